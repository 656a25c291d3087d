use crate::core::{CapacitySource, ExamSource, GovernanceSource, Storage};
use crate::domain::model::{
    ExamRow, GovernanceRule, LocationCapacity, ModalityCapacity, ScheduledSnapshot,
};
use crate::utils::error::{CapacityError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// File names read from the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFiles {
    pub scheduled: String,
    pub completed: String,
    pub governance: String,
    pub location_capacity: String,
    pub modality_capacity: String,
}

impl Default for CsvFiles {
    fn default() -> Self {
        Self {
            scheduled: "scheduled.csv".to_string(),
            completed: "completed.csv".to_string(),
            governance: "governance.csv".to_string(),
            location_capacity: "capacity_location.csv".to_string(),
            modality_capacity: "capacity_modality.csv".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScheduledCsvRow {
    location: String,
    modality: String,
    volume: u64,
    service_date: NaiveDate,
    #[serde(default)]
    captured_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct GovernanceCsvRow {
    modality: String,
    weight: f64,
    effective_start: NaiveDate,
    #[serde(default)]
    effective_end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct LocationCapacityCsvRow {
    location: String,
    capacity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ModalityCapacityCsvRow {
    location: String,
    modality: String,
    capacity: Option<f64>,
}

/// Reads every report input from CSV extracts behind a `Storage`.
#[derive(Debug, Clone)]
pub struct CsvSource<S: Storage> {
    storage: S,
    files: CsvFiles,
}

impl<S: Storage> CsvSource<S> {
    pub fn new(storage: S) -> Self {
        Self::with_files(storage, CsvFiles::default())
    }

    pub fn with_files(storage: S, files: CsvFiles) -> Self {
        Self { storage, files }
    }

    async fn read_rows<T: DeserializeOwned>(&self, source_name: &str, file: &str) -> Result<Vec<T>> {
        tracing::debug!("Reading {} rows from {}", source_name, file);
        let bytes = self
            .storage
            .read_file(file)
            .await
            .map_err(|e| CapacityError::source_unavailable(source_name, format!("{}: {}", file, e)))?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes.as_slice());

        reader
            .deserialize()
            .map(|record| {
                record.map_err(|e| {
                    CapacityError::source_unavailable(source_name, format!("{}: {}", file, e))
                })
            })
            .collect()
    }
}

fn check_finite(source_name: &str, label: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CapacityError::source_unavailable(
            source_name,
            format!("non-numeric value {} for {}", value, label),
        ))
    }
}

#[async_trait]
impl<S: Storage> ExamSource for CsvSource<S> {
    async fn scheduled_snapshot(&self, dos: NaiveDate) -> Result<ScheduledSnapshot> {
        let rows: Vec<ScheduledCsvRow> = self.read_rows("scheduled", &self.files.scheduled).await?;

        let day: Vec<ScheduledCsvRow> = rows.into_iter().filter(|r| r.service_date == dos).collect();

        // 同一 DOS 若有多個擷取日，只保留最新一次擷取
        let latest = day.iter().filter_map(|r| r.captured_on).max();
        let dropped = day.iter().filter(|r| r.captured_on != latest).count();
        if dropped > 0 {
            tracing::debug!("Skipping {} scheduled rows from older captures of {}", dropped, dos);
        }

        let rows = day
            .into_iter()
            .filter(|r| r.captured_on == latest)
            .map(|row| ExamRow {
                location: row.location,
                modality: row.modality,
                volume: row.volume,
                service_date: row.service_date,
            })
            .collect();

        Ok(ScheduledSnapshot {
            snapshot_date: latest,
            rows,
        })
    }

    async fn completed_exams(&self, dos: NaiveDate) -> Result<Vec<ExamRow>> {
        let rows: Vec<ExamRow> = self.read_rows("completed", &self.files.completed).await?;
        Ok(rows.into_iter().filter(|r| r.service_date == dos).collect())
    }
}

#[async_trait]
impl<S: Storage> GovernanceSource for CsvSource<S> {
    async fn governance_rules(&self) -> Result<Vec<GovernanceRule>> {
        let rows: Vec<GovernanceCsvRow> = self.read_rows("governance", &self.files.governance).await?;

        rows.into_iter()
            .map(|row| {
                let weight = check_finite("governance", &row.modality, row.weight)?;
                Ok(GovernanceRule::new(
                    &row.modality,
                    weight,
                    row.effective_start,
                    row.effective_end,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl<S: Storage> CapacitySource for CsvSource<S> {
    async fn location_capacity(&self) -> Result<Vec<LocationCapacity>> {
        let rows: Vec<LocationCapacityCsvRow> = self
            .read_rows("location capacity", &self.files.location_capacity)
            .await?;

        // 空白容量視為無基準
        rows.into_iter()
            .filter_map(|row| row.capacity.map(|capacity| (row.location, capacity)))
            .map(|(location, capacity)| {
                let capacity = check_finite("location capacity", &location, capacity)?;
                Ok(LocationCapacity { location, capacity })
            })
            .collect()
    }

    async fn modality_capacity(&self) -> Result<Vec<ModalityCapacity>> {
        let rows: Vec<ModalityCapacityCsvRow> = self
            .read_rows("modality capacity", &self.files.modality_capacity)
            .await?;

        rows.into_iter()
            .filter_map(|row| {
                row.capacity
                    .map(|capacity| (row.location, row.modality, capacity))
            })
            .map(|(location, modality, capacity)| {
                let capacity = check_finite("modality capacity", &location, capacity)?;
                Ok(ModalityCapacity {
                    location,
                    modality,
                    capacity,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, content: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), content.as_bytes().to_vec());
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                CapacityError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_scheduled_snapshot_filters_by_dos() {
        let storage = MockStorage::default();
        storage
            .put(
                "scheduled.csv",
                "location,modality,volume,service_date,captured_on\n\
                 NORTH,MRI,12,2026-01-16,2026-01-15\n\
                 NORTH, ct ,4,2026-01-16,2026-01-16\n\
                 SOUTH,MRI,9,2026-01-17,2026-01-16\n",
            )
            .await;
        let source = CsvSource::new(storage);

        let snapshot = source.scheduled_snapshot(date(2026, 1, 16)).await.unwrap();

        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].modality, "ct");
        assert_eq!(snapshot.snapshot_date, Some(date(2026, 1, 16)));
    }

    #[tokio::test]
    async fn test_scheduled_snapshot_keeps_only_latest_capture() {
        let storage = MockStorage::default();
        storage
            .put(
                "scheduled.csv",
                "location,modality,volume,service_date,captured_on\n\
                 NORTH,MRI,40,2026-01-16,2026-01-14\n\
                 NORTH,MRI,50,2026-01-16,2026-01-15\n\
                 SOUTH,CT,7,2026-01-16,2026-01-15\n",
            )
            .await;
        let source = CsvSource::new(storage);

        let snapshot = source.scheduled_snapshot(date(2026, 1, 16)).await.unwrap();

        assert_eq!(snapshot.snapshot_date, Some(date(2026, 1, 15)));
        assert_eq!(snapshot.rows.len(), 2);
        let north: u64 = snapshot
            .rows
            .iter()
            .filter(|r| r.location == "NORTH")
            .map(|r| r.volume)
            .sum();
        assert_eq!(north, 50);
    }

    #[tokio::test]
    async fn test_scheduled_snapshot_without_capture_column() {
        let storage = MockStorage::default();
        storage
            .put(
                "scheduled.csv",
                "location,modality,volume,service_date\nNORTH,MRI,12,2026-01-16\n",
            )
            .await;
        let source = CsvSource::new(storage);

        let snapshot = source.scheduled_snapshot(date(2026, 1, 16)).await.unwrap();
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.snapshot_date, None);
    }

    #[tokio::test]
    async fn test_governance_rules_are_normalized_with_open_end() {
        let storage = MockStorage::default();
        storage
            .put(
                "governance.csv",
                "modality,weight,effective_start,effective_end\n\
                 mri ,2.5,2025-01-01,\n\
                 CT,1.25,2025-01-01,2025-12-31\n",
            )
            .await;
        let source = CsvSource::new(storage);

        let rules = source.governance_rules().await.unwrap();
        assert_eq!(rules[0].modality, "MRI");
        assert_eq!(rules[0].effective_end, None);
        assert_eq!(rules[1].effective_end, Some(date(2025, 12, 31)));
    }

    #[tokio::test]
    async fn test_blank_capacity_means_no_benchmark() {
        let storage = MockStorage::default();
        storage
            .put("capacity_location.csv", "location,capacity\nNORTH,120.5\nSOUTH,\n")
            .await;
        storage
            .put(
                "capacity_modality.csv",
                "location,modality,capacity\nNORTH,MRI,80\nNORTH,CT,\n",
            )
            .await;
        let source = CsvSource::new(storage);

        let locations = source.location_capacity().await.unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].capacity, 120.5);

        let modalities = source.modality_capacity().await.unwrap();
        assert_eq!(modalities.len(), 1);
        assert_eq!(modalities[0].modality, "MRI");
    }

    #[tokio::test]
    async fn test_malformed_rows_are_source_unavailable() {
        let storage = MockStorage::default();
        storage
            .put(
                "completed.csv",
                "location,modality,volume,service_date\nNORTH,MRI,many,2026-01-16\n",
            )
            .await;
        let source = CsvSource::new(storage);

        let err = source.completed_exams(date(2026, 1, 16)).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("completed"));
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let source = CsvSource::new(MockStorage::default());

        let err = source.governance_rules().await.unwrap_err();
        assert!(matches!(err, CapacityError::SourceUnavailable { .. }));
    }
}
