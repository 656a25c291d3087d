use crate::core::{CapacitySource, ExamSource, GovernanceSource};
use crate::domain::model::{
    ExamRow, GovernanceRule, LocationCapacity, ModalityCapacity, ScheduledSnapshot,
};
use crate::utils::error::{CapacityError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct LocationCapacityRow {
    location: String,
    #[serde(default)]
    capacity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ModalityCapacityRow {
    location: String,
    modality: String,
    #[serde(default)]
    capacity: Option<f64>,
}

/// Reads report inputs from a JSON reporting API.
///
/// | Path | Body |
/// |------|------|
/// | `scheduled?dos=YYYY-MM-DD` | `{"snapshot_date": .., "rows": [..]}` |
/// | `completed?dos=YYYY-MM-DD` | `[ExamRow]` |
/// | `governance` | `[GovernanceRule]` |
/// | `capacity/locations` | `[LocationCapacity]` |
/// | `capacity/modalities` | `[ModalityCapacity]` |
#[derive(Debug, Clone)]
pub struct HttpSource {
    endpoint: String,
    client: Client,
}

impl HttpSource {
    pub fn new(endpoint: &str, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(|e| CapacityError::ConfigError {
            message: format!("HTTP client setup failed: {}", e),
        })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        source_name: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.endpoint, path);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CapacityError::source_unavailable(source_name, e))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(CapacityError::source_unavailable(
                source_name,
                format!("HTTP {} from {}", status, url),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CapacityError::source_unavailable(source_name, format!("malformed body: {}", e)))
    }
}

fn dos_query(dos: NaiveDate) -> [(&'static str, String); 1] {
    [("dos", dos.format("%Y-%m-%d").to_string())]
}

#[async_trait]
impl ExamSource for HttpSource {
    async fn scheduled_snapshot(&self, dos: NaiveDate) -> Result<ScheduledSnapshot> {
        self.get_json("scheduled", "scheduled", &dos_query(dos)).await
    }

    async fn completed_exams(&self, dos: NaiveDate) -> Result<Vec<ExamRow>> {
        self.get_json("completed", "completed", &dos_query(dos)).await
    }
}

#[async_trait]
impl GovernanceSource for HttpSource {
    async fn governance_rules(&self) -> Result<Vec<GovernanceRule>> {
        let rules: Vec<GovernanceRule> = self.get_json("governance", "governance", &[]).await?;
        Ok(rules
            .into_iter()
            .map(|r| GovernanceRule::new(&r.modality, r.weight, r.effective_start, r.effective_end))
            .collect())
    }
}

#[async_trait]
impl CapacitySource for HttpSource {
    async fn location_capacity(&self) -> Result<Vec<LocationCapacity>> {
        let rows: Vec<LocationCapacityRow> = self
            .get_json("location capacity", "capacity/locations", &[])
            .await?;

        // null 容量視為無基準
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.capacity.map(|capacity| LocationCapacity {
                    location: row.location,
                    capacity,
                })
            })
            .collect())
    }

    async fn modality_capacity(&self) -> Result<Vec<ModalityCapacity>> {
        let rows: Vec<ModalityCapacityRow> = self
            .get_json("modality capacity", "capacity/modalities", &[])
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.capacity.map(|capacity| ModalityCapacity {
                    location: row.location,
                    modality: row.modality,
                    capacity,
                })
            })
            .collect())
    }
}
