use crate::core::ops::OpsDailyCapacityResult;
use crate::core::Storage;
use crate::domain::model::{Audience, DailyCapacityResult};
use crate::presentation::{console, email, ops};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Bundles every rendering of a daily result into one ZIP per date of service.
#[derive(Debug, Clone)]
pub struct ReportArchive<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportArchive<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn archive_name(result: &DailyCapacityResult) -> String {
        format!("daily_capacity_{}.zip", result.dos())
    }

    /// Writes the bundle and returns its name relative to the storage root.
    pub async fn write(&self, result: &DailyCapacityResult) -> Result<String> {
        let name = Self::archive_name(result);
        let ops_result = OpsDailyCapacityResult::from_daily(result);

        let entries: Vec<(&str, String)> = vec![
            ("report.txt", console::render_daily_capacity(result)),
            (
                "scheduling.html",
                email::build_capacity_email(result, Audience::Scheduling).html,
            ),
            ("ops.html", email::build_capacity_email(result, Audience::Ops).html),
            ("ops.txt", ops::render_ops_capacity_text(&ops_result)),
            ("result.json", serde_json::to_string_pretty(result)?),
        ];

        tracing::debug!("Creating ZIP file with {} files", entries.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (file_name, content) in &entries {
                zip.start_file::<_, ()>(*file_name, FileOptions::default())?;
                zip.write_all(content.as_bytes())?;
            }
            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&name, &zip_data).await?;

        tracing::info!("📦 Report archive saved: {}", name);
        Ok(name)
    }
}
