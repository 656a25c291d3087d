use crate::domain::model::{
    Audience, ExamRow, GovernanceRule, LocationCapacity, ModalityCapacity, ScheduledSnapshot,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Scheduled and completed exam populations. Both share the `ExamRow` shape.
#[async_trait]
pub trait ExamSource: Send + Sync {
    async fn scheduled_snapshot(&self, dos: NaiveDate) -> Result<ScheduledSnapshot>;
    async fn completed_exams(&self, dos: NaiveDate) -> Result<Vec<ExamRow>>;
}

#[async_trait]
pub trait GovernanceSource: Send + Sync {
    async fn governance_rules(&self) -> Result<Vec<GovernanceRule>>;
}

#[async_trait]
pub trait CapacitySource: Send + Sync {
    async fn location_capacity(&self) -> Result<Vec<LocationCapacity>>;
    async fn modality_capacity(&self) -> Result<Vec<ModalityCapacity>>;
}

/// Where report inputs come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSettings {
    Csv { path: String },
    Http { endpoint: String, timeout_seconds: Option<u64> },
}

pub trait ConfigProvider: Send + Sync {
    fn source_settings(&self) -> SourceSettings;
    fn output_path(&self) -> Option<&str>;
    fn audience(&self) -> Audience;
    fn days(&self) -> usize;
}
