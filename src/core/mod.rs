pub mod aggregate;
pub mod capacity;
pub mod engine;
pub mod execution;
pub mod network;
pub mod ops;
pub mod report;
pub mod rounding;
pub mod weights;

pub use crate::domain::model::{DailyCapacityResult, ExamRow, GovernanceRule, ScheduledSnapshot};
pub use crate::domain::ports::{
    CapacitySource, ConfigProvider, ExamSource, GovernanceSource, SourceSettings, Storage,
};
pub use crate::utils::error::Result;
