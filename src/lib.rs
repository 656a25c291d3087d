pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod presentation;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use crate::adapters::{CsvSource, HttpSource, LocalStorage, ReportArchive};
pub use crate::core::{engine::CapacityEngine, ops::OpsDailyCapacityResult};
pub use crate::domain::model::{Audience, DailyCapacityResult, RangeCapacityResult};
pub use crate::utils::error::{CapacityError, Result};
