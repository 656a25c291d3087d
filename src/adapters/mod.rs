// Adapters layer: concrete sources and sinks behind the domain ports.

pub mod archive;
pub mod csv_source;
pub mod http_source;
pub mod storage;

pub use archive::ReportArchive;
pub use csv_source::{CsvFiles, CsvSource};
pub use http_source::HttpSource;
pub use storage::LocalStorage;
