//! Summary exports written next to the charts

pub mod csv_export;
pub mod json_export;

pub use csv_export::CsvExporter;
pub use json_export::JsonExporter;
