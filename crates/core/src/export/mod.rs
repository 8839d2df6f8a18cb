//! Dataset export - csv, tsv, excel and parquet renditions of price tables.

mod export_model;
mod export_writer;

pub use export_model::{Dataset, DatasetFormat};
pub use export_writer::write_dataset;
