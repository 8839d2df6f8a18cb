//! Writes a price table to disk as one row per stock and one column per day.

use std::fs::File;
use std::path::Path;

use log::debug;
use polars::prelude::{DataFrame, NamedFrom, ParquetWriter, Series};
use rust_xlsxwriter::Workbook;

use super::export_model::DatasetFormat;
use crate::errors::{Error, Result};
use crate::quotes::PriceMatrix;
use crate::utils::time_utils::format_ymd;

const INDEX_COLUMN: &str = "asx_code";

fn export_error(err: impl std::fmt::Display) -> Error {
    Error::Export(err.to_string())
}

fn header(matrix: &PriceMatrix) -> Vec<String> {
    std::iter::once(INDEX_COLUMN.to_string())
        .chain(matrix.dates().iter().map(|d| format_ymd(*d)))
        .collect()
}

fn write_delimited(matrix: &PriceMatrix, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(export_error)?;
    writer.write_record(header(matrix)).map_err(export_error)?;
    for stock in matrix.stocks() {
        let mut record = vec![stock.to_string()];
        record.extend(
            matrix
                .dates()
                .iter()
                .map(|d| matrix.value(stock, *d).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).map_err(export_error)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_excel(matrix: &PriceMatrix, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in header(matrix).iter().enumerate() {
        sheet
            .write_string(0, col as u16, name.as_str())
            .map_err(export_error)?;
    }
    for (row, stock) in matrix.stocks().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, stock).map_err(export_error)?;
        for (col, date) in matrix.dates().iter().enumerate() {
            if let Some(value) = matrix.value(stock, *date) {
                sheet
                    .write_number(row, col as u16 + 1, value)
                    .map_err(export_error)?;
            }
        }
    }
    workbook.save(path).map_err(export_error)?;
    Ok(())
}

fn write_parquet(matrix: &PriceMatrix, path: &Path) -> Result<()> {
    let stocks: Vec<&str> = matrix.stocks().collect();
    let mut columns = vec![Series::new(INDEX_COLUMN, stocks.clone())];
    for date in matrix.dates() {
        let values: Vec<Option<f64>> = stocks.iter().map(|s| matrix.value(s, *date)).collect();
        columns.push(Series::new(format_ymd(*date).as_str(), values));
    }
    let mut frame = DataFrame::new(columns).map_err(export_error)?;
    let file = File::create(path)?;
    ParquetWriter::new(file)
        .finish(&mut frame)
        .map_err(export_error)?;
    Ok(())
}

/// Writes `matrix` to `path`; an empty table is refused.
pub fn write_dataset(matrix: &PriceMatrix, format: DatasetFormat, path: &Path) -> Result<()> {
    if matrix.is_empty() {
        return Err(Error::NotFound("No data available for download".to_string()));
    }
    debug!(
        "Writing {} stocks x {} days as {}",
        matrix.n_stocks(),
        matrix.dates().len(),
        format.as_str()
    );
    match format {
        DatasetFormat::Csv => write_delimited(matrix, path, b','),
        DatasetFormat::Tsv => write_delimited(matrix, path, b'\t'),
        DatasetFormat::Excel => write_excel(matrix, path),
        DatasetFormat::Parquet => write_parquet(matrix, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::{QuoteField, Quotation};
    use chrono::NaiveDate;

    fn sample() -> PriceMatrix {
        let quotes = vec![
            Quotation {
                asx_code: "ANZ".to_string(),
                fetch_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
                change_in_percent: Some(1.5),
                ..Default::default()
            },
            Quotation {
                asx_code: "BHP".to_string(),
                fetch_date: NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
                change_in_percent: Some(-0.25),
                ..Default::default()
            },
        ];
        PriceMatrix::from_quotations(QuoteField::ChangeInPercent, &quotes)
    }

    #[test]
    fn tsv_has_wide_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_dataset(&sample(), DatasetFormat::Tsv, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "asx_code\t2024-11-01\t2024-11-04");
        assert_eq!(lines[1], "ANZ\t1.5\t");
        assert_eq!(lines[2], "BHP\t\t-0.25");
    }

    #[test]
    fn binary_formats_produce_files() {
        let dir = tempfile::tempdir().unwrap();
        for format in [DatasetFormat::Excel, DatasetFormat::Parquet] {
            let path = dir.path().join(format!("out.{}", format.as_str()));
            write_dataset(&sample(), format, &path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn empty_table_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let empty = PriceMatrix::from_quotations(QuoteField::ChangeInPercent, std::iter::empty());
        let err = write_dataset(&empty, DatasetFormat::Csv, &dir.path().join("x.csv")).unwrap_err();
        assert!(err.is_not_found());
    }
}
