//! Downloadable datasets and their file formats.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Csv,
    Tsv,
    Excel,
    Parquet,
}

impl DatasetFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            DatasetFormat::Csv => "text/csv",
            DatasetFormat::Tsv => "text/tab-separated-values",
            DatasetFormat::Excel => "application/vnd.ms-excel",
            DatasetFormat::Parquet => "application/octet-stream",
        }
    }

    /// The name used in download URLs and the suggested filename.
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetFormat::Csv => "csv",
            DatasetFormat::Tsv => "tsv",
            DatasetFormat::Excel => "excel",
            DatasetFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for DatasetFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(DatasetFormat::Csv),
            "tsv" => Ok(DatasetFormat::Tsv),
            "excel" => Ok(DatasetFormat::Excel),
            "parquet" => Ok(DatasetFormat::Parquet),
            other => Err(Error::NotFound(format!("Unsupported format {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Daily change in percent of every stock over the sentiment window.
    MarketSentiment,
}

impl FromStr for Dataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market_sentiment" => Ok(Dataset::MarketSentiment),
            other => Err(Error::NotFound(format!("Unsupported dataset {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_only() {
        assert_eq!("tsv".parse::<DatasetFormat>().unwrap(), DatasetFormat::Tsv);
        assert!("xml".parse::<DatasetFormat>().unwrap_err().is_not_found());
        assert_eq!(
            "market_sentiment".parse::<Dataset>().unwrap(),
            Dataset::MarketSentiment
        );
        assert!("prices".parse::<Dataset>().is_err());
    }
}
