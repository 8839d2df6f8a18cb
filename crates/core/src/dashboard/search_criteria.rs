//! Typed criteria for the three search pages.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::quotes::QuotationFilter;

pub const DEFAULT_MIN_YIELD: f64 = 0.0;
pub const DEFAULT_MAX_YIELD: f64 = 10000.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SectorSearch {
    pub sector: String,
    pub best10: bool,
    pub worst10: bool,
}

impl SectorSearch {
    pub fn validate(&self) -> Result<()> {
        if self.sector.trim().is_empty() {
            return Err(ValidationError::MissingField("sector".to_string()).into());
        }
        Ok(())
    }

    /// True when the result is restricted to best and/or worst performers.
    pub fn is_restricted(&self) -> bool {
        self.best10 || self.worst10
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YieldSearch {
    pub min_yield: f64,
    pub max_yield: f64,
    pub min_pe: Option<f64>,
    pub max_pe: Option<f64>,
}

impl Default for YieldSearch {
    fn default() -> Self {
        Self {
            min_yield: DEFAULT_MIN_YIELD,
            max_yield: DEFAULT_MAX_YIELD,
            min_pe: None,
            max_pe: None,
        }
    }
}

impl YieldSearch {
    pub fn validate(&self) -> Result<()> {
        let all = [Some(self.min_yield), Some(self.max_yield), self.min_pe, self.max_pe];
        if all.iter().flatten().any(|v| !v.is_finite()) {
            return Err(
                ValidationError::InvalidInput("search bounds must be numbers".to_string()).into(),
            );
        }
        if self.min_yield > self.max_yield {
            return Err(ValidationError::InvalidInput(
                "min_yield must not exceed max_yield".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn filter(&self) -> QuotationFilter {
        QuotationFilter {
            min_yield: Some(self.min_yield),
            max_yield: Some(self.max_yield),
            min_pe: self.min_pe,
            max_pe: self.max_pe,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanySearch {
    pub name: String,
    pub activity: String,
}

impl CompanySearch {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() && self.activity.trim().is_empty() {
            return Err(ValidationError::MissingField("name or activity".to_string()).into());
        }
        Ok(())
    }
}
