//! Listed company domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tradeable security issued by a listed company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub asx_code: String,
    pub asx_isin_code: String,
    pub company_name: String,
    pub security_name: String,
}

/// Slow-changing company metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub asx_code: String,
    pub name_full: String,
    pub sector_name: Option<String>,
    pub principal_activities: Option<String>,
    pub web_address: Option<String>,
    pub phone_number: Option<String>,
    pub listing_date: Option<NaiveDate>,
}

/// Security names containing this marker are exchange traded funds.
pub const ETF_SECURITY_NAME: &str = "EXCHANGE TRADED FUND";
