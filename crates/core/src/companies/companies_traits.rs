use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use super::companies_model::{CompanyDetails, Security};
use crate::errors::Result;

/// Storage contract for securities and company details.
#[async_trait]
pub trait CompanyRepositoryTrait: Send + Sync {
    fn securities_for(&self, asx_code: &str) -> Result<Vec<Security>>;

    fn company_details(&self, asx_code: &str) -> Result<Option<CompanyDetails>>;

    /// Codes of every company in the sector, ascending.
    fn sector_stocks(&self, sector: &str) -> Result<Vec<String>>;

    /// Distinct non-empty sector names, ascending.
    fn sectors(&self) -> Result<Vec<String>>;

    /// (code, sector) for every company with a sector.
    fn sector_memberships(&self) -> Result<Vec<(String, String)>>;

    /// Codes whose full company name or security company name contains `fragment` (case-insensitive).
    fn codes_matching_name(&self, fragment: &str) -> Result<Vec<String>>;

    /// Codes whose principal activities contain `fragment` (case-insensitive).
    fn codes_matching_activity(&self, fragment: &str) -> Result<Vec<String>>;

    /// Codes with a security whose name contains `security_name` (case-insensitive).
    fn codes_with_security_name(&self, security_name: &str) -> Result<Vec<String>>;

    async fn upsert_securities(&self, securities: Vec<Security>) -> Result<usize>;

    async fn upsert_company_details(&self, details: Vec<CompanyDetails>) -> Result<usize>;
}

#[async_trait]
pub trait CompanyServiceTrait: Send + Sync {
    fn securities(&self, asx_code: &str) -> Result<Vec<Security>>;

    fn company_details(&self, asx_code: &str) -> Result<Option<CompanyDetails>>;

    fn all_sector_stocks(&self, sector: &str) -> Result<Vec<String>>;

    fn all_sectors(&self) -> Result<Vec<String>>;

    /// Sector name keyed by stock code.
    fn sector_memberships(&self) -> Result<HashMap<String, String>>;

    /// Union of name and activity matches; an empty fragment matches nothing.
    fn find_named_companies(&self, name: &str, activity: &str) -> Result<BTreeSet<String>>;

    fn all_etfs(&self) -> Result<Vec<String>>;

    async fn import_securities(&self, securities: Vec<Security>) -> Result<usize>;

    async fn import_company_details(&self, details: Vec<CompanyDetails>) -> Result<usize>;
}
