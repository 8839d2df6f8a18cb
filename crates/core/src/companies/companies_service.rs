use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::companies_model::{CompanyDetails, Security, ETF_SECURITY_NAME};
use super::companies_traits::{CompanyRepositoryTrait, CompanyServiceTrait};
use crate::errors::Result;

pub struct CompanyService {
    repository: Arc<dyn CompanyRepositoryTrait>,
}

impl CompanyService {
    pub fn new(repository: Arc<dyn CompanyRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CompanyServiceTrait for CompanyService {
    fn securities(&self, asx_code: &str) -> Result<Vec<Security>> {
        self.repository.securities_for(asx_code)
    }

    fn company_details(&self, asx_code: &str) -> Result<Option<CompanyDetails>> {
        self.repository.company_details(asx_code)
    }

    fn all_sector_stocks(&self, sector: &str) -> Result<Vec<String>> {
        if sector.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.sector_stocks(sector)
    }

    fn all_sectors(&self) -> Result<Vec<String>> {
        self.repository.sectors()
    }

    fn sector_memberships(&self) -> Result<HashMap<String, String>> {
        Ok(self.repository.sector_memberships()?.into_iter().collect())
    }

    fn find_named_companies(&self, name: &str, activity: &str) -> Result<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        let name = name.trim();
        let activity = activity.trim();
        if !name.is_empty() {
            found.extend(self.repository.codes_matching_name(name)?);
        }
        if !activity.is_empty() {
            found.extend(self.repository.codes_matching_activity(activity)?);
        }
        debug!(
            "Found {} companies for name '{}' / activity '{}'",
            found.len(),
            name,
            activity
        );
        Ok(found)
    }

    fn all_etfs(&self) -> Result<Vec<String>> {
        let mut codes = self.repository.codes_with_security_name(ETF_SECURITY_NAME)?;
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    async fn import_securities(&self, securities: Vec<Security>) -> Result<usize> {
        self.repository.upsert_securities(securities).await
    }

    async fn import_company_details(&self, details: Vec<CompanyDetails>) -> Result<usize> {
        self.repository.upsert_company_details(details).await
    }
}
