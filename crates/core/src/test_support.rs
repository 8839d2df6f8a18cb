//! In-memory repositories shared by the service tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::companies::{
    CompanyDetails, CompanyRepositoryTrait, CompanyService, CompanyServiceTrait, Security,
};
use crate::dashboard::DashboardService;
use crate::errors::Result;
use crate::purchases::{PurchaseRepositoryTrait, PurchaseService, VirtualPurchase};
use crate::quotes::{Quotation, QuoteRepositoryTrait, QuoteService, QuoteServiceTrait};
use crate::watchlist::{WatchlistEntry, WatchlistRepositoryTrait, WatchlistService};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
pub struct MockQuoteRepository {
    pub quotes: Mutex<Vec<Quotation>>,
}

impl MockQuoteRepository {
    pub fn with(quotes: Vec<Quotation>) -> Self {
        Self {
            quotes: Mutex::new(quotes),
        }
    }
}

fn code_wanted(codes: Option<&[String]>, code: &str) -> bool {
    codes.map_or(true, |c| c.iter().any(|w| w == code))
}

#[async_trait]
impl QuoteRepositoryTrait for MockQuoteRepository {
    fn available_dates(&self, asx_code: Option<&str>) -> Result<Vec<NaiveDate>> {
        let dates: BTreeSet<NaiveDate> = self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| asx_code.map_or(true, |c| q.asx_code == c))
            .map(|q| q.fetch_date)
            .collect();
        Ok(dates.into_iter().collect())
    }

    fn quotes_on(&self, date: NaiveDate, codes: Option<&[String]>) -> Result<Vec<Quotation>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.fetch_date == date && code_wanted(codes, &q.asx_code))
            .cloned()
            .collect())
    }

    fn quotes_between(
        &self,
        codes: Option<&[String]>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quotation>> {
        let mut found: Vec<Quotation> = self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.fetch_date >= start && q.fetch_date <= end)
            .filter(|q| code_wanted(codes, &q.asx_code))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.asx_code
                .cmp(&b.asx_code)
                .then_with(|| a.fetch_date.cmp(&b.fetch_date))
        });
        Ok(found)
    }

    async fn upsert_quotations(&self, quotations: Vec<Quotation>) -> Result<usize> {
        let mut stored = self.quotes.lock().unwrap();
        let n = quotations.len();
        for q in quotations {
            stored.retain(|s| !(s.asx_code == q.asx_code && s.fetch_date == q.fetch_date));
            stored.push(q);
        }
        Ok(n)
    }
}

#[derive(Default)]
pub struct MockCompanyRepository {
    pub securities: Mutex<Vec<Security>>,
    pub details: Mutex<Vec<CompanyDetails>>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CompanyRepositoryTrait for MockCompanyRepository {
    fn securities_for(&self, asx_code: &str) -> Result<Vec<Security>> {
        Ok(self
            .securities
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.asx_code == asx_code)
            .cloned()
            .collect())
    }

    fn company_details(&self, asx_code: &str) -> Result<Option<CompanyDetails>> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.asx_code == asx_code)
            .cloned())
    }

    fn sector_stocks(&self, sector: &str) -> Result<Vec<String>> {
        let mut codes: Vec<String> = self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.sector_name.as_deref() == Some(sector))
            .map(|d| d.asx_code.clone())
            .collect();
        codes.sort();
        Ok(codes)
    }

    fn sectors(&self) -> Result<Vec<String>> {
        let sectors: BTreeSet<String> = self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter_map(|d| d.sector_name.clone())
            .collect();
        Ok(sectors.into_iter().collect())
    }

    fn sector_memberships(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter_map(|d| d.sector_name.clone().map(|s| (d.asx_code.clone(), s)))
            .collect())
    }

    fn codes_matching_name(&self, fragment: &str) -> Result<Vec<String>> {
        let mut codes: Vec<String> = self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| contains_ci(&d.name_full, fragment))
            .map(|d| d.asx_code.clone())
            .collect();
        codes.extend(
            self.securities
                .lock()
                .unwrap()
                .iter()
                .filter(|s| contains_ci(&s.company_name, fragment))
                .map(|s| s.asx_code.clone()),
        );
        Ok(codes)
    }

    fn codes_matching_activity(&self, fragment: &str) -> Result<Vec<String>> {
        Ok(self
            .details
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.principal_activities
                    .as_deref()
                    .is_some_and(|a| contains_ci(a, fragment))
            })
            .map(|d| d.asx_code.clone())
            .collect())
    }

    fn codes_with_security_name(&self, security_name: &str) -> Result<Vec<String>> {
        Ok(self
            .securities
            .lock()
            .unwrap()
            .iter()
            .filter(|s| contains_ci(&s.security_name, security_name))
            .map(|s| s.asx_code.clone())
            .collect())
    }

    async fn upsert_securities(&self, securities: Vec<Security>) -> Result<usize> {
        let n = securities.len();
        self.securities.lock().unwrap().extend(securities);
        Ok(n)
    }

    async fn upsert_company_details(&self, details: Vec<CompanyDetails>) -> Result<usize> {
        let n = details.len();
        self.details.lock().unwrap().extend(details);
        Ok(n)
    }
}

#[derive(Default)]
pub struct MockWatchlistRepository {
    pub entries: Mutex<Vec<WatchlistEntry>>,
}

impl MockWatchlistRepository {
    pub fn watching(user_id: &str, codes: &[&str]) -> Self {
        let added_at = ymd(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        Self {
            entries: Mutex::new(
                codes
                    .iter()
                    .map(|c| WatchlistEntry {
                        user_id: user_id.to_string(),
                        asx_code: c.to_string(),
                        added_at,
                    })
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for MockWatchlistRepository {
    fn list_entries(&self, user_id: &str) -> Result<Vec<WatchlistEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    fn contains(&self, user_id: &str, asx_code: &str) -> Result<bool> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.user_id == user_id && e.asx_code == asx_code))
    }

    async fn add(&self, user_id: &str, asx_code: &str) -> Result<usize> {
        if self.contains(user_id, asx_code)? {
            return Ok(0);
        }
        self.entries.lock().unwrap().push(WatchlistEntry {
            user_id: user_id.to_string(),
            asx_code: asx_code.to_string(),
            added_at: ymd(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
        });
        Ok(1)
    }

    async fn remove(&self, user_id: &str, asx_code: &str) -> Result<usize> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !(e.user_id == user_id && e.asx_code == asx_code));
        Ok(before - entries.len())
    }
}

#[derive(Default)]
pub struct MockPurchaseRepository {
    pub purchases: Mutex<Vec<VirtualPurchase>>,
}

#[async_trait]
impl PurchaseRepositoryTrait for MockPurchaseRepository {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<VirtualPurchase>> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, purchase_id: &str) -> Result<Option<VirtualPurchase>> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == purchase_id)
            .cloned())
    }

    async fn insert(&self, purchase: VirtualPurchase) -> Result<VirtualPurchase> {
        self.purchases.lock().unwrap().push(purchase.clone());
        Ok(purchase)
    }

    async fn update(&self, purchase: VirtualPurchase) -> Result<VirtualPurchase> {
        let mut stored = self.purchases.lock().unwrap();
        if let Some(existing) = stored.iter_mut().find(|p| p.id == purchase.id) {
            *existing = purchase.clone();
        }
        Ok(purchase)
    }

    async fn delete(&self, purchase_id: &str) -> Result<usize> {
        let mut stored = self.purchases.lock().unwrap();
        let before = stored.len();
        stored.retain(|p| p.id != purchase_id);
        Ok(before - stored.len())
    }
}

/// A quotation with a price, yield and daily change.
pub fn quote(code: &str, date: NaiveDate, price: f64, dy: f64, change: f64) -> Quotation {
    Quotation {
        asx_code: code.to_string(),
        fetch_date: date,
        last_price: Some(price),
        annual_dividend_yield: Some(dy),
        change_in_percent: Some(change),
        volume: Some(1000),
        ..Default::default()
    }
}

pub fn details(code: &str, name: &str, sector: Option<&str>) -> CompanyDetails {
    CompanyDetails {
        asx_code: code.to_string(),
        name_full: name.to_string(),
        sector_name: sector.map(str::to_string),
        ..Default::default()
    }
}

/// Services wired over in-memory repositories.
pub struct Fixture {
    pub quotes: Arc<MockQuoteRepository>,
    pub companies: Arc<MockCompanyRepository>,
    pub watchlist: Arc<MockWatchlistRepository>,
    pub purchases: Arc<MockPurchaseRepository>,
}

impl Fixture {
    pub fn new(quotes: Vec<Quotation>, company_details: Vec<CompanyDetails>) -> Self {
        Self {
            quotes: Arc::new(MockQuoteRepository::with(quotes)),
            companies: Arc::new(MockCompanyRepository {
                details: Mutex::new(company_details),
                ..Default::default()
            }),
            watchlist: Arc::new(MockWatchlistRepository::default()),
            purchases: Arc::new(MockPurchaseRepository::default()),
        }
    }

    pub fn quote_service(&self) -> Arc<dyn QuoteServiceTrait> {
        Arc::new(QuoteService::new(self.quotes.clone(), "ANZ"))
    }

    pub fn company_service(&self) -> Arc<dyn CompanyServiceTrait> {
        Arc::new(CompanyService::new(self.companies.clone()))
    }

    pub fn purchase_service(&self) -> PurchaseService {
        PurchaseService::new(self.purchases.clone(), self.quote_service())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(
            self.quote_service(),
            self.company_service(),
            Arc::new(WatchlistService::new(self.watchlist.clone())),
            Arc::new(self.purchase_service()),
        )
    }
}
