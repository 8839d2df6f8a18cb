use asxtrade_core::companies::{CompanyDetails, Security};
use chrono::NaiveDate;
use diesel::prelude::*;

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::securities)]
#[diesel(primary_key(asx_isin_code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SecurityDB {
    pub asx_isin_code: String,
    pub asx_code: String,
    pub company_name: String,
    pub security_name: String,
}

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::company_details)]
#[diesel(primary_key(asx_code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompanyDetailsDB {
    pub asx_code: String,
    pub name_full: String,
    pub sector_name: Option<String>,
    pub principal_activities: Option<String>,
    pub web_address: Option<String>,
    pub phone_number: Option<String>,
    pub listing_date: Option<NaiveDate>,
}

impl From<SecurityDB> for Security {
    fn from(db: SecurityDB) -> Self {
        Self {
            asx_code: db.asx_code,
            asx_isin_code: db.asx_isin_code,
            company_name: db.company_name,
            security_name: db.security_name,
        }
    }
}

impl From<Security> for SecurityDB {
    fn from(security: Security) -> Self {
        Self {
            asx_isin_code: security.asx_isin_code,
            asx_code: security.asx_code.trim().to_uppercase(),
            company_name: security.company_name,
            security_name: security.security_name,
        }
    }
}

impl From<CompanyDetailsDB> for CompanyDetails {
    fn from(db: CompanyDetailsDB) -> Self {
        Self {
            asx_code: db.asx_code,
            name_full: db.name_full,
            sector_name: db.sector_name,
            principal_activities: db.principal_activities,
            web_address: db.web_address,
            phone_number: db.phone_number,
            listing_date: db.listing_date,
        }
    }
}

impl From<CompanyDetails> for CompanyDetailsDB {
    fn from(details: CompanyDetails) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            asx_code: details.asx_code.trim().to_uppercase(),
            name_full: details.name_full,
            sector_name: non_empty(details.sector_name),
            principal_activities: non_empty(details.principal_activities),
            web_address: non_empty(details.web_address),
            phone_number: non_empty(details.phone_number),
            listing_date: details.listing_date,
        }
    }
}
