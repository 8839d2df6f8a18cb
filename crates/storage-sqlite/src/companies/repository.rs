use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use asxtrade_core::companies::{CompanyDetails, CompanyRepositoryTrait, Security};
use asxtrade_core::Result;

use super::model::{CompanyDetailsDB, SecurityDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{company_details, securities};
use crate::utils::like_pattern;

pub struct CompanyRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CompanyRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CompanyRepository { pool, writer }
    }
}

fn sorted_unique(mut codes: Vec<String>) -> Vec<String> {
    codes.sort();
    codes.dedup();
    codes
}

#[async_trait]
impl CompanyRepositoryTrait for CompanyRepository {
    fn securities_for(&self, asx_code: &str) -> Result<Vec<Security>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = securities::table
            .filter(securities::asx_code.eq(asx_code))
            .order(securities::asx_isin_code.asc())
            .select(SecurityDB::as_select())
            .load::<SecurityDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Security::from).collect())
    }

    fn company_details(&self, asx_code: &str) -> Result<Option<CompanyDetails>> {
        let mut conn = get_connection(&self.pool)?;
        let row = company_details::table
            .find(asx_code)
            .select(CompanyDetailsDB::as_select())
            .first::<CompanyDetailsDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(CompanyDetails::from))
    }

    fn sector_stocks(&self, sector: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(company_details::table
            .filter(company_details::sector_name.eq(sector))
            .select(company_details::asx_code)
            .order(company_details::asx_code.asc())
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn sectors(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let names = company_details::table
            .filter(company_details::sector_name.is_not_null())
            .select(company_details::sector_name)
            .distinct()
            .load::<Option<String>>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(sorted_unique(
            names
                .into_iter()
                .flatten()
                .filter(|s| !s.trim().is_empty())
                .collect(),
        ))
    }

    fn sector_memberships(&self) -> Result<Vec<(String, String)>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = company_details::table
            .filter(company_details::sector_name.is_not_null())
            .select((company_details::asx_code, company_details::sector_name))
            .load::<(String, Option<String>)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .filter_map(|(code, sector)| sector.map(|s| (code, s)))
            .collect())
    }

    fn codes_matching_name(&self, fragment: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let pattern = like_pattern(fragment);
        let mut codes = company_details::table
            .filter(company_details::name_full.like(&pattern).escape('\\'))
            .select(company_details::asx_code)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        codes.extend(
            securities::table
                .filter(securities::company_name.like(&pattern).escape('\\'))
                .select(securities::asx_code)
                .load::<String>(&mut conn)
                .map_err(StorageError::from)?,
        );
        Ok(sorted_unique(codes))
    }

    fn codes_matching_activity(&self, fragment: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let codes = company_details::table
            .filter(
                company_details::principal_activities
                    .like(like_pattern(fragment))
                    .escape('\\'),
            )
            .select(company_details::asx_code)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(sorted_unique(codes))
    }

    fn codes_with_security_name(&self, security_name: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let codes = securities::table
            .filter(
                securities::security_name
                    .like(like_pattern(security_name))
                    .escape('\\'),
            )
            .select(securities::asx_code)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(sorted_unique(codes))
    }

    async fn upsert_securities(&self, rows: Vec<Security>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for security in rows {
                    written += diesel::replace_into(securities::table)
                        .values(SecurityDB::from(security))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(written)
            })
            .await
    }

    async fn upsert_company_details(&self, rows: Vec<CompanyDetails>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for details in rows {
                    written += diesel::replace_into(company_details::table)
                        .values(CompanyDetailsDB::from(details))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(written)
            })
            .await
    }
}
