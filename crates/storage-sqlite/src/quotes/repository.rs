use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;

use asxtrade_core::quotes::{Quotation, QuoteRepositoryTrait};
use asxtrade_core::Result;

use super::model::QuotationDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::quotations;
use crate::utils::chunk_for_sqlite;

pub struct QuoteRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl QuoteRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        QuoteRepository { pool, writer }
    }

    fn load_between(
        conn: &mut SqliteConnection,
        codes: Option<&[String]>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<QuotationDB>> {
        let window = || {
            quotations::table
                .filter(quotations::fetch_date.ge(start))
                .filter(quotations::fetch_date.le(end))
        };
        let Some(codes) = codes else {
            return Ok(window()
                .select(QuotationDB::as_select())
                .load::<QuotationDB>(conn)
                .map_err(StorageError::from)?);
        };

        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(codes) {
            let batch = window()
                .filter(quotations::asx_code.eq_any(chunk))
                .select(QuotationDB::as_select())
                .load::<QuotationDB>(conn)
                .map_err(StorageError::from)?;
            rows.extend(batch);
        }
        Ok(rows)
    }
}

#[async_trait]
impl QuoteRepositoryTrait for QuoteRepository {
    fn available_dates(&self, asx_code: Option<&str>) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = quotations::table
            .select(quotations::fetch_date)
            .distinct()
            .order(quotations::fetch_date.asc())
            .into_boxed();
        if let Some(code) = asx_code {
            query = query.filter(quotations::asx_code.eq(code));
        }
        Ok(query
            .load::<NaiveDate>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn quotes_on(&self, date: NaiveDate, codes: Option<&[String]>) -> Result<Vec<Quotation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = Self::load_between(&mut conn, codes, date, date)?;
        Ok(rows.into_iter().map(Quotation::from).collect())
    }

    fn quotes_between(
        &self,
        codes: Option<&[String]>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quotation>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows = Self::load_between(&mut conn, codes, start, end)?;
        // Chunked loads come back per chunk; restore a global order.
        rows.sort_by(|a, b| {
            a.asx_code
                .cmp(&b.asx_code)
                .then(a.fetch_date.cmp(&b.fetch_date))
        });
        Ok(rows.into_iter().map(Quotation::from).collect())
    }

    async fn upsert_quotations(&self, quotes: Vec<Quotation>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                for quote in quotes {
                    let row = QuotationDB::from(quote);
                    written += diesel::replace_into(quotations::table)
                        .values(&row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                debug!("Stored {} quotations", written);
                Ok(written)
            })
            .await
    }
}
