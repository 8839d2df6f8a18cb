use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use asxtrade_core::watchlist::{WatchlistEntry, WatchlistRepositoryTrait};
use asxtrade_core::Result;

use super::model::WatchlistEntryDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::watchlist;

pub struct WatchlistRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl WatchlistRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        WatchlistRepository { pool, writer }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    fn list_entries(&self, user_id: &str) -> Result<Vec<WatchlistEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = watchlist::table
            .filter(watchlist::user_id.eq(user_id))
            .order(watchlist::asx_code.asc())
            .select(WatchlistEntryDB::as_select())
            .load::<WatchlistEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(WatchlistEntry::from).collect())
    }

    fn contains(&self, user_id: &str, asx_code: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::select(diesel::dsl::exists(
            watchlist::table
                .filter(watchlist::user_id.eq(user_id))
                .filter(watchlist::asx_code.eq(asx_code)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(StorageError::from)?)
    }

    async fn add(&self, user_id: &str, asx_code: &str) -> Result<usize> {
        let row = WatchlistEntryDB {
            user_id: user_id.to_string(),
            asx_code: asx_code.to_string(),
            added_at: Utc::now().naive_utc(),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::insert_or_ignore_into(watchlist::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn remove(&self, user_id: &str, asx_code: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let asx_code = asx_code.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    watchlist::table
                        .filter(watchlist::user_id.eq(&user_id))
                        .filter(watchlist::asx_code.eq(&asx_code)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_db, create_test_user};

    #[tokio::test]
    async fn add_is_idempotent_and_remove_deletes() {
        let (pool, writer, _dir) = create_test_db();
        create_test_user(&pool, "u1");
        let repo = WatchlistRepository::new(pool, writer);

        assert_eq!(repo.add("u1", "BHP").await.unwrap(), 1);
        assert_eq!(repo.add("u1", "BHP").await.unwrap(), 0);
        repo.add("u1", "ANZ").await.unwrap();
        assert!(repo.contains("u1", "BHP").unwrap());

        let codes: Vec<String> = repo
            .list_entries("u1")
            .unwrap()
            .into_iter()
            .map(|e| e.asx_code)
            .collect();
        assert_eq!(codes, vec!["ANZ", "BHP"]);

        assert_eq!(repo.remove("u1", "BHP").await.unwrap(), 1);
        assert!(!repo.contains("u1", "BHP").unwrap());
    }

    #[tokio::test]
    async fn watchlists_are_per_user() {
        let (pool, writer, _dir) = create_test_db();
        create_test_user(&pool, "u1");
        create_test_user(&pool, "u2");
        let repo = WatchlistRepository::new(pool, writer);

        repo.add("u1", "CBA").await.unwrap();
        assert!(repo.list_entries("u2").unwrap().is_empty());
        assert_eq!(repo.remove("u2", "CBA").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_by_foreign_key() {
        let (pool, writer, _dir) = create_test_db();
        let repo = WatchlistRepository::new(pool, writer);
        assert!(repo.add("ghost", "CBA").await.is_err());
    }
}
