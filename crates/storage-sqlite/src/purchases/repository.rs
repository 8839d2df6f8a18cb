use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use asxtrade_core::purchases::{PurchaseRepositoryTrait, VirtualPurchase};
use asxtrade_core::Result;

use super::model::VirtualPurchaseDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::virtual_purchases;
use crate::schema::virtual_purchases::dsl::*;

pub struct PurchaseRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PurchaseRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PurchaseRepository { pool, writer }
    }
}

#[async_trait]
impl PurchaseRepositoryTrait for PurchaseRepository {
    fn list_for_user(&self, owner: &str) -> Result<Vec<VirtualPurchase>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = virtual_purchases
            .filter(user_id.eq(owner))
            .order((buy_date.asc(), id.asc()))
            .select(VirtualPurchaseDB::as_select())
            .load::<VirtualPurchaseDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(VirtualPurchase::from).collect())
    }

    fn get_by_id(&self, purchase_id: &str) -> Result<Option<VirtualPurchase>> {
        let mut conn = get_connection(&self.pool)?;
        let row = virtual_purchases
            .find(purchase_id)
            .select(VirtualPurchaseDB::as_select())
            .first::<VirtualPurchaseDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(VirtualPurchase::from))
    }

    async fn insert(&self, purchase: VirtualPurchase) -> Result<VirtualPurchase> {
        let row = VirtualPurchaseDB::from(purchase);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<VirtualPurchase> {
                let stored = diesel::insert_into(virtual_purchases::table)
                    .values(&row)
                    .returning(VirtualPurchaseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(VirtualPurchase::from(stored))
            })
            .await
    }

    async fn update(&self, purchase: VirtualPurchase) -> Result<VirtualPurchase> {
        let row = VirtualPurchaseDB::from(purchase);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<VirtualPurchase> {
                let stored = diesel::update(virtual_purchases.find(&row.id))
                    .set(&row)
                    .returning(VirtualPurchaseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(VirtualPurchase::from(stored))
            })
            .await
    }

    async fn delete(&self, purchase_id: &str) -> Result<usize> {
        let purchase_id = purchase_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(virtual_purchases.find(&purchase_id))
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
    use chrono::NaiveDate;

    fn purchase(purchase_id: &str, day: u32) -> VirtualPurchase {
        VirtualPurchase {
            id: purchase_id.to_string(),
            user_id: "u1".to_string(),
            asx_code: "BHP".to_string(),
            buy_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            price_at_buy_date: 40.0,
            amount: 5000.0,
            n: 125,
        }
    }

    #[tokio::test]
    async fn purchase_lifecycle() {
        let (pool, writer, _dir) = create_test_db();
        create_test_user(&pool, "u1");
        let repo = PurchaseRepository::new(pool, writer);

        repo.insert(purchase("p2", 8)).await.unwrap();
        repo.insert(purchase("p1", 1)).await.unwrap();
        let ids: Vec<String> = repo
            .list_for_user("u1")
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p1", "p2"]);

        let mut changed = purchase("p1", 1);
        changed.amount = 2000.0;
        changed.n = 50;
        let updated = repo.update(changed).await.unwrap();
        assert_eq!(updated.n, 50);
        assert_eq!(repo.get_by_id("p1").unwrap().unwrap().amount, 2000.0);

        assert_eq!(repo.delete("p1").await.unwrap(), 1);
        assert!(repo.get_by_id("p1").unwrap().is_none());
        assert_eq!(repo.delete("p1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn updating_a_missing_purchase_is_not_found() {
        let (pool, writer, _dir) = create_test_db();
        create_test_user(&pool, "u1");
        let repo = PurchaseRepository::new(pool, writer);

        let err = repo.update(purchase("nope", 1)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
