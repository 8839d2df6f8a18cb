use asxtrade_core::purchases::VirtualPurchase;
use chrono::NaiveDate;
use diesel::prelude::*;

#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::virtual_purchases)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VirtualPurchaseDB {
    pub id: String,
    pub user_id: String,
    pub asx_code: String,
    pub buy_date: NaiveDate,
    pub price_at_buy_date: f64,
    pub amount: f64,
    pub n: i64,
}

impl From<VirtualPurchaseDB> for VirtualPurchase {
    fn from(db: VirtualPurchaseDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            asx_code: db.asx_code,
            buy_date: db.buy_date,
            price_at_buy_date: db.price_at_buy_date,
            amount: db.amount,
            n: db.n,
        }
    }
}

impl From<VirtualPurchase> for VirtualPurchaseDB {
    fn from(purchase: VirtualPurchase) -> Self {
        Self {
            id: purchase.id,
            user_id: purchase.user_id,
            asx_code: purchase.asx_code,
            buy_date: purchase.buy_date,
            price_at_buy_date: purchase.price_at_buy_date,
            amount: purchase.amount,
            n: purchase.n,
        }
    }
}
