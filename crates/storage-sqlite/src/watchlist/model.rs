use asxtrade_core::watchlist::WatchlistEntry;
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::watchlist)]
#[diesel(primary_key(user_id, asx_code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistEntryDB {
    pub user_id: String,
    pub asx_code: String,
    pub added_at: NaiveDateTime,
}

impl From<WatchlistEntryDB> for WatchlistEntry {
    fn from(db: WatchlistEntryDB) -> Self {
        Self {
            user_id: db.user_id,
            asx_code: db.asx_code,
            added_at: db.added_at,
        }
    }
}
