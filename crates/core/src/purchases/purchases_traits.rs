use std::collections::BTreeMap;

use async_trait::async_trait;

use super::purchases_model::{
    NewVirtualPurchase, PurchaseDefaults, VirtualPurchase, VirtualPurchaseUpdate,
};
use crate::errors::Result;

/// Trait for virtual purchase repository operations
#[async_trait]
pub trait PurchaseRepositoryTrait: Send + Sync {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<VirtualPurchase>>;
    fn get_by_id(&self, purchase_id: &str) -> Result<Option<VirtualPurchase>>;
    async fn insert(&self, purchase: VirtualPurchase) -> Result<VirtualPurchase>;
    async fn update(&self, purchase: VirtualPurchase) -> Result<VirtualPurchase>;
    async fn delete(&self, purchase_id: &str) -> Result<usize>;
}

/// Trait for virtual purchase service operations. Every call is scoped to a user.
#[async_trait]
pub trait PurchaseServiceTrait: Send + Sync {
    /// Purchases grouped by stock code, each group in buy-date order.
    fn user_purchases(&self, user_id: &str) -> Result<BTreeMap<String, Vec<VirtualPurchase>>>;
    /// Buy-form values from the latest quote; `None` when the price is zero or unknown.
    fn purchase_defaults(&self, asx_code: &str, amount: Option<f64>)
        -> Result<Option<PurchaseDefaults>>;
    fn get_purchase(&self, user_id: &str, purchase_id: &str) -> Result<VirtualPurchase>;
    async fn create_purchase(
        &self,
        user_id: &str,
        new_purchase: NewVirtualPurchase,
    ) -> Result<VirtualPurchase>;
    async fn update_purchase(
        &self,
        user_id: &str,
        purchase_id: &str,
        changes: VirtualPurchaseUpdate,
    ) -> Result<VirtualPurchase>;
    async fn delete_purchase(&self, user_id: &str, purchase_id: &str) -> Result<()>;
}
