use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use uuid::Uuid;

use super::purchases_model::{
    shares_for, NewVirtualPurchase, PurchaseDefaults, VirtualPurchase, VirtualPurchaseUpdate,
};
use super::purchases_traits::{PurchaseRepositoryTrait, PurchaseServiceTrait};
use crate::constants::{DEFAULT_PURCHASE_AMOUNT, MIN_PRICE};
use crate::errors::{Error, Result, ValidationError};
use crate::quotes::{validate_stock_code, QuoteServiceTrait};

pub struct PurchaseService {
    repository: Arc<dyn PurchaseRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl PurchaseService {
    pub fn new(
        repository: Arc<dyn PurchaseRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        Self {
            repository,
            quote_service,
        }
    }

    fn not_found(purchase_id: &str) -> Error {
        Error::NotFound(format!("No such virtual purchase: {}", purchase_id))
    }
}

#[async_trait]
impl PurchaseServiceTrait for PurchaseService {
    fn user_purchases(&self, user_id: &str) -> Result<BTreeMap<String, Vec<VirtualPurchase>>> {
        let mut purchases = self.repository.list_for_user(user_id)?;
        purchases.sort_by(|a, b| a.buy_date.cmp(&b.buy_date).then_with(|| a.id.cmp(&b.id)));
        let mut grouped: BTreeMap<String, Vec<VirtualPurchase>> = BTreeMap::new();
        for purchase in purchases {
            grouped
                .entry(purchase.asx_code.clone())
                .or_default()
                .push(purchase);
        }
        Ok(grouped)
    }

    fn purchase_defaults(
        &self,
        asx_code: &str,
        amount: Option<f64>,
    ) -> Result<Option<PurchaseDefaults>> {
        let amount = amount
            .filter(|a| a.is_finite() && *a > 0.0)
            .unwrap_or(DEFAULT_PURCHASE_AMOUNT);
        let Some(quote) = self.quote_service.latest_quote(asx_code)? else {
            debug!("No latest quote for {}", asx_code);
            return Ok(None);
        };
        match quote.last_price {
            Some(price) if price >= MIN_PRICE => Ok(Some(PurchaseDefaults {
                asx_code: quote.asx_code,
                buy_date: quote.fetch_date,
                price_at_buy_date: price,
                amount,
                n: shares_for(amount, price),
            })),
            _ => Ok(None),
        }
    }

    fn get_purchase(&self, user_id: &str, purchase_id: &str) -> Result<VirtualPurchase> {
        self.repository
            .get_by_id(purchase_id)?
            .filter(|p| p.user_id == user_id)
            .ok_or_else(|| Self::not_found(purchase_id))
    }

    async fn create_purchase(
        &self,
        user_id: &str,
        new_purchase: NewVirtualPurchase,
    ) -> Result<VirtualPurchase> {
        let asx_code = validate_stock_code(&new_purchase.asx_code).ok_or_else(|| {
            ValidationError::InvalidInput(format!(
                "Invalid stock code: {}",
                new_purchase.asx_code
            ))
        })?;
        let n = new_purchase.validate()?;
        let purchase = VirtualPurchase {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            asx_code,
            buy_date: new_purchase.buy_date,
            price_at_buy_date: new_purchase.price_at_buy_date,
            amount: new_purchase.amount,
            n,
        };
        let created = self.repository.insert(purchase).await?;
        info!(
            "Created virtual purchase {} of {} x {} for {}",
            created.id, created.n, created.asx_code, user_id
        );
        Ok(created)
    }

    async fn update_purchase(
        &self,
        user_id: &str,
        purchase_id: &str,
        changes: VirtualPurchaseUpdate,
    ) -> Result<VirtualPurchase> {
        changes.validate()?;
        let existing = self.get_purchase(user_id, purchase_id)?;
        let updated = VirtualPurchase {
            buy_date: changes.buy_date,
            price_at_buy_date: changes.price_at_buy_date,
            amount: changes.amount,
            n: changes.n,
            ..existing
        };
        self.repository.update(updated).await
    }

    async fn delete_purchase(&self, user_id: &str, purchase_id: &str) -> Result<()> {
        let existing = self.get_purchase(user_id, purchase_id)?;
        let removed = self.repository.delete(&existing.id).await?;
        if removed == 0 {
            return Err(Self::not_found(purchase_id));
        }
        info!("Deleted virtual purchase {} for {}", purchase_id, user_id);
        Ok(())
    }
}
