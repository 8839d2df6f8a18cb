//! Virtual purchase domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// A simulated holding owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPurchase {
    pub id: String,
    pub user_id: String,
    pub asx_code: String,
    pub buy_date: NaiveDate,
    pub price_at_buy_date: f64,
    pub amount: f64,
    pub n: i64,
}

/// Input model for buying a stock. `n` is derived when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVirtualPurchase {
    pub asx_code: String,
    pub buy_date: NaiveDate,
    pub price_at_buy_date: f64,
    pub amount: f64,
    pub n: Option<i64>,
}

/// Editable fields of an existing purchase; the stock code cannot change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPurchaseUpdate {
    pub buy_date: NaiveDate,
    pub price_at_buy_date: f64,
    pub amount: f64,
    pub n: i64,
}

/// Pre-filled values for the buy form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDefaults {
    pub asx_code: String,
    pub buy_date: NaiveDate,
    pub price_at_buy_date: f64,
    pub amount: f64,
    pub n: i64,
}

/// Whole shares affordable for `amount` at `price`.
pub fn shares_for(amount: f64, price: f64) -> i64 {
    (amount / price).floor() as i64
}

fn validate_price_and_amount(price: f64, amount: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::InvalidInput(
            "price_at_buy_date must be greater than zero".to_string(),
        )
        .into());
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(
            ValidationError::InvalidInput("amount must be greater than zero".to_string()).into(),
        );
    }
    Ok(())
}

impl NewVirtualPurchase {
    /// Checks the input and returns the share count to store.
    pub fn validate(&self) -> Result<i64> {
        validate_price_and_amount(self.price_at_buy_date, self.amount)?;
        let expected = shares_for(self.amount, self.price_at_buy_date);
        match self.n {
            Some(n) if n != expected => Err(ValidationError::InvalidInput(format!(
                "n must be {} for amount {} at price {}",
                expected, self.amount, self.price_at_buy_date
            ))
            .into()),
            _ => Ok(expected),
        }
    }
}

impl VirtualPurchaseUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_price_and_amount(self.price_at_buy_date, self.amount)?;
        if self.n < 0 {
            return Err(
                ValidationError::InvalidInput("n must not be negative".to_string()).into(),
            );
        }
        Ok(())
    }
}
