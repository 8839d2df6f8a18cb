//! Virtual purchase forms: buy, edit and delete. Successful posts redirect
//! to the watchlist, where the purchases are listed.

use std::sync::Arc;

use asxtrade_core::dashboard::{Message, PurchaseFormPage, PurchasePage};
use asxtrade_core::purchases::{shares_for, NewVirtualPurchase, VirtualPurchaseUpdate};
use asxtrade_core::quotes::validate_stock_code;
use asxtrade_core::utils::time_utils::parse_ymd;
use asxtrade_core::errors::ValidationError;
use asxtrade_core::Error as CoreError;
use axum::{
    extract::{Extension, Path, Query, State},
    response::Redirect,
    routing::get,
    Form, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::shared::{field, parse_optional, parse_required, render};
use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const AFTER_SAVE: &str = "/show/watched";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuyQuery {
    pub amount: Option<String>,
}

/// Fields of the purchase form. `asx_code` is read-only and ignored when posted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PurchaseForm {
    pub buy_date: Option<String>,
    pub price_at_buy_date: Option<String>,
    pub amount: Option<String>,
    pub n: Option<String>,
}

struct ParsedPurchase {
    buy_date: NaiveDate,
    price_at_buy_date: f64,
    amount: f64,
    n: Option<i64>,
}

impl PurchaseForm {
    fn parse(&self) -> ApiResult<ParsedPurchase> {
        let raw_date = field(&self.buy_date)
            .ok_or_else(|| ValidationError::MissingField("buy_date".to_string()))
            .map_err(CoreError::from)?;
        let buy_date = parse_ymd(raw_date)
            .map_err(|e| CoreError::from(ValidationError::from(e)))?;
        Ok(ParsedPurchase {
            buy_date,
            price_at_buy_date: parse_required("price_at_buy_date", &self.price_at_buy_date)?,
            amount: parse_required("amount", &self.amount)?,
            n: parse_optional("n", &self.n)?,
        })
    }
}

async fn buy_form(
    Path(stock): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<BuyQuery>,
) -> ApiResult<Json<PurchaseFormPage>> {
    let amount = parse_optional("amount", &query.amount)?;
    let page = state.dashboard_service.buy_form(&stock, amount)?;
    Ok(render(&state, &user, page))
}

async fn buy(
    Path(stock): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PurchaseForm>,
) -> ApiResult<Redirect> {
    let code = validate_stock_code(&stock)
        .ok_or_else(|| ApiError::NotFound(format!("Invalid stock code: {}", stock)))?;
    let parsed = form.parse()?;
    let created = state
        .purchase_service
        .create_purchase(
            &user.id,
            NewVirtualPurchase {
                asx_code: code,
                buy_date: parsed.buy_date,
                price_at_buy_date: parsed.price_at_buy_date,
                amount: parsed.amount,
                n: parsed.n,
            },
        )
        .await?;
    state.sessions.flash(
        &user.id,
        Message::info(format!("Saved purchase of {}", created.asx_code)),
    );
    Ok(Redirect::to(AFTER_SAVE))
}

async fn edit_form(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<PurchasePage>> {
    let purchase = state.purchase_service.get_purchase(&user.id, &id)?;
    let page = PurchasePage {
        title: format!("Edit {} purchase", purchase.asx_code),
        purchase,
        messages: Vec::new(),
    };
    Ok(render(&state, &user, page))
}

async fn edit(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PurchaseForm>,
) -> ApiResult<Redirect> {
    let parsed = form.parse()?;
    let changes = VirtualPurchaseUpdate {
        buy_date: parsed.buy_date,
        price_at_buy_date: parsed.price_at_buy_date,
        amount: parsed.amount,
        n: parsed
            .n
            .unwrap_or_else(|| shares_for(parsed.amount, parsed.price_at_buy_date)),
    };
    state
        .purchase_service
        .update_purchase(&user.id, &id, changes)
        .await?;
    Ok(Redirect::to(AFTER_SAVE))
}

async fn delete_form(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<PurchasePage>> {
    let purchase = state.purchase_service.get_purchase(&user.id, &id)?;
    let page = PurchasePage {
        title: format!(
            "Delete {} purchase of {}?",
            purchase.asx_code, purchase.buy_date
        ),
        purchase,
        messages: Vec::new(),
    };
    Ok(render(&state, &user, page))
}

async fn delete(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Redirect> {
    state.purchase_service.delete_purchase(&user.id, &id).await?;
    Ok(Redirect::to(AFTER_SAVE))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/buy/{stock}", get(buy_form).post(buy))
        .route("/edit/{id}", get(edit_form).post(edit))
        .route("/delete/{id}", get(delete_form).post(delete))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_form_requires_a_date() {
        let form = PurchaseForm {
            price_at_buy_date: Some("10".into()),
            amount: Some("5000".into()),
            ..Default::default()
        };
        assert!(form.parse().is_err());
    }

    #[test]
    fn purchase_form_parses_numbers() {
        let form = PurchaseForm {
            buy_date: Some("2024-03-01".into()),
            price_at_buy_date: Some("10".into()),
            amount: Some("5000".into()),
            n: Some("".into()),
        };
        let parsed = form.parse().unwrap();
        assert_eq!(parsed.buy_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(parsed.amount, 5000.0);
        assert_eq!(parsed.n, None);
    }
}
