//! The three search pages. Criteria arrive as query parameters or a form
//! body; the last submitted criteria are reused by bare paging links.

use std::sync::Arc;

use asxtrade_core::dashboard::{CompanySearch, SearchPage, SectorSearch, YieldSearch};
use asxtrade_core::dashboard::{DEFAULT_MAX_YIELD, DEFAULT_MIN_YIELD};
use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Form, Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::shared::{field, is_checked, parse_optional, render, today, PageQuery};
use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

const SECTOR_VIEW: &str = "by-sector";
const YIELD_VIEW: &str = "by-yield";
const COMPANY_VIEW: &str = "by-company";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SectorSearchForm {
    pub sector: Option<String>,
    pub best10: Option<String>,
    pub worst10: Option<String>,
    pub page: Option<String>,
}

impl SectorSearchForm {
    fn criteria(&self) -> Option<SectorSearch> {
        if self.sector.is_none() && self.best10.is_none() && self.worst10.is_none() {
            return None;
        }
        Some(SectorSearch {
            sector: field(&self.sector).unwrap_or_default().to_string(),
            best10: is_checked(&self.best10),
            worst10: is_checked(&self.worst10),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct YieldSearchForm {
    pub min_yield: Option<String>,
    pub max_yield: Option<String>,
    pub min_pe: Option<String>,
    pub max_pe: Option<String>,
    pub page: Option<String>,
}

impl YieldSearchForm {
    fn criteria(&self) -> ApiResult<Option<YieldSearch>> {
        let submitted = [&self.min_yield, &self.max_yield, &self.min_pe, &self.max_pe];
        if submitted.iter().all(|v| v.is_none()) {
            return Ok(None);
        }
        Ok(Some(YieldSearch {
            min_yield: parse_optional("min_yield", &self.min_yield)?.unwrap_or(DEFAULT_MIN_YIELD),
            max_yield: parse_optional("max_yield", &self.max_yield)?.unwrap_or(DEFAULT_MAX_YIELD),
            min_pe: parse_optional("min_pe", &self.min_pe)?,
            max_pe: parse_optional("max_pe", &self.max_pe)?,
        }))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompanySearchForm {
    pub name: Option<String>,
    pub activity: Option<String>,
    pub page: Option<String>,
}

impl CompanySearchForm {
    fn criteria(&self) -> Option<CompanySearch> {
        if self.name.is_none() && self.activity.is_none() {
            return None;
        }
        Some(CompanySearch {
            name: field(&self.name).unwrap_or_default().to_string(),
            activity: field(&self.activity).unwrap_or_default().to_string(),
        })
    }
}

/// Falls back to the remembered criteria when none were submitted, and
/// remembers submitted criteria once the search succeeds.
fn run_search<C, F>(
    state: &AppState,
    user: &CurrentUser,
    view: &'static str,
    submitted: Option<C>,
    search: F,
) -> ApiResult<Json<SearchPage<C>>>
where
    C: Serialize + DeserializeOwned,
    F: FnOnce(Option<C>) -> asxtrade_core::Result<SearchPage<C>>,
{
    let from_form = submitted.is_some();
    let criteria = submitted.or_else(|| state.sessions.recall(&user.id, view));
    let page = search(criteria)?;
    if from_form {
        if let Some(criteria) = &page.criteria {
            state.sessions.remember(&user.id, view, criteria);
        }
    }
    Ok(render(state, user, page))
}

fn sector_search(
    state: &AppState,
    user: &CurrentUser,
    form: SectorSearchForm,
    page: Option<String>,
) -> ApiResult<Json<SearchPage<SectorSearch>>> {
    let page = form.page.clone().or(page);
    run_search(state, user, SECTOR_VIEW, form.criteria(), |criteria| {
        state
            .dashboard_service
            .sector_search(&user.id, criteria, page.as_deref(), today())
    })
}

fn yield_search(
    state: &AppState,
    user: &CurrentUser,
    form: YieldSearchForm,
    page: Option<String>,
) -> ApiResult<Json<SearchPage<YieldSearch>>> {
    let page = form.page.clone().or(page);
    run_search(state, user, YIELD_VIEW, form.criteria()?, |criteria| {
        state
            .dashboard_service
            .yield_search(&user.id, criteria, page.as_deref(), today())
    })
}

fn company_search(
    state: &AppState,
    user: &CurrentUser,
    form: CompanySearchForm,
    page: Option<String>,
) -> ApiResult<Json<SearchPage<CompanySearch>>> {
    let page = form.page.clone().or(page);
    run_search(state, user, COMPANY_VIEW, form.criteria(), |criteria| {
        state
            .dashboard_service
            .company_search(&user.id, criteria, page.as_deref(), today())
    })
}

async fn sector_search_get(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(form): Query<SectorSearchForm>,
) -> ApiResult<Json<SearchPage<SectorSearch>>> {
    sector_search(&state, &user, form, None)
}

async fn sector_search_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
    Form(form): Form<SectorSearchForm>,
) -> ApiResult<Json<SearchPage<SectorSearch>>> {
    sector_search(&state, &user, form, query.page)
}

async fn yield_search_get(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(form): Query<YieldSearchForm>,
) -> ApiResult<Json<SearchPage<YieldSearch>>> {
    yield_search(&state, &user, form, None)
}

async fn yield_search_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
    Form(form): Form<YieldSearchForm>,
) -> ApiResult<Json<SearchPage<YieldSearch>>> {
    yield_search(&state, &user, form, query.page)
}

async fn company_search_get(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(form): Query<CompanySearchForm>,
) -> ApiResult<Json<SearchPage<CompanySearch>>> {
    company_search(&state, &user, form, None)
}

async fn company_search_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
    Form(form): Form<CompanySearchForm>,
) -> ApiResult<Json<SearchPage<CompanySearch>>> {
    company_search(&state, &user, form, query.page)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/search/by-sector",
            get(sector_search_get).post(sector_search_post),
        )
        .route(
            "/search/by-yield",
            get(yield_search_get).post(yield_search_post),
        )
        .route(
            "/search/by-company",
            get(company_search_get).post(company_search_post),
        )
}
