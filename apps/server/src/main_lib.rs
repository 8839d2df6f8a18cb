use std::sync::Arc;

use anyhow::Context;
use argon2::password_hash::PasswordHash;
use asxtrade_core::{
    companies::{CompanyService, CompanyServiceTrait},
    dashboard::{DashboardService, DashboardServiceTrait},
    purchases::{PurchaseService, PurchaseServiceTrait},
    quotes::{QuoteService, QuoteServiceTrait},
    users::{NewUser, UserService, UserServiceTrait},
    watchlist::{WatchlistService, WatchlistServiceTrait},
};
use asxtrade_storage_sqlite::{
    companies::CompanyRepository, db, purchases::PurchaseRepository, quotes::QuoteRepository,
    users::UserRepository, watchlist::WatchlistRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::{decode_secret_key, generate_secret_key, AuthManager},
    config::{BootstrapUser, Config},
    session::SessionStore,
};

pub struct AppState {
    pub quote_service: Arc<dyn QuoteServiceTrait>,
    pub company_service: Arc<dyn CompanyServiceTrait>,
    pub watchlist_service: Arc<dyn WatchlistServiceTrait>,
    pub purchase_service: Arc<dyn PurchaseServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub dashboard_service: Arc<dyn DashboardServiceTrait>,
    /// Flash messages and remembered search criteria, per user.
    pub sessions: SessionStore,
    pub auth: Arc<AuthManager>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("ASX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let quote_repository = Arc::new(QuoteRepository::new(pool.clone(), writer.clone()));
    let company_repository = Arc::new(CompanyRepository::new(pool.clone(), writer.clone()));
    let watchlist_repository = Arc::new(WatchlistRepository::new(pool.clone(), writer.clone()));
    let purchase_repository = Arc::new(PurchaseRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));

    let quote_service: Arc<dyn QuoteServiceTrait> = Arc::new(QuoteService::new(
        quote_repository,
        config.reference_stock.clone(),
    ));
    let company_service: Arc<dyn CompanyServiceTrait> =
        Arc::new(CompanyService::new(company_repository));
    let watchlist_service: Arc<dyn WatchlistServiceTrait> =
        Arc::new(WatchlistService::new(watchlist_repository));
    let purchase_service: Arc<dyn PurchaseServiceTrait> = Arc::new(PurchaseService::new(
        purchase_repository,
        quote_service.clone(),
    ));
    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(user_repository));
    let dashboard_service: Arc<dyn DashboardServiceTrait> = Arc::new(DashboardService::new(
        quote_service.clone(),
        company_service.clone(),
        watchlist_service.clone(),
        purchase_service.clone(),
    ));

    let secret = match config.secret_key.as_deref() {
        Some(raw) => decode_secret_key(raw).context("Invalid ASX_SECRET_KEY")?,
        None => {
            tracing::warn!("ASX_SECRET_KEY is not set; sessions will not survive a restart");
            generate_secret_key()
        }
    };
    let auth = Arc::new(AuthManager::new(&secret, config.session_ttl));

    if let Some(bootstrap) = &config.bootstrap_user {
        ensure_bootstrap_user(user_service.as_ref(), bootstrap).await?;
    }

    Ok(Arc::new(AppState {
        quote_service,
        company_service,
        watchlist_service,
        purchase_service,
        user_service,
        dashboard_service,
        sessions: SessionStore::new(),
        auth,
        db_path,
    }))
}

async fn ensure_bootstrap_user(
    users: &dyn UserServiceTrait,
    bootstrap: &BootstrapUser,
) -> anyhow::Result<()> {
    PasswordHash::new(&bootstrap.password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid ASX_BOOTSTRAP_PASSWORD_HASH: {}", e))?;
    let user = users
        .upsert_user(NewUser {
            id: None,
            username: bootstrap.username.clone(),
            password_hash: bootstrap.password_hash.clone(),
            is_active: true,
        })
        .await?;
    tracing::info!("Bootstrap user '{}' is ready", user.username);
    Ok(())
}
