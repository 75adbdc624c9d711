use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::api::investments;
use crate::persistence::InvestmentStore;
use crate::quotes::QuoteProvider;

/// Shared clients handed to every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvestmentStore>,
    pub quotes: Arc<dyn QuoteProvider>,
    pub jwt_secret: Vec<u8>,
}

async fn health() -> &'static str {
    "healthy"
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/investments",
            get(investments::list_investments).post(investments::create_investment),
        )
        .route(
            "/investments/{id}",
            get(investments::get_investment)
                .put(investments::update_investment)
                .delete(investments::delete_investment),
        )
        .route(
            "/investments/{id}/performance",
            get(investments::investment_performance),
        )
        .route("/portfolio", get(investments::portfolio_summary))
        .with_state(state)
}
