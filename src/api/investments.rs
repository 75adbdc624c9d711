//! HTTP handlers for `/investments` and `/portfolio`. Each one delegates to a
//! domain module and converts the outcome to a status code at the boundary.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::auth::AuthUser;
use crate::api::routes::AppState;
use crate::error::{Action, ApiError};
use crate::investments;
use crate::metrics::{self, InvestmentMetrics};
use crate::portfolio::{self, PortfolioSummary};
use crate::types::investment::{Investment, InvestmentPayload};

/// Ids that are not UUIDs cannot name a record.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found())
}

fn read_payload(body: Result<Json<InvestmentPayload>, JsonRejection>) -> Result<InvestmentPayload, ApiError> {
    body.map(|Json(p)| p)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub async fn create_investment(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<InvestmentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Investment>), ApiError> {
    let payload = read_payload(body)?;
    let created = investments::create(state.store.as_ref(), user.user_id, payload)
        .await
        .map_err(|e| ApiError::from_investment(Action::Create, e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_investments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Investment>>, ApiError> {
    let records = investments::list(state.store.as_ref(), user.user_id)
        .await
        .map_err(|e| ApiError::from_investment(Action::List, e))?;
    Ok(Json(records))
}

pub async fn get_investment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Investment>, ApiError> {
    let id = parse_id(&id)?;
    let record = investments::get(state.store.as_ref(), user.user_id, id)
        .await
        .map_err(|e| ApiError::from_investment(Action::Get, e))?;
    Ok(Json(record))
}

pub async fn update_investment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<InvestmentPayload>, JsonRejection>,
) -> Result<Json<Investment>, ApiError> {
    let id = parse_id(&id)?;
    let payload = read_payload(body)?;
    let updated = investments::update(state.store.as_ref(), user.user_id, id, payload)
        .await
        .map_err(|e| ApiError::from_investment(Action::Update, e))?;
    Ok(Json(updated))
}

pub async fn delete_investment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    investments::delete(state.store.as_ref(), user.user_id, id)
        .await
        .map_err(|e| ApiError::from_investment(Action::Delete, e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current value, profit/loss and horizon changes against fresh daily quotes.
pub async fn investment_performance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<InvestmentMetrics>, ApiError> {
    let id = parse_id(&id)?;
    let record = investments::get(state.store.as_ref(), user.user_id, id)
        .await
        .map_err(|e| ApiError::from_investment(Action::Analyze, e))?;
    let series = state
        .quotes
        .daily_series(&record.symbol)
        .await
        .map_err(|e| ApiError::from_quote(Action::Analyze, e))?;
    let report = metrics::analyze(&record, &series).map_err(ApiError::from_metric)?;
    Ok(Json(report))
}

/// Every holding of the caller valued at its latest close, with totals.
pub async fn portfolio_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PortfolioSummary>, ApiError> {
    let summary = portfolio::summarize(state.store.as_ref(), state.quotes.as_ref(), user.user_id)
        .await
        .map_err(ApiError::from_portfolio)?;
    Ok(Json(summary))
}
