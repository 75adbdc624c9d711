//! HTTP boundary errors. Domain errors are translated here and nowhere else.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::investments::InvestmentError;
use crate::metrics::MetricError;
use crate::portfolio::PortfolioError;
use crate::quotes::QuoteError;

/// The operation a request was performing, used to phrase error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Get,
    List,
    Update,
    Delete,
    Analyze,
    Summarize,
}

impl Action {
    fn forbidden_message(self) -> &'static str {
        match self {
            Action::Update => "Not authorized to update this investment",
            Action::Delete => "Not authorized to delete this investment",
            Action::Analyze => "Not authorized to analyze this investment",
            _ => "Not authorized to access this investment",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Action::Create => "Could not create investment",
            Action::Get => "Could not get investment",
            Action::List => "Could not list investments",
            Action::Update => "Could not update investment",
            Action::Delete => "Could not delete investment",
            Action::Analyze => "Could not analyze investment",
            Action::Summarize => "Could not summarize portfolio",
        }
    }
}

/// Status code plus the message sent as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Investment not found")
    }

    pub fn from_investment(action: Action, err: InvestmentError) -> Self {
        match err {
            InvestmentError::NotFound => Self::not_found(),
            InvestmentError::Forbidden { .. } => {
                Self::new(StatusCode::FORBIDDEN, action.forbidden_message())
            }
            InvestmentError::Invalid(message) => Self::bad_request(message),
            InvestmentError::Store(e) => {
                error!(?action, error = %e, "store operation failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, action.failure_message())
            }
        }
    }

    pub fn from_quote(action: Action, err: QuoteError) -> Self {
        error!(?action, error = %err, "quote provider call failed");
        match err {
            QuoteError::NoData(symbol) => Self::new(
                StatusCode::BAD_GATEWAY,
                format!("No data available for symbol {symbol}"),
            ),
            _ => Self::new(StatusCode::BAD_GATEWAY, action.failure_message()),
        }
    }

    pub fn from_metric(err: MetricError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }

    pub fn from_portfolio(err: PortfolioError) -> Self {
        match err {
            PortfolioError::Investment(e) => Self::from_investment(Action::Summarize, e),
            PortfolioError::Quote(e) => Self::from_quote(Action::Summarize, e),
            PortfolioError::Metric(e) => Self::from_metric(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
