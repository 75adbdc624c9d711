//! Whole-portfolio valuation for one owner: every holding priced at its
//! latest close, plus totals across them.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::investments::{self, InvestmentError};
use crate::metrics::{self, MetricError, PositionValue};
use crate::persistence::InvestmentStore;
use crate::quotes::{QuoteError, QuoteProvider};
use crate::types::quote::PricePoint;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error(transparent)]
    Investment(#[from] InvestmentError),
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Metric(#[from] MetricError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSummary {
    pub investment_id: Uuid,
    pub symbol: String,
    pub quantity: f64,
    pub current_price: f64,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub value: PositionValue,
    /// Share of the portfolio's total value. `None` when that total is zero.
    pub allocation_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_percent: Option<f64>,
    /// One entry per investment record, ordered by symbol then creation time.
    pub holdings: Vec<HoldingSummary>,
}

/// Value all of `caller`'s investments. Each distinct symbol is quoted once;
/// any quote failure fails the whole summary.
pub async fn summarize(
    store: &dyn InvestmentStore,
    quotes: &dyn QuoteProvider,
    caller: Uuid,
) -> Result<PortfolioSummary, PortfolioError> {
    let mut records = investments::list(store, caller).await?;
    records.sort_by(|a, b| {
        (&a.symbol, a.created_at, a.id).cmp(&(&b.symbol, b.created_at, b.id))
    });

    let mut latest: HashMap<String, PricePoint> = HashMap::new();
    for record in &records {
        if latest.contains_key(&record.symbol) {
            continue;
        }
        let series = quotes.daily_series(&record.symbol).await?;
        let point = *series
            .latest()
            .ok_or(MetricError::InsufficientHistory { len: 0 })?;
        latest.insert(record.symbol.clone(), point);
    }

    let mut holdings = Vec::with_capacity(records.len());
    for record in records {
        let point = latest[&record.symbol];
        holdings.push(HoldingSummary {
            investment_id: record.id,
            value: metrics::position_value(record.quantity, record.purchase_price, point.close),
            symbol: record.symbol,
            quantity: record.quantity,
            current_price: point.close,
            as_of: point.date,
            allocation_percent: None,
        });
    }

    let total_value: f64 = holdings.iter().map(|h| h.value.total_value).sum();
    let total_cost: f64 = holdings.iter().map(|h| h.value.total_cost).sum();
    let total_profit_loss = total_value - total_cost;
    for holding in &mut holdings {
        holding.allocation_percent = metrics::percent_of(holding.value.total_value, total_value);
    }

    info!(owner = %caller, holdings = holdings.len(), symbols = latest.len(), "portfolio summarized");
    Ok(PortfolioSummary {
        total_value,
        total_cost,
        total_profit_loss,
        total_profit_loss_percent: metrics::percent_of(total_profit_loss, total_cost),
        holdings,
    })
}
