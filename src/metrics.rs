//! Derived financials for a position: value, profit/loss and horizon changes.
//! Pure functions, no I/O.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::types::investment::Investment;
use crate::types::quote::{PricePoint, QuoteSeries};

/// Trading days back from the latest close.
pub const DAILY_LOOKBACK: usize = 1;
pub const WEEKLY_LOOKBACK: usize = 5;
pub const MONTHLY_LOOKBACK: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("price history has {len} entries, at least 2 are required")]
    InsufficientHistory { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValue {
    pub total_value: f64,
    pub total_cost: f64,
    pub profit_loss: f64,
    /// `None` when the cost basis is zero.
    pub profit_loss_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    pub reference_date: NaiveDate,
    pub reference_price: f64,
    pub change: f64,
    /// `None` when the reference price is zero.
    pub change_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonChanges {
    pub daily: PriceChange,
    pub weekly: PriceChange,
    pub monthly: PriceChange,
}

/// Everything shown for one investment against its latest quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    pub investment_id: Uuid,
    pub symbol: String,
    pub current_price: f64,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub value: PositionValue,
    pub changes: HorizonChanges,
    /// Close on the trading day nearest the purchase date.
    pub purchase_reference: PricePoint,
    pub computed_at: DateTime<Utc>,
}

pub fn position_value(quantity: f64, purchase_price: f64, current_price: f64) -> PositionValue {
    let total_value = quantity * current_price;
    let total_cost = quantity * purchase_price;
    let profit_loss = total_value - total_cost;
    PositionValue {
        total_value,
        total_cost,
        profit_loss,
        profit_loss_percent: percent_of(profit_loss, total_cost),
    }
}

/// Daily, weekly and monthly changes of the latest close.
///
/// Weekly and monthly fall back to the oldest entry when the series is
/// shorter than their lookback.
pub fn horizon_changes(series: &QuoteSeries) -> Result<HorizonChanges, MetricError> {
    let points = &series.points;
    if points.len() < 2 {
        return Err(MetricError::InsufficientHistory { len: points.len() });
    }
    let current = points[points.len() - 1].close;
    Ok(HorizonChanges {
        daily: change_since(current, lookback(points, DAILY_LOOKBACK)),
        weekly: change_since(current, lookback(points, WEEKLY_LOOKBACK)),
        monthly: change_since(current, lookback(points, MONTHLY_LOOKBACK)),
    })
}

/// Point whose date is closest to `date`. Ties keep the earlier point.
pub fn purchase_reference(series: &QuoteSeries, date: NaiveDate) -> Option<PricePoint> {
    series
        .points
        .iter()
        .min_by_key(|p| (p.date - date).num_days().abs())
        .copied()
}

pub fn analyze(investment: &Investment, series: &QuoteSeries) -> Result<InvestmentMetrics, MetricError> {
    let changes = horizon_changes(series)?;
    let latest = *series
        .latest()
        .ok_or(MetricError::InsufficientHistory { len: 0 })?;
    let purchase_reference = purchase_reference(series, investment.purchase_date).unwrap_or(latest);

    Ok(InvestmentMetrics {
        investment_id: investment.id,
        symbol: investment.symbol.clone(),
        current_price: latest.close,
        as_of: latest.date,
        value: position_value(investment.quantity, investment.purchase_price, latest.close),
        changes,
        purchase_reference,
        computed_at: Utc::now(),
    })
}

fn lookback(points: &[PricePoint], days: usize) -> PricePoint {
    let latest = points.len() - 1;
    points[latest.saturating_sub(days)]
}

fn change_since(current: f64, past: PricePoint) -> PriceChange {
    let change = current - past.close;
    PriceChange {
        reference_date: past.date,
        reference_price: past.close,
        change,
        change_percent: percent_of(change, past.close),
    }
}

pub(crate) fn percent_of(delta: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some(delta / base * 100.0)
    }
}
