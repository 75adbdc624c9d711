use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closes for a symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl QuoteSeries {
    /// Builds a series, sorting the points ascending by date.
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}
