//! Investment resource operations: create, get, list, update, delete.
//! Testable without HTTP.
//!
//! Get, update and delete check existence first, then ownership, and only
//! then touch the store. A caller asking for an id that does not exist
//! always gets `NotFound`, whoever they are.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::persistence::{InvestmentStore, StoreError};
use crate::types::investment::{Investment, InvestmentPayload};

#[derive(Debug, Error)]
pub enum InvestmentError {
    #[error("Investment not found")]
    NotFound,
    #[error("investment {id} is not owned by caller")]
    Forbidden { id: Uuid },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn create(
    store: &dyn InvestmentStore,
    caller: Uuid,
    payload: InvestmentPayload,
) -> Result<Investment, InvestmentError> {
    let symbol = normalize_symbol(&payload.symbol)?;
    flag_unusual_amounts(&payload);

    let now = now_micros();
    let investment = Investment {
        id: Uuid::new_v4(),
        owner_id: caller,
        symbol,
        quantity: payload.quantity,
        purchase_price: payload.purchase_price,
        purchase_date: payload.purchase_date,
        notes: payload.notes.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    store.insert(&investment).await?;

    info!(id = %investment.id, owner = %caller, symbol = %investment.symbol, "investment created");
    Ok(investment)
}

pub async fn get(
    store: &dyn InvestmentStore,
    caller: Uuid,
    id: Uuid,
) -> Result<Investment, InvestmentError> {
    load_owned(store, caller, id).await
}

/// All investments owned by `caller`, in store order.
pub async fn list(store: &dyn InvestmentStore, caller: Uuid) -> Result<Vec<Investment>, InvestmentError> {
    Ok(store.list_by_owner(caller).await?)
}

/// Replace the mutable fields. id, owner and created_at are kept and
/// updated_at moves strictly forward.
pub async fn update(
    store: &dyn InvestmentStore,
    caller: Uuid,
    id: Uuid,
    payload: InvestmentPayload,
) -> Result<Investment, InvestmentError> {
    let existing = load_owned(store, caller, id).await?;
    let symbol = normalize_symbol(&payload.symbol)?;
    flag_unusual_amounts(&payload);

    let replacement = Investment {
        symbol,
        quantity: payload.quantity,
        purchase_price: payload.purchase_price,
        purchase_date: payload.purchase_date,
        notes: payload.notes.unwrap_or_default(),
        updated_at: next_timestamp(existing.updated_at),
        ..existing
    };

    // A concurrent delete between the read and the write leaves nothing to update.
    let updated = store
        .update(&replacement)
        .await?
        .ok_or(InvestmentError::NotFound)?;

    info!(%id, owner = %caller, "investment updated");
    Ok(updated)
}

pub async fn delete(store: &dyn InvestmentStore, caller: Uuid, id: Uuid) -> Result<(), InvestmentError> {
    load_owned(store, caller, id).await?;
    if !store.delete(id).await? {
        return Err(InvestmentError::NotFound);
    }
    info!(%id, owner = %caller, "investment deleted");
    Ok(())
}

async fn load_owned(
    store: &dyn InvestmentStore,
    caller: Uuid,
    id: Uuid,
) -> Result<Investment, InvestmentError> {
    let investment = store.get(id).await?.ok_or(InvestmentError::NotFound)?;
    if investment.owner_id != caller {
        warn!(%id, %caller, "refused access to investment owned by another user");
        return Err(InvestmentError::Forbidden { id });
    }
    Ok(investment)
}

fn normalize_symbol(raw: &str) -> Result<String, InvestmentError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(InvestmentError::Invalid("symbol is required".to_string()));
    }
    Ok(symbol.to_uppercase())
}

// Negative amounts are stored as given, only logged.
fn flag_unusual_amounts(payload: &InvestmentPayload) {
    if payload.quantity < 0.0 || payload.purchase_price < 0.0 {
        warn!(
            quantity = payload.quantity,
            purchase_price = payload.purchase_price,
            "accepting negative quantity or purchase price"
        );
    }
}

/// Current time at the store's precision (microseconds), so what a caller
/// receives is exactly what a later read returns.
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now_micros();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
