//! Resource operation tests against the in-memory store: ownership, existence
//! precedence, update semantics and deletion.

use async_trait::async_trait;
use chrono::{NaiveDate, Timelike};
use stock_tracker::investments::{self, InvestmentError};
use stock_tracker::persistence::{InvestmentStore, MemoryStore, StoreError};
use stock_tracker::types::investment::{Investment, InvestmentPayload};
use uuid::Uuid;

fn payload(symbol: &str, quantity: f64, price: f64) -> InvestmentPayload {
    InvestmentPayload {
        symbol: symbol.to_string(),
        quantity,
        purchase_price: price,
        purchase_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        notes: None,
    }
}

#[tokio::test]
async fn create_sets_owner_and_timestamps() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();

    let created = investments::create(&store, owner, payload("aapl", 10.0, 100.0))
        .await
        .unwrap();

    assert_eq!(created.owner_id, owner);
    assert_eq!(created.symbol, "AAPL");
    assert_eq!(created.notes, "");
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(store.get(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn create_keeps_notes_and_negative_amounts() {
    let store = MemoryStore::new();
    let mut p = payload("MSFT", -2.0, -5.0);
    p.notes = Some("averaging down".to_string());

    let created = investments::create(&store, Uuid::new_v4(), p).await.unwrap();

    assert_eq!(created.notes, "averaging down");
    assert_eq!(created.quantity, -2.0);
    assert_eq!(created.purchase_price, -5.0);
}

#[tokio::test]
async fn create_blank_symbol_is_invalid() {
    let store = MemoryStore::new();

    let err = investments::create(&store, Uuid::new_v4(), payload("   ", 1.0, 1.0))
        .await
        .unwrap_err();

    assert!(matches!(err, InvestmentError::Invalid(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn create_ids_are_unique() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let a = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();
    let b = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn get_by_other_user_is_forbidden() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let created = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();

    let err = investments::get(&store, intruder, created.id).await.unwrap_err();
    assert!(matches!(err, InvestmentError::Forbidden { id } if id == created.id));

    let own = investments::get(&store, owner, created.id).await.unwrap();
    assert_eq!(own.id, created.id);
}

#[tokio::test]
async fn missing_id_is_not_found_for_every_operation() {
    let store = MemoryStore::new();
    let caller = Uuid::new_v4();
    let missing = Uuid::new_v4();

    assert!(matches!(
        investments::get(&store, caller, missing).await,
        Err(InvestmentError::NotFound)
    ));
    assert!(matches!(
        investments::update(&store, caller, missing, payload("AAPL", 1.0, 1.0)).await,
        Err(InvestmentError::NotFound)
    ));
    assert!(matches!(
        investments::delete(&store, caller, missing).await,
        Err(InvestmentError::NotFound)
    ));
}

#[tokio::test]
async fn update_and_delete_by_other_user_leave_record_untouched() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let created = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();

    let err = investments::update(&store, intruder, created.id, payload("TSLA", 9.0, 9.0))
        .await
        .unwrap_err();
    assert!(matches!(err, InvestmentError::Forbidden { .. }));

    let err = investments::delete(&store, intruder, created.id).await.unwrap_err();
    assert!(matches!(err, InvestmentError::Forbidden { .. }));

    assert_eq!(store.get(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn update_replaces_fields_and_preserves_identity() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let mut p = payload("AAPL", 1.0, 1.0);
    p.notes = Some("first lot".to_string());
    let created = investments::create(&store, owner, p).await.unwrap();

    let mut replacement = payload("googl", 3.5, 140.25);
    replacement.purchase_date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
    let updated = investments::update(&store, owner, created.id, replacement)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.owner_id, owner);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.symbol, "GOOGL");
    assert_eq!(updated.quantity, 3.5);
    assert_eq!(updated.purchase_price, 140.25);
    assert_eq!(updated.purchase_date, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
    // absent notes reset to empty
    assert_eq!(updated.notes, "");
}

#[tokio::test]
async fn repeated_updates_advance_updated_at() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let created = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();

    let mut last = created.updated_at;
    for qty in 2..8 {
        let updated = investments::update(&store, owner, created.id, payload("AAPL", qty as f64, 1.0))
            .await
            .unwrap();
        assert!(updated.updated_at > last);
        last = updated.updated_at;
    }
}

#[tokio::test]
async fn delete_removes_record_and_second_delete_is_not_found() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let created = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();

    investments::delete(&store, owner, created.id).await.unwrap();

    assert!(matches!(
        investments::get(&store, owner, created.id).await,
        Err(InvestmentError::NotFound)
    ));
    assert!(matches!(
        investments::delete(&store, owner, created.id).await,
        Err(InvestmentError::NotFound)
    ));
    assert!(investments::list(&store, owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_returns_only_callers_records() {
    let store = MemoryStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let carol = Uuid::new_v4();

    for symbol in ["AAPL", "MSFT", "NVDA"] {
        investments::create(&store, alice, payload(symbol, 1.0, 1.0)).await.unwrap();
    }
    investments::create(&store, bob, payload("TSLA", 1.0, 1.0)).await.unwrap();

    let mut alice_symbols: Vec<String> = investments::list(&store, alice)
        .await
        .unwrap()
        .into_iter()
        .inspect(|inv| assert_eq!(inv.owner_id, alice))
        .map(|inv| inv.symbol)
        .collect();
    alice_symbols.sort();
    assert_eq!(alice_symbols, vec!["AAPL", "MSFT", "NVDA"]);

    let bob_records = investments::list(&store, bob).await.unwrap();
    assert_eq!(bob_records.len(), 1);
    assert_eq!(bob_records[0].symbol, "TSLA");

    assert!(investments::list(&store, carol).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_with_blank_symbol_checks_existence_and_ownership_first() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let created = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();

    let err = investments::update(&store, owner, Uuid::new_v4(), payload("   ", 1.0, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, InvestmentError::NotFound));

    let err = investments::update(&store, intruder, created.id, payload("   ", 1.0, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, InvestmentError::Forbidden { id } if id == created.id));

    // the owner still gets the validation error
    let err = investments::update(&store, owner, created.id, payload("   ", 1.0, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, InvestmentError::Invalid(_)));

    assert_eq!(store.get(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn timestamps_are_whole_microseconds() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let created = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();
    assert_eq!(created.created_at.nanosecond() % 1_000, 0);

    let mut last = created.updated_at;
    for qty in 2..5 {
        let updated = investments::update(&store, owner, created.id, payload("AAPL", qty as f64, 1.0))
            .await
            .unwrap();
        assert_eq!(updated.updated_at.nanosecond() % 1_000, 0);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > last);
        last = updated.updated_at;
    }
}

/// Reads succeed but the record is gone by the time a write lands, as when
/// another request deletes it in between.
struct VanishingStore {
    inner: MemoryStore,
}

#[async_trait]
impl InvestmentStore for VanishingStore {
    async fn get(&self, id: Uuid) -> Result<Option<Investment>, StoreError> {
        self.inner.get(id).await
    }

    async fn insert(&self, investment: &Investment) -> Result<(), StoreError> {
        self.inner.insert(investment).await
    }

    async fn update(&self, _investment: &Investment) -> Result<Option<Investment>, StoreError> {
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Investment>, StoreError> {
        self.inner.list_by_owner(owner_id).await
    }
}

#[tokio::test]
async fn record_removed_before_write_is_not_found() {
    let store = VanishingStore {
        inner: MemoryStore::new(),
    };
    let owner = Uuid::new_v4();
    let created = investments::create(&store, owner, payload("AAPL", 1.0, 1.0)).await.unwrap();

    let err = investments::update(&store, owner, created.id, payload("MSFT", 2.0, 2.0))
        .await
        .unwrap_err();
    assert!(matches!(err, InvestmentError::NotFound));

    let err = investments::delete(&store, owner, created.id).await.unwrap_err();
    assert!(matches!(err, InvestmentError::NotFound));
}
