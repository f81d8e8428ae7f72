use super::{Storage, TransactionStorage};
use crate::models::{Transaction, TransactionType};
use crate::types::PageRequest;
use anyhow::{anyhow, Result};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

fn create_transaction(amount: &str, seconds: i64) -> Result<Transaction> {
    let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    Ok(Transaction {
        id: Uuid::new_v4(),
        amount: Decimal::from_str(amount)?,
        transaction_type: TransactionType::Deposit,
        description: "Salary".to_string(),
        category: "Income".to_string(),
        timestamp: epoch + Duration::seconds(seconds)
    })
}

#[test]
fn test_storage_basic_save_and_find_operations() -> Result<()> {
    let storage = TransactionStorage::new();

    assert!(storage.find_by_id(Uuid::new_v4()).is_none());

    let transaction = create_transaction("100.50", 0)?;
    let saved = storage.save(transaction.clone());
    let retrieved = storage.find_by_id(transaction.id).ok_or_else(|| anyhow!("Transaction not found in storage"))?;

    assert_eq!(saved, transaction);
    assert_eq!(retrieved, transaction);
    assert_eq!(storage.len(), 1);

    Ok(())
}

#[test]
fn test_storage_enforces_correct_overwrite_semantics() -> Result<()> {
    let storage = TransactionStorage::new();

    let version_1 = create_transaction("10.0", 0)?;
    storage.save(version_1.clone());

    let mut version_2 = storage.find_by_id(version_1.id).ok_or_else(|| anyhow!("Transaction v1 missing"))?;
    version_2.amount = Decimal::from_str("20.0")?;
    storage.save(version_2);

    let final_version = storage.find_by_id(version_1.id).ok_or_else(|| anyhow!("Final transaction version missing"))?;

    assert_eq!(final_version.amount, Decimal::from_str("20.0")?);
    assert_eq!(storage.len(), 1);

    Ok(())
}

#[test]
fn test_storage_is_not_affected_by_later_caller_mutation() -> Result<()> {
    let storage = TransactionStorage::new();

    let mut transaction = create_transaction("10.0", 0)?;
    storage.save(transaction.clone());
    transaction.description = "Changed".to_string();

    let stored = storage.find_by_id(transaction.id).ok_or_else(|| anyhow!("Transaction missing"))?;

    assert_eq!(stored.description, "Salary");

    Ok(())
}

#[test]
fn test_storage_delete_removes_and_tolerates_missing_ids() -> Result<()> {
    let storage = TransactionStorage::new();
    let transaction = storage.save(create_transaction("10.0", 0)?);

    storage.delete_by_id(Uuid::new_v4());
    assert_eq!(storage.len(), 1);

    storage.delete_by_id(transaction.id);
    storage.delete_by_id(transaction.id);

    assert!(storage.find_by_id(transaction.id).is_none());
    assert_eq!(storage.len(), 0);

    Ok(())
}

#[test]
fn test_find_all_orders_most_recent_first() -> Result<()> {
    let storage = TransactionStorage::new();
    let first = storage.save(create_transaction("1.0", 1)?);
    let third = storage.save(create_transaction("3.0", 3)?);
    let second = storage.save(create_transaction("2.0", 2)?);

    let ids: Vec<_> = storage.find_all(PageRequest::new(0, 10)).into_iter().map(|transaction| transaction.id).collect();

    assert_eq!(ids, vec![third.id, second.id, first.id]);

    Ok(())
}

#[test]
fn test_find_all_breaks_timestamp_ties_by_ascending_id() -> Result<()> {
    let storage = TransactionStorage::new();
    let mut expected = Vec::new();

    for _ in 0..5 {
        expected.push(storage.save(create_transaction("1.0", 0)?).id);
    }
    expected.sort();

    let ids: Vec<_> = storage.find_all(PageRequest::new(0, 10)).into_iter().map(|transaction| transaction.id).collect();

    assert_eq!(ids, expected);

    Ok(())
}

#[test]
fn test_find_all_pages_through_ordered_records() -> Result<()> {
    let storage = TransactionStorage::new();

    for seconds in 0..7 {
        storage.save(create_transaction("1.0", seconds)?);
    }

    let first_page = storage.find_all(PageRequest::new(0, 3));
    let last_page = storage.find_all(PageRequest::new(2, 3));

    assert_eq!(first_page.len(), 3);
    assert_eq!(first_page[0].timestamp, create_transaction("1.0", 6)?.timestamp);
    assert_eq!(last_page.len(), 1);
    assert_eq!(last_page[0].timestamp, create_transaction("1.0", 0)?.timestamp);
    assert!(storage.find_all(PageRequest::new(3, 3)).is_empty());
    assert!(storage.find_all(PageRequest::new(i64::MAX, 50)).is_empty());

    Ok(())
}

#[test]
fn test_storage_concurrent_saves_are_not_lost() -> Result<()> {
    let storage = Arc::new(TransactionStorage::new());

    thread::scope(|scope| {
        for _ in 0..8 {
            let storage = storage.clone();
            scope.spawn(move || {
                for seconds in 0..250 {
                    if let Ok(transaction) = create_transaction("1.0", seconds) {
                        storage.save(transaction);
                    }
                }
            });
        }
    });

    assert_eq!(storage.len(), 2000);

    Ok(())
}
