//! Atomicity-contract tests for the in-memory store.
//!
//! These pin the behaviors every [`BillingStore`] backend must provide:
//! dense unique sequences, all-or-nothing conditional stock deduction, and
//! compare-and-swap credit reservation, each correct under concurrency.

mod common;

use billing_engine::store::{BillingStore, StockDeduction};
use common::{dec, TestApp};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn concurrent_sequences_are_dense_and_unique() {
    let app = TestApp::spawn().await;
    let account_id = app.account_id;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&app.store);
        handles.push(tokio::spawn(async move {
            store
                .next_sequence(account_id, "INV", "20260806")
                .await
                .expect("Failed to take sequence")
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        seen.insert(handle.await.expect("Task panicked"));
    }

    assert_eq!(seen, (1..=20).collect::<HashSet<u32>>());
}

#[tokio::test]
async fn sequences_are_scoped_per_account_prefix_and_day() {
    let app = TestApp::spawn().await;
    let other_account = Uuid::new_v4();

    assert_eq!(
        app.store
            .next_sequence(app.account_id, "INV", "20260806")
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        app.store
            .next_sequence(app.account_id, "INV", "20260806")
            .await
            .unwrap(),
        2
    );
    // Different prefix, account, or day each restart at 1.
    assert_eq!(
        app.store
            .next_sequence(app.account_id, "CHALLAN", "20260806")
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        app.store
            .next_sequence(other_account, "INV", "20260806")
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        app.store
            .next_sequence(app.account_id, "INV", "20260807")
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn concurrent_stock_deductions_never_oversell() {
    let app = TestApp::spawn().await;
    let product = app.seed_product("Masala Tea", "100", 10).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&app.store);
        let product_id = product.id;
        handles.push(tokio::spawn(async move {
            store
                .deduct_stock(&[(product_id, 1)])
                .await
                .expect("Failed to deduct")
        }));
    }

    let mut applied = 0;
    for handle in handles {
        if handle.await.expect("Task panicked") == StockDeduction::Applied {
            applied += 1;
        }
    }

    assert_eq!(applied, 10);
    assert_eq!(app.product_quantity(product.id).await, 0);
}

#[tokio::test]
async fn multi_line_deduction_is_all_or_nothing() {
    let app = TestApp::spawn().await;
    let plenty = app.seed_product("Masala Tea", "100", 100).await;
    let scarce = app.seed_product("Green Tea", "100", 2).await;

    let outcome = app
        .store
        .deduct_stock(&[(plenty.id, 10), (scarce.id, 5)])
        .await
        .expect("Failed to deduct");

    assert_eq!(
        outcome,
        StockDeduction::Short {
            product_id: scarce.id,
            available: 2,
            requested: 5,
        }
    );
    assert_eq!(app.product_quantity(plenty.id).await, 100);
    assert_eq!(app.product_quantity(scarce.id).await, 2);
}

#[tokio::test]
async fn repeated_product_lines_are_checked_in_aggregate() {
    let app = TestApp::spawn().await;
    let product = app.seed_product("Masala Tea", "100", 10).await;

    let outcome = app
        .store
        .deduct_stock(&[(product.id, 6), (product.id, 6)])
        .await
        .expect("Failed to deduct");

    assert_eq!(
        outcome,
        StockDeduction::Short {
            product_id: product.id,
            available: 10,
            requested: 12,
        }
    );
    assert_eq!(app.product_quantity(product.id).await, 10);
}

#[tokio::test]
async fn concurrent_credit_reservations_respect_the_limit() {
    let app = TestApp::spawn().await;
    let customer = app.seed_customer("Sharma Stores", "100", "0").await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&app.store);
        let customer_id = customer.id;
        handles.push(tokio::spawn(async move {
            store
                .reserve_credit(customer_id, dec("10"))
                .await
                .expect("Failed to reserve")
        }));
    }

    let mut reserved = 0;
    for handle in handles {
        if handle.await.expect("Task panicked") {
            reserved += 1;
        }
    }

    assert_eq!(reserved, 10);
    assert_eq!(app.customer_credit_used(customer.id).await, dec("100"));
}

#[tokio::test]
async fn release_credit_ignores_unknown_customers() {
    let app = TestApp::spawn().await;
    app.store
        .release_credit(Uuid::new_v4(), dec("50"))
        .await
        .expect("Release on unknown customer should be a no-op");
}
