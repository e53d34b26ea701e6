//! Delivery challan integration tests.

mod common;

use billing_engine::models::{ChallanStatus, CreateInvoice, GenerateChallan};
use billing_engine::EngineError;
use common::{line, today_key, TestApp};
use uuid::Uuid;

async fn seeded_invoice(app: &TestApp, delivery_address: Option<&str>) -> (Uuid, Uuid) {
    let product = app.seed_product("Masala Tea", "100", 50).await;
    let customer = app.seed_customer("Sharma Stores", "100000", "0").await;
    let detail = app
        .engine
        .create_invoice(CreateInvoice {
            account_id: app.account_id,
            customer_id: customer.id,
            line_items: vec![line(&product, 1)],
            delivery_address: delivery_address.map(str::to_string),
            notes: None,
            is_same_state: true,
        })
        .await
        .expect("Failed to create invoice");
    (detail.invoice.id, customer.id)
}

fn challan_input(app: &TestApp, invoice_id: Uuid) -> GenerateChallan {
    GenerateChallan {
        account_id: app.account_id,
        invoice_id,
        recipient_name: None,
        recipient_phone: None,
        notes: None,
    }
}

#[tokio::test]
async fn recipient_fields_default_from_the_customer() {
    let app = TestApp::spawn().await;
    let (invoice_id, _) = seeded_invoice(&app, None).await;

    let challan = app
        .engine
        .generate_delivery_challan(challan_input(&app, invoice_id))
        .await
        .expect("Failed to generate challan");

    // Seeded customer carries these contact fields.
    assert_eq!(challan.recipient_name, "Sharma Stores");
    assert_eq!(challan.recipient_phone, "9876543210");
    assert_eq!(challan.delivery_address, "14 Market Road, Pune");
    assert_eq!(challan.status, ChallanStatus::Pending);
    assert_eq!(challan.invoice_id, invoice_id);
}

#[tokio::test]
async fn invoice_delivery_address_takes_precedence() {
    let app = TestApp::spawn().await;
    let (invoice_id, _) = seeded_invoice(&app, Some("Warehouse 7, Nashik")).await;

    let challan = app
        .engine
        .generate_delivery_challan(challan_input(&app, invoice_id))
        .await
        .expect("Failed to generate challan");

    assert_eq!(challan.delivery_address, "Warehouse 7, Nashik");
}

#[tokio::test]
async fn explicit_recipient_fields_win_over_defaults() {
    let app = TestApp::spawn().await;
    let (invoice_id, _) = seeded_invoice(&app, None).await;

    let mut input = challan_input(&app, invoice_id);
    input.recipient_name = Some("Gate Security".to_string());
    input.recipient_phone = Some("9123456780".to_string());
    input.notes = Some("Deliver before noon".to_string());

    let challan = app
        .engine
        .generate_delivery_challan(input)
        .await
        .expect("Failed to generate challan");

    assert_eq!(challan.recipient_name, "Gate Security");
    assert_eq!(challan.recipient_phone, "9123456780");
    assert_eq!(challan.notes.as_deref(), Some("Deliver before noon"));
}

#[tokio::test]
async fn challan_numbers_run_their_own_daily_sequence() {
    let app = TestApp::spawn().await;
    let (invoice_id, _) = seeded_invoice(&app, None).await;

    let first = app
        .engine
        .generate_delivery_challan(challan_input(&app, invoice_id))
        .await
        .expect("Failed to generate challan");
    let second = app
        .engine
        .generate_delivery_challan(challan_input(&app, invoice_id))
        .await
        .expect("Failed to generate challan");

    // The invoice already consumed INV...0001; challans are sequenced
    // independently under their own prefix.
    let prefix = format!("CHALLAN{}", today_key());
    assert_eq!(first.challan_number, format!("{prefix}0001"));
    assert_eq!(second.challan_number, format!("{prefix}0002"));
}

#[tokio::test]
async fn unknown_invoice_is_not_found() {
    let app = TestApp::spawn().await;

    let err = app
        .engine
        .generate_delivery_challan(challan_input(&app, Uuid::new_v4()))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn invoice_of_another_account_is_unauthorized() {
    let app = TestApp::spawn().await;
    let (invoice_id, _) = seeded_invoice(&app, None).await;

    let mut input = challan_input(&app, invoice_id);
    input.account_id = Uuid::new_v4();

    let err = app
        .engine
        .generate_delivery_challan(input)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Unauthorized(_)));
}
