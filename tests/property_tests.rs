//! Property-based tests for order placement and the stock ledger.
//!
//! Every case runs against its own temporary database, so case counts are kept low.

mod common;

use assert_matches::assert_matches;
use common::TestApp;
use paperstore_api::{
    errors::ServiceError,
    services::{
        customers::CustomerContact,
        orders::{OrderLine, PlaceOrderRequest},
    },
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// (price in cents, stock) per product
fn catalog_strategy() -> impl Strategy<Value = Vec<(i64, i32)>> {
    prop::collection::vec((0i64..10_000, 1i32..20), 1..4)
}

/// A catalog plus one in-stock quantity per product
fn satisfiable_cart_strategy() -> impl Strategy<Value = (Vec<(i64, i32)>, Vec<i32>)> {
    catalog_strategy().prop_flat_map(|catalog| {
        let quantities: Vec<_> = catalog.iter().map(|(_, stock)| 1..=*stock).collect();
        (Just(catalog), quantities)
    })
}

/// A satisfiable cart where the line at the returned index is pushed over its stock
fn oversold_cart_strategy() -> impl Strategy<Value = (Vec<(i64, i32)>, Vec<i32>, usize, i32)> {
    satisfiable_cart_strategy().prop_flat_map(|(catalog, quantities)| {
        let len = catalog.len();
        (Just(catalog), Just(quantities), 0..len, 1i32..5)
    })
}

fn run<F: std::future::Future<Output = ()>>(future: F) {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

fn cart(ids: &[i32], quantities: &[i32]) -> PlaceOrderRequest {
    PlaceOrderRequest {
        customer_name: "Ada Lovelace".into(),
        customer_address: "12 Analytical Row".into(),
        customer_phone: "555-0101".into(),
        customer_email: "ada@example.com".into(),
        order_entries: ids
            .iter()
            .zip(quantities)
            .map(|(&product_id, &quantity)| OrderLine {
                product_id,
                quantity,
            })
            .collect(),
        ..PlaceOrderRequest::default()
    }
}

async fn seed(app: &TestApp, catalog: &[(i64, i32)]) -> Vec<i32> {
    let mut ids = Vec::with_capacity(catalog.len());
    for (n, (cents, stock)) in catalog.iter().enumerate() {
        let paper = app
            .seed_paper(&format!("Paper {n}"), Decimal::new(*cents, 2), *stock)
            .await;
        ids.push(paper.id);
    }
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn satisfiable_cart_decrements_exactly_and_totals((catalog, quantities) in satisfiable_cart_strategy()) {
        run(async move {
            let app = TestApp::new().await;
            let ids = seed(&app, &catalog).await;

            let order = app
                .state
                .services
                .orders
                .place_order(cart(&ids, &quantities))
                .await
                .expect("satisfiable cart is placed");

            let expected_total: Decimal = catalog
                .iter()
                .zip(&quantities)
                .map(|((cents, _), q)| Decimal::new(*cents, 2) * Decimal::from(*q))
                .sum();
            assert_eq!(order.total_amount, expected_total);
            assert_eq!(order.order_entries.len(), ids.len());

            for ((id, (_, stock)), q) in ids.iter().zip(&catalog).zip(&quantities) {
                assert_eq!(app.stock_of(*id).await, stock - q);
            }
            assert_eq!(app.order_count().await, 1);
        });
    }

    #[test]
    fn oversold_line_rolls_back_everything((catalog, mut quantities, over, extra) in oversold_cart_strategy()) {
        run(async move {
            let app = TestApp::new().await;
            let ids = seed(&app, &catalog).await;
            quantities[over] = catalog[over].1 + extra;

            let err = app
                .state
                .services
                .orders
                .place_order(cart(&ids, &quantities))
                .await
                .expect_err("oversold cart is rejected");

            assert_matches!(
                err,
                ServiceError::InsufficientStock { product_id, requested, available, .. }
                    if product_id == ids[over]
                        && requested == quantities[over]
                        && available == catalog[over].1
            );

            for (id, (_, stock)) in ids.iter().zip(&catalog) {
                assert_eq!(app.stock_of(*id).await, *stock);
            }
            assert_eq!(app.order_count().await, 0);
            assert_eq!(app.order_entry_count().await, 0);
            assert_eq!(app.customer_count().await, 0);
        });
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn contact_fields_are_stored_trimmed(
        pad in "[ \t]{0,3}",
        name in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]",
        email in "[a-z]{3,10}@[a-z]{3,8}\\.com",
    ) {
        let contact = CustomerContact::new(
            &format!("{pad}{name}{pad}"),
            "1 Mill Lane",
            "555-0101",
            &format!("{pad}{email}"),
        )
        .expect("non-blank contact");
        prop_assert_eq!(contact.name, name);
        prop_assert_eq!(contact.email, email);
    }

    #[test]
    fn whitespace_only_fields_are_rejected(blank in "[ \t]{0,6}") {
        let result = CustomerContact::new("Ada", &blank, "555-0101", "ada@example.com");
        prop_assert!(
            matches!(result, Err(ServiceError::InvalidCustomerData(_))),
            "blank address accepted"
        );
    }
}
