mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, order_body, response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn create_paper_with_properties() {
    let app = TestApp::new().await;
    let recycled = app.seed_property("Recycled").await;
    let heavy = app.seed_property("Heavyweight").await;

    let response = app
        .request(
            Method::POST,
            "/api/paper",
            Some(json!({
                "name": "  Kraft A4  ",
                "price": "5.00",
                "stock": 10,
                "propertyIds": [heavy.id, recycled.id, heavy.id]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["name"], "Kraft A4");
    assert_eq!(decimal(&body["price"]), dec!(5.00));
    assert_eq!(body["stock"], 10);
    assert_eq!(body["discontinued"], false);
    assert_eq!(
        body["properties"],
        json!([
            { "id": recycled.id, "propertyName": "Recycled" },
            { "id": heavy.id, "propertyName": "Heavyweight" }
        ])
    );
}

#[tokio::test]
async fn price_accepts_json_numbers() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/paper",
            Some(json!({ "name": "Vellum", "price": 2.5, "stock": 3 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(decimal(&response_json(response).await["price"]), dec!(2.5));
}

#[tokio::test]
async fn list_and_get_papers() {
    let app = TestApp::new().await;
    let first = app.seed_paper("Kraft A4", dec!(5.00), 10).await;
    let second = app.seed_paper("Vellum A5", dec!(0.75), 3).await;

    let list = response_json(app.request(Method::GET, "/api/paper", None).await).await;
    let ids: Vec<i64> = list
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![i64::from(first.id), i64::from(second.id)]);

    let response = app
        .request(Method::GET, &format!("/api/paper/{}", second.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["name"], "Vellum A5");

    let missing = app.request(Method::GET, "/api/paper/9999", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_fields_and_property_set() {
    let app = TestApp::new().await;
    let recycled = app.seed_property("Recycled").await;
    let glossy = app.seed_property("Glossy").await;
    let paper = app
        .seed_paper_with_properties("Kraft A4", dec!(5.00), 10, vec![recycled.id])
        .await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/paper/{}", paper.id),
            Some(json!({
                "id": paper.id,
                "name": "Kraft A4 Glossy",
                "price": "6.25",
                "stock": 4,
                "discontinued": true,
                "propertyIds": [glossy.id]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["name"], "Kraft A4 Glossy");
    assert_eq!(decimal(&body["price"]), dec!(6.25));
    assert_eq!(body["stock"], 4);
    assert_eq!(body["discontinued"], true);
    assert_eq!(
        body["properties"],
        json!([{ "id": glossy.id, "propertyName": "Glossy" }])
    );
}

#[tokio::test]
async fn update_rejects_mismatched_body_id() {
    let app = TestApp::new().await;
    let paper = app.seed_paper("Kraft A4", dec!(5.00), 10).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/paper/{}", paper.id),
            Some(json!({ "id": paper.id + 1, "name": "Other", "price": "1.00", "stock": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.stock_of(paper.id).await, 10);
}

#[tokio::test]
async fn update_missing_paper_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/api/paper/404",
            Some(json!({ "name": "Ghost", "price": "1.00", "stock": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = TestApp::new().await;

    for body in [
        json!({ "name": "Kraft", "price": "-1.00", "stock": 1 }),
        json!({ "name": "Kraft", "price": "1.00", "stock": -1 }),
        json!({ "name": "   ", "price": "1.00", "stock": 1 }),
        json!({ "name": "Kraft", "price": "1.00", "stock": 1, "propertyIds": [77] }),
    ] {
        let response = app.request(Method::POST, "/api/paper", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let list = response_json(app.request(Method::GET, "/api/paper", None).await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn price_outside_the_price_column_is_rejected() {
    let app = TestApp::new().await;

    for price in ["70000000000000000000000000000", "10000000000.00", "1.005"] {
        let response = app
            .request(
                Method::POST,
                "/api/paper",
                Some(json!({ "name": "Ledger", "price": price, "stock": 10 })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "price {price}");
        let body = response_json(response).await;
        assert!(body["message"].as_str().expect("message").contains("price"));
    }

    let response = app
        .request(
            Method::POST,
            "/api/paper",
            Some(json!({ "name": "Ledger", "price": "9999999999.99", "stock": 10 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn delete_removes_unreferenced_paper() {
    let app = TestApp::new().await;
    let recycled = app.seed_property("Recycled").await;
    let paper = app
        .seed_paper_with_properties("Kraft A4", dec!(5.00), 10, vec![recycled.id])
        .await;

    let response = app
        .request(Method::DELETE, &format!("/api/paper/{}", paper.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(Method::GET, &format!("/api/paper/{}", paper.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The property itself survives and is no longer assigned
    let check = response_json(
        app.request(
            Method::GET,
            &format!("/api/property/{}/canDelete", recycled.id),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(check, json!({ "canDelete": true, "assignedCount": 0 }));

    let again = app
        .request(Method::DELETE, &format!("/api/paper/{}", paper.id), None)
        .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_refuses_paper_with_order_history() {
    let app = TestApp::new().await;
    let paper = app.seed_paper("Kraft A4", dec!(5.00), 10).await;

    let placed = app
        .request(
            Method::POST,
            "/api/order",
            Some(order_body("ada@example.com", &[(paper.id, 1)])),
        )
        .await;
    assert_eq!(placed.status(), StatusCode::CREATED);

    let response = app
        .request(Method::DELETE, &format!("/api/paper/{}", paper.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.stock_of(paper.id).await, 9);
}
