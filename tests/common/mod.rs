#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use paperstore_api::{
    build_router,
    config::AppConfig,
    db,
    entities::{customer, order, order_entry, paper},
    services::{
        catalog::{PaperInput, PaperResponse},
        properties::PropertyResponse,
    },
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper harness for spinning up the application against a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = db_dir.path().join("paperstore_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.cors_allow_any_origin = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn seed_paper(&self, name: &str, price: Decimal, stock: i32) -> PaperResponse {
        self.seed_paper_with_properties(name, price, stock, Vec::new())
            .await
    }

    pub async fn seed_paper_with_properties(
        &self,
        name: &str,
        price: Decimal,
        stock: i32,
        property_ids: Vec<i32>,
    ) -> PaperResponse {
        self.state
            .services
            .catalog
            .create_paper(PaperInput {
                name: name.to_string(),
                price,
                stock,
                discontinued: false,
                property_ids,
            })
            .await
            .expect("seed paper for tests")
    }

    pub async fn seed_property(&self, name: &str) -> PropertyResponse {
        self.state
            .services
            .properties
            .create_property(name.to_string())
            .await
            .expect("seed property for tests")
    }

    /// Stock as currently committed in the database.
    pub async fn stock_of(&self, paper_id: i32) -> i32 {
        paper::Entity::find_by_id(paper_id)
            .one(&*self.state.db)
            .await
            .expect("query paper")
            .expect("paper exists")
            .stock
    }

    pub async fn order_count(&self) -> u64 {
        order::Entity::find()
            .count(&*self.state.db)
            .await
            .expect("count orders")
    }

    pub async fn order_entry_count(&self) -> u64 {
        order_entry::Entity::find()
            .count(&*self.state.db)
            .await
            .expect("count order entries")
    }

    pub async fn customer_count(&self) -> u64 {
        customer::Entity::find()
            .count(&*self.state.db)
            .await
            .expect("count customers")
    }
}

/// Order placement body with fixed contact details for `email`.
pub fn order_body(email: &str, lines: &[(i32, i32)]) -> Value {
    let entries: Vec<Value> = lines
        .iter()
        .map(|(product_id, quantity)| json!({ "productId": product_id, "quantity": quantity }))
        .collect();

    json!({
        "customerName": "Ada Lovelace",
        "customerAddress": "12 Analytical Row",
        "customerPhone": "555-0101",
        "customerEmail": email,
        "orderEntries": entries,
    })
}

pub async fn response_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&body).expect("response body is json")
}

/// Parses a monetary field, which is serialized as a decimal string.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected decimal, got {other}"),
    }
}
