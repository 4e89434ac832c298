use crate::db::DbPool;
use crate::services::{
    catalog::CatalogService, customers::CustomerService, orders::OrderService,
    properties::PropertyService,
};
use std::sync::Arc;

pub mod common;
pub mod customers;
pub mod orders;
pub mod papers;
pub mod properties;

/// Service container shared by every handler through `AppState`
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub properties: Arc<PropertyService>,
    pub orders: Arc<OrderService>,
    pub customers: Arc<CustomerService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db_pool.clone())),
            properties: Arc::new(PropertyService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool.clone())),
            customers: Arc::new(CustomerService::new(db_pool)),
        }
    }
}
