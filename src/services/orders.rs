use crate::{
    db::DbPool,
    entities::{customer, order, order_entry},
    errors::ServiceError,
    services::{
        customers::{find_or_create_customer, CustomerContact, CustomerResponse},
        inventory::{InventoryLedger, Reservation},
    },
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Status given to an order when the caller supplies none
pub const DEFAULT_ORDER_STATUS: &str = "Pending";

/// Longest status accepted, counted in characters after trimming
pub const MAX_STATUS_LEN: usize = 64;

/// Trims `status` and enforces [`MAX_STATUS_LEN`]. A blank status yields `None`.
fn normalize_status(status: &str) -> Result<Option<String>, ServiceError> {
    let status = status.trim();
    if status.is_empty() {
        return Ok(None);
    }
    if status.chars().count() > MAX_STATUS_LEN {
        return Err(ServiceError::ValidationError(format!(
            "status cannot be longer than {} characters",
            MAX_STATUS_LEN
        )));
    }
    Ok(Some(status.to_string()))
}

/// Cart and customer payload for order placement.
///
/// Fields not listed here (a client-chosen `customerId`, `totalAmount`, `orderDate`)
/// are ignored on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: String,
    pub delivery_date: Option<DateTime<Utc>>,
    /// Blank or missing means `Pending`
    #[schema(max_length = 64)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_entries: Vec<OrderLine>,
}

/// One line item of a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntryResponse {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    /// Unit price captured at placement
    #[schema(value_type = String, example = "5.00")]
    pub price: Decimal,
    pub quantity: i32,
}

impl From<order_entry::Model> for OrderEntryResponse {
    fn from(model: order_entry::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            product_name: model.product_name,
            price: model.unit_price,
            quantity: model.quantity,
        }
    }
}

/// A persisted order with its customer and entries resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub status: String,
    #[schema(value_type = String, example = "10.00")]
    pub total_amount: Decimal,
    pub customer: CustomerResponse,
    pub order_entries: Vec<OrderEntryResponse>,
}

impl OrderResponse {
    fn from_parts(
        order: order::Model,
        customer: customer::Model,
        mut entries: Vec<order_entry::Model>,
    ) -> Self {
        entries.sort_by_key(|entry| entry.id);
        Self {
            id: order.id,
            order_date: order.order_date,
            delivery_date: order.delivery_date,
            status: order.status,
            total_amount: order.total_amount,
            customer: customer.into(),
            order_entries: entries.into_iter().map(OrderEntryResponse::from).collect(),
        }
    }
}

/// Order placement and order administration.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    ledger: InventoryLedger,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db_pool,
            ledger: InventoryLedger::new(),
        }
    }

    /// Places an order as one atomic unit.
    ///
    /// Customer resolution, every stock reservation, the order row and its entries
    /// are written in a single transaction. Any failure rolls all of them back, so a
    /// rejected cart leaves stock, customers and orders exactly as they were.
    #[instrument(skip(self, request), fields(line_items = request.order_entries.len()))]
    pub async fn place_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let contact = CustomerContact::new(
            &request.customer_name,
            &request.customer_address,
            &request.customer_phone,
            &request.customer_email,
        )?;

        for (index, line) in request.order_entries.iter().enumerate() {
            if line.quantity <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "orderEntries[{}]: quantity for product {} must be greater than zero",
                    index, line.product_id
                )));
            }
        }

        let status = normalize_status(request.status.as_deref().unwrap_or_default())?
            .unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string());

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin order placement transaction");
            ServiceError::DatabaseError(e)
        })?;

        let placed = self
            .persist_order(
                &txn,
                &contact,
                &request.order_entries,
                status,
                request.delivery_date,
            )
            .await;

        let (order, customer, entries) = match placed {
            Ok(parts) => parts,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back order placement");
                }
                return Err(e);
            }
        };

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit order placement");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = order.id,
            customer_id = customer.id,
            total = %order.total_amount,
            "Order placed"
        );

        Ok(OrderResponse::from_parts(order, customer, entries))
    }

    async fn persist_order(
        &self,
        txn: &DatabaseTransaction,
        contact: &CustomerContact,
        lines: &[OrderLine],
        status: String,
        delivery_date: Option<DateTime<Utc>>,
    ) -> Result<(order::Model, customer::Model, Vec<order_entry::Model>), ServiceError> {
        let customer = find_or_create_customer(txn, contact).await?;

        let mut total = Decimal::ZERO;
        let mut reservations: Vec<Reservation> = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let reservation = self
                .ledger
                .reserve(txn, line.product_id, line.quantity)
                .await
                .map_err(|e| {
                    warn!(
                        line = index,
                        product_id = line.product_id,
                        error = %e,
                        "Order placement rejected"
                    );
                    e
                })?;
            total = reservation
                .line_total()
                .and_then(|amount| total.checked_add(amount))
                .ok_or_else(|| {
                    warn!(
                        line = index,
                        product_id = line.product_id,
                        "Order total overflowed"
                    );
                    ServiceError::ValidationError(format!(
                        "orderEntries[{}]: order total is too large",
                        index
                    ))
                })?;
            reservations.push(reservation);
        }

        let order = order::ActiveModel {
            id: NotSet,
            customer_id: Set(customer.id),
            order_date: Set(Utc::now()),
            delivery_date: Set(delivery_date),
            status: Set(status),
            total_amount: Set(total),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to insert order");
            ServiceError::DatabaseError(e)
        })?;

        let mut entries = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            let entry = order_entry::ActiveModel {
                id: NotSet,
                order_id: Set(order.id),
                product_id: Set(reservation.product_id),
                product_name: Set(reservation.product_name),
                unit_price: Set(reservation.unit_price),
                quantity: Set(reservation.quantity),
            }
            .insert(txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = order.id, "Failed to insert order entry");
                ServiceError::DatabaseError(e)
            })?;
            entries.push(entry);
        }

        Ok((order, customer, entries))
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderResponse>, ServiceError> {
        let db = &*self.db_pool;
        let orders = order::Entity::find()
            .order_by_asc(order::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list orders");
                ServiceError::DatabaseError(e)
            })?;

        self.hydrate(orders).await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: i32) -> Result<OrderResponse, ServiceError> {
        let order = self.find_order(id).await?;
        let mut hydrated = self.hydrate(vec![order]).await?;
        hydrated
            .pop()
            .ok_or_else(|| ServiceError::InternalError(format!("Order {} lost during load", id)))
    }

    /// Replaces the status of an order. Entries, total and customer are never touched.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: i32,
        status: String,
    ) -> Result<OrderResponse, ServiceError> {
        let status = normalize_status(&status)?.ok_or_else(|| {
            ServiceError::ValidationError("status must not be blank".to_string())
        })?;

        let db = &*self.db_pool;
        let order = self.find_order(id).await?;
        let mut active: order::ActiveModel = order.into();
        active.status = Set(status);
        active.update(db).await.map_err(|e| {
            error!(error = %e, order_id = id, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = id, "Order status updated");
        self.get_order(id).await
    }

    /// Deletes an order and its entries. Reserved stock stays consumed.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction");
            ServiceError::DatabaseError(e)
        })?;

        let order = order::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = id, "Failed to load order");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;

        order_entry::Entity::delete_many()
            .filter(order_entry::Column::OrderId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = id, "Failed to delete order entries");
                ServiceError::DatabaseError(e)
            })?;

        order.delete(&txn).await.map_err(|e| {
            error!(error = %e, order_id = id, "Failed to delete order");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit order deletion");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = id, "Order deleted");
        Ok(())
    }

    async fn find_order(&self, id: i32) -> Result<order::Model, ServiceError> {
        let db = &*self.db_pool;
        order::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = id, "Failed to load order");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))
    }

    /// Loads customers and entries for `orders` with one query each.
    async fn hydrate(&self, orders: Vec<order::Model>) -> Result<Vec<OrderResponse>, ServiceError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let db = &*self.db_pool;
        let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let customer_ids: Vec<i32> = orders.iter().map(|o| o.customer_id).collect();

        let mut entries_by_order: HashMap<i32, Vec<order_entry::Model>> = HashMap::new();
        let entries = order_entry::Entity::find()
            .filter(order_entry::Column::OrderId.is_in(order_ids))
            .order_by_asc(order_entry::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load order entries");
                ServiceError::DatabaseError(e)
            })?;
        for entry in entries {
            entries_by_order.entry(entry.order_id).or_default().push(entry);
        }

        let customers: HashMap<i32, customer::Model> = customer::Entity::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load order customers");
                ServiceError::DatabaseError(e)
            })?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        orders
            .into_iter()
            .map(|order| {
                let customer = customers.get(&order.customer_id).cloned().ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "Customer {} of order {} is missing",
                        order.customer_id, order.id
                    ))
                })?;
                let entries = entries_by_order.remove(&order.id).unwrap_or_default();
                Ok(OrderResponse::from_parts(order, customer, entries))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_order_request_ignores_client_owned_fields() {
        let request: PlaceOrderRequest = serde_json::from_value(serde_json::json!({
            "customerId": 99,
            "totalAmount": "0.01",
            "customerName": "Ada",
            "customerAddress": "1 Mill Lane",
            "customerPhone": "555-0101",
            "customerEmail": "ada@example.com",
            "orderEntries": [{ "productId": 1, "quantity": 2 }]
        }))
        .unwrap();

        assert_eq!(request.customer_name, "Ada");
        assert_eq!(request.status, None);
        assert_eq!(
            request.order_entries,
            vec![OrderLine {
                product_id: 1,
                quantity: 2
            }]
        );
    }

    #[test]
    fn status_is_trimmed_and_bounded() {
        assert_eq!(
            normalize_status("  Shipped ").unwrap().as_deref(),
            Some("Shipped")
        );
        assert_eq!(normalize_status(" \t ").unwrap(), None);

        let padded_limit = format!("  {}  ", "x".repeat(MAX_STATUS_LEN));
        assert_eq!(
            normalize_status(&padded_limit).unwrap(),
            Some("x".repeat(MAX_STATUS_LEN))
        );
        assert!(matches!(
            normalize_status(&"x".repeat(MAX_STATUS_LEN + 1)),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_customer_fields_deserialize_as_blank() {
        let request: PlaceOrderRequest =
            serde_json::from_value(serde_json::json!({ "orderEntries": [] })).unwrap();
        assert!(request.customer_email.is_empty());
        assert!(request.order_entries.is_empty());
    }
}
