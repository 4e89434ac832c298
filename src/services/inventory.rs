//! Stock ledger for paper products.
//!
//! The ledger is the only code that writes `paper.stock` after a product is
//! created. It never opens or commits a transaction of its own: every call runs
//! on the caller's connection, normally the order-placement transaction, so a
//! rolled back placement also rolls back every reservation it made.

use crate::{entities::paper, errors::ServiceError};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect,
};
use tracing::{debug, error, instrument, warn};

/// Product data captured by a successful reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub product_id: i32,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    /// Stock left after this reservation, as seen by the reserving transaction
    pub remaining_stock: i32,
}

impl Reservation {
    /// Unit price times quantity, or `None` when the product overflows `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryLedger;

impl InventoryLedger {
    pub fn new() -> Self {
        Self
    }

    /// Takes `quantity` units of `product_id` out of stock on `conn`.
    ///
    /// Fails with [`ServiceError::ProductNotFound`] for an unknown product and
    /// [`ServiceError::InsufficientStock`] when fewer than `quantity` units remain,
    /// including the case where a concurrent transaction consumed the stock between
    /// the read and the decrement.
    #[instrument(skip(self, conn))]
    pub async fn reserve<C>(
        &self,
        conn: &C,
        product_id: i32,
        quantity: i32,
    ) -> Result<Reservation, ServiceError>
    where
        C: ConnectionTrait,
    {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "Quantity for product {} must be greater than zero",
                product_id
            )));
        }

        let product = paper::Entity::find_by_id(product_id)
            .one(conn)
            .await
            .map_err(|e| {
                error!(error = %e, product_id, "Failed to load product for reservation");
                ServiceError::DatabaseError(e)
            })?
            .ok_or(ServiceError::ProductNotFound(product_id))?;

        if product.stock < quantity {
            warn!(
                product_id,
                requested = quantity,
                available = product.stock,
                "Insufficient stock"
            );
            return Err(insufficient_stock(&product, quantity, product.stock));
        }

        // Guarded decrement; zero rows means another transaction got there first
        let result = paper::Entity::update_many()
            .col_expr(
                paper::Column::Stock,
                Expr::col(paper::Column::Stock).sub(quantity),
            )
            .filter(paper::Column::Id.eq(product_id))
            .filter(paper::Column::Stock.gte(quantity))
            .exec(conn)
            .await
            .map_err(|e| {
                error!(error = %e, product_id, "Failed to decrement stock");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            let available = self.available(conn, product_id).await?.unwrap_or(0);
            warn!(
                product_id,
                requested = quantity,
                available,
                "Stock consumed by a concurrent reservation"
            );
            return Err(insufficient_stock(&product, quantity, available));
        }

        debug!(product_id, quantity, "Stock reserved");

        Ok(Reservation {
            product_id,
            remaining_stock: product.stock - quantity,
            product_name: product.name,
            unit_price: product.price,
            quantity,
        })
    }

    /// Puts `quantity` units of `product_id` back into stock on `conn`.
    ///
    /// Order placement never calls this: a failed placement discards its whole
    /// transaction instead. It exists for callers that restock outside a
    /// placement, such as returns handled by an admin.
    #[instrument(skip(self, conn))]
    pub async fn release<C>(
        &self,
        conn: &C,
        product_id: i32,
        quantity: i32,
    ) -> Result<i32, ServiceError>
    where
        C: ConnectionTrait,
    {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "Quantity for product {} must be greater than zero",
                product_id
            )));
        }

        let result = paper::Entity::update_many()
            .col_expr(
                paper::Column::Stock,
                Expr::col(paper::Column::Stock).add(quantity),
            )
            .filter(paper::Column::Id.eq(product_id))
            .exec(conn)
            .await
            .map_err(|e| {
                error!(error = %e, product_id, "Failed to restore stock");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::ProductNotFound(product_id));
        }

        let stock = self.available(conn, product_id).await?.unwrap_or(0);
        debug!(product_id, quantity, stock, "Stock released");
        Ok(stock)
    }

    /// Current stock for `product_id`, or `None` if the product does not exist.
    pub async fn available<C>(&self, conn: &C, product_id: i32) -> Result<Option<i32>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let stock = paper::Entity::find_by_id(product_id)
            .select_only()
            .column(paper::Column::Stock)
            .into_tuple::<i32>()
            .one(conn)
            .await?;
        Ok(stock)
    }
}

fn insufficient_stock(product: &paper::Model, requested: i32, available: i32) -> ServiceError {
    ServiceError::InsufficientStock {
        product_id: product.id,
        product_name: product.name.clone(),
        requested,
        available,
    }
}
