use crate::{
    db::DbPool,
    entities::{customer, order},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

/// Contact fields supplied with an order, trimmed and checked for presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl CustomerContact {
    /// Fails with [`ServiceError::InvalidCustomerData`] naming the first blank field.
    pub fn new(name: &str, address: &str, phone: &str, email: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            name: required("customerName", name)?,
            address: required("customerAddress", address)?,
            phone: required("customerPhone", phone)?,
            email: required("customerEmail", email)?,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidCustomerData(format!(
            "{} is required",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Returns the customer registered under `contact.email`, creating one when the
/// email has not been seen before. An existing record is reused as stored.
pub(crate) async fn find_or_create_customer<C>(
    conn: &C,
    contact: &CustomerContact,
) -> Result<customer::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let existing = customer::Entity::find()
        .filter(customer::Column::Email.eq(contact.email.as_str()))
        .order_by_asc(customer::Column::Id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to look up customer by email");
            ServiceError::DatabaseError(e)
        })?;

    if let Some(customer) = existing {
        return Ok(customer);
    }

    let created = customer::ActiveModel {
        id: NotSet,
        name: Set(contact.name.clone()),
        address: Set(contact.address.clone()),
        phone: Set(contact.phone.clone()),
        email: Set(contact.email.clone()),
    }
    .insert(conn)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create customer");
        ServiceError::DatabaseError(e)
    })?;

    info!(customer_id = created.id, "Customer created");
    Ok(created)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            phone: model.phone,
            email: model.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: i32,
    pub order_date: DateTime<Utc>,
    pub status: String,
    #[schema(value_type = String, example = "10.00")]
    pub total_amount: Decimal,
}

impl From<order::Model> for OrderSummary {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            order_date: model.order_date,
            status: model.status,
            total_amount: model.total_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerDetailResponse {
    #[serde(flatten)]
    pub customer: CustomerResponse,
    pub orders: Vec<OrderSummary>,
}

/// Read side for customers. Customers are written only by order placement.
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<CustomerResponse>, ServiceError> {
        let db = &*self.db_pool;
        let customers = customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list customers");
                ServiceError::DatabaseError(e)
            })?;

        Ok(customers.into_iter().map(CustomerResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: i32) -> Result<CustomerDetailResponse, ServiceError> {
        let db = &*self.db_pool;
        let customer = customer::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, customer_id = id, "Failed to load customer");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", id)))?;

        let orders = order::Entity::find()
            .filter(order::Column::CustomerId.eq(id))
            .order_by_asc(order::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, customer_id = id, "Failed to load customer orders");
                ServiceError::DatabaseError(e)
            })?;

        Ok(CustomerDetailResponse {
            customer: customer.into(),
            orders: orders.into_iter().map(OrderSummary::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn contact_fields_are_trimmed() {
        let contact =
            CustomerContact::new("  Ada  ", " 1 Mill Lane ", " 555-0101", "ada@example.com  ")
                .unwrap();
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.address, "1 Mill Lane");
        assert_eq!(contact.phone, "555-0101");
        assert_eq!(contact.email, "ada@example.com");
    }

    #[test]
    fn blank_contact_field_is_named_in_error() {
        let err = CustomerContact::new("Ada", "1 Mill Lane", "   ", "ada@example.com").unwrap_err();
        assert_matches!(err, ServiceError::InvalidCustomerData(ref msg) if msg == "customerPhone is required");
    }

    #[test]
    fn first_missing_field_wins() {
        let err = CustomerContact::new("", "", "", "").unwrap_err();
        assert_matches!(err, ServiceError::InvalidCustomerData(ref msg) if msg.starts_with("customerName"));
    }
}
