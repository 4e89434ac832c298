//! Paper product catalog: product CRUD and property tagging.

use crate::{
    db::DbPool,
    entities::{order_entry, paper, paper_property, property},
    errors::ServiceError,
    services::properties::PropertyResponse,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, ModelTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, sync::Arc};
use tracing::{error, info, instrument};
use utoipa::ToSchema;

/// Decimal places stored for a price, matching the `decimal(12, 2)` column
pub const PRICE_SCALE: u32 = 2;

/// Largest price the `decimal(12, 2)` column holds
pub fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, PRICE_SCALE)
}

/// Writable fields of a paper product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperInput {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub discontinued: bool,
    pub property_ids: Vec<i32>,
}

impl PaperInput {
    /// Trims the name, de-duplicates property ids and checks value ranges.
    fn normalized(self) -> Result<Self, ServiceError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError("name is required".to_string()));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ServiceError::ValidationError(
                "price cannot be negative".to_string(),
            ));
        }
        if self.price > max_price() {
            return Err(ServiceError::ValidationError(format!(
                "price cannot exceed {}",
                max_price()
            )));
        }
        if self.price.normalize().scale() > PRICE_SCALE {
            return Err(ServiceError::ValidationError(format!(
                "price cannot have more than {} decimal places",
                PRICE_SCALE
            )));
        }
        if self.stock < 0 {
            return Err(ServiceError::ValidationError(
                "stock cannot be negative".to_string(),
            ));
        }

        let property_ids: BTreeSet<i32> = self.property_ids.into_iter().collect();
        Ok(Self {
            name,
            property_ids: property_ids.into_iter().collect(),
            ..self
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaperResponse {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String, example = "5.00")]
    pub price: Decimal,
    pub stock: i32,
    pub discontinued: bool,
    pub properties: Vec<PropertyResponse>,
}

impl PaperResponse {
    fn from_parts(paper: paper::Model, mut properties: Vec<property::Model>) -> Self {
        properties.sort_by_key(|p| p.id);
        Self {
            id: paper.id,
            name: paper.name,
            price: paper.price,
            stock: paper.stock,
            discontinued: paper.discontinued,
            properties: properties.into_iter().map(PropertyResponse::from).collect(),
        }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_papers(&self) -> Result<Vec<PaperResponse>, ServiceError> {
        let db = &*self.db_pool;
        let rows = paper::Entity::find()
            .order_by_asc(paper::Column::Id)
            .find_with_related(property::Entity)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list papers");
                ServiceError::DatabaseError(e)
            })?;

        let mut papers: Vec<PaperResponse> = rows
            .into_iter()
            .map(|(paper, properties)| PaperResponse::from_parts(paper, properties))
            .collect();
        papers.sort_by_key(|p| p.id);
        Ok(papers)
    }

    #[instrument(skip(self))]
    pub async fn get_paper(&self, id: i32) -> Result<PaperResponse, ServiceError> {
        let db = &*self.db_pool;
        load_paper(db, id).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_paper(&self, input: PaperInput) -> Result<PaperResponse, ServiceError> {
        let input = input.normalized()?;
        let db = &*self.db_pool;
        let txn = begin(db).await?;

        ensure_properties_exist(&txn, &input.property_ids).await?;

        let created = paper::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            price: Set(input.price),
            stock: Set(input.stock),
            discontinued: Set(input.discontinued),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to insert paper");
            ServiceError::DatabaseError(e)
        })?;

        attach_properties(&txn, created.id, &input.property_ids).await?;
        let response = load_paper(&txn, created.id).await?;
        commit(txn).await?;

        info!(paper_id = created.id, "Paper created");
        Ok(response)
    }

    /// Overwrites a product and replaces its property set.
    #[instrument(skip(self, input))]
    pub async fn update_paper(
        &self,
        id: i32,
        input: PaperInput,
    ) -> Result<PaperResponse, ServiceError> {
        let input = input.normalized()?;
        let db = &*self.db_pool;
        let txn = begin(db).await?;

        let existing = find_paper(&txn, id).await?;
        ensure_properties_exist(&txn, &input.property_ids).await?;

        let mut active: paper::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.price = Set(input.price);
        active.stock = Set(input.stock);
        active.discontinued = Set(input.discontinued);
        active.update(&txn).await.map_err(|e| {
            error!(error = %e, paper_id = id, "Failed to update paper");
            ServiceError::DatabaseError(e)
        })?;

        paper_property::Entity::delete_many()
            .filter(paper_property::Column::PaperId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, paper_id = id, "Failed to clear paper properties");
                ServiceError::DatabaseError(e)
            })?;
        attach_properties(&txn, id, &input.property_ids).await?;

        let response = load_paper(&txn, id).await?;
        commit(txn).await?;

        info!(paper_id = id, "Paper updated");
        Ok(response)
    }

    /// Removes a product that no order references, along with its property tags.
    #[instrument(skip(self))]
    pub async fn delete_paper(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = begin(db).await?;

        let existing = find_paper(&txn, id).await?;

        let referenced = order_entry::Entity::find()
            .filter(order_entry::Column::ProductId.eq(id))
            .count(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, paper_id = id, "Failed to count order references");
                ServiceError::DatabaseError(e)
            })?;
        if referenced > 0 {
            return Err(ServiceError::Conflict(format!(
                "Paper {} is referenced by {} order entries; mark it discontinued instead",
                id, referenced
            )));
        }

        paper_property::Entity::delete_many()
            .filter(paper_property::Column::PaperId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, paper_id = id, "Failed to clear paper properties");
                ServiceError::DatabaseError(e)
            })?;

        existing.delete(&txn).await.map_err(|e| {
            error!(error = %e, paper_id = id, "Failed to delete paper");
            ServiceError::DatabaseError(e)
        })?;
        commit(txn).await?;

        info!(paper_id = id, "Paper deleted");
        Ok(())
    }
}

async fn begin(db: &DbPool) -> Result<DatabaseTransaction, ServiceError> {
    db.begin().await.map_err(|e| {
        error!(error = %e, "Failed to begin transaction");
        ServiceError::DatabaseError(e)
    })
}

async fn commit(txn: DatabaseTransaction) -> Result<(), ServiceError> {
    txn.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit transaction");
        ServiceError::DatabaseError(e)
    })
}

async fn find_paper<C: ConnectionTrait>(conn: &C, id: i32) -> Result<paper::Model, ServiceError> {
    paper::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, paper_id = id, "Failed to load paper");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::NotFound(format!("Paper {} not found", id)))
}

async fn load_paper<C: ConnectionTrait>(conn: &C, id: i32) -> Result<PaperResponse, ServiceError> {
    let paper = find_paper(conn, id).await?;
    let properties = paper
        .find_related(property::Entity)
        .all(conn)
        .await
        .map_err(|e| {
            error!(error = %e, paper_id = id, "Failed to load paper properties");
            ServiceError::DatabaseError(e)
        })?;
    Ok(PaperResponse::from_parts(paper, properties))
}

async fn ensure_properties_exist<C: ConnectionTrait>(
    conn: &C,
    property_ids: &[i32],
) -> Result<(), ServiceError> {
    if property_ids.is_empty() {
        return Ok(());
    }

    let found: BTreeSet<i32> = property::Entity::find()
        .filter(property::Column::Id.is_in(property_ids.to_vec()))
        .all(conn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load properties");
            ServiceError::DatabaseError(e)
        })?
        .into_iter()
        .map(|p| p.id)
        .collect();

    match property_ids.iter().find(|id| !found.contains(*id)) {
        Some(missing) => Err(ServiceError::ValidationError(format!(
            "Property {} does not exist",
            missing
        ))),
        None => Ok(()),
    }
}

async fn attach_properties<C: ConnectionTrait>(
    conn: &C,
    paper_id: i32,
    property_ids: &[i32],
) -> Result<(), ServiceError> {
    if property_ids.is_empty() {
        return Ok(());
    }

    let rows = property_ids.iter().map(|&property_id| paper_property::ActiveModel {
        paper_id: Set(paper_id),
        property_id: Set(property_id),
    });
    paper_property::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .map_err(|e| {
            error!(error = %e, paper_id, "Failed to attach properties");
            ServiceError::DatabaseError(e)
        })?;
    Ok(())
}
