use crate::{
    db::DbPool,
    entities::{paper_property, property},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: i32,
    pub property_name: String,
}

impl From<property::Model> for PropertyResponse {
    fn from(model: property::Model) -> Self {
        Self {
            id: model.id,
            property_name: model.property_name,
        }
    }
}

/// Answer to "may this property be deleted without force?"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCheck {
    pub can_delete: bool,
    pub assigned_count: u64,
}

#[derive(Clone)]
pub struct PropertyService {
    db_pool: Arc<DbPool>,
}

impl PropertyService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_properties(&self) -> Result<Vec<PropertyResponse>, ServiceError> {
        let db = &*self.db_pool;
        let properties = property::Entity::find()
            .order_by_asc(property::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list properties");
                ServiceError::DatabaseError(e)
            })?;
        Ok(properties.into_iter().map(PropertyResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_property(&self, id: i32) -> Result<PropertyResponse, ServiceError> {
        let db = &*self.db_pool;
        Ok(find_property(db, id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn create_property(
        &self,
        property_name: String,
    ) -> Result<PropertyResponse, ServiceError> {
        let property_name = normalize_name(&property_name)?;
        let db = &*self.db_pool;

        let created = property::ActiveModel {
            id: NotSet,
            property_name: Set(property_name),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to insert property");
            ServiceError::DatabaseError(e)
        })?;

        info!(property_id = created.id, "Property created");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn update_property(
        &self,
        id: i32,
        property_name: String,
    ) -> Result<PropertyResponse, ServiceError> {
        let property_name = normalize_name(&property_name)?;
        let db = &*self.db_pool;

        let mut active: property::ActiveModel = find_property(db, id).await?.into();
        active.property_name = Set(property_name);
        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, property_id = id, "Failed to update property");
            ServiceError::DatabaseError(e)
        })?;

        info!(property_id = id, "Property updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn can_delete(&self, id: i32) -> Result<DeleteCheck, ServiceError> {
        let db = &*self.db_pool;
        find_property(db, id).await?;
        let assigned_count = assigned_count(db, id).await?;
        Ok(DeleteCheck {
            can_delete: assigned_count == 0,
            assigned_count,
        })
    }

    /// Deletes a property. An assigned property is only removed when `force` is set,
    /// in which case its product associations go with it; the products stay.
    #[instrument(skip(self))]
    pub async fn delete_property(&self, id: i32, force: bool) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction");
            ServiceError::DatabaseError(e)
        })?;

        let existing = find_property(&txn, id).await?;
        let assigned = assigned_count(&txn, id).await?;

        if assigned > 0 {
            if !force {
                warn!(property_id = id, assigned, "Refusing to delete assigned property");
                return Err(ServiceError::PropertyInUse {
                    property_id: id,
                    assigned_count: assigned,
                });
            }

            paper_property::Entity::delete_many()
                .filter(paper_property::Column::PropertyId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    error!(error = %e, property_id = id, "Failed to detach property");
                    ServiceError::DatabaseError(e)
                })?;
        }

        existing.delete(&txn).await.map_err(|e| {
            error!(error = %e, property_id = id, "Failed to delete property");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit property deletion");
            ServiceError::DatabaseError(e)
        })?;

        info!(property_id = id, detached = assigned, "Property deleted");
        Ok(())
    }
}

fn normalize_name(raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::ValidationError(
            "propertyName is required".to_string(),
        ));
    }
    Ok(name.to_string())
}

async fn find_property<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<property::Model, ServiceError> {
    property::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, property_id = id, "Failed to load property");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::NotFound(format!("Property {} not found", id)))
}

async fn assigned_count<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64, ServiceError> {
    paper_property::Entity::find()
        .filter(paper_property::Column::PropertyId.eq(id))
        .count(conn)
        .await
        .map_err(|e| {
            error!(error = %e, property_id = id, "Failed to count property assignments");
            ServiceError::DatabaseError(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_are_trimmed_and_required() {
        assert_eq!(normalize_name("  Recycled ").unwrap(), "Recycled");
        assert!(matches!(
            normalize_name(" \t"),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
