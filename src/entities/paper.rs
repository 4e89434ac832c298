use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

/// A sellable paper product. `stock` is owned by the inventory ledger.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paper")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    pub discontinued: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::paper_property::Entity")]
    PaperProperty,
    #[sea_orm(has_many = "super::order_entry::Entity")]
    OrderEntry,
}

impl Related<super::paper_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaperProperty.def()
    }
}

impl Related<super::order_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderEntry.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        super::paper_property::Relation::Property.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::paper_property::Relation::Paper.def().rev())
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(stock) = &self.stock {
            if *stock < 0 {
                return Err(DbErr::Custom(format!("paper stock cannot be negative: {stock}")));
            }
        }
        if let ActiveValue::Set(price) = &self.price {
            if price.is_sign_negative() && !price.is_zero() {
                return Err(DbErr::Custom(format!("paper price cannot be negative: {price}")));
            }
        }
        Ok(self)
    }
}
