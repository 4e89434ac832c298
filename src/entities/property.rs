use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::paper_property::Entity")]
    PaperProperty,
}

impl Related<super::paper_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaperProperty.def()
    }
}

impl Related<super::paper::Entity> for Entity {
    fn to() -> RelationDef {
        super::paper_property::Relation::Paper.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::paper_property::Relation::Property.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
