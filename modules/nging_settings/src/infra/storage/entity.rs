//! SeaORM entity for the config table

use sea_orm::entity::prelude::*;

/// Config table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "config")]
pub struct Model {
    /// Settings group (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub group: String,

    /// Key inside the group (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    pub label: String,

    /// Raw value as entered
    #[sea_orm(column_type = "Text")]
    pub value: String,

    /// Decoding rule (text, url, html, json, list)
    pub kind: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Disabled rows are not loaded
    pub disabled: bool,

    /// Last update timestamp
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
