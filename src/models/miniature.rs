use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const BASE_SIZES: [&str; 4] = ["30mm", "32mm", "40mm", "50mm"];
pub const STATIONS: [&str; 5] = ["Master", "Totem", "Unique", "Minion", "Peon"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "miniatures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub model_name: String,
    #[sea_orm(default_value = "M3E")]
    pub sculpt_variant: String,
    pub variant_name: Option<String>,
    pub base_size: String,
    pub station: String,
    pub soulstone_cost: Option<i32>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::miniature_faction::Entity")]
    Factions,
    #[sea_orm(has_many = "super::miniature_keyword::Entity")]
    Keywords,
    #[sea_orm(has_many = "super::miniature_characteristic::Entity")]
    Characteristics,
    #[sea_orm(has_many = "super::miniature_box_name::Entity")]
    BoxNames,
    #[sea_orm(has_many = "super::collection_entry::Entity")]
    CollectionEntries,
    #[sea_orm(has_many = "super::photo_miniature::Entity")]
    PhotoLinks,
}

impl Related<super::miniature_faction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factions.def()
    }
}

impl Related<super::collection_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Catalog entry as returned by the API: the row plus its tag sets,
/// assembled from the junction tables by the catalog repository.
#[derive(Debug, Clone, Serialize)]
pub struct Miniature {
    pub id: i32,
    pub model_name: String,
    pub sculpt_variant: String,
    pub variant_name: Option<String>,
    pub display_name: String,
    pub base_size: String,
    pub station: String,
    pub soulstone_cost: Option<i32>,
    pub factions: Vec<String>,
    pub keywords: Vec<String>,
    pub characteristics: Vec<String>,
    pub box_names: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Compact shape for typeahead search results.
#[derive(Debug, Clone, Serialize)]
pub struct MiniatureSuggestion {
    pub id: i32,
    pub model_name: String,
    pub variant_name: Option<String>,
    pub display_name: String,
    pub station: String,
    pub factions: Vec<String>,
}

/// Sculpts are named by their variant when one exists, otherwise by the
/// base model name.
pub fn display_name(model_name: &str, variant_name: Option<&str>) -> String {
    match variant_name {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => model_name.to_string(),
    }
}
