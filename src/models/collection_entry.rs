use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The five painting statuses a collection entry can be in.
pub const STATUSES: [&str; 5] = [
    "Painted",
    "Painting in progress",
    "Unpainted",
    "Unassembled",
    "Wishlist",
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub miniature_id: i32,
    #[sea_orm(default_value = "Unpainted")]
    pub status: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub acquired_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::miniature::Entity",
        from = "Column::MiniatureId",
        to = "super::miniature::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Miniature,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::miniature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Miniature.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Collection entry joined with its catalog entry, as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionEntry {
    pub id: i32,
    pub user_id: i32,
    pub miniature_id: i32,
    pub status: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub acquired_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub miniature: MiniatureSummary,
}

/// The subset of catalog data embedded in each collection entry.
#[derive(Debug, Clone, Serialize)]
pub struct MiniatureSummary {
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
}
