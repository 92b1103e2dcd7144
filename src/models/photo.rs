use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Painting-status tags a photo can carry.
pub const PAINTING_STATUSES: [&str; 2] = ["Painted", "Painting progress"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub image_url: String,
    pub caption: Option<String>,
    pub painting_status: Option<String>,
    pub is_crew_picture: bool,
    pub created_at: String,
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
    #[sea_orm(has_many = "super::photo_miniature::Entity")]
    MiniatureLinks,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Photo as served to clients: author details, aggregated social counts
/// and the catalog entries pictured.
#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub avatar_url: Option<String>,
    pub image_url: String,
    pub caption: Option<String>,
    pub painting_status: Option<String>,
    pub is_crew_picture: bool,
    pub created_at: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub user_liked: bool,
    pub miniatures: Vec<LinkedMiniature>,
}

/// A catalog entry pictured in a photo.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedMiniature {
    pub id: i32,
    pub model_name: String,
    pub variant_name: Option<String>,
    pub display_name: String,
}
