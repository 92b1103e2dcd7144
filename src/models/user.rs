use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collection_entry::Entity")]
    CollectionEntries,
    #[sea_orm(has_many = "super::photo::Entity")]
    Photos,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::collection_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionEntries.def()
    }
}

impl Related<super::photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Profile shape returned to the authenticated user themselves.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

impl From<Model> for Profile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            avatar_url: model.avatar_url,
            bio: model.bio,
            created_at: model.created_at,
        }
    }
}

/// Profile shape visible to other users (no email).
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: i32,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

impl From<Model> for PublicProfile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            avatar_url: model.avatar_url,
            bio: model.bio,
            created_at: model.created_at,
        }
    }
}
