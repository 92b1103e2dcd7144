//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{CatalogRepository, CollectionRepository, PhotoRepository, SocialRepository};
use crate::infrastructure::{
    SeaOrmCatalogRepository, SeaOrmCollectionRepository, SeaOrmPhotoRepository,
    SeaOrmSocialRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection (for handlers not yet behind a repository)
    db: DatabaseConnection,
    /// Master catalog repository
    pub catalog_repo: Arc<dyn CatalogRepository>,
    /// Per-user collection repository
    pub collection_repo: Arc<dyn CollectionRepository>,
    /// Photo repository
    pub photo_repo: Arc<dyn PhotoRepository>,
    /// Comments repository
    pub social_repo: Arc<dyn SocialRepository>,
    /// Directory photo uploads are written to
    pub upload_dir: String,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, upload_dir: String) -> Self {
        let catalog_repo = Arc::new(SeaOrmCatalogRepository::new(db.clone()));
        let collection_repo = Arc::new(SeaOrmCollectionRepository::new(db.clone()));
        let photo_repo = Arc::new(SeaOrmPhotoRepository::new(db.clone()));
        let social_repo = Arc::new(SeaOrmSocialRepository::new(db.clone()));

        Self {
            db,
            catalog_repo,
            collection_repo,
            photo_repo,
            social_repo,
            upload_dir,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Allow handlers to extract the DatabaseConnection directly
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
