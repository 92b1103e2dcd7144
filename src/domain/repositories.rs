//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{CollectionEntry, Comment, Miniature, MiniatureSuggestion, Photo};

/// Filter criteria for master catalog queries. All supplied filters are
/// combined with AND; tag filters match via existence on the junction
/// tables.
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    pub faction: Option<String>,
    pub station: Option<String>,
    pub base_size: Option<String>,
    pub keyword: Option<String>,
    pub box_name: Option<String>,
    pub search: Option<String>,
}

/// Community aggregates for one catalog entry. Absent aggregates are
/// zero, never null.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct CatalogStatistics {
    pub owners_count: i64,
    pub photos_count: i64,
    pub painted_count: i64,
    pub total_owned: i64,
}

/// Repository for the shared master catalog and its tag junctions.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Find all active catalog entries matching the filter, ordered by
    /// model name, each with its tag sets aggregated.
    async fn find_all(&self, filter: CatalogFilter) -> Result<Vec<Miniature>, DomainError>;

    /// Find a single catalog entry by ID (active or not).
    async fn find_by_id(&self, id: i32) -> Result<Option<Miniature>, DomainError>;

    /// Distinct faction labels, sorted.
    async fn list_factions(&self) -> Result<Vec<String>, DomainError>;

    /// Distinct stations of active entries, sorted.
    async fn list_stations(&self) -> Result<Vec<String>, DomainError>;

    /// Distinct keyword labels, sorted.
    async fn list_keywords(&self) -> Result<Vec<String>, DomainError>;

    /// Distinct box names, sorted.
    async fn list_box_names(&self) -> Result<Vec<String>, DomainError>;

    /// Typeahead search: prefix matches on the model name rank before
    /// substring-only matches, then alphabetical.
    async fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<MiniatureSuggestion>, DomainError>;

    /// Community statistics for one entry.
    async fn statistics(&self, id: i32) -> Result<CatalogStatistics, DomainError>;
}

/// Input for adding a catalog entry to a user's collection.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewCollectionEntry {
    pub miniature_id: i32,
    pub status: Option<String>,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
    pub acquired_date: Option<String>,
}

/// Partial update of a collection entry. Outer None = leave unchanged,
/// Some(None) = clear the field.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct CollectionPatch {
    pub status: Option<String>,
    pub quantity: Option<i32>,
    #[serde(default)]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub acquired_date: Option<Option<String>>,
}

/// Filter criteria for a user's collection listing.
#[derive(Debug, Default, Clone)]
pub struct CollectionFilter {
    pub status: Option<String>,
    pub faction: Option<String>,
    pub station: Option<String>,
}

/// Per-user collection totals. Quantity sums default to zero for
/// statuses with no entries.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct CollectionStats {
    pub unique_models: i64,
    pub total_quantity: i64,
    pub painted: i64,
    pub in_progress: i64,
    pub unpainted: i64,
    pub unassembled: i64,
    pub wishlist: i64,
}

/// Per-faction slice of a user's collection.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FactionBreakdown {
    pub faction: String,
    pub unique_models: i64,
    pub total_quantity: i64,
    pub painted_count: i64,
}

/// Repository for per-user ownership records over the catalog.
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Add a catalog entry to a user's collection. A duplicate
    /// (user, miniature) pair yields Conflict.
    async fn add(
        &self,
        user_id: i32,
        input: NewCollectionEntry,
    ) -> Result<CollectionEntry, DomainError>;

    /// Find a collection entry by ID, joined with its catalog entry.
    async fn find_by_id(&self, id: i32) -> Result<Option<CollectionEntry>, DomainError>;

    /// A user's collection, filtered, ordered by catalog model name.
    async fn find_by_user(
        &self,
        user_id: i32,
        filter: CollectionFilter,
    ) -> Result<Vec<CollectionEntry>, DomainError>;

    /// Partial update; always refreshes updated_at.
    async fn update(&self, id: i32, patch: CollectionPatch)
        -> Result<CollectionEntry, DomainError>;

    /// Hard delete. Returns whether a row was actually removed.
    async fn remove(&self, id: i32) -> Result<bool, DomainError>;

    /// Collection totals for a user.
    async fn stats(&self, user_id: i32) -> Result<CollectionStats, DomainError>;

    /// Per-faction breakdown, total quantity descending.
    async fn faction_breakdown(&self, user_id: i32)
        -> Result<Vec<FactionBreakdown>, DomainError>;

    /// Whether the user already owns the given catalog entry.
    async fn user_owns(&self, user_id: i32, miniature_id: i32) -> Result<bool, DomainError>;
}

/// Input for creating a photo. The image has already been stored by the
/// upload layer; image_url is its public reference.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub miniature_ids: Vec<i32>,
    pub image_url: String,
    pub caption: Option<String>,
    pub painting_status: Option<String>,
}

/// Filter criteria for the public gallery.
#[derive(Debug, Default, Clone)]
pub struct GalleryFilter {
    pub painting_status: Option<String>,
    pub is_crew_picture: Option<bool>,
    pub faction: Option<String>,
    pub miniature_id: Option<i32>,
}

/// Repository for photos and their catalog links.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Create a photo with its catalog links. At least one catalog entry
    /// is required; the photo row and all link rows are written
    /// atomically.
    async fn create(&self, user_id: i32, input: NewPhoto) -> Result<Photo, DomainError>;

    /// Find a photo with social counts, resolved from the viewer's
    /// perspective when one is given.
    async fn find_by_id(&self, id: i32, viewer: Option<i32>)
        -> Result<Option<Photo>, DomainError>;

    /// Public gallery page, newest first.
    async fn gallery(
        &self,
        limit: u64,
        offset: u64,
        viewer: Option<i32>,
        filter: GalleryFilter,
    ) -> Result<Vec<Photo>, DomainError>;

    /// All photos by one user, newest first.
    async fn find_by_user(
        &self,
        user_id: i32,
        viewer: Option<i32>,
    ) -> Result<Vec<Photo>, DomainError>;

    /// Like the photo if the user has not liked it, unlike it otherwise.
    /// Returns whether the photo is liked afterwards.
    async fn toggle_like(&self, photo_id: i32, user_id: i32) -> Result<bool, DomainError>;

    /// Delete a photo; its links, comments and likes go with it.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository for comments on photos.
#[async_trait]
pub trait SocialRepository: Send + Sync {
    /// Add a comment, returned joined with the author's profile.
    async fn add_comment(
        &self,
        user_id: i32,
        photo_id: i32,
        content: String,
    ) -> Result<Comment, DomainError>;

    /// Find one comment (for ownership checks before deletion).
    async fn find_comment(&self, id: i32) -> Result<Option<Comment>, DomainError>;

    /// Comments on a photo in chronological order.
    async fn find_by_photo(&self, photo_id: i32) -> Result<Vec<Comment>, DomainError>;

    /// Hard delete a comment.
    async fn delete_comment(&self, id: i32) -> Result<(), DomainError>;
}
