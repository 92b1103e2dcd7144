//! SeaORM implementation of CollectionRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryResult, Set, Statement, Value,
};

use crate::domain::errors::is_unique_violation;
use crate::domain::{
    CollectionFilter, CollectionPatch, CollectionRepository, CollectionStats, DomainError,
    FactionBreakdown, NewCollectionEntry,
};
use crate::models::collection_entry::{ActiveModel, Column, Entity as CollectionEntryEntity};
use crate::models::miniature::display_name;
use crate::models::{CollectionEntry, MiniatureSummary};

use super::catalog_repository::split_tags;

const ENTRY_SELECT: &str = r#"
    SELECT ce.id, ce.user_id, ce.miniature_id, ce.status, ce.quantity,
           ce.notes, ce.acquired_date, ce.created_at, ce.updated_at,
           m.model_name, m.sculpt_variant, m.variant_name, m.base_size,
           m.station, m.soulstone_cost,
           (SELECT GROUP_CONCAT(f.faction)
              FROM miniature_factions f WHERE f.miniature_id = m.id) AS factions,
           (SELECT GROUP_CONCAT(k.keyword)
              FROM miniature_keywords k WHERE k.miniature_id = m.id) AS keywords,
           (SELECT GROUP_CONCAT(c.characteristic)
              FROM miniature_characteristics c WHERE c.miniature_id = m.id) AS characteristics
    FROM collection_entries ce
    JOIN miniatures m ON m.id = ce.miniature_id
"#;

fn entry_from_row(row: &QueryResult) -> Result<CollectionEntry, DomainError> {
    let model_name: String = row.try_get("", "model_name")?;
    let variant_name: Option<String> = row.try_get("", "variant_name")?;
    let display = display_name(&model_name, variant_name.as_deref());

    Ok(CollectionEntry {
        id: row.try_get("", "id")?,
        user_id: row.try_get("", "user_id")?,
        miniature_id: row.try_get("", "miniature_id")?,
        status: row.try_get("", "status")?,
        quantity: row.try_get("", "quantity")?,
        notes: row.try_get("", "notes")?,
        acquired_date: row.try_get("", "acquired_date")?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        miniature: MiniatureSummary {
            id: row.try_get("", "miniature_id")?,
            model_name,
            sculpt_variant: row.try_get("", "sculpt_variant")?,
            variant_name,
            display_name: display,
            base_size: row.try_get("", "base_size")?,
            station: row.try_get("", "station")?,
            soulstone_cost: row.try_get("", "soulstone_cost")?,
            factions: split_tags(row.try_get("", "factions")?),
            keywords: split_tags(row.try_get("", "keywords")?),
            characteristics: split_tags(row.try_get("", "characteristics")?),
        },
    })
}

/// SeaORM-based implementation of CollectionRepository
pub struct SeaOrmCollectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmCollectionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CollectionRepository for SeaOrmCollectionRepository {
    async fn add(
        &self,
        user_id: i32,
        input: NewCollectionEntry,
    ) -> Result<CollectionEntry, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let entry = ActiveModel {
            user_id: Set(user_id),
            miniature_id: Set(input.miniature_id),
            status: Set(input.status.unwrap_or_else(|| "Unpainted".to_string())),
            quantity: Set(input.quantity.unwrap_or(1)),
            notes: Set(input.notes),
            acquired_date: Set(input.acquired_date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = entry.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("You already have this miniature in your collection".to_string())
            } else {
                DomainError::from(e)
            }
        })?;

        self.find_by_id(inserted.id)
            .await?
            .ok_or_else(|| DomainError::Database("inserted entry not found".to_string()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CollectionEntry>, DomainError> {
        let sql = format!("{} WHERE ce.id = ?", ENTRY_SELECT);
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [id.into()],
            ))
            .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: i32,
        filter: CollectionFilter,
    ) -> Result<Vec<CollectionEntry>, DomainError> {
        let mut sql = format!("{} WHERE ce.user_id = ?", ENTRY_SELECT);
        let mut values: Vec<Value> = vec![user_id.into()];

        if let Some(status) = filter.status.filter(|s| !s.is_empty()) {
            sql.push_str(" AND ce.status = ?");
            values.push(status.into());
        }

        if let Some(faction) = filter.faction.filter(|s| !s.is_empty()) {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM miniature_factions f \
                 WHERE f.miniature_id = m.id AND f.faction = ?)",
            );
            values.push(faction.into());
        }

        if let Some(station) = filter.station.filter(|s| !s.is_empty()) {
            sql.push_str(" AND m.station = ?");
            values.push(station.into());
        }

        sql.push_str(" ORDER BY m.model_name ASC, ce.id ASC");

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                values,
            ))
            .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn update(
        &self,
        id: i32,
        patch: CollectionPatch,
    ) -> Result<CollectionEntry, DomainError> {
        let existing = CollectionEntryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(quantity) = patch.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(notes);
        }
        if let Some(acquired_date) = patch.acquired_date {
            active.acquired_date = Set(acquired_date);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active.update(&self.db).await?;

        self.find_by_id(updated.id)
            .await?
            .ok_or_else(|| DomainError::Database("updated entry not found".to_string()))
    }

    async fn remove(&self, id: i32) -> Result<bool, DomainError> {
        let result = CollectionEntryEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn stats(&self, user_id: i32) -> Result<CollectionStats, DomainError> {
        let sql = r#"
            SELECT COUNT(*) AS unique_models,
                   COALESCE(SUM(quantity), 0) AS total_quantity,
                   COALESCE(SUM(CASE WHEN status = 'Painted' THEN quantity ELSE 0 END), 0) AS painted,
                   COALESCE(SUM(CASE WHEN status = 'Painting in progress' THEN quantity ELSE 0 END), 0) AS in_progress,
                   COALESCE(SUM(CASE WHEN status = 'Unpainted' THEN quantity ELSE 0 END), 0) AS unpainted,
                   COALESCE(SUM(CASE WHEN status = 'Unassembled' THEN quantity ELSE 0 END), 0) AS unassembled,
                   COALESCE(SUM(CASE WHEN status = 'Wishlist' THEN quantity ELSE 0 END), 0) AS wishlist
            FROM collection_entries
            WHERE user_id = ?
        "#;

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [user_id.into()],
            ))
            .await?
            .ok_or_else(|| DomainError::Database("stats query returned no row".to_string()))?;

        Ok(CollectionStats {
            unique_models: row.try_get("", "unique_models")?,
            total_quantity: row.try_get("", "total_quantity")?,
            painted: row.try_get("", "painted")?,
            in_progress: row.try_get("", "in_progress")?,
            unpainted: row.try_get("", "unpainted")?,
            unassembled: row.try_get("", "unassembled")?,
            wishlist: row.try_get("", "wishlist")?,
        })
    }

    async fn faction_breakdown(
        &self,
        user_id: i32,
    ) -> Result<Vec<FactionBreakdown>, DomainError> {
        // Dual-faction models count once per faction they belong to.
        let sql = r#"
            SELECT f.faction,
                   COUNT(DISTINCT ce.miniature_id) AS unique_models,
                   COALESCE(SUM(ce.quantity), 0) AS total_quantity,
                   COALESCE(SUM(CASE WHEN ce.status = 'Painted' THEN ce.quantity ELSE 0 END), 0) AS painted_count
            FROM collection_entries ce
            JOIN miniature_factions f ON f.miniature_id = ce.miniature_id
            WHERE ce.user_id = ?
            GROUP BY f.faction
            ORDER BY total_quantity DESC, f.faction ASC
        "#;

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [user_id.into()],
            ))
            .await?;

        rows.iter()
            .map(|row| {
                Ok(FactionBreakdown {
                    faction: row.try_get("", "faction")?,
                    unique_models: row.try_get("", "unique_models")?,
                    total_quantity: row.try_get("", "total_quantity")?,
                    painted_count: row.try_get("", "painted_count")?,
                })
            })
            .collect()
    }

    async fn user_owns(&self, user_id: i32, miniature_id: i32) -> Result<bool, DomainError> {
        let count = CollectionEntryEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::MiniatureId.eq(miniature_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
