//! SeaORM implementation of CatalogRepository

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryResult, Statement, Value};

use crate::domain::{CatalogFilter, CatalogRepository, CatalogStatistics, DomainError};
use crate::models::miniature::display_name;
use crate::models::{Miniature, MiniatureSuggestion};

/// Splits a GROUP_CONCAT aggregate back into its labels. A NULL
/// aggregate (no junction rows) becomes an empty vec, never null.
pub(crate) fn split_tags(concat: Option<String>) -> Vec<String> {
    concat
        .map(|s| {
            s.split(',')
                .map(|t| t.to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

const MINIATURE_SELECT: &str = r#"
    SELECT m.id, m.model_name, m.sculpt_variant, m.variant_name, m.base_size,
           m.station, m.soulstone_cost, m.is_active, m.created_at, m.updated_at,
           (SELECT GROUP_CONCAT(f.faction)
              FROM miniature_factions f WHERE f.miniature_id = m.id) AS factions,
           (SELECT GROUP_CONCAT(k.keyword)
              FROM miniature_keywords k WHERE k.miniature_id = m.id) AS keywords,
           (SELECT GROUP_CONCAT(c.characteristic)
              FROM miniature_characteristics c WHERE c.miniature_id = m.id) AS characteristics,
           (SELECT GROUP_CONCAT(b.box_name)
              FROM miniature_box_names b WHERE b.miniature_id = m.id) AS box_names
    FROM miniatures m
"#;

fn miniature_from_row(row: &QueryResult) -> Result<Miniature, DomainError> {
    let model_name: String = row.try_get("", "model_name")?;
    let variant_name: Option<String> = row.try_get("", "variant_name")?;
    let display = display_name(&model_name, variant_name.as_deref());

    Ok(Miniature {
        id: row.try_get("", "id")?,
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
        box_names: split_tags(row.try_get("", "box_names")?),
        is_active: row.try_get("", "is_active")?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
    })
}

/// SeaORM-based implementation of CatalogRepository
pub struct SeaOrmCatalogRepository {
    db: DatabaseConnection,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn distinct_labels(&self, sql: &str) -> Result<Vec<String>, DomainError> {
        let rows = self
            .db
            .query_all(Statement::from_string(
                self.db.get_database_backend(),
                sql.to_owned(),
            ))
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String>("", "label").map_err(DomainError::from))
            .collect()
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn find_all(&self, filter: CatalogFilter) -> Result<Vec<Miniature>, DomainError> {
        let mut sql = format!("{} WHERE m.is_active = 1", MINIATURE_SELECT);
        let mut values: Vec<Value> = Vec::new();

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

        if let Some(base_size) = filter.base_size.filter(|s| !s.is_empty()) {
            sql.push_str(" AND m.base_size = ?");
            values.push(base_size.into());
        }

        if let Some(keyword) = filter.keyword.filter(|s| !s.is_empty()) {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM miniature_keywords k \
                 WHERE k.miniature_id = m.id AND k.keyword = ?)",
            );
            values.push(keyword.into());
        }

        if let Some(box_name) = filter.box_name.filter(|s| !s.is_empty()) {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM miniature_box_names b \
                 WHERE b.miniature_id = m.id AND b.box_name = ?)",
            );
            values.push(box_name.into());
        }

        if let Some(search) = filter.search.filter(|s| !s.is_empty()) {
            sql.push_str(" AND (m.model_name LIKE ? OR m.variant_name LIKE ?)");
            let pattern = format!("%{}%", search);
            values.push(pattern.clone().into());
            values.push(pattern.into());
        }

        sql.push_str(" ORDER BY m.model_name ASC, m.id ASC");

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                values,
            ))
            .await?;

        rows.iter().map(miniature_from_row).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Miniature>, DomainError> {
        let sql = format!("{} WHERE m.id = ?", MINIATURE_SELECT);
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [id.into()],
            ))
            .await?;

        row.as_ref().map(miniature_from_row).transpose()
    }

    async fn list_factions(&self) -> Result<Vec<String>, DomainError> {
        self.distinct_labels(
            "SELECT DISTINCT faction AS label FROM miniature_factions ORDER BY faction",
        )
        .await
    }

    async fn list_stations(&self) -> Result<Vec<String>, DomainError> {
        self.distinct_labels(
            "SELECT DISTINCT station AS label FROM miniatures WHERE is_active = 1 ORDER BY station",
        )
        .await
    }

    async fn list_keywords(&self) -> Result<Vec<String>, DomainError> {
        self.distinct_labels(
            "SELECT DISTINCT keyword AS label FROM miniature_keywords ORDER BY keyword",
        )
        .await
    }

    async fn list_box_names(&self) -> Result<Vec<String>, DomainError> {
        self.distinct_labels(
            "SELECT DISTINCT box_name AS label FROM miniature_box_names ORDER BY box_name",
        )
        .await
    }

    async fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<MiniatureSuggestion>, DomainError> {
        let sql = r#"
            SELECT m.id, m.model_name, m.variant_name, m.station,
                   (SELECT GROUP_CONCAT(f.faction)
                      FROM miniature_factions f WHERE f.miniature_id = m.id) AS factions
            FROM miniatures m
            WHERE m.is_active = 1 AND (m.model_name LIKE ? OR m.variant_name LIKE ?)
            ORDER BY CASE WHEN m.model_name LIKE ? THEN 0 ELSE 1 END,
                     m.model_name ASC, m.id ASC
            LIMIT ?
        "#;

        let contains = format!("%{}%", query);
        let prefix = format!("{}%", query);
        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [
                    contains.clone().into(),
                    contains.into(),
                    prefix.into(),
                    (limit as i64).into(),
                ],
            ))
            .await?;

        rows.iter()
            .map(|row| {
                let model_name: String = row.try_get("", "model_name")?;
                let variant_name: Option<String> = row.try_get("", "variant_name")?;
                let display = display_name(&model_name, variant_name.as_deref());
                Ok(MiniatureSuggestion {
                    id: row.try_get("", "id")?,
                    model_name,
                    variant_name,
                    display_name: display,
                    station: row.try_get("", "station")?,
                    factions: split_tags(row.try_get("", "factions")?),
                })
            })
            .collect()
    }

    async fn statistics(&self, id: i32) -> Result<CatalogStatistics, DomainError> {
        // Independent scalar subqueries; a single multi-join would
        // inflate the sums whenever an entry has both owners and photos.
        let sql = r#"
            SELECT
                (SELECT COUNT(DISTINCT ce.user_id) FROM collection_entries ce
                  WHERE ce.miniature_id = ?) AS owners_count,
                (SELECT COUNT(*) FROM photo_miniatures pm
                  WHERE pm.miniature_id = ?) AS photos_count,
                (SELECT COALESCE(SUM(CASE WHEN ce.status = 'Painted' THEN ce.quantity ELSE 0 END), 0)
                   FROM collection_entries ce
                  WHERE ce.miniature_id = ?) AS painted_count,
                (SELECT COALESCE(SUM(ce.quantity), 0) FROM collection_entries ce
                  WHERE ce.miniature_id = ?) AS total_owned
        "#;

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [id.into(), id.into(), id.into(), id.into()],
            ))
            .await?
            .ok_or_else(|| DomainError::Database("statistics query returned no row".to_string()))?;

        Ok(CatalogStatistics {
            owners_count: row.try_get("", "owners_count")?,
            photos_count: row.try_get("", "photos_count")?,
            painted_count: row.try_get("", "painted_count")?,
            total_owned: row.try_get("", "total_owned")?,
        })
    }
}
