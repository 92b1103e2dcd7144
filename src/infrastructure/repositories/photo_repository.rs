//! SeaORM implementation of PhotoRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryResult, Set, Statement, TransactionTrait, Value,
};

use crate::domain::errors::is_unique_violation;
use crate::domain::{DomainError, GalleryFilter, NewPhoto, PhotoRepository};
use crate::models::like::{
    ActiveModel as LikeActiveModel, Column as LikeColumn, Entity as LikeEntity,
};
use crate::models::miniature::display_name;
use crate::models::photo::{ActiveModel, Entity as PhotoEntity};
use crate::models::photo_miniature::ActiveModel as PhotoMiniatureActiveModel;
use crate::models::{LinkedMiniature, Photo};

const PHOTO_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.image_url, p.caption, p.painting_status,
           p.is_crew_picture, p.created_at,
           u.username, u.avatar_url,
           (SELECT COUNT(*) FROM likes l WHERE l.photo_id = p.id) AS likes_count,
           (SELECT COUNT(*) FROM comments c WHERE c.photo_id = p.id) AS comments_count,
           EXISTS(SELECT 1 FROM likes l
                   WHERE l.photo_id = p.id AND l.user_id = ?) AS user_liked
    FROM photos p
    JOIN users u ON u.id = p.user_id
"#;

fn photo_from_row(row: &QueryResult) -> Result<Photo, DomainError> {
    Ok(Photo {
        id: row.try_get("", "id")?,
        user_id: row.try_get("", "user_id")?,
        username: row.try_get("", "username")?,
        avatar_url: row.try_get("", "avatar_url")?,
        image_url: row.try_get("", "image_url")?,
        caption: row.try_get("", "caption")?,
        painting_status: row.try_get("", "painting_status")?,
        is_crew_picture: row.try_get("", "is_crew_picture")?,
        created_at: row.try_get("", "created_at")?,
        likes_count: row.try_get("", "likes_count")?,
        comments_count: row.try_get("", "comments_count")?,
        user_liked: row.try_get::<i64>("", "user_liked")? != 0,
        miniatures: Vec::new(),
    })
}

/// SeaORM-based implementation of PhotoRepository
pub struct SeaOrmPhotoRepository {
    db: DatabaseConnection,
}

impl SeaOrmPhotoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn linked_miniatures(&self, photo_id: i32) -> Result<Vec<LinkedMiniature>, DomainError> {
        let sql = r#"
            SELECT m.id, m.model_name, m.variant_name
            FROM photo_miniatures pm
            JOIN miniatures m ON m.id = pm.miniature_id
            WHERE pm.photo_id = ?
            ORDER BY m.model_name ASC
        "#;

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [photo_id.into()],
            ))
            .await?;

        rows.iter()
            .map(|row| {
                let model_name: String = row.try_get("", "model_name")?;
                let variant_name: Option<String> = row.try_get("", "variant_name")?;
                let display = display_name(&model_name, variant_name.as_deref());
                Ok(LinkedMiniature {
                    id: row.try_get("", "id")?,
                    model_name,
                    variant_name,
                    display_name: display,
                })
            })
            .collect()
    }

    async fn attach_links(&self, mut photos: Vec<Photo>) -> Result<Vec<Photo>, DomainError> {
        for photo in &mut photos {
            photo.miniatures = self.linked_miniatures(photo.id).await?;
        }
        Ok(photos)
    }
}

#[async_trait]
impl PhotoRepository for SeaOrmPhotoRepository {
    async fn create(&self, user_id: i32, input: NewPhoto) -> Result<Photo, DomainError> {
        if input.miniature_ids.is_empty() {
            return Err(DomainError::Validation(
                "A photo must reference at least one miniature".to_string(),
            ));
        }

        let mut miniature_ids = input.miniature_ids;
        miniature_ids.sort_unstable();
        miniature_ids.dedup();

        // Crew pictures are inferred from the link count rather than
        // trusted from the client.
        let is_crew = miniature_ids.len() > 1;
        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.db.begin().await?;

        let photo = ActiveModel {
            user_id: Set(user_id),
            image_url: Set(input.image_url),
            caption: Set(input.caption),
            painting_status: Set(input.painting_status),
            is_crew_picture: Set(is_crew),
            created_at: Set(now),
            ..Default::default()
        };
        let photo = photo.insert(&txn).await?;

        for miniature_id in miniature_ids {
            let link = PhotoMiniatureActiveModel {
                photo_id: Set(photo.id),
                miniature_id: Set(miniature_id),
            };
            link.insert(&txn).await.map_err(|e| {
                if e.to_string().contains("FOREIGN KEY constraint failed") {
                    DomainError::Validation(format!("Unknown miniature id {}", miniature_id))
                } else {
                    DomainError::from(e)
                }
            })?;
        }

        txn.commit().await?;

        self.find_by_id(photo.id, Some(user_id))
            .await?
            .ok_or_else(|| DomainError::Database("created photo not found".to_string()))
    }

    async fn find_by_id(
        &self,
        id: i32,
        viewer: Option<i32>,
    ) -> Result<Option<Photo>, DomainError> {
        let sql = format!("{} WHERE p.id = ?", PHOTO_SELECT);
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [viewer.into(), id.into()],
            ))
            .await?;

        match row.as_ref().map(photo_from_row).transpose()? {
            Some(mut photo) => {
                photo.miniatures = self.linked_miniatures(photo.id).await?;
                Ok(Some(photo))
            }
            None => Ok(None),
        }
    }

    async fn gallery(
        &self,
        limit: u64,
        offset: u64,
        viewer: Option<i32>,
        filter: GalleryFilter,
    ) -> Result<Vec<Photo>, DomainError> {
        let mut sql = format!("{} WHERE 1 = 1", PHOTO_SELECT);
        let mut values: Vec<Value> = vec![viewer.into()];

        if let Some(status) = filter.painting_status.filter(|s| !s.is_empty()) {
            sql.push_str(" AND p.painting_status = ?");
            values.push(status.into());
        }

        if let Some(is_crew) = filter.is_crew_picture {
            sql.push_str(" AND p.is_crew_picture = ?");
            values.push(is_crew.into());
        }

        if let Some(faction) = filter.faction.filter(|s| !s.is_empty()) {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM photo_miniatures pm \
                 JOIN miniature_factions f ON f.miniature_id = pm.miniature_id \
                 WHERE pm.photo_id = p.id AND f.faction = ?)",
            );
            values.push(faction.into());
        }

        if let Some(miniature_id) = filter.miniature_id {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM photo_miniatures pm \
                 WHERE pm.photo_id = p.id AND pm.miniature_id = ?)",
            );
            values.push(miniature_id.into());
        }

        sql.push_str(" ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?");
        values.push((limit as i64).into());
        values.push((offset as i64).into());

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                values,
            ))
            .await?;

        let photos: Vec<Photo> = rows
            .iter()
            .map(photo_from_row)
            .collect::<Result<_, _>>()?;

        self.attach_links(photos).await
    }

    async fn find_by_user(
        &self,
        user_id: i32,
        viewer: Option<i32>,
    ) -> Result<Vec<Photo>, DomainError> {
        let sql = format!(
            "{} WHERE p.user_id = ? ORDER BY p.created_at DESC, p.id DESC",
            PHOTO_SELECT
        );

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [viewer.into(), user_id.into()],
            ))
            .await?;

        let photos: Vec<Photo> = rows
            .iter()
            .map(photo_from_row)
            .collect::<Result<_, _>>()?;

        self.attach_links(photos).await
    }

    async fn toggle_like(&self, photo_id: i32, user_id: i32) -> Result<bool, DomainError> {
        let existing = LikeEntity::find()
            .filter(LikeColumn::PhotoId.eq(photo_id))
            .filter(LikeColumn::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        if let Some(like) = existing {
            LikeEntity::delete_by_id(like.id).exec(&self.db).await?;
            return Ok(false);
        }

        let like = LikeActiveModel {
            user_id: Set(user_id),
            photo_id: Set(photo_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match like.insert(&self.db).await {
            Ok(_) => Ok(true),
            // Concurrent like of the same photo: the row already exists,
            // which is the outcome the caller asked for.
            Err(e) if is_unique_violation(&e) => Ok(true),
            Err(e) => Err(DomainError::from(e)),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = PhotoEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
