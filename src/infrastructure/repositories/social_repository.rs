//! SeaORM implementation of SocialRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryResult, Set,
    Statement,
};

use crate::domain::{DomainError, SocialRepository};
use crate::models::comment::{ActiveModel, Entity as CommentEntity};
use crate::models::Comment;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.user_id, c.photo_id, c.content, c.created_at,
           u.username, u.avatar_url
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

fn comment_from_row(row: &QueryResult) -> Result<Comment, DomainError> {
    Ok(Comment {
        id: row.try_get("", "id")?,
        user_id: row.try_get("", "user_id")?,
        photo_id: row.try_get("", "photo_id")?,
        content: row.try_get("", "content")?,
        created_at: row.try_get("", "created_at")?,
        username: row.try_get("", "username")?,
        avatar_url: row.try_get("", "avatar_url")?,
    })
}

/// SeaORM-based implementation of SocialRepository
pub struct SeaOrmSocialRepository {
    db: DatabaseConnection,
}

impl SeaOrmSocialRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SocialRepository for SeaOrmSocialRepository {
    async fn add_comment(
        &self,
        user_id: i32,
        photo_id: i32,
        content: String,
    ) -> Result<Comment, DomainError> {
        let comment = ActiveModel {
            user_id: Set(user_id),
            photo_id: Set(photo_id),
            content: Set(content),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let inserted = comment.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("FOREIGN KEY constraint failed") {
                DomainError::NotFound
            } else {
                DomainError::from(e)
            }
        })?;

        self.find_comment(inserted.id)
            .await?
            .ok_or_else(|| DomainError::Database("inserted comment not found".to_string()))
    }

    async fn find_comment(&self, id: i32) -> Result<Option<Comment>, DomainError> {
        let sql = format!("{} WHERE c.id = ?", COMMENT_SELECT);
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [id.into()],
            ))
            .await?;

        row.as_ref().map(comment_from_row).transpose()
    }

    async fn find_by_photo(&self, photo_id: i32) -> Result<Vec<Comment>, DomainError> {
        let sql = format!(
            "{} WHERE c.photo_id = ? ORDER BY c.created_at ASC, c.id ASC",
            COMMENT_SELECT
        );

        let rows = self
            .db
            .query_all(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [photo_id.into()],
            ))
            .await?;

        rows.iter().map(comment_from_row).collect()
    }

    async fn delete_comment(&self, id: i32) -> Result<(), DomainError> {
        let result = CommentEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
