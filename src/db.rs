use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // SQLite leaves foreign key enforcement off per-connection unless
    // asked; cascade deletes depend on it.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    // Create users table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            avatar_url TEXT,
            bio TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create master catalog table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS miniatures (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_name TEXT NOT NULL,
            sculpt_variant TEXT NOT NULL DEFAULT 'M3E',
            variant_name TEXT,
            base_size TEXT NOT NULL CHECK(base_size IN ('30mm', '32mm', '40mm', '50mm')),
            station TEXT NOT NULL CHECK(station IN ('Master', 'Totem', 'Unique', 'Minion', 'Peon')),
            soulstone_cost INTEGER CHECK(soulstone_cost BETWEEN 1 AND 15),
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_miniatures_model_name ON miniatures(model_name)"
            .to_owned(),
    ))
    .await?;

    // Tag junction tables, one per kind. The composite primary key
    // doubles as the per-(entry, label) uniqueness constraint.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS miniature_factions (
            miniature_id INTEGER NOT NULL,
            faction TEXT NOT NULL,
            PRIMARY KEY (miniature_id, faction),
            FOREIGN KEY (miniature_id) REFERENCES miniatures(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_miniature_factions_faction ON miniature_factions(faction)"
            .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS miniature_keywords (
            miniature_id INTEGER NOT NULL,
            keyword TEXT NOT NULL,
            PRIMARY KEY (miniature_id, keyword),
            FOREIGN KEY (miniature_id) REFERENCES miniatures(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_miniature_keywords_keyword ON miniature_keywords(keyword)"
            .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS miniature_characteristics (
            miniature_id INTEGER NOT NULL,
            characteristic TEXT NOT NULL,
            PRIMARY KEY (miniature_id, characteristic),
            FOREIGN KEY (miniature_id) REFERENCES miniatures(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS miniature_box_names (
            miniature_id INTEGER NOT NULL,
            box_name TEXT NOT NULL,
            PRIMARY KEY (miniature_id, box_name),
            FOREIGN KEY (miniature_id) REFERENCES miniatures(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_miniature_box_names_box_name ON miniature_box_names(box_name)"
            .to_owned(),
    ))
    .await?;

    // Per-user collection entries over the catalog
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS collection_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            miniature_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'Unpainted'
                CHECK(status IN ('Painted', 'Painting in progress', 'Unpainted', 'Unassembled', 'Wishlist')),
            quantity INTEGER NOT NULL DEFAULT 1 CHECK(quantity >= 1),
            notes TEXT,
            acquired_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(user_id, miniature_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (miniature_id) REFERENCES miniatures(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_collection_entries_user_id ON collection_entries(user_id)"
            .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_collection_entries_miniature_id ON collection_entries(miniature_id)"
            .to_owned(),
    ))
    .await?;

    // Photos
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            image_url TEXT NOT NULL,
            caption TEXT,
            painting_status TEXT CHECK(painting_status IN ('Painted', 'Painting progress')),
            is_crew_picture INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_photos_user_id ON photos(user_id)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_photos_created_at ON photos(created_at)".to_owned(),
    ))
    .await?;

    // Migration: v1 photos carried a single miniature reference and no
    // painting status. Add the v2 columns to pre-existing databases;
    // SQLite has no IF NOT EXISTS for ALTER TABLE, so errors are ignored.
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE photos ADD COLUMN painting_status TEXT".to_owned(),
        ))
        .await;

    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE photos ADD COLUMN is_crew_picture INTEGER NOT NULL DEFAULT 0".to_owned(),
        ))
        .await;

    // Photo-to-catalog links (crew pictures reference several entries)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS photo_miniatures (
            photo_id INTEGER NOT NULL,
            miniature_id INTEGER NOT NULL,
            PRIMARY KEY (photo_id, miniature_id),
            FOREIGN KEY (photo_id) REFERENCES photos(id) ON DELETE CASCADE,
            FOREIGN KEY (miniature_id) REFERENCES miniatures(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_photo_miniatures_miniature_id ON photo_miniatures(miniature_id)"
            .to_owned(),
    ))
    .await?;

    // Comments
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            photo_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (photo_id) REFERENCES photos(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_comments_photo_id ON comments(photo_id)".to_owned(),
    ))
    .await?;

    // Likes
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS likes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            photo_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(user_id, photo_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (photo_id) REFERENCES photos(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_likes_photo_id ON likes(photo_id)".to_owned(),
    ))
    .await?;

    Ok(())
}
