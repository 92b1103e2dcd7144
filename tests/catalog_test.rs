use basecoat::db;
use basecoat::domain::{CatalogFilter, CatalogRepository};
use basecoat::infrastructure::SeaOrmCatalogRepository;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_user(db: &DatabaseConnection, username: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    basecoat::models::user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password_hash: Set("$argon2id$dummy".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user")
    .id
}

async fn create_entry(
    db: &DatabaseConnection,
    user_id: i32,
    miniature_id: i32,
    status: &str,
    quantity: i32,
) {
    let now = chrono::Utc::now().to_rfc3339();
    basecoat::models::collection_entry::ActiveModel {
        user_id: Set(user_id),
        miniature_id: Set(miniature_id),
        status: Set(status.to_string()),
        quantity: Set(quantity),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create collection entry");
}

async fn create_miniature(
    db: &DatabaseConnection,
    model_name: &str,
    base_size: &str,
    station: &str,
    factions: &[&str],
    keywords: &[&str],
) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let inserted = basecoat::models::miniature::ActiveModel {
        model_name: Set(model_name.to_string()),
        sculpt_variant: Set("M3E".to_string()),
        base_size: Set(base_size.to_string()),
        station: Set(station.to_string()),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create miniature");

    for faction in factions {
        basecoat::models::miniature_faction::ActiveModel {
            miniature_id: Set(inserted.id),
            faction: Set(faction.to_string()),
        }
        .insert(db)
        .await
        .expect("Failed to tag faction");
    }
    for keyword in keywords {
        basecoat::models::miniature_keyword::ActiveModel {
            miniature_id: Set(inserted.id),
            keyword: Set(keyword.to_string()),
        }
        .insert(db)
        .await
        .expect("Failed to tag keyword");
    }

    inserted.id
}

#[tokio::test]
async fn test_find_all_aggregates_tags_and_sorts_by_name() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    create_miniature(&db, "Peacekeeper", "50mm", "Unique", &["Guild"], &["Guard"]).await;
    create_miniature(
        &db,
        "Bete Noire",
        "30mm",
        "Unique",
        &["Resurrectionists", "Outcasts"],
        &["Versatile"],
    )
    .await;

    let miniatures = repo.find_all(CatalogFilter::default()).await.unwrap();
    assert_eq!(miniatures.len(), 2);
    assert_eq!(miniatures[0].model_name, "Bete Noire");
    assert_eq!(miniatures[1].model_name, "Peacekeeper");

    let bete = &miniatures[0];
    assert_eq!(bete.factions.len(), 2);
    assert!(bete.factions.contains(&"Outcasts".to_string()));
    assert!(bete.factions.contains(&"Resurrectionists".to_string()));
    assert_eq!(bete.keywords, vec!["Versatile"]);
    assert!(bete.box_names.is_empty());
}

#[tokio::test]
async fn test_faction_filter_matches_any_tag() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    create_miniature(&db, "Peacekeeper", "50mm", "Unique", &["Guild"], &[]).await;
    let dual = create_miniature(
        &db,
        "Bete Noire",
        "30mm",
        "Unique",
        &["Resurrectionists", "Outcasts"],
        &[],
    )
    .await;

    let filter = CatalogFilter {
        faction: Some("Outcasts".to_string()),
        ..Default::default()
    };
    let miniatures = repo.find_all(filter).await.unwrap();
    assert_eq!(miniatures.len(), 1);
    assert_eq!(miniatures[0].id, dual);
}

#[tokio::test]
async fn test_combined_filters_are_anded() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    create_miniature(&db, "Death Marshal", "30mm", "Minion", &["Guild"], &["Marshal"]).await;
    create_miniature(&db, "Guild Guard", "30mm", "Minion", &["Guild"], &["Guard"]).await;
    create_miniature(&db, "Lady Justice", "30mm", "Master", &["Guild"], &["Marshal"]).await;

    let filter = CatalogFilter {
        faction: Some("Guild".to_string()),
        station: Some("Minion".to_string()),
        keyword: Some("Marshal".to_string()),
        ..Default::default()
    };
    let miniatures = repo.find_all(filter).await.unwrap();
    assert_eq!(miniatures.len(), 1);
    assert_eq!(miniatures[0].model_name, "Death Marshal");
}

#[tokio::test]
async fn test_inactive_entries_hidden_from_listing_but_found_by_id() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    let id = create_miniature(&db, "Lady Justice", "30mm", "Master", &["Guild"], &[]).await;

    // Retire the sculpt
    let existing = basecoat::models::miniature::Entity::find_by_id(id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let mut active: basecoat::models::miniature::ActiveModel = existing.into();
    active.is_active = Set(false);
    active.update(&db).await.unwrap();

    let listed = repo.find_all(CatalogFilter::default()).await.unwrap();
    assert!(listed.is_empty());

    let fetched = repo.find_by_id(id).await.unwrap();
    assert!(fetched.is_some());
    assert!(!fetched.unwrap().is_active);
}

#[tokio::test]
async fn test_display_name_prefers_variant() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    let now = chrono::Utc::now().to_rfc3339();
    let inserted = basecoat::models::miniature::ActiveModel {
        model_name: Set("Lady Justice".to_string()),
        sculpt_variant: Set("Alt".to_string()),
        variant_name: Set(Some("Lady Justice, Avatar of Strife".to_string())),
        base_size: Set("50mm".to_string()),
        station: Set("Master".to_string()),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let fetched = repo.find_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(fetched.display_name, "Lady Justice, Avatar of Strife");
}

#[tokio::test]
async fn test_search_ranks_prefix_matches_first() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    create_miniature(&db, "Pale Lady", "30mm", "Minion", &["Neverborn"], &[]).await;
    create_miniature(&db, "Lady Justice", "30mm", "Master", &["Guild"], &[]).await;

    let suggestions = repo.search("Lady", 10).await.unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].model_name, "Lady Justice");
    assert_eq!(suggestions[1].model_name, "Pale Lady");
}

#[tokio::test]
async fn test_search_respects_limit() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    for i in 0..5 {
        create_miniature(
            &db,
            &format!("Guild Guard {}", i),
            "30mm",
            "Minion",
            &["Guild"],
            &[],
        )
        .await;
    }

    let suggestions = repo.search("Guard", 3).await.unwrap();
    assert_eq!(suggestions.len(), 3);
}

#[tokio::test]
async fn test_statistics_sum_painted_quantities() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    let mini = create_miniature(&db, "Death Marshal", "30mm", "Minion", &["Guild"], &[]).await;
    let henchman = create_user(&db, "henchman").await;
    let painter = create_user(&db, "painter").await;

    create_entry(&db, henchman, mini, "Painted", 3).await;
    create_entry(&db, painter, mini, "Unpainted", 2).await;

    let stats = repo.statistics(mini).await.unwrap();
    assert_eq!(stats.owners_count, 2);
    // Painted figures, not painted entries
    assert_eq!(stats.painted_count, 3);
    assert_eq!(stats.total_owned, 5);
    assert_eq!(stats.photos_count, 0);
}

#[tokio::test]
async fn test_statistics_are_zero_without_owners() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    let mini = create_miniature(&db, "Lady Justice", "30mm", "Master", &["Guild"], &[]).await;

    let stats = repo.statistics(mini).await.unwrap();
    assert_eq!(stats.owners_count, 0);
    assert_eq!(stats.photos_count, 0);
    assert_eq!(stats.painted_count, 0);
    assert_eq!(stats.total_owned, 0);
}

#[tokio::test]
async fn test_filter_option_lists_are_distinct_and_sorted() {
    let db = setup_test_db().await;
    let repo = SeaOrmCatalogRepository::new(db.clone());

    create_miniature(&db, "A", "30mm", "Minion", &["Guild"], &["Marshal"]).await;
    create_miniature(&db, "B", "30mm", "Minion", &["Guild"], &["Guard"]).await;
    create_miniature(&db, "C", "30mm", "Master", &["Arcanists"], &["Marshal"]).await;

    let factions = repo.list_factions().await.unwrap();
    assert_eq!(factions, vec!["Arcanists", "Guild"]);

    let stations = repo.list_stations().await.unwrap();
    assert_eq!(stations, vec!["Master", "Minion"]);

    let keywords = repo.list_keywords().await.unwrap();
    assert_eq!(keywords, vec!["Guard", "Marshal"]);
}
