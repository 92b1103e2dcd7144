use basecoat::db;
use basecoat::domain::{DomainError, GalleryFilter, NewPhoto, PhotoRepository, SocialRepository};
use basecoat::infrastructure::{SeaOrmPhotoRepository, SeaOrmSocialRepository};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

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

async fn create_miniature(db: &DatabaseConnection, model_name: &str, factions: &[&str]) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let inserted = basecoat::models::miniature::ActiveModel {
        model_name: Set(model_name.to_string()),
        sculpt_variant: Set("M3E".to_string()),
        base_size: Set("30mm".to_string()),
        station: Set("Minion".to_string()),
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

    inserted.id
}

fn new_photo(miniature_ids: Vec<i32>, image_url: &str) -> NewPhoto {
    NewPhoto {
        miniature_ids,
        image_url: image_url.to_string(),
        caption: None,
        painting_status: Some("Painted".to_string()),
    }
}

#[tokio::test]
async fn test_create_photo_links_and_crew_flag() {
    let db = setup_test_db().await;
    let repo = SeaOrmPhotoRepository::new(db.clone());

    let user_id = create_user(&db, "painter").await;
    let a = create_miniature(&db, "Lady Justice", &["Guild"]).await;
    let b = create_miniature(&db, "Death Marshal", &["Guild"]).await;

    let solo = repo
        .create(user_id, new_photo(vec![a], "/uploads/photos/solo.jpg"))
        .await
        .unwrap();
    assert!(!solo.is_crew_picture);
    assert_eq!(solo.miniatures.len(), 1);
    assert_eq!(solo.username, "painter");
    assert_eq!(solo.likes_count, 0);

    let crew = repo
        .create(user_id, new_photo(vec![a, b, a], "/uploads/photos/crew.jpg"))
        .await
        .unwrap();
    assert!(crew.is_crew_picture);
    // Duplicate links collapse
    assert_eq!(crew.miniatures.len(), 2);
}

#[tokio::test]
async fn test_create_photo_with_unknown_miniature_rolls_back() {
    let db = setup_test_db().await;
    let repo = SeaOrmPhotoRepository::new(db.clone());

    let user_id = create_user(&db, "painter").await;
    let a = create_miniature(&db, "Lady Justice", &["Guild"]).await;

    let err = repo
        .create(user_id, new_photo(vec![a, 9999], "/uploads/photos/bad.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    // The photo row must not survive the failed link insert
    let photos = basecoat::models::photo::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(photos, 0);
}

#[tokio::test]
async fn test_create_photo_requires_a_miniature() {
    let db = setup_test_db().await;
    let repo = SeaOrmPhotoRepository::new(db.clone());

    let user_id = create_user(&db, "painter").await;
    let err = repo
        .create(user_id, new_photo(vec![], "/uploads/photos/empty.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_toggle_like_flips_state_and_counts() {
    let db = setup_test_db().await;
    let repo = SeaOrmPhotoRepository::new(db.clone());

    let owner = create_user(&db, "painter").await;
    let fan = create_user(&db, "henchman").await;
    let mini = create_miniature(&db, "Lady Justice", &["Guild"]).await;
    let photo = repo
        .create(owner, new_photo(vec![mini], "/uploads/photos/p.jpg"))
        .await
        .unwrap();

    assert!(repo.toggle_like(photo.id, fan).await.unwrap());
    let liked_view = repo.find_by_id(photo.id, Some(fan)).await.unwrap().unwrap();
    assert_eq!(liked_view.likes_count, 1);
    assert!(liked_view.user_liked);

    // Someone else's view does not carry the flag
    let owner_view = repo
        .find_by_id(photo.id, Some(owner))
        .await
        .unwrap()
        .unwrap();
    assert!(!owner_view.user_liked);

    // Anonymous view neither
    let anon_view = repo.find_by_id(photo.id, None).await.unwrap().unwrap();
    assert!(!anon_view.user_liked);

    assert!(!repo.toggle_like(photo.id, fan).await.unwrap());
    let unliked_view = repo.find_by_id(photo.id, None).await.unwrap().unwrap();
    assert_eq!(unliked_view.likes_count, 0);
}

#[tokio::test]
async fn test_gallery_orders_newest_first_and_paginates() {
    let db = setup_test_db().await;
    let repo = SeaOrmPhotoRepository::new(db.clone());

    let user_id = create_user(&db, "painter").await;
    let mini = create_miniature(&db, "Lady Justice", &["Guild"]).await;

    let first = repo
        .create(user_id, new_photo(vec![mini], "/uploads/photos/1.jpg"))
        .await
        .unwrap();
    let second = repo
        .create(user_id, new_photo(vec![mini], "/uploads/photos/2.jpg"))
        .await
        .unwrap();
    let third = repo
        .create(user_id, new_photo(vec![mini], "/uploads/photos/3.jpg"))
        .await
        .unwrap();

    let page = repo
        .gallery(2, 0, None, GalleryFilter::default())
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, third.id);
    assert_eq!(page[1].id, second.id);

    let next = repo
        .gallery(2, 2, None, GalleryFilter::default())
        .await
        .unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].id, first.id);
}

#[tokio::test]
async fn test_gallery_faction_and_crew_filters() {
    let db = setup_test_db().await;
    let repo = SeaOrmPhotoRepository::new(db.clone());

    let user_id = create_user(&db, "painter").await;
    let guild = create_miniature(&db, "Lady Justice", &["Guild"]).await;
    let outcast = create_miniature(&db, "Bete Noire", &["Outcasts"]).await;

    let guild_photo = repo
        .create(user_id, new_photo(vec![guild], "/uploads/photos/g.jpg"))
        .await
        .unwrap();
    let crew_photo = repo
        .create(
            user_id,
            new_photo(vec![guild, outcast], "/uploads/photos/c.jpg"),
        )
        .await
        .unwrap();

    let guild_only = repo
        .gallery(
            20,
            0,
            None,
            GalleryFilter {
                faction: Some("Guild".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(guild_only.len(), 2);

    let outcasts_only = repo
        .gallery(
            20,
            0,
            None,
            GalleryFilter {
                faction: Some("Outcasts".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(outcasts_only.len(), 1);
    assert_eq!(outcasts_only[0].id, crew_photo.id);

    let solo_shots = repo
        .gallery(
            20,
            0,
            None,
            GalleryFilter {
                is_crew_picture: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(solo_shots.len(), 1);
    assert_eq!(solo_shots[0].id, guild_photo.id);

    let by_miniature = repo
        .gallery(
            20,
            0,
            None,
            GalleryFilter {
                miniature_id: Some(outcast),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_miniature.len(), 1);
}

#[tokio::test]
async fn test_comments_are_chronological_and_joined_with_author() {
    let db = setup_test_db().await;
    let photos = SeaOrmPhotoRepository::new(db.clone());
    let social = SeaOrmSocialRepository::new(db.clone());

    let owner = create_user(&db, "painter").await;
    let fan = create_user(&db, "henchman").await;
    let mini = create_miniature(&db, "Lady Justice", &["Guild"]).await;
    let photo = photos
        .create(owner, new_photo(vec![mini], "/uploads/photos/p.jpg"))
        .await
        .unwrap();

    social
        .add_comment(fan, photo.id, "Lovely blending".to_string())
        .await
        .unwrap();
    social
        .add_comment(owner, photo.id, "Thanks!".to_string())
        .await
        .unwrap();

    let comments = social.find_by_photo(photo.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].content, "Lovely blending");
    assert_eq!(comments[0].username, "henchman");
    assert_eq!(comments[1].username, "painter");

    let photo_view = photos.find_by_id(photo.id, None).await.unwrap().unwrap();
    assert_eq!(photo_view.comments_count, 2);
}

#[tokio::test]
async fn test_deleting_photo_cascades_links_comments_and_likes() {
    let db = setup_test_db().await;
    let photos = SeaOrmPhotoRepository::new(db.clone());
    let social = SeaOrmSocialRepository::new(db.clone());

    let owner = create_user(&db, "painter").await;
    let fan = create_user(&db, "henchman").await;
    let mini = create_miniature(&db, "Lady Justice", &["Guild"]).await;
    let photo = photos
        .create(owner, new_photo(vec![mini], "/uploads/photos/p.jpg"))
        .await
        .unwrap();

    photos.toggle_like(photo.id, fan).await.unwrap();
    social
        .add_comment(fan, photo.id, "Nice".to_string())
        .await
        .unwrap();

    photos.delete(photo.id).await.unwrap();

    assert_eq!(
        basecoat::models::photo_miniature::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        basecoat::models::comment::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        basecoat::models::like::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );

    let err = photos.delete(photo.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound));
}

#[tokio::test]
async fn test_deleting_user_leaves_no_orphaned_content() {
    let db = setup_test_db().await;
    let photos = SeaOrmPhotoRepository::new(db.clone());
    let social = SeaOrmSocialRepository::new(db.clone());

    let owner = create_user(&db, "painter").await;
    let fan = create_user(&db, "henchman").await;
    let mini = create_miniature(&db, "Lady Justice", &["Guild"]).await;

    let now = chrono::Utc::now().to_rfc3339();
    basecoat::models::collection_entry::ActiveModel {
        user_id: Set(owner),
        miniature_id: Set(mini),
        status: Set("Painted".to_string()),
        quantity: Set(2),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let photo = photos
        .create(owner, new_photo(vec![mini], "/uploads/photos/p.jpg"))
        .await
        .unwrap();
    photos.toggle_like(photo.id, fan).await.unwrap();
    social
        .add_comment(fan, photo.id, "Nice".to_string())
        .await
        .unwrap();

    basecoat::models::user::Entity::delete_by_id(owner)
        .exec(&db)
        .await
        .unwrap();

    // Everything hanging off the user (directly or via their photos)
    // must be gone; the fan and the catalog entry survive.
    assert_eq!(
        basecoat::models::collection_entry::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        basecoat::models::photo::Entity::find().count(&db).await.unwrap(),
        0
    );
    assert_eq!(
        basecoat::models::photo_miniature::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        basecoat::models::comment::Entity::find().count(&db).await.unwrap(),
        0
    );
    assert_eq!(
        basecoat::models::like::Entity::find().count(&db).await.unwrap(),
        0
    );
    assert!(basecoat::models::user::Entity::find_by_id(fan)
        .one(&db)
        .await
        .unwrap()
        .is_some());
    assert!(basecoat::models::miniature::Entity::find_by_id(mini)
        .one(&db)
        .await
        .unwrap()
        .is_some());
}
