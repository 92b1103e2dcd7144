use crate::auth::hash_password;
use crate::models::{
    collection_entry, miniature, miniature_characteristic, miniature_faction, miniature_keyword,
    photo, photo_miniature, user,
};
use sea_orm::*;

struct SeedMiniature {
    model_name: &'static str,
    base_size: &'static str,
    station: &'static str,
    soulstone_cost: Option<i32>,
    factions: &'static [&'static str],
    keywords: &'static [&'static str],
    characteristics: &'static [&'static str],
}

const SEED_MINIATURES: [SeedMiniature; 5] = [
    SeedMiniature {
        model_name: "Lady Justice",
        base_size: "30mm",
        station: "Master",
        soulstone_cost: None,
        factions: &["Guild"],
        keywords: &["Marshal"],
        characteristics: &["Living"],
    },
    SeedMiniature {
        model_name: "The Judge",
        base_size: "30mm",
        station: "Unique",
        soulstone_cost: Some(9),
        factions: &["Guild"],
        keywords: &["Marshal"],
        characteristics: &["Living"],
    },
    SeedMiniature {
        model_name: "Death Marshal",
        base_size: "30mm",
        station: "Minion",
        soulstone_cost: Some(6),
        factions: &["Guild"],
        keywords: &["Marshal"],
        characteristics: &["Undead"],
    },
    SeedMiniature {
        model_name: "Peacekeeper",
        base_size: "50mm",
        station: "Unique",
        soulstone_cost: Some(10),
        factions: &["Guild"],
        keywords: &["Guard"],
        characteristics: &["Construct"],
    },
    SeedMiniature {
        model_name: "Bete Noire",
        base_size: "30mm",
        station: "Unique",
        soulstone_cost: Some(8),
        factions: &["Resurrectionists", "Outcasts"],
        keywords: &["Versatile"],
        characteristics: &["Undead"],
    },
];

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    // 1. Demo users
    let demo_password =
        hash_password("password").map_err(|e| DbErr::Custom(format!("hash failed: {}", e)))?;

    for (username, email) in [
        ("henchman", "henchman@example.com"),
        ("painter", "painter@example.com"),
    ] {
        let demo_user = user::ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(demo_password.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        user::Entity::insert(demo_user)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(user::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(db)
            .await?;
    }

    // 2. A small slice of the catalog
    for seed in SEED_MINIATURES {
        let existing = miniature::Entity::find()
            .filter(miniature::Column::ModelName.eq(seed.model_name))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        let inserted = miniature::ActiveModel {
            model_name: Set(seed.model_name.to_owned()),
            sculpt_variant: Set("M3E".to_owned()),
            base_size: Set(seed.base_size.to_owned()),
            station: Set(seed.station.to_owned()),
            soulstone_cost: Set(seed.soulstone_cost),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for faction in seed.factions {
            miniature_faction::ActiveModel {
                miniature_id: Set(inserted.id),
                faction: Set((*faction).to_owned()),
            }
            .insert(db)
            .await?;
        }
        for keyword in seed.keywords {
            miniature_keyword::ActiveModel {
                miniature_id: Set(inserted.id),
                keyword: Set((*keyword).to_owned()),
            }
            .insert(db)
            .await?;
        }
        for characteristic in seed.characteristics {
            miniature_characteristic::ActiveModel {
                miniature_id: Set(inserted.id),
                characteristic: Set((*characteristic).to_owned()),
            }
            .insert(db)
            .await?;
        }
    }

    // 3. Give the first demo user a starter collection
    let henchman = user::Entity::find()
        .filter(user::Column::Username.eq("henchman"))
        .one(db)
        .await?;
    let lady_justice = miniature::Entity::find()
        .filter(miniature::Column::ModelName.eq("Lady Justice"))
        .one(db)
        .await?;

    if let (Some(owner), Some(mini)) = (henchman, lady_justice) {
        let entry = collection_entry::ActiveModel {
            user_id: Set(owner.id),
            miniature_id: Set(mini.id),
            status: Set("Painted".to_owned()),
            quantity: Set(1),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        collection_entry::Entity::insert(entry)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    collection_entry::Column::UserId,
                    collection_entry::Column::MiniatureId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .do_nothing()
            .exec(db)
            .await?;

        // 4. One showcase photo so the gallery isn't empty on first run
        let existing_photo = photo::Entity::find()
            .filter(photo::Column::UserId.eq(owner.id))
            .one(db)
            .await?;
        if existing_photo.is_none() {
            let inserted = photo::ActiveModel {
                user_id: Set(owner.id),
                image_url: Set("/uploads/photos/demo-lady-justice.jpg".to_owned()),
                caption: Set(Some("Freshly based Lady Justice".to_owned())),
                painting_status: Set(Some("Painted".to_owned())),
                is_crew_picture: Set(false),
                created_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            }
            .insert(db)
            .await?;

            photo_miniature::ActiveModel {
                photo_id: Set(inserted.id),
                miniature_id: Set(mini.id),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}
