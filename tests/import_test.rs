use basecoat::db;
use basecoat::import::{import_catalog, parse_catalog_csv};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn test_empty_factions_cell_imports_with_no_tags() {
    let db = db::init_db("sqlite::memory:").await.expect("Failed to init DB");

    let csv = "Model Name,Base Size,Station,Factions,Keywords\n\
               Perdita Ortega,30mm,Master,,Family\n";
    let (rows, errors) = parse_catalog_csv(csv.as_bytes()).unwrap();
    assert!(errors.is_empty());

    let summary = import_catalog(&db, rows).await.unwrap();
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.failed, 0);

    let imported = basecoat::models::miniature::Entity::find()
        .filter(basecoat::models::miniature::Column::ModelName.eq("Perdita Ortega"))
        .one(&db)
        .await
        .unwrap();
    assert!(imported.is_some());

    let factions = basecoat::models::miniature_faction::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(factions, 0);

    let keywords = basecoat::models::miniature_keyword::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(keywords, 1);
}

#[tokio::test]
async fn test_failing_row_is_counted_and_later_rows_still_import() {
    let db = db::init_db("sqlite::memory:").await.expect("Failed to init DB");

    // The repeated faction violates the junction primary key mid-row.
    let csv = "Model Name,Base Size,Station,Factions,Keywords\n\
               Broken Sculpt,30mm,Minion,\"Guild, Guild\",Marshal\n\
               Lady Justice,30mm,Master,Guild,Marshal\n";
    let (rows, errors) = parse_catalog_csv(csv.as_bytes()).unwrap();
    assert!(errors.is_empty());

    let summary = import_catalog(&db, rows).await.unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.imported, 1);

    // The failed row must leave no half-written miniature behind
    let broken = basecoat::models::miniature::Entity::find()
        .filter(basecoat::models::miniature::Column::ModelName.eq("Broken Sculpt"))
        .one(&db)
        .await
        .unwrap();
    assert!(broken.is_none());

    let lady = basecoat::models::miniature::Entity::find()
        .filter(basecoat::models::miniature::Column::ModelName.eq("Lady Justice"))
        .one(&db)
        .await
        .unwrap();
    assert!(lady.is_some());

    let miniatures = basecoat::models::miniature::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(miniatures, 1);
}

#[tokio::test]
async fn test_rerun_skips_existing_sculpts() {
    let db = db::init_db("sqlite::memory:").await.expect("Failed to init DB");

    let csv = "Model Name,Base Size,Station,Factions,Keywords\n\
               Lady Justice,30mm,Master,Guild,Marshal\n";

    let (rows, _) = parse_catalog_csv(csv.as_bytes()).unwrap();
    let first = import_catalog(&db, rows).await.unwrap();
    assert_eq!(first.imported, 1);

    let (rows, _) = parse_catalog_csv(csv.as_bytes()).unwrap();
    let second = import_catalog(&db, rows).await.unwrap();
    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped, 1);
}
