//! CSV import pipeline for the master catalog.
//!
//! Expects the community-maintained export format: one row per sculpt,
//! multi-valued tag columns (factions, keywords, characteristics, box
//! names) comma-separated within their cell.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::domain::DomainError;
use crate::models::miniature::{BASE_SIZES, STATIONS};
use crate::models::{
    miniature, miniature_box_name, miniature_characteristic, miniature_faction, miniature_keyword,
};

const REQUIRED_HEADERS: [&str; 5] = ["Model Name", "Base Size", "Station", "Factions", "Keywords"];

#[derive(Debug, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "Model Name")]
    pub model_name: String,
    #[serde(rename = "Sculpt Variant")]
    pub sculpt_variant: Option<String>,
    #[serde(rename = "Variant Name")]
    pub variant_name: Option<String>,
    #[serde(rename = "Base Size")]
    pub base_size: String,
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Soulstone Cost")]
    pub soulstone_cost: Option<String>,
    #[serde(rename = "Factions")]
    pub factions: Option<String>,
    #[serde(rename = "Keywords")]
    pub keywords: Option<String>,
    #[serde(rename = "Characteristics")]
    pub characteristics: Option<String>,
    #[serde(rename = "Box Names")]
    pub box_names: Option<String>,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Splits a multi-valued tag cell into trimmed, non-empty labels.
pub fn split_tag_cell(cell: Option<&str>) -> Vec<String> {
    cell.map(|s| {
        s.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Parses the catalog CSV. A missing required header aborts the whole
/// import; individual malformed rows are returned as (line, error)
/// pairs so the caller can log and move on.
pub fn parse_catalog_csv(
    content: &[u8],
) -> Result<(Vec<CatalogRow>, Vec<(usize, String)>), String> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);

    let headers = rdr
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {}", e))?
        .clone();

    for required in REQUIRED_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(format!("Missing required column '{}'", required));
        }
    }

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        // Header is line 1, first data row line 2.
        let line = idx + 2;
        let row: CatalogRow = match result {
            Ok(row) => row,
            Err(e) => {
                errors.push((line, format!("CSV parse error: {}", e)));
                continue;
            }
        };

        if let Err(msg) = validate_row(&row) {
            errors.push((line, msg));
            continue;
        }

        rows.push(row);
    }

    Ok((rows, errors))
}

fn validate_row(row: &CatalogRow) -> Result<(), String> {
    if row.model_name.trim().is_empty() {
        return Err("Model name is empty".to_string());
    }
    if !BASE_SIZES.contains(&row.base_size.trim()) {
        return Err(format!("Invalid base size '{}'", row.base_size));
    }
    if !STATIONS.contains(&row.station.trim()) {
        return Err(format!("Invalid station '{}'", row.station));
    }
    if let Some(cost) = row.soulstone_cost.as_deref().map(str::trim) {
        if !cost.is_empty() {
            match cost.parse::<i32>() {
                Ok(c) if (1..=15).contains(&c) => {}
                _ => return Err(format!("Invalid soulstone cost '{}'", cost)),
            }
        }
    }
    Ok(())
}

/// Imports validated rows into the catalog. A sculpt already present
/// (same model name + sculpt variant + variant name) is skipped, so the
/// import is re-runnable against newer exports. A row whose inserts
/// fail is logged and counted as failed without aborting the run.
pub async fn import_catalog(
    db: &DatabaseConnection,
    rows: Vec<CatalogRow>,
) -> Result<ImportSummary, DomainError> {
    let mut summary = ImportSummary::default();

    for row in rows {
        let model_name = row.model_name.trim().to_string();
        match import_row(db, row).await {
            Ok(true) => summary.imported += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                tracing::warn!("Failed to import '{}': {}", model_name, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Imports one row. Returns false if the sculpt already exists. The
/// miniature and its tag rows are written in one transaction so a
/// failed row leaves nothing behind.
async fn import_row(db: &DatabaseConnection, row: CatalogRow) -> Result<bool, DomainError> {
    let model_name = row.model_name.trim().to_string();
    let sculpt_variant = row
        .sculpt_variant
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("M3E")
        .to_string();
    let variant_name = row
        .variant_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut existing = miniature::Entity::find()
        .filter(miniature::Column::ModelName.eq(&model_name))
        .filter(miniature::Column::SculptVariant.eq(&sculpt_variant));
    existing = match &variant_name {
        Some(v) => existing.filter(miniature::Column::VariantName.eq(v)),
        None => existing.filter(miniature::Column::VariantName.is_null()),
    };

    if existing.one(db).await?.is_some() {
        return Ok(false);
    }

    let soulstone_cost = row
        .soulstone_cost
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i32>().ok());

    let txn = db.begin().await?;

    let now = chrono::Utc::now().to_rfc3339();
    let inserted = miniature::ActiveModel {
        model_name: Set(model_name),
        sculpt_variant: Set(sculpt_variant),
        variant_name: Set(variant_name),
        base_size: Set(row.base_size.trim().to_string()),
        station: Set(row.station.trim().to_string()),
        soulstone_cost: Set(soulstone_cost),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for faction in split_tag_cell(row.factions.as_deref()) {
        miniature_faction::ActiveModel {
            miniature_id: Set(inserted.id),
            faction: Set(faction),
        }
        .insert(&txn)
        .await?;
    }
    for keyword in split_tag_cell(row.keywords.as_deref()) {
        miniature_keyword::ActiveModel {
            miniature_id: Set(inserted.id),
            keyword: Set(keyword),
        }
        .insert(&txn)
        .await?;
    }
    for characteristic in split_tag_cell(row.characteristics.as_deref()) {
        miniature_characteristic::ActiveModel {
            miniature_id: Set(inserted.id),
            characteristic: Set(characteristic),
        }
        .insert(&txn)
        .await?;
    }
    for box_name in split_tag_cell(row.box_names.as_deref()) {
        miniature_box_name::ActiveModel {
            miniature_id: Set(inserted.id),
            box_name: Set(box_name),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_rows() {
        let csv = "Model Name,Base Size,Station,Factions,Keywords\n\
                   Lady Justice,30mm,Master,Guild,Marshal\n\
                   Peacekeeper,50mm,Unique,\"Guild, Outcasts\",\"Marshal, Construct\"\n";
        let (rows, errors) = parse_catalog_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(errors.is_empty());
        assert_eq!(
            split_tag_cell(rows[1].factions.as_deref()),
            vec!["Guild", "Outcasts"]
        );
    }

    #[test]
    fn missing_required_header_aborts() {
        let csv = "Model Name,Base Size,Factions,Keywords\nLady Justice,30mm,Guild,Marshal\n";
        let err = parse_catalog_csv(csv.as_bytes()).unwrap_err();
        assert!(err.contains("Station"));
    }

    #[test]
    fn bad_rows_are_collected_not_fatal() {
        let csv = "Model Name,Base Size,Station,Factions,Keywords\n\
                   Lady Justice,30mm,Master,Guild,Marshal\n\
                   Broken,33mm,Master,Guild,Marshal\n\
                   ,30mm,Minion,Guild,Marshal\n";
        let (rows, errors) = parse_catalog_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].0, 3);
    }

    #[test]
    fn soulstone_cost_out_of_range_is_rejected() {
        let csv = "Model Name,Base Size,Station,Factions,Keywords,Soulstone Cost\n\
                   Lady Justice,30mm,Master,Guild,Marshal,16\n";
        let (rows, errors) = parse_catalog_csv(csv.as_bytes()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn empty_factions_cell_is_accepted() {
        let csv = "Model Name,Base Size,Station,Factions,Keywords\n\
                   Perdita Ortega,30mm,Master,,Family\n";
        let (rows, errors) = parse_catalog_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(errors.is_empty());
        assert!(split_tag_cell(rows[0].factions.as_deref()).is_empty());
    }

    #[test]
    fn empty_tag_cells_split_to_nothing() {
        assert!(split_tag_cell(None).is_empty());
        assert!(split_tag_cell(Some("")).is_empty());
        assert!(split_tag_cell(Some(" , ,")).is_empty());
    }
}
