use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::Catalog;
use super::normalize::{normalize, RawRow};
use super::schema::Schema;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Whole-resource ingestion failures. Field-level parse failures and rows
/// without an identity never show up here; the normalizer recovers those
/// as nulls or counted drops.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level JSON array of record objects")]
    JsonShape,
    #[error("JSON row {0} is not an object")]
    JsonRow(usize),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a catalog from a file and run it through the full pipeline
/// (normalize → dedupe → facet domains). Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row mapping 1:1 to column ids, empty lines skipped
/// * `.json` – records-oriented array: `[{ "pl_name": ..., ... }, ...]`
pub fn load_catalog(path: &Path, schema: &Schema) -> Result<Catalog, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => rows_from_csv(path)?,
        "json" => rows_from_json(&std::fs::read_to_string(path)?)?,
        other => return Err(IngestError::UnsupportedExtension(other.to_string())),
    };

    let row_count = rows.len();
    let outcome = normalize(&rows, schema);
    let normalized = outcome.entries.len();
    let catalog = Catalog::from_entries(outcome.entries, schema, outcome.dropped);

    log::info!(
        "loaded {} entries from {} ({row_count} rows, {} merged, {} dropped)",
        catalog.len(),
        path.display(),
        normalized - catalog.len(),
        catalog.dropped_rows,
    );
    Ok(catalog)
}

/// The bundled dataset substituted when catalog ingestion fails outright.
/// The embedded JSON is covered by tests, so a parse failure here can only
/// mean a corrupted build; it degrades to an empty catalog rather than
/// panicking.
pub fn fallback_catalog(schema: &Schema) -> Catalog {
    match rows_from_json(include_str!("../../assets/fallback.json")) {
        Ok(rows) => {
            let outcome = normalize(&rows, schema);
            Catalog::from_entries(outcome.entries, schema, outcome.dropped)
        }
        Err(e) => {
            log::error!("bundled fallback dataset failed to parse: {e}");
            Catalog::from_entries(Vec::new(), schema, 0)
        }
    }
}

// ---------------------------------------------------------------------------
// CSV rows
// ---------------------------------------------------------------------------

/// Read raw rows from a headered CSV file. Records that fail to decode are
/// skipped with a warning; a few broken lines must not take down the whole
/// catalog.
fn rows_from_csv(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("skipping unreadable CSV row {row_no}: {e}");
                continue;
            }
        };
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON rows
// ---------------------------------------------------------------------------

/// Read raw rows from a records-oriented JSON array. Values are carried as
/// their string form; the normalizer re-types them against the schema like
/// any other source.
fn rows_from_json(text: &str) -> Result<Vec<RawRow>, IngestError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(IngestError::JsonShape)?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or(IngestError::JsonRow(i))?;

        let mut row = RawRow::new();
        for (key, value) in obj {
            let raw = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                JsonValue::Null => continue,
                other => other.to_string(),
            };
            row.insert(key.clone(), raw);
        }
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Secondary enrichment resource
// ---------------------------------------------------------------------------

/// Supplementary descriptive fields for one object, joined by identity key
/// at render time only, never part of filtering.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// Load the enrichment CSV: identity columns plus `display_name` and
/// `description`. Rows without an identity key are skipped.
pub fn load_enrichment(
    path: &Path,
    schema: &Schema,
) -> Result<BTreeMap<String, Enrichment>, IngestError> {
    let rows = rows_from_csv(path)?;

    let mut map = BTreeMap::new();
    for row in &rows {
        let Some(key) = schema.identity_key(|id| row.get(id).cloned()) else {
            continue;
        };
        let field = |name: &str| {
            row.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        map.insert(
            key,
            Enrichment {
                display_name: field("display_name"),
                description: field("description"),
            },
        );
    }

    log::info!("loaded {} enrichment records from {}", map.len(), path.display());
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn schema() -> Schema {
        Schema::builtin().unwrap()
    }

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_catalog_round_trip_with_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "catalog.csv",
            "pl_name,hostname,pl_letter,discoverymethod,pl_rade\n\
             Kepler-22 b,Kepler-22,b,Transit,\n\
             Kepler-22 b,Kepler-22,b,Transit,2.38\n\
             51 Peg b,51 Peg,b,Radial Velocity,\n\
             ,,,Transit,1.0\n",
        );

        let catalog = load_catalog(&path, &schema()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dropped_rows, 1);
        // First record seeds the entry, the second fills the gap.
        assert_eq!(catalog.entries[0].value("pl_rade").as_f64(), Some(2.38));
        assert_eq!(catalog.entries[0].key, "Kepler-22|b");
    }

    #[test]
    fn json_catalog_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "catalog.json",
            r#"[{"hostname": "GJ 1214", "pl_letter": "b", "pl_rade": 2.74, "pl_bmasse": null}]"#,
        );

        let catalog = load_catalog(&path, &schema()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries[0].value("pl_rade").as_f64(), Some(2.74));
        assert!(catalog.entries[0].value("pl_bmasse").is_null());
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_catalog(Path::new("catalog.parquet"), &schema()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedExtension(ext) if ext == "parquet"));
    }

    #[test]
    fn missing_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(load_catalog(&path, &schema()).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "bad.json", r#"{"not": "an array"}"#);
        assert!(matches!(
            load_catalog(&path, &schema()),
            Err(IngestError::JsonShape)
        ));
    }

    #[test]
    fn fallback_catalog_is_usable() {
        let catalog = fallback_catalog(&schema());
        assert!(!catalog.is_empty());
        // Every fallback entry has an identity and a name.
        for entry in &catalog.entries {
            assert!(!entry.key.is_empty());
            assert!(entry.value("pl_name").as_str().is_some());
        }
    }

    #[test]
    fn enrichment_is_keyed_by_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "descriptions.csv",
            "hostname,pl_letter,display_name,description\n\
             Kepler-22,b,Kepler-22b,First known transiting planet in a habitable zone.\n\
             ,,Orphan,No identity here\n",
        );

        let map = load_enrichment(&path, &schema()).unwrap();
        assert_eq!(map.len(), 1);
        let enrichment = map.get("Kepler-22|b").unwrap();
        assert_eq!(enrichment.display_name.as_deref(), Some("Kepler-22b"));
        assert!(enrichment.description.as_deref().unwrap().starts_with("First"));
    }
}
