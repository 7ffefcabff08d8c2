//! CSV-driven catalog sync.
//!
//! Rows match existing problems by `link`. A new link inserts a fresh
//! document tagged with the importing company; a known link with the company
//! already tagged is a no-op (counted as skipped, which is what makes an
//! exact re-run report 0 inserted); otherwise the row's fields are merged
//! onto the existing document and the company is added to its tag set.
//! Row-level problems never abort the batch: bad rows are skipped and
//! counted.

use ct_store::{Collection, DocStore, Filter, Patch};
use serde_json::json;
use uuid::Uuid;

use super::model::{
    ColumnMapping, ImportSummary, NOT_AVAILABLE, normalize_difficulty, parse_acceptance,
    parse_topics,
};
use crate::error::ApiError;

/// Run a CSV import for `company`, returning per-row outcome counts.
pub async fn upsert_from_import(
    store: &dyn DocStore,
    company: &str,
    mapping: &ColumnMapping,
    csv_text: &str,
) -> Result<ImportSummary, ApiError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(ApiError::Validation("Company name cannot be empty".to_string()));
    }

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| ApiError::Validation(format!("Invalid CSV: {e}")))?
        .clone();

    let columns = Columns::resolve(&headers, mapping)?;

    let mut summary = ImportSummary::default();
    for record in reader.records() {
        let Ok(record) = record else {
            summary.skipped += 1;
            continue;
        };

        let name = columns.get(&record, Some(columns.name)).trim().to_string();
        let link = columns.get(&record, Some(columns.link)).trim().to_string();
        if name.is_empty() || link.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let difficulty = normalize_difficulty(columns.get(&record, columns.difficulty));
        let acceptance = match columns.acceptance {
            Some(idx) => parse_acceptance(columns.get(&record, Some(idx))),
            None => json!(NOT_AVAILABLE),
        };
        let topics = parse_topics(columns.get(&record, columns.topics));

        let existing = store
            .find_one(Collection::Problems, &Filter::new().eq("link", link.as_str()))
            .await?;

        match existing {
            None => {
                store
                    .insert_one(
                        Collection::Problems,
                        json!({
                            "id": Uuid::new_v4().to_string(),
                            "name": name,
                            "link": link,
                            "difficulty": difficulty,
                            "acceptance": acceptance,
                            "topics": topics,
                            "company_tag": [company],
                        }),
                    )
                    .await?;
                summary.inserted += 1;
            }
            Some(doc) if has_company_tag(&doc, company) => {
                summary.skipped += 1;
            }
            Some(_) => {
                let patch = Patch::new()
                    .set("name", name)
                    .set("difficulty", difficulty)
                    .set("acceptance", acceptance)
                    .set("topics", topics)
                    .add_to_set("company_tag", company);
                store
                    .update_one(
                        Collection::Problems,
                        &Filter::new().eq("link", link.as_str()),
                        &patch,
                    )
                    .await?;
                summary.updated += 1;
            }
        }
    }

    tracing::info!(
        company,
        inserted = summary.inserted,
        updated = summary.updated,
        skipped = summary.skipped,
        "catalog import finished"
    );
    Ok(summary)
}

fn has_company_tag(doc: &serde_json::Value, company: &str) -> bool {
    doc.get("company_tag")
        .and_then(|tags| tags.as_array())
        .is_some_and(|tags| tags.iter().any(|tag| tag == company))
}

/// Mapped header names resolved to record indexes.
struct Columns {
    name: usize,
    link: usize,
    difficulty: Option<usize>,
    acceptance: Option<usize>,
    topics: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, mapping: &ColumnMapping) -> Result<Self, ApiError> {
        let index_of = |column: &str| -> Result<usize, ApiError> {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| {
                    ApiError::Validation(format!("CSV has no column named \"{column}\""))
                })
        };
        let optional = |column: &Option<String>| -> Result<Option<usize>, ApiError> {
            column.as_deref().map(index_of).transpose()
        };

        Ok(Self {
            name: index_of(&mapping.name)?,
            link: index_of(&mapping.link)?,
            difficulty: optional(&mapping.difficulty)?,
            acceptance: optional(&mapping.acceptance)?,
            topics: optional(&mapping.topics)?,
        })
    }

    /// Cell at an optional column; unmapped or out-of-range reads as empty.
    fn get<'r>(&self, record: &'r csv::StringRecord, idx: Option<usize>) -> &'r str {
        idx.and_then(|idx| record.get(idx)).unwrap_or_default()
    }
}
