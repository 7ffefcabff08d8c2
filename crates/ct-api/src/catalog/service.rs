//! Catalog queries.
//!
//! Reads go straight to the store on every request; list results are small
//! enough that no cache sits in front of them.

use std::collections::BTreeSet;

use ct_store::{Collection, DocStore, Document, Filter, Sort};
use serde_json::Value;

use super::model::normalize_difficulty;
use crate::error::ApiError;

/// Optional constraints on a catalog listing. An unset field means "no
/// constraint", not "match empty".
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    pub company: Option<String>,
    pub difficulty: Option<String>,
    pub topics: Vec<String>,
}

impl CatalogFilter {
    fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(company) = &self.company {
            filter = filter.contains("company_tag", company.as_str());
        }
        if let Some(difficulty) = &self.difficulty {
            // Storage is uppercase, so the match is case-insensitive.
            filter = filter.eq("difficulty", normalize_difficulty(difficulty));
        }
        if !self.topics.is_empty() {
            let topics: Vec<Value> = self.topics.iter().map(|t| Value::String(t.clone())).collect();
            filter = filter.contains_all("topics", topics);
        }
        filter
    }
}

/// Problems matching `filter`, sorted by name ascending.
pub async fn query(
    store: &dyn DocStore,
    filter: &CatalogFilter,
) -> Result<Vec<Document>, ApiError> {
    let docs = store
        .find(
            Collection::Problems,
            &filter.to_filter(),
            Some(&Sort::asc("name")),
        )
        .await?;
    Ok(docs)
}

/// Distinct values of a catalog field, for populating filter choices.
pub async fn distinct_values(
    store: &dyn DocStore,
    field: &str,
) -> Result<BTreeSet<String>, ApiError> {
    Ok(store.distinct(Collection::Problems, field).await?)
}

/// Total number of problems in the catalog.
pub async fn count_all(store: &dyn DocStore) -> Result<u64, ApiError> {
    Ok(store.count(Collection::Problems, &Filter::new()).await?)
}
