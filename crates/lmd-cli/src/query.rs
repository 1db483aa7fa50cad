//! # Offline List Queries
//!
//! Runs the same filter → paginate → present pipeline the API serves, but
//! over a JSON file of flat records — useful for inspecting exported
//! registries without a running server.
//!
//! Records are arbitrary flat JSON objects. The free-text predicate
//! searches every string value; the categorical predicates read the
//! conventionally named keys (`status`, `category`, `priority`,
//! `district`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;

use lmd_query::{evaluate, facet_filter, Facet, FilterState, Filterable, DEFAULT_PAGE_SIZE};

/// Arguments for `lmd query`.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path to a JSON array of flat record objects.
    pub records: PathBuf,

    /// Free-text query, case-insensitive.
    #[arg(long)]
    pub search: Option<String>,

    /// Exact-match status filter ("all" accepts everything).
    #[arg(long)]
    pub status: Option<String>,

    /// Exact-match category filter.
    #[arg(long)]
    pub category: Option<String>,

    /// Exact-match priority filter.
    #[arg(long)]
    pub priority: Option<String>,

    /// Exact-match district filter.
    #[arg(long)]
    pub district: Option<String>,

    /// Page to print, 1-based.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Records per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Print a table instead of cards.
    #[arg(long)]
    pub table: bool,
}

/// A flat JSON object viewed through the list pipeline.
#[derive(Debug, Clone)]
pub struct JsonRecord(serde_json::Map<String, serde_json::Value>);

impl JsonRecord {
    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }
}

impl Filterable for JsonRecord {
    fn search_fields(&self) -> Vec<&str> {
        self.0
            .values()
            .filter_map(serde_json::Value::as_str)
            .collect()
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => self.str_field("status").or_else(|| self.str_field("state")),
            Facet::Category => self.str_field("category"),
            Facet::Priority => self.str_field("priority"),
            Facet::District => self.str_field("district"),
        }
    }
}

/// Load a record file into pipeline records.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<JsonRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    let array = match value {
        serde_json::Value::Array(items) => items,
        _ => bail!("{} is not a JSON array of records", path.display()),
    };
    array
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(map) => Ok(JsonRecord(map)),
            other => bail!("record is not an object: {other}"),
        })
        .collect()
}

/// Run `lmd query`.
pub fn run_query(args: &QueryArgs) -> anyhow::Result<u8> {
    let records = load_records(&args.records)?;
    let state = FilterState {
        search: args.search.clone().filter(|s| !s.trim().is_empty()),
        status: facet_filter(args.status.as_deref()),
        category: facet_filter(args.category.as_deref()),
        priority: facet_filter(args.priority.as_deref()),
        district: facet_filter(args.district.as_deref()),
        page: args.page.max(1),
    };

    let outcome = evaluate(&records, &state, args.page_size);
    let page = &outcome.page;

    if page.items.is_empty() {
        println!("no records match");
    } else if args.table {
        print_table(&page.items);
    } else {
        for record in &page.items {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(record.0.clone()))?
            );
        }
    }

    println!(
        "page {}/{} — {} of {} records shown ({} in file)",
        page.number,
        page.page_count,
        page.items.len(),
        outcome.summary.filtered,
        outcome.summary.total,
    );
    if !outcome.summary.by_status.is_empty() {
        let chips: Vec<String> = outcome
            .summary
            .by_status
            .iter()
            .map(|(status, count)| format!("{status}: {count}"))
            .collect();
        println!("by status — {}", chips.join(", "));
    }

    Ok(0)
}

/// Print the tabular projection: the sorted union of keys as columns, one
/// row per record, missing values dashed.
fn print_table(items: &[JsonRecord]) {
    let mut columns: Vec<&str> = items
        .iter()
        .flat_map(|r| r.0.keys().map(String::as_str))
        .collect();
    columns.sort_unstable();
    columns.dedup();

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|col| match record.0.get(*col) {
                    None | Some(serde_json::Value::Null) => "—".to_string(),
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, &w)| format!("{col:<w$}"))
        .collect();
    println!("{}", header.join("  "));
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        println!("{}", cells.join("  "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_records(records: serde_json::Value) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
        (dir, path)
    }

    fn args(path: PathBuf) -> QueryArgs {
        QueryArgs {
            records: path,
            search: None,
            status: None,
            category: None,
            priority: None,
            district: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            table: false,
        }
    }

    #[test]
    fn load_records_accepts_array_of_objects() {
        let (_dir, path) = write_records(serde_json::json!([
            {"name": "a", "status": "open"},
            {"name": "b", "status": "closed"}
        ]));
        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].facet(Facet::Status), Some("open"));
    }

    #[test]
    fn load_records_rejects_non_array() {
        let (_dir, path) = write_records(serde_json::json!({"not": "an array"}));
        assert!(load_records(&path).is_err());
    }

    #[test]
    fn load_records_rejects_scalar_entries() {
        let (_dir, path) = write_records(serde_json::json!([1, 2, 3]));
        assert!(load_records(&path).is_err());
    }

    #[test]
    fn json_record_searches_all_string_values() {
        let record = JsonRecord(
            serde_json::json!({"name": "Precision Scales", "district": "MRP", "fee": 500})
                .as_object()
                .unwrap()
                .clone(),
        );
        let state = FilterState {
            search: Some("precision".into()),
            ..FilterState::default()
        };
        assert!(lmd_query::matches(&record, &state));

        // Numbers are not searched.
        let state = FilterState {
            search: Some("500".into()),
            ..FilterState::default()
        };
        assert!(!lmd_query::matches(&record, &state));
    }

    #[test]
    fn state_key_rides_the_status_facet() {
        let record = JsonRecord(
            serde_json::json!({"reference": "x", "state": "submitted"})
                .as_object()
                .unwrap()
                .clone(),
        );
        assert_eq!(record.facet(Facet::Status), Some("submitted"));
    }

    #[test]
    fn run_query_succeeds_over_exported_file() {
        let (_dir, path) = write_records(serde_json::json!([
            {"name": "a", "status": "open"},
            {"name": "b", "status": "open"},
            {"name": "c", "status": "closed"}
        ]));
        let mut a = args(path);
        a.status = Some("open".into());
        assert_eq!(run_query(&a).unwrap(), 0);
    }

    #[test]
    fn run_query_fails_on_missing_file() {
        let a = args(PathBuf::from("/no/such/records.json"));
        assert!(run_query(&a).is_err());
    }
}
