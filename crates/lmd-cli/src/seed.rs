//! # Seed Dataset Export
//!
//! Writes the registries' seed dataset to disk, one JSON file per
//! registry. The exported files are valid input for `lmd query`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use lmd_api::state::AppState;

/// Arguments for `lmd seed`.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Directory to write the JSON files into (created if absent).
    #[arg(long, default_value = "seed-out")]
    pub output_dir: PathBuf,
}

fn write_json<T: Serialize>(dir: &Path, name: &str, records: &[T]) -> anyhow::Result<()> {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(records)?;
    std::fs::write(&path, text).with_context(|| format!("cannot write {}", path.display()))?;
    tracing::info!(file = %path.display(), count = records.len(), "exported");
    Ok(())
}

/// Run `lmd seed`.
pub fn run_seed(args: &SeedArgs) -> anyhow::Result<u8> {
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("cannot create {}", args.output_dir.display()))?;

    let state = AppState::seeded();
    let dir = &args.output_dir;

    write_json(dir, "applications.json", &state.applications.list())?;
    write_json(dir, "licenses.json", &state.licenses.list())?;
    write_json(dir, "inspections.json", &state.inspections.list())?;
    write_json(dir, "districts.json", &state.districts.list())?;
    write_json(dir, "users.json", &state.users.list())?;

    println!("seed dataset written to {}", dir.display());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_one_file_per_registry() {
        let dir = tempfile::tempdir().unwrap();
        let args = SeedArgs {
            output_dir: dir.path().join("out"),
        };
        assert_eq!(run_seed(&args).unwrap(), 0);

        for name in [
            "applications.json",
            "licenses.json",
            "inspections.json",
            "districts.json",
            "users.json",
        ] {
            let path = args.output_dir.join(name);
            assert!(path.exists(), "{name} missing");
            let text = std::fs::read_to_string(&path).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert!(!value.as_array().unwrap().is_empty());
        }
    }

    #[test]
    fn exported_applications_feed_the_query_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let args = SeedArgs {
            output_dir: dir.path().to_path_buf(),
        };
        run_seed(&args).unwrap();

        let records =
            crate::query::load_records(&args.output_dir.join("applications.json")).unwrap();
        assert_eq!(records.len(), 12);
    }
}
