//! # lmd-cli — CLI Tool for the Legal Metrology Stack
//!
//! Provides the `lmd` command-line interface for working with registry
//! data outside the API service.
//!
//! ## Subcommands
//!
//! - `lmd query` — Run the filter → paginate → present pipeline over a
//!   JSON record file and print the card or table view.
//! - `lmd seed` — Export the seed dataset as JSON files, one per registry.
//! - `lmd config` — Validate a YAML configuration file.
//!
//! Exit codes: 0 success, 1 failure, 2 validation findings.

pub mod config_check;
pub mod query;
pub mod seed;
