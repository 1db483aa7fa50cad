//! # Configuration Check
//!
//! Validates a YAML configuration file against the server's rules without
//! starting the server. Findings exit with code 2 so CI can distinguish
//! "config is wrong" from "tool failed".

use std::path::PathBuf;

use clap::{Args, Subcommand};

use lmd_api::config::ConfigFile;

/// Arguments for `lmd config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Parse and validate a configuration file.
    Check {
        /// Path to the YAML config file.
        file: PathBuf,
    },
}

/// Run `lmd config`.
pub fn run_config(args: &ConfigArgs) -> anyhow::Result<u8> {
    match &args.command {
        ConfigCommand::Check { file } => match ConfigFile::load(file) {
            Ok(parsed) => {
                let config = parsed.into_config();
                println!(
                    "{} is valid — port {}, page size {}, {} credential(s)",
                    file.display(),
                    config.port,
                    config.page_size,
                    config.credentials.len()
                );
                if !config.auth_enabled() {
                    println!("note: no credentials configured, authentication will be disabled");
                }
                Ok(0)
            }
            Err(e) => {
                eprintln!("{}: {e}", file.display());
                Ok(2)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(contents: &str) -> u8 {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lmd.yaml");
        std::fs::write(&path, contents).unwrap();
        run_config(&ConfigArgs {
            command: ConfigCommand::Check { file: path },
        })
        .unwrap()
    }

    #[test]
    fn valid_config_exits_zero() {
        let code = check(
            r#"
port: 8080
page_size: 6
credentials:
  - { username: admin, password: secret, role: admin }
"#,
        );
        assert_eq!(code, 0);
    }

    #[test]
    fn invalid_config_exits_two() {
        assert_eq!(check("page_size: 0"), 2);
        assert_eq!(check("no_such_key: true"), 2);
        assert_eq!(check(": not yaml"), 2);
    }

    #[test]
    fn duplicate_credentials_exit_two() {
        let code = check(
            r#"
credentials:
  - { username: a, password: x, role: officer }
  - { username: a, password: y, role: admin }
"#,
        );
        assert_eq!(code, 2);
    }
}
