//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = if path.exists() {
                Config::load(path)?
            } else {
                eprintln!("{} not found, showing defaults", path.display());
                Config::default()
            };
            let content = toml::to_string_pretty(&config.masked())
                .context("Failed to render configuration")?;
            print!("{}", content);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigAction::Validate => {
            Config::load_validated(path)?;
            println!("{}: OK", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("guardianrx").join("config.toml");

        cmd_config(ConfigAction::Init { force: false }, &path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[band]\nname = \"Ward-3 Band\"\n").unwrap();

        assert!(cmd_config(ConfigAction::Init { force: false }, &path).is_err());
        assert_eq!(Config::load(&path).unwrap().band.name, "Ward-3 Band");

        cmd_config(ConfigAction::Init { force: true }, &path).unwrap();
        assert_eq!(Config::load(&path).unwrap().band.name, "GuardianRX-Band");
    }

    #[test]
    fn test_validate_reports_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[band]\noperation_timeout_ms = 0\n").unwrap();

        let err = cmd_config(ConfigAction::Validate, &path).unwrap_err();
        assert!(err.to_string().contains("band.operation_timeout_ms"));
    }

    #[test]
    fn test_show_without_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");
        assert!(cmd_config(ConfigAction::Show, &path).is_ok());
    }
}
