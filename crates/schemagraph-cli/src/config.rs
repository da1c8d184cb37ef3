//! Configuration file handling

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::args::BuildArgs;

pub const CONFIG_FILE_NAME: &str = "schemagraph.toml";

/// Configuration for schemagraph
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Schema file paths
    #[serde(default)]
    pub schema: Vec<String>,

    /// Schema directory
    pub schema_dir: Option<String>,

    /// Output file, or `-` for stdout
    pub out: Option<String>,

    /// SQL dialect (mysql, postgresql, generic)
    #[serde(default)]
    pub dialect: Option<String>,

    /// Diagnostic output format (human, json)
    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        Ok(config)
    }

    /// Try to find and load schemagraph.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let current_dir = std::env::current_dir().into_diagnostic()?;
        Self::find_from(current_dir)
    }

    fn find_from(mut dir: PathBuf) -> Result<Option<Self>> {
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading config");
                return Ok(Some(Self::from_file(&config_path)?));
            }

            // Try parent directory
            if !dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_with_args(mut self, args: &BuildArgs) -> Self {
        if !args.schema.is_empty() {
            self.schema = args.schema.iter().map(|p| p.display().to_string()).collect();
        }

        if let Some(dir) = &args.schema_dir {
            self.schema_dir = Some(dir.display().to_string());
        }

        if args.out.is_some() {
            self.out = args.out.clone();
        }

        if args.dialect.is_some() {
            self.dialect = args.dialect.clone();
        }

        if let Some(fmt) = args.format {
            self.format = Some(format!("{:?}", fmt).to_lowercase());
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::OutputFormat;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
schema = ["db/schema.sql"]
out = "-"
dialect = "postgresql"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schema, vec!["db/schema.sql"]);
        assert_eq!(config.out.as_deref(), Some("-"));
        assert_eq!(config.dialect.as_deref(), Some("postgresql"));
        assert_eq!(config.schema_dir, None);
    }

    #[test]
    fn test_found_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "schema_dir = \"sql\"\n").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::find_from(nested).unwrap().unwrap();
        assert_eq!(config.schema_dir.as_deref(), Some("sql"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = Config {
            schema: vec!["old.sql".to_string()],
            dialect: Some("generic".to_string()),
            format: Some("json".to_string()),
            ..Config::default()
        };
        let args = BuildArgs {
            schema: vec![PathBuf::from("new.sql")],
            format: Some(OutputFormat::Human),
            ..BuildArgs::default()
        };

        let merged = config.merge_with_args(&args);
        assert_eq!(merged.schema, vec!["new.sql"]);
        assert_eq!(merged.dialect.as_deref(), Some("generic"));
        assert_eq!(merged.format.as_deref(), Some("human"));
    }
}
