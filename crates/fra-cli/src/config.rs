//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use fra_domain::{Authority, Jurisdiction, Role};
use fra_workflow::{StaticAuthority, WorkflowConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Claims database path (defaults to `~/.fra/claims.db`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Boundary validation settings
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Officers keyed by session token
    #[serde(default)]
    pub officers: HashMap<String, OfficerConfig>,
}

/// An officer reachable through a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerConfig {
    /// Officer identifier recorded in claim history
    pub officer_id: String,

    /// Role name (gram_sabha, subdivision, district, state)
    pub role: String,

    /// Area the officer may act on
    pub jurisdiction: JurisdictionConfig,
}

/// Jurisdiction as written in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum JurisdictionConfig {
    /// A single Gram Panchayat
    GramPanchayat {
        /// District
        district: String,
        /// Gram Panchayat
        gram_panchayat: String,
    },
    /// A subdivision (tehsil)
    Subdivision {
        /// District
        district: String,
        /// Tehsil
        tehsil: String,
    },
    /// A whole district
    District {
        /// District
        district: String,
    },
    /// A whole state
    State {
        /// State
        state: String,
    },
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration directory.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".fra"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if it is absent.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve the claims database path.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(expand_home(path)),
            None => Ok(Self::dir()?.join("claims.db")),
        }
    }

    /// Build the token table from the configured officers.
    pub fn authorities(&self) -> Result<StaticAuthority> {
        let mut table = StaticAuthority::new();
        for (token, officer) in &self.officers {
            table.insert(token.clone(), officer.to_authority(token)?);
        }
        Ok(table)
    }
}

impl OfficerConfig {
    fn to_authority(&self, token: &str) -> Result<Authority> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            CliError::Config(format!(
                "Officer '{}' has unknown role '{}'",
                token, self.role
            ))
        })?;
        let jurisdiction: Jurisdiction = self.jurisdiction.clone().into();
        if !role.accepts(&jurisdiction) {
            return Err(CliError::Config(format!(
                "Officer '{}' with role '{}' cannot hold jurisdiction over {}",
                token, role, jurisdiction
            )));
        }
        Ok(Authority::new(self.officer_id.clone(), role, jurisdiction))
    }
}

impl From<JurisdictionConfig> for Jurisdiction {
    fn from(config: JurisdictionConfig) -> Self {
        match config {
            JurisdictionConfig::GramPanchayat {
                district,
                gram_panchayat,
            } => Jurisdiction::GramPanchayat {
                district,
                gram_panchayat,
            },
            JurisdictionConfig::Subdivision { district, tehsil } => {
                Jurisdiction::Subdivision { district, tehsil }
            }
            JurisdictionConfig::District { district } => Jurisdiction::District { district },
            JurisdictionConfig::State { state } => Jurisdiction::State { state },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fra_domain::traits::AuthorityContext;

    const SAMPLE: &str = r#"
database = "/var/lib/fra/claims.db"

[settings]
format = "json"

[workflow]
reject_self_intersecting = true

[officers.tok-gs]
officer_id = "gs-samnapur"
role = "gram_sabha"
jurisdiction = { level = "gram_panchayat", district = "Dindori", gram_panchayat = "Samnapur" }

[officers.tok-dlc]
officer_id = "dlc-dindori"
role = "district"
jurisdiction = { level = "district", district = "Dindori" }
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert!(config.officers.is_empty());
    }

    #[test]
    fn test_parse_sample() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/var/lib/fra/claims.db")
        );
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert!(config.workflow.reject_self_intersecting);
        assert_eq!(config.workflow.circle_segments, 32);
        assert_eq!(config.officers.len(), 2);
    }

    #[test]
    fn test_officers_become_authorities() {
        let table = Config::parse(SAMPLE).unwrap().authorities().unwrap();
        let officer = table.resolve("tok-gs").unwrap();
        assert_eq!(officer.officer_id, "gs-samnapur");
        assert_eq!(officer.role, Role::GramSabha);
        assert_eq!(
            officer.jurisdiction,
            Jurisdiction::GramPanchayat {
                district: "Dindori".to_string(),
                gram_panchayat: "Samnapur".to_string(),
            }
        );
        assert!(table.resolve("tok-unknown").is_err());
    }

    #[test]
    fn test_unknown_role_is_a_config_error() {
        let toml = r#"
[officers.tok]
officer_id = "x"
role = "collector"
jurisdiction = { level = "district", district = "Dindori" }
"#;
        let config = Config::parse(toml).unwrap();
        assert!(matches!(config.authorities(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_jurisdiction_wider_than_role_is_a_config_error() {
        let toml = r#"
[officers.tok]
officer_id = "gs-wide"
role = "gram_sabha"
jurisdiction = { level = "state", state = "Madhya Pradesh" }
"#;
        let config = Config::parse(toml).unwrap();
        match config.authorities() {
            Err(CliError::Config(msg)) => assert!(msg.contains("state Madhya Pradesh"), "{}", msg),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_jurisdiction_level_fails_to_parse() {
        let toml = r#"
[officers.tok]
officer_id = "x"
role = "district"
jurisdiction = { level = "block", district = "Dindori" }
"#;
        assert!(matches!(Config::parse(toml), Err(CliError::Toml(_))));
    }
}
