//! Configuration types and parsing for dbconf.yml
//!
//! A Drover project directory (`db/` by default) holds a `dbconf.yml` that
//! maps environment names to connection settings, plus a `migrations/`
//! directory:
//!
//! ```yaml
//! development:
//!   driver: duckdb
//!   open: ./dev.duckdb
//! production:
//!   driver: duckdb
//!   open: ${DROVER_PROD_DB}
//!   schema: app
//! ```

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory DuckDB sentinel accepted in `open`.
pub const MEMORY_DATABASE: &str = ":memory:";

const MIGRATIONS_DIR: &str = "migrations";

/// Database driver selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Driver::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// One environment entry from dbconf.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Database driver
    #[serde(default)]
    pub driver: Driver,

    /// Driver-specific open string (a DuckDB file path or `:memory:`)
    pub open: String,

    /// Schema that migrations and the ledger table live in
    #[serde(default)]
    pub schema: Option<String>,
}

/// Resolved configuration for one migration run.
#[derive(Debug, Clone)]
pub struct DbConf {
    /// Directory holding the migration files
    pub migrations_dir: PathBuf,

    /// Environment name the settings were taken from
    pub env: String,

    /// Database driver
    pub driver: Driver,

    /// Open string after environment variable expansion
    pub open: String,

    /// Schema qualifier, CLI override taking precedence over the config file
    pub schema: Option<String>,

    /// Directory containing the config file, used to resolve relative paths
    root: PathBuf,
}

impl DbConf {
    /// Load the configuration for `env` from the project directory `dir`.
    ///
    /// `schema_override` replaces the environment's `schema` when given.
    pub fn load(dir: &Path, env: &str, schema_override: Option<&str>) -> CoreResult<Self> {
        let path = find_config_file(dir)?;
        let content = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut environments: HashMap<String, EnvironmentConfig> =
            serde_yaml::from_str(&content)?;

        let env_config =
            environments
                .remove(env)
                .ok_or_else(|| CoreError::EnvironmentNotFound {
                    env: env.to_string(),
                    path: path.display().to_string(),
                })?;

        Self::from_environment(dir, env, env_config, schema_override)
    }

    /// Build a configuration from an already-parsed environment entry.
    pub fn from_environment(
        dir: &Path,
        env: &str,
        env_config: EnvironmentConfig,
        schema_override: Option<&str>,
    ) -> CoreResult<Self> {
        let open = expand_env(&env_config.open);
        if open.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("environment '{env}' has an empty 'open' string"),
            });
        }

        let schema = schema_override
            .map(str::to_string)
            .or(env_config.schema)
            .filter(|s| !s.is_empty());

        Ok(Self {
            migrations_dir: dir.join(MIGRATIONS_DIR),
            env: env.to_string(),
            driver: env_config.driver,
            open,
            schema,
            root: dir.to_path_buf(),
        })
    }

    /// True when the open string targets an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.open == MEMORY_DATABASE
    }

    /// Database file path, with relative paths resolved against the
    /// directory holding dbconf.yml.
    ///
    /// Returns `None` for in-memory databases.
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.is_memory() {
            return None;
        }
        let path = Path::new(&self.open);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(self.root.join(path))
        }
    }
}

/// Look for dbconf.yml or dbconf.yaml inside `dir`.
fn find_config_file(dir: &Path) -> CoreResult<PathBuf> {
    let yml_path = dir.join("dbconf.yml");
    let yaml_path = dir.join("dbconf.yaml");

    if yml_path.exists() {
        Ok(yml_path)
    } else if yaml_path.exists() {
        Ok(yaml_path)
    } else {
        Err(CoreError::ConfigNotFound {
            path: yml_path.display().to_string(),
        })
    }
}

/// Replace `$VAR` and `${VAR}` with values from the process environment.
///
/// Unset variables expand to the empty string.
pub fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let name: String = if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                name.push(ch);
            }
            if !closed {
                out.push_str("${");
                out.push_str(&name);
                continue;
            }
            name
        } else {
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push('$');
                continue;
            }
            name
        };
        out.push_str(&std::env::var(&name).unwrap_or_default());
    }
    out
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
