//! Migration descriptors and directory discovery
//!
//! Migration files are named `<version>_<description>.<ext>`, e.g.
//! `00003_add_orders.sql`. The numeric prefix is the version; the extension
//! decides the [`MigrationKind`] once, at collection time.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// How a migration is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    /// Annotated SQL script run by the SQL executor
    Scripted,
    /// Rust function compiled into the binary
    Programmatic,
}

impl MigrationKind {
    /// Resolve the kind of a migration file from its extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "sql" => Some(MigrationKind::Scripted),
            _ => None,
        }
    }
}

impl std::fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationKind::Scripted => write!(f, "scripted"),
            MigrationKind::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// Immutable metadata identifying one migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationDescriptor {
    /// Version number; unique across a migration set
    pub version: i64,

    /// Source locator: a file path for scripted migrations, the registered
    /// name for programmatic ones
    pub source: String,

    /// Executor kind
    pub kind: MigrationKind,
}

impl MigrationDescriptor {
    /// Describe a scripted migration file.
    pub fn scripted(version: i64, path: &Path) -> Self {
        Self {
            version,
            source: path.display().to_string(),
            kind: MigrationKind::Scripted,
        }
    }

    /// Describe a programmatic migration registered under `name`.
    pub fn programmatic(version: i64, name: &str) -> Self {
        Self {
            version,
            source: name.to_string(),
            kind: MigrationKind::Programmatic,
        }
    }

    /// Short name used in reports: the final path component of the source.
    pub fn label(&self) -> &str {
        Path::new(&self.source)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.source)
    }
}

/// Version window `(min, max]` used when collecting migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    /// Exclusive lower bound
    pub min: i64,
    /// Inclusive upper bound
    pub max: i64,
}

impl VersionRange {
    /// Create a range of versions greater than `min` and at most `max`.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Whether `version` falls inside the window.
    pub fn contains(&self, version: i64) -> bool {
        version > self.min && version <= self.max
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: i64::MAX,
        }
    }
}

/// Extract the version from a migration file name.
///
/// Returns `Ok(None)` for names that are not migrations (no `_`, or a
/// non-numeric prefix). A numeric prefix that is zero or negative is an error.
pub fn parse_version(file_name: &str) -> CoreResult<Option<i64>> {
    let Some((prefix, _)) = file_name.split_once('_') else {
        return Ok(None);
    };
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let version: i64 = prefix.parse().map_err(|e| CoreError::InvalidVersion {
        file: file_name.to_string(),
        reason: format!("{e}"),
    })?;
    if version <= 0 {
        return Err(CoreError::InvalidVersion {
            file: file_name.to_string(),
            reason: "migration versions must be greater than zero".to_string(),
        });
    }
    Ok(Some(version))
}

/// Collect migration files from `dir` whose version lies in `range`.
///
/// Sub-directories and files without a version prefix are ignored. A
/// version-prefixed file whose extension maps to no [`MigrationKind`] is an
/// error, as are duplicate versions. The result is sorted ascending.
pub fn collect_migrations(dir: &Path, range: VersionRange) -> CoreResult<Vec<MigrationDescriptor>> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut by_version: BTreeMap<i64, MigrationDescriptor> = BTreeMap::new();

    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        let Some(version) = parse_version(file_name)? else {
            log::debug!("Ignoring {file_name}: no version prefix");
            continue;
        };

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let kind =
            MigrationKind::from_extension(ext).ok_or_else(|| CoreError::UnknownMigrationKind {
                path: path.display().to_string(),
                extension: ext.to_string(),
            })?;

        if !range.contains(version) {
            continue;
        }

        let descriptor = MigrationDescriptor {
            version,
            source: path.display().to_string(),
            kind,
        };
        if let Some(existing) = by_version.insert(version, descriptor) {
            return Err(CoreError::DuplicateVersion {
                version,
                first: existing.label().to_string(),
                second: file_name.to_string(),
            });
        }
    }

    Ok(by_version.into_values().collect())
}

/// Sort migrations ascending by version.
pub fn sort_migrations(migrations: &mut [MigrationDescriptor]) {
    migrations.sort_by_key(|m| m.version);
}

/// Combine two migration sets into one ascending sequence.
///
/// A version present in both sets is an error.
pub fn merge_migrations(
    left: Vec<MigrationDescriptor>,
    right: Vec<MigrationDescriptor>,
) -> CoreResult<Vec<MigrationDescriptor>> {
    let mut by_version: BTreeMap<i64, MigrationDescriptor> = BTreeMap::new();
    for descriptor in left.into_iter().chain(right) {
        let version = descriptor.version;
        let label = descriptor.label().to_string();
        if let Some(existing) = by_version.insert(version, descriptor) {
            return Err(CoreError::DuplicateVersion {
                version,
                first: existing.label().to_string(),
                second: label,
            });
        }
    }
    Ok(by_version.into_values().collect())
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
