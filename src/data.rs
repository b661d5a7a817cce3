//! Catalog data loading.
//!
//! Filters, filter groups, authors and team members are maintained as YAML
//! files in the site's data directory, one sequence of records per file:
//!
//! ```text
//! data/
//! ├── filters.yml          # - { key, value, label, color, checked? }
//! ├── filter-groups.yml    # - { key, label }
//! ├── authors.yml          # - { id, name, title, image, links: [{ type, uri }] }
//! └── team.yml             # same shape as authors.yml
//! ```
//!
//! This is the ingestion boundary: records are parsed into the typed shapes
//! of [`crate::types`] and checked for duplicate keys here, so the store only
//! ever sees structurally valid input. A missing or empty file is an empty
//! collection.

use crate::types::{Author, Filter, FilterGroup, TeamMember};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const FILTERS_FILE: &str = "filters.yml";
pub const FILTER_GROUPS_FILE: &str = "filter-groups.yml";
pub const AUTHORS_FILE: &str = "authors.yml";
pub const TEAM_FILE: &str = "team.yml";

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Duplicate filter {0}")]
    DuplicateFilter(String),
    #[error("Duplicate filter group {0}")]
    DuplicateFilterGroup(String),
    #[error("Duplicate author {0}")]
    DuplicateAuthor(String),
    #[error("Duplicate team member {0}")]
    DuplicateTeamMember(String),
}

/// The catalog records loaded from the data directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub filters: Vec<Filter>,
    pub filter_groups: Vec<FilterGroup>,
    pub authors: Vec<Author>,
    pub team: Vec<TeamMember>,
}

impl CatalogData {
    /// Reject duplicate keys within each collection.
    pub fn validate(&self) -> Result<(), DataError> {
        ensure_unique(
            self.filters.iter().map(|f| format!("{}:{}", f.key, f.value)),
            DataError::DuplicateFilter,
        )?;
        ensure_unique(
            self.filter_groups.iter().map(|g| g.key.clone()),
            DataError::DuplicateFilterGroup,
        )?;
        ensure_unique(
            self.authors.iter().map(|a| a.id.clone()),
            DataError::DuplicateAuthor,
        )?;
        ensure_unique(
            self.team.iter().map(|m| m.id.clone()),
            DataError::DuplicateTeamMember,
        )?;
        Ok(())
    }
}

fn ensure_unique(
    keys: impl Iterator<Item = String>,
    err: impl Fn(String) -> DataError,
) -> Result<(), DataError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            return Err(err(key));
        }
    }
    Ok(())
}

/// Load every catalog collection from `data_dir` and validate it.
pub fn load_catalog_data(data_dir: &Path) -> Result<CatalogData, DataError> {
    let data = CatalogData {
        filters: load_collection(&data_dir.join(FILTERS_FILE))?,
        filter_groups: load_collection(&data_dir.join(FILTER_GROUPS_FILE))?,
        authors: load_collection(&data_dir.join(AUTHORS_FILE))?,
        team: load_collection(&data_dir.join(TEAM_FILE))?,
    };
    data.validate()?;
    Ok(data)
}

/// Load one YAML sequence of records.
///
/// Returns an empty collection if the file doesn't exist or holds only
/// whitespace and comments.
pub fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataError> {
    if !path.exists() {
        debug!(path = %path.display(), "data file not found; using an empty collection");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_collection(&content).map_err(|source| DataError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_collection<T: DeserializeOwned>(content: &str) -> Result<Vec<T>, serde_yaml::Error> {
    let has_records = content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'));
    if !has_records {
        return Ok(Vec::new());
    }
    let records: Option<Vec<T>> = serde_yaml::from_str(content)?;
    Ok(records.unwrap_or_default())
}
