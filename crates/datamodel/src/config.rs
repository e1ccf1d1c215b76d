//! `prisma.yml` loading and validation.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ConfigError;

/// The database flavour a datamodel targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    Relational,
    Document,
}

/// One `generate` entry of a `prisma.yml` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateTarget {
    pub generator: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum DatamodelPaths {
    One(String),
    Many(Vec<String>),
}

/// The subset of `prisma.yml` the generator cares about.
///
/// Unknown keys (`secret`, `hooks`, `seed`, ...) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrismaDefinition {
    #[serde(default)]
    datamodel: Option<DatamodelPaths>,
    #[serde(default)]
    pub generate: Option<Vec<GenerateTarget>>,
    #[serde(default)]
    pub database_type: Option<DatabaseType>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl PrismaDefinition {
    /// Datamodel file paths as written in the file.
    pub fn datamodel(&self) -> Vec<&str> {
        match &self.datamodel {
            Some(DatamodelPaths::One(path)) => vec![path.as_str()],
            Some(DatamodelPaths::Many(paths)) => paths.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }
}

/// A validated configuration together with the location it was read from.
#[derive(Debug, Clone)]
pub struct PrismaConfig {
    pub config_path: PathBuf,
    pub definition: PrismaDefinition,
}

impl PrismaConfig {
    /// Datamodel files resolved against the directory of the config file.
    pub fn datamodel_paths(&self) -> Vec<PathBuf> {
        let dir = self.config_path.parent().unwrap_or_else(|| Path::new(""));
        self.definition
            .datamodel()
            .into_iter()
            .map(|path| dir.join(path))
            .collect()
    }

    pub fn database_type(&self) -> DatabaseType {
        self.definition.database_type.unwrap_or_default()
    }
}

/// Load and validate a `prisma.yml` file.
pub fn read_prisma_yml(config_path: impl AsRef<Path>) -> Result<PrismaConfig, ConfigError> {
    let config_path = config_path.as_ref();

    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path.to_path_buf()));
    }

    let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;

    let config = parse_prisma_yml(config_path, &contents)?;
    debug!(path = %config_path.display(), "loaded prisma.yml");
    Ok(config)
}

/// Parse and validate `prisma.yml` contents. `config_path` is only used for
/// error reporting and relative path resolution.
pub fn parse_prisma_yml(config_path: &Path, contents: &str) -> Result<PrismaConfig, ConfigError> {
    let definition: PrismaDefinition =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;

    if definition.datamodel.is_none() {
        return Err(ConfigError::MissingDatamodel(config_path.to_path_buf()));
    }

    if definition.generate.is_none() {
        return Err(ConfigError::MissingGenerate(config_path.to_path_buf()));
    }

    Ok(PrismaConfig {
        config_path: config_path.to_path_buf(),
        definition,
    })
}
