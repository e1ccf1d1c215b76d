//! # nexus-prisma-datamodel
//!
//! Reads a Prisma project (`prisma.yml`) and resolves the data model it
//! references into an in-memory entity graph.
//!
//! ## Modules
//!
//! - `config`: `prisma.yml` loading and validation
//! - `entity`: the resolved data-model graph
//! - `parser`: datamodel SDL parsing
//!
//! ## Usage
//!
//! ```no_run
//! use nexus_prisma_datamodel::{read_prisma_yml, resolve_datamodel};
//!
//! let config = read_prisma_yml("prisma/prisma.yml")?;
//! let resolved = resolve_datamodel(&config)?;
//!
//! for entity in &resolved.datamodel.types {
//!     println!("{} -> {:?}", entity.name, entity.unique_field_names());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod entity;
pub mod parser;

use std::path::PathBuf;
use thiserror::Error;

pub use config::{read_prisma_yml, DatabaseType, GenerateTarget, PrismaConfig, PrismaDefinition};
pub use entity::{Datamodel, DatamodelEnum, Entity, EntityField};
pub use parser::{parse_datamodel, resolve_datamodel, ResolvedDatamodel};

/// Problems with the project configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find `prisma.yml` file at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Yaml parsing error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid prisma.yml file {}: Missing `datamodel` property", .0.display())]
    MissingDatamodel(PathBuf),

    #[error(
        "Invalid prisma.yml file {}: Missing `generate` property for a `prisma-client`",
        .0.display()
    )]
    MissingGenerate(PathBuf),
}

/// Problems resolving the data model referenced by the configuration.
#[derive(Debug, Error)]
pub enum DatamodelError {
    #[error("The types definition file \"{}\" could not be found.", .0.display())]
    TypesFileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Datamodel syntax error: {0}")]
    Syntax(String),

    #[error("Type `{0}` is defined more than once in the datamodel")]
    DuplicateType(String),

    #[error("Embedded type `{0}` is only supported by document databases")]
    EmbeddedNotSupported(String),
}
