use std::path::PathBuf;

use nexus_prisma_datamodel::{ConfigError, DatamodelError};
use nexus_prisma_gql::{GenerationError, SchemaError};
use thiserror::Error;

/// Filesystem faults while writing the output tree.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve the working directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Any fault of a full generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Datamodel(#[from] DatamodelError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
