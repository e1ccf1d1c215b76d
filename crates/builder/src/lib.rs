//! # nexus-prisma-builder
//!
//! Runtime counterpart of the generator. A [`PrismaSchemaBuilder`] loads the
//! generated `datamodelInfo.js` document once per process and answers
//! "type not found" lookups of the host schema builder from the generated
//! schema, falling back to the host's own resolution.
//!
//! ```no_run
//! use nexus_prisma_builder::{BuilderOptions, DatamodelInfoCache, PrismaSchemaBuilder};
//!
//! let options = BuilderOptions::new("node_modules/@generated/nexus-prisma/generated/datamodelInfo.js");
//! let builder = PrismaSchemaBuilder::new(options, DatamodelInfoCache::global())?;
//! println!("embedded types: {:?}", builder.datamodel_info().embedded_types);
//! # Ok::<(), nexus_prisma_builder::BuilderError>(())
//! ```

pub mod artifacts;
pub mod cache;
pub mod options;
pub mod resolver;

use std::fmt::Display;
use std::future::Future;
use std::path::PathBuf;

use nexus_prisma_gql::{DatamodelInfo, MetadataError, NamedType, Schema, SchemaError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub use artifacts::{should_generate_artifacts, spawn_artifact_generation};
pub use cache::{DatamodelInfoCache, LoadedDatamodelInfo};
pub use options::{BuilderOptions, ClientAccessor, DEFAULT_CLIENT_KEY};
pub use resolver::{FallbackChain, GeneratedTypeResolver, MissingTypeResolver};

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error(
        "Invalid `client` option: expected the name of the client in the GraphQL context, \
         or a function returning the client from the context"
    )]
    MissingClient,

    #[error("Failed to read datamodel info {}: {source}", .path.display())]
    ReadDatamodelInfo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, BuilderError>;

/// Schema builder backed by the generated metadata.
#[derive(Debug)]
pub struct PrismaSchemaBuilder<'c> {
    options: BuilderOptions,
    datamodel_info: &'c LoadedDatamodelInfo,
}

impl<'c> PrismaSchemaBuilder<'c> {
    /// Validate `options` and load the metadata through `cache`.
    pub fn new(options: BuilderOptions, cache: &'c DatamodelInfoCache) -> Result<Self> {
        options.validate()?;
        let datamodel_info = cache.get_or_load(&options.datamodel_info_path)?;
        debug!(
            types = datamodel_info.schema.types().len(),
            "schema builder ready"
        );
        Ok(Self {
            options,
            datamodel_info,
        })
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn datamodel_info(&self) -> &DatamodelInfo {
        &self.datamodel_info.info
    }

    pub fn schema(&self) -> &Schema {
        &self.datamodel_info.schema
    }

    /// Resolve `name` from the generated schema, then from `host_default`.
    pub fn missing_type(&self, name: &str, host_default: impl MissingTypeResolver) -> Option<NamedType> {
        FallbackChain::new(GeneratedTypeResolver::new(self.schema()), host_default).resolve_missing_type(name)
    }

    /// Spawn `task` when artifact generation is enabled for this process.
    pub fn maybe_generate_artifacts<F, E>(&self, task: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if !self.options.resolve_should_generate_artifacts() {
            return None;
        }
        info!("regenerating schema artifacts in the background");
        Some(spawn_artifact_generation(task))
    }
}
