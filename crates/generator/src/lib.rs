//! # nexus-prisma-generator
//!
//! Generates the nexus-prisma artifacts of a Prisma project: the
//! `types.d.ts` declaration document, the `datamodelInfo.js` metadata
//! document and the static support files of the schema-builder library.
//!
//! ## Example
//!
//! ```no_run
//! use nexus_prisma_generator::{generate, GenerateOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = GenerateOptions::default().with_output_path("node_modules/@generated/nexus-prisma");
//!     let report = generate(Path::new("prisma/prisma.yml"), &options).await?;
//!     println!("wrote {}", report.datamodel_info.display());
//!     Ok(())
//! }
//! ```

pub mod emit;
mod error;
pub mod options;
pub mod paths;

use std::path::Path;

use nexus_prisma_datamodel::{read_prisma_yml, resolve_datamodel, DatabaseType, Datamodel};
use nexus_prisma_gql::{generate_crud_schema, Schema};
use tracing::{debug, info};

pub use emit::{emit, EmitReport};
pub use error::{EmitError, GenerateError, Result};
pub use options::{GenerateOptions, DEFAULT_CLIENT_DIR, DEFAULT_OUTPUT_PATH, LIBRARY_DIR_ENV};

/// A Prisma project resolved to its datamodel and CRUD schema.
#[derive(Debug, Clone)]
pub struct Project {
    pub datamodel: Datamodel,
    pub database_type: DatabaseType,
    pub schema: Schema,
}

/// Read `prisma.yml`, resolve its datamodel and synthesize the CRUD schema.
pub fn load_project(config_path: &Path) -> Result<Project> {
    let config = read_prisma_yml(config_path)?;
    let resolved = resolve_datamodel(&config)?;
    debug!(
        types = resolved.datamodel.types.len(),
        enums = resolved.datamodel.enums.len(),
        database_type = ?resolved.database_type,
        "resolved datamodel"
    );

    let schema = generate_crud_schema(&resolved.datamodel, resolved.database_type)?;

    Ok(Project {
        datamodel: resolved.datamodel,
        database_type: resolved.database_type,
        schema,
    })
}

/// Generate every artifact for the project at `config_path`.
pub async fn generate(config_path: &Path, options: &GenerateOptions) -> Result<EmitReport> {
    info!(config = %config_path.display(), output = %options.output_path.display(), "generating nexus-prisma artifacts");

    let project = load_project(config_path)?;
    Ok(emit(&project.datamodel, &project.schema, options).await?)
}
