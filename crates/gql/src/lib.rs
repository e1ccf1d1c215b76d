//! GraphQL schema handling for nexus-prisma.
//!
//! This crate owns the in-memory schema model and everything derived from it:
//! - [`generate_crud_schema`] synthesizes the CRUD API of a Prisma datamodel,
//! - [`render_nexus_prisma_types`] renders the TypeScript declaration module,
//! - [`render_datamodel_info`] renders the `datamodelInfo` metadata document,
//!   which embeds the introspection form of the schema.
//!
//! # Example
//!
//! ```ignore
//! use nexus_prisma_datamodel::{parse_datamodel, DatabaseType};
//! use nexus_prisma_gql::{generate_crud_schema, render_nexus_prisma_types};
//!
//! let datamodel = parse_datamodel("type User { id: ID! @id name: String }")?;
//! let schema = generate_crud_schema(&datamodel, DatabaseType::Relational)?;
//! let declarations = render_nexus_prisma_types(&schema, "./prisma-client")?;
//! ```

pub mod codegen;
pub mod crud;
mod error;
pub mod introspection;
pub mod metadata;
pub mod naming;
mod schema;
pub mod shape;

pub use codegen::{render_nexus_prisma_types, scalar_ts_type};
pub use crud::{generate_crud_schema, generate_crud_sdl};
pub use error::{GenerationError, MetadataError, Result, SchemaError};
pub use introspection::{introspect, IntrospectionQuery};
pub use metadata::{render_datamodel_info, DatamodelInfo, DEFAULT_EXPORT_PREFIX};
pub use schema::{
    builtin_directives, DirectiveDefinition, EnumType, EnumValue, Field, InputObjectType,
    InputValue, InterfaceType, NamedType, ObjectType, RootTypes, ScalarType, Schema, TypeRef,
    UnionType,
};
