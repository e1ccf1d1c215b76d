//! Loading generated metadata from disk and resolving types through it.

use std::fs;
use std::path::Path;

use nexus_prisma_builder::{
    BuilderError, BuilderOptions, ClientAccessor, DatamodelInfoCache, PrismaSchemaBuilder,
};
use nexus_prisma_datamodel::{parse_datamodel, DatabaseType};
use nexus_prisma_gql::{generate_crud_schema, render_datamodel_info, NamedType, DEFAULT_EXPORT_PREFIX};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_datamodel_info(path: &Path, sdl: &str) {
    let datamodel = parse_datamodel(sdl).unwrap();
    let schema = generate_crud_schema(&datamodel, DatabaseType::Relational).unwrap();
    let document = render_datamodel_info(&datamodel, &schema, DEFAULT_EXPORT_PREFIX).unwrap();
    fs::write(path, document).unwrap();
}

fn no_host_default(_: &str) -> Option<NamedType> {
    None
}

#[test]
fn test_builder_resolves_generated_types() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("datamodelInfo.js");
    write_datamodel_info(&path, "type User {\n  id: ID! @id\n  email: String! @unique\n}\n");

    let cache = DatamodelInfoCache::new();
    let builder = PrismaSchemaBuilder::new(BuilderOptions::new(&path), &cache).unwrap();

    assert_eq!(
        builder.datamodel_info().unique_fields("User").unwrap().to_vec(),
        vec!["id", "email"]
    );
    assert!(matches!(
        builder.missing_type("UserWhereInput", no_host_default),
        Some(NamedType::InputObject(_))
    ));
    assert!(builder.missing_type("Upload", no_host_default).is_none());
}

#[test]
fn test_cache_loads_once() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.js");
    let second = dir.path().join("second.js");
    write_datamodel_info(&first, "type User {\n  id: ID! @id\n}\n");
    write_datamodel_info(&second, "type Post {\n  id: ID! @id\n}\n");

    let cache = DatamodelInfoCache::new();
    cache.get_or_load(&first).unwrap();
    let loaded = cache.get_or_load(&second).unwrap();

    assert!(loaded.schema.get_type("User").is_some());
    assert!(loaded.schema.get_type("Post").is_none());
}

#[test]
fn test_failed_load_leaves_cache_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("datamodelInfo.js");

    let cache = DatamodelInfoCache::new();
    let err = cache.get_or_load(&path).unwrap_err();
    assert!(matches!(err, BuilderError::ReadDatamodelInfo { .. }));
    assert!(cache.get().is_none());

    fs::write(&path, "export default {}").unwrap();
    let err = cache.get_or_load(&path).unwrap_err();
    assert!(matches!(err, BuilderError::Metadata(_)));
}

#[test]
fn test_invalid_client_option_is_rejected_before_loading() {
    let cache = DatamodelInfoCache::new();
    let options = BuilderOptions::new("does-not-exist.js")
        .with_client(ClientAccessor::ContextKey("  ".to_string()));

    let err = PrismaSchemaBuilder::new(options, &cache).unwrap_err();
    assert!(matches!(err, BuilderError::MissingClient));
}

#[tokio::test]
async fn test_artifact_generation_respects_option() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("datamodelInfo.js");
    write_datamodel_info(&path, "type User {\n  id: ID! @id\n}\n");
    let cache = DatamodelInfoCache::new();

    let disabled = PrismaSchemaBuilder::new(
        BuilderOptions::new(&path).with_should_generate_artifacts(false),
        &cache,
    )
    .unwrap();
    assert!(disabled
        .maybe_generate_artifacts(async { Ok::<(), String>(()) })
        .is_none());

    let enabled = PrismaSchemaBuilder::new(
        BuilderOptions::new(&path).with_should_generate_artifacts(true),
        &cache,
    )
    .unwrap();
    let handle = enabled
        .maybe_generate_artifacts(async { Err::<(), _>("boom".to_string()) })
        .unwrap();
    assert!(handle.await.is_ok());
}
