//! End-to-end generation against a project on disk.

use std::fs;
use std::path::Path;

use nexus_prisma_datamodel::DatamodelError;
use nexus_prisma_generator::emit::{static_file_paths, DATAMODEL_INFO, GENERATED_TYPES};
use nexus_prisma_generator::{generate, EmitError, GenerateError, GenerateOptions};
use tempfile::TempDir;

const PRISMA_YML: &str = r#"
datamodel: datamodel.prisma
generate:
  - generator: typescript-client
    output: ./generated/prisma-client/
"#;

const DATAMODEL: &str = r#"
type User {
  id: ID! @id
  email: String! @unique
  posts: [Post!]!
}

type Post {
  id: ID! @id
  title: String!
  author: User!
}
"#;

fn write_project(root: &Path, datamodel: &str) {
    fs::write(root.join("prisma.yml"), PRISMA_YML).unwrap();
    fs::write(root.join("datamodel.prisma"), datamodel).unwrap();
}

fn write_library(library: &Path) {
    for file in static_file_paths() {
        let path = library.join(&file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("// {}\n", file.display())).unwrap();
    }
}

fn options(root: &Path) -> GenerateOptions {
    GenerateOptions::default()
        .with_output_path(root.join("out"))
        .with_library_dir(root.join("library"))
}

#[tokio::test]
async fn test_generate_writes_every_artifact() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), DATAMODEL);
    write_library(&dir.path().join("library"));

    let options = options(dir.path());
    let report = generate(&dir.path().join("prisma.yml"), &options).await.unwrap();

    let output = dir.path().join("out");
    assert_eq!(report.static_files, 46);
    assert_eq!(report.types, Some(output.join(GENERATED_TYPES)));
    assert_eq!(
        fs::read_to_string(output.join("definitions/objectType.d.ts")).unwrap(),
        "// definitions/objectType.d.ts\n"
    );

    let info = fs::read_to_string(output.join(DATAMODEL_INFO)).unwrap();
    assert!(info.starts_with("module.exports = {"));

    let types = fs::read_to_string(output.join(GENERATED_TYPES)).unwrap();
    assert!(types.contains("import * as prisma from '@generated/prisma-client'"));
    assert!(types.contains("// Types for Post"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_absolute_client_dir_is_made_relative() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), DATAMODEL);
    write_library(&dir.path().join("library"));

    let client_dir = dir.path().join("client").join("index.ts");
    let options = options(dir.path()).with_client_dir(client_dir.to_string_lossy());
    generate(&dir.path().join("prisma.yml"), &options).await.unwrap();

    let types = fs::read_to_string(dir.path().join("out").join(GENERATED_TYPES)).unwrap();
    assert!(types.contains("import * as prisma from '../../client'"));
}

#[tokio::test]
async fn test_copy_failure_still_writes_documents() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), DATAMODEL);

    let options = options(dir.path());
    let err = generate(&dir.path().join("prisma.yml"), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::Emit(EmitError::Copy { .. })));
    let output = dir.path().join("out");
    assert!(output.join(DATAMODEL_INFO).is_file());
    assert!(output.join(GENERATED_TYPES).is_file());
}

#[tokio::test]
async fn test_render_failure_still_writes_metadata() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), "type Event {\n  id: ID! @id\n  payload: Json\n}\n");
    write_library(&dir.path().join("library"));

    let options = options(dir.path());
    let report = generate(&dir.path().join("prisma.yml"), &options).await.unwrap();

    let output = dir.path().join("out");
    assert_eq!(report.types, None);
    assert!(!output.join(GENERATED_TYPES).exists());
    assert!(output.join(DATAMODEL_INFO).is_file());
}

#[tokio::test]
async fn test_missing_config() {
    let dir = TempDir::new().unwrap();

    let err = generate(&dir.path().join("prisma.yml"), &options(dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::Config(_)));
    assert!(err.to_string().contains("Could not find `prisma.yml` file"));
}

#[tokio::test]
async fn test_embedded_types_rejected_at_datamodel_resolution() {
    let dir = TempDir::new().unwrap();
    write_project(
        dir.path(),
        "type User {\n  id: ID! @id\n  address: Address\n}\ntype Address @embedded {\n  city: String!\n}\n",
    );
    write_library(&dir.path().join("library"));

    let err = generate(&dir.path().join("prisma.yml"), &options(dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerateError::Datamodel(DatamodelError::EmbeddedNotSupported(ref name)) if name == "Address"
    ));
    assert!(!dir.path().join("out").exists());
}
