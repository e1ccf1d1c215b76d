//! Writing the output tree.
//!
//! ```text
//! <output>/
//!   blocks/ definitions/ graphqlToNexus/   static support files
//!   generated/datamodelInfo.js             metadata document
//!   generated/types.d.ts                   type declarations
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use nexus_prisma_datamodel::Datamodel;
use nexus_prisma_gql::{render_datamodel_info, render_nexus_prisma_types, Schema, DEFAULT_EXPORT_PREFIX};
use tracing::{debug, error, info};

use crate::error::EmitError;
use crate::options::GenerateOptions;
use crate::paths::client_import_path;

/// Subdirectories of the output root.
pub const DIRS: &[&str] = &["blocks", "definitions", "graphqlToNexus", "generated"];

/// Support files copied from the library directory, without extension. Each
/// entry is copied as a `.js` and a `.d.ts` file.
pub const STATIC_FILES: &[&str] = &[
    "camelcase",
    "graphql",
    "index",
    "throw",
    "typesHelpers",
    "validate",
    "builder",
    "resolver",
    "types",
    "utils",
    "blocks/objectType",
    "blocks/inputObjectType",
    "blocks/extendType",
    "definitions/index",
    "definitions/objectType",
    "definitions/inputObjectType",
    "definitions/enumType",
    "definitions/extendType",
    "graphqlToNexus/index",
    "graphqlToNexus/common",
    "graphqlToNexus/enumType",
    "graphqlToNexus/inputObjectType",
    "graphqlToNexus/objectType",
];

const STATIC_EXTENSIONS: &[&str] = &["js", "d.ts"];

pub const GENERATED_TYPES: &str = "generated/types.d.ts";
pub const DATAMODEL_INFO: &str = "generated/datamodelInfo.js";

/// Every static file as a path relative to the library and output roots.
pub fn static_file_paths() -> Vec<PathBuf> {
    STATIC_EXTENSIONS
        .iter()
        .flat_map(|extension| {
            STATIC_FILES
                .iter()
                .map(move |file| PathBuf::from(format!("{}.{}", file, extension)))
        })
        .collect()
}

/// Create the output root and its subdirectories. Existing directories are
/// left alone.
pub async fn ensure_output_dirs(output: &Path) -> Result<(), EmitError> {
    let dirs = std::iter::once(output.to_path_buf()).chain(DIRS.iter().map(|dir| output.join(dir)));

    for dir in dirs {
        match tokio::fs::create_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(source) => return Err(EmitError::CreateDir { path: dir, source }),
        }
    }
    Ok(())
}

/// Copy the static manifest from `library_dir` into `output`, all files
/// concurrently. Copies that completed before a failure are kept.
pub async fn copy_static_files(library_dir: &Path, output: &Path) -> Result<usize, EmitError> {
    let copies = static_file_paths().into_iter().map(|file| {
        let from = library_dir.join(&file);
        let to = output.join(&file);
        async move {
            tokio::fs::copy(&from, &to)
                .await
                .map_err(|source| EmitError::Copy { from, to, source })
        }
    });

    let copied = try_join_all(copies).await?;
    debug!(files = copied.len(), "copied static support files");
    Ok(copied.len())
}

/// Render and write `generated/datamodelInfo.js`.
pub async fn write_datamodel_info(
    datamodel: &Datamodel,
    schema: &Schema,
    output: &Path,
) -> Result<PathBuf, EmitError> {
    let path = output.join(DATAMODEL_INFO);
    let document = render_datamodel_info(datamodel, schema, DEFAULT_EXPORT_PREFIX)?;
    write_file(&path, document).await?;
    Ok(path)
}

/// Render and write the declaration document to `output_file`.
///
/// Rendering faults are logged and nothing is written; returns whether the
/// file was written. Write failures still propagate.
pub async fn render_types(schema: &Schema, client_dir: &str, output_file: &Path) -> Result<bool, EmitError> {
    let cwd = std::env::current_dir().map_err(EmitError::CurrentDir)?;
    let import_path = client_import_path(client_dir, output_file, &cwd);

    match render_nexus_prisma_types(schema, &import_path) {
        Ok(declarations) => {
            write_file(output_file, declarations).await?;
            Ok(true)
        }
        Err(e) => {
            error!(error = %e, output = %output_file.display(), "failed to render type declarations");
            Ok(false)
        }
    }
}

async fn write_file(path: &Path, contents: String) -> Result<(), EmitError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| EmitError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// What an [`emit`] run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    pub static_files: usize,
    pub datamodel_info: PathBuf,
    /// `None` when declaration rendering failed.
    pub types: Option<PathBuf>,
}

/// Write the full output tree for `datamodel` and `schema`.
///
/// A failed static copy does not stop the metadata and declaration documents
/// from being written; the copy error is returned once they are.
pub async fn emit(
    datamodel: &Datamodel,
    schema: &Schema,
    options: &GenerateOptions,
) -> Result<EmitReport, EmitError> {
    let output = options.output_path.as_path();
    ensure_output_dirs(output).await?;

    let copied = copy_static_files(&options.library_dir, output).await;
    if let Err(e) = &copied {
        error!(error = %e, "failed to copy static support files");
    }

    let datamodel_info = write_datamodel_info(datamodel, schema, output).await?;

    let types_path = output.join(GENERATED_TYPES);
    let types = render_types(schema, &options.client_dir, &types_path)
        .await?
        .then_some(types_path);

    let static_files = copied?;
    info!(output = %output.display(), static_files, "generated nexus-prisma artifacts");

    Ok(EmitReport {
        static_files,
        datamodel_info,
        types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_manifest() {
        let files = static_file_paths();

        assert_eq!(STATIC_FILES.len(), 23);
        assert_eq!(files.len(), 46);
        assert_eq!(files[0], PathBuf::from("camelcase.js"));
        assert_eq!(files[23], PathBuf::from("camelcase.d.ts"));
        assert!(files.contains(&PathBuf::from("graphqlToNexus/objectType.d.ts")));
    }

    #[tokio::test]
    async fn test_ensure_output_dirs_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nexus-prisma");

        ensure_output_dirs(&output).await.unwrap();
        ensure_output_dirs(&output).await.unwrap();

        for sub in DIRS {
            assert!(output.join(sub).is_dir());
        }
    }
}
