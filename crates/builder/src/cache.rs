use std::path::Path;

use nexus_prisma_gql::{DatamodelInfo, Schema, DEFAULT_EXPORT_PREFIX};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::BuilderError;

/// A metadata document together with the schema it embeds.
#[derive(Debug, Clone)]
pub struct LoadedDatamodelInfo {
    pub info: DatamodelInfo,
    pub schema: Schema,
}

impl LoadedDatamodelInfo {
    pub fn parse(document: &str) -> Result<Self, BuilderError> {
        let info = DatamodelInfo::parse_document(document, DEFAULT_EXPORT_PREFIX)?;
        let schema = info.build_schema()?;
        Ok(Self { info, schema })
    }
}

/// Loads the metadata document at most once.
///
/// The first successful [`get_or_load`](Self::get_or_load) wins; later calls
/// return the cached value whatever path they pass. A failed load leaves the
/// cache empty.
#[derive(Debug, Default)]
pub struct DatamodelInfoCache {
    cell: OnceCell<LoadedDatamodelInfo>,
}

static GLOBAL: DatamodelInfoCache = DatamodelInfoCache::new();

impl DatamodelInfoCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static DatamodelInfoCache {
        &GLOBAL
    }

    pub fn get(&self) -> Option<&LoadedDatamodelInfo> {
        self.cell.get()
    }

    pub fn get_or_load(&self, path: &Path) -> Result<&LoadedDatamodelInfo, BuilderError> {
        self.cell.get_or_try_init(|| {
            debug!(path = %path.display(), "loading datamodel info");
            let document = std::fs::read_to_string(path).map_err(|source| BuilderError::ReadDatamodelInfo {
                path: path.to_path_buf(),
                source,
            })?;
            LoadedDatamodelInfo::parse(&document)
        })
    }
}
