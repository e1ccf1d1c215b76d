use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::artifacts::should_generate_artifacts;
use crate::BuilderError;

/// Context key the client is read from when none is configured.
pub const DEFAULT_CLIENT_KEY: &str = "photon";

pub type ClientFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// How resolvers reach the generated client from the GraphQL context.
#[derive(Clone)]
pub enum ClientAccessor {
    /// Property of the context object holding the client.
    ContextKey(String),
    /// Function extracting the client from the context.
    Function(ClientFn),
}

impl ClientAccessor {
    pub fn function(f: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    pub fn client(&self, context: &Value) -> Option<Value> {
        match self {
            Self::ContextKey(key) => context.get(key).cloned(),
            Self::Function(f) => f(context),
        }
    }
}

impl Default for ClientAccessor {
    fn default() -> Self {
        Self::ContextKey(DEFAULT_CLIENT_KEY.to_string())
    }
}

impl fmt::Debug for ClientAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextKey(key) => f.debug_tuple("ContextKey").field(key).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuilderOptions {
    pub client: ClientAccessor,
    /// `None` defers to `NODE_ENV`.
    pub should_generate_artifacts: Option<bool>,
    /// The rendered `datamodelInfo.js` document.
    pub datamodel_info_path: PathBuf,
}

impl BuilderOptions {
    pub fn new(datamodel_info_path: impl Into<PathBuf>) -> Self {
        Self {
            client: ClientAccessor::default(),
            should_generate_artifacts: None,
            datamodel_info_path: datamodel_info_path.into(),
        }
    }

    pub fn with_client(mut self, client: ClientAccessor) -> Self {
        self.client = client;
        self
    }

    pub fn with_should_generate_artifacts(mut self, generate: bool) -> Self {
        self.should_generate_artifacts = Some(generate);
        self
    }

    pub fn validate(&self) -> Result<(), BuilderError> {
        match &self.client {
            ClientAccessor::ContextKey(key) if key.trim().is_empty() => Err(BuilderError::MissingClient),
            _ => Ok(()),
        }
    }

    /// The explicit setting, else whether `NODE_ENV` is unset or `development`.
    pub fn resolve_should_generate_artifacts(&self) -> bool {
        self.should_generate_artifacts.unwrap_or_else(|| {
            let node_env = std::env::var("NODE_ENV").ok();
            should_generate_artifacts(node_env.as_deref())
        })
    }
}
