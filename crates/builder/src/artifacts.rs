use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Artifacts are regenerated only outside production: when `NODE_ENV` is
/// unset or `development`.
pub fn should_generate_artifacts(node_env: Option<&str>) -> bool {
    matches!(node_env, None | Some("development"))
}

/// Run `task` in the background. A failure is logged and otherwise ignored.
pub fn spawn_artifact_generation<F, E>(task: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        match task.await {
            Ok(()) => debug!("generated schema artifacts"),
            Err(e) => error!(error = %e, "failed to generate schema artifacts"),
        }
    })
}
