use std::path::PathBuf;

/// Module specifier of the generated Prisma client.
pub const DEFAULT_CLIENT_DIR: &str = "@generated/prisma-client";

/// Where the nexus-prisma artifacts are written.
pub const DEFAULT_OUTPUT_PATH: &str = "@generated/nexus-prisma";

/// Overrides the directory the static support files are copied from.
pub const LIBRARY_DIR_ENV: &str = "NEXUS_PRISMA_LIBRARY_DIR";

/// Options for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Import path of the generated client. Paths starting with `.` or the
    /// path separator are rewritten relative to the declaration file.
    pub client_dir: String,
    /// Root of the output tree.
    pub output_path: PathBuf,
    /// Directory holding the static `.js` / `.d.ts` support files.
    pub library_dir: PathBuf,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            client_dir: DEFAULT_CLIENT_DIR.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            library_dir: default_library_dir(),
        }
    }
}

impl GenerateOptions {
    pub fn with_client_dir(mut self, client_dir: impl Into<String>) -> Self {
        self.client_dir = client_dir.into();
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_library_dir(mut self, library_dir: impl Into<PathBuf>) -> Self {
        self.library_dir = library_dir.into();
        self
    }
}

/// `$NEXUS_PRISMA_LIBRARY_DIR`, else `library/` next to the running
/// executable, else `library/` in the working directory.
pub fn default_library_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LIBRARY_DIR_ENV) {
        return PathBuf::from(dir);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("library")))
        .unwrap_or_else(|| PathBuf::from("library"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods_override_defaults() {
        let options = GenerateOptions::default()
            .with_client_dir("./prisma-client")
            .with_output_path("out")
            .with_library_dir("lib");

        assert_eq!(options.client_dir, "./prisma-client");
        assert_eq!(options.output_path, PathBuf::from("out"));
        assert_eq!(options.library_dir, PathBuf::from("lib"));
    }

    #[test]
    fn test_defaults() {
        let options = GenerateOptions::default();
        assert_eq!(options.client_dir, DEFAULT_CLIENT_DIR);
        assert_eq!(options.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }
}
