use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nexus_prisma_generator::{generate, GenerateOptions, DEFAULT_CLIENT_DIR, DEFAULT_OUTPUT_PATH};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nexus-prisma-generate")]
#[command(about = "Generate nexus-prisma type declarations and metadata from a Prisma project", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the project's prisma.yml
    #[arg(long, short = 'p', env = "PRISMA_CONFIG_PATH", default_value = "prisma.yml")]
    prisma_yml: PathBuf,

    /// Import path of the generated Prisma client
    #[arg(long, env = "NEXUS_PRISMA_CLIENT_DIR", default_value = DEFAULT_CLIENT_DIR)]
    client: String,

    /// Output directory of the generated artifacts
    #[arg(long, short = 'o', env = "NEXUS_PRISMA_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Directory holding the static support files
    #[arg(long, env = "NEXUS_PRISMA_LIBRARY_DIR")]
    library_dir: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> GenerateOptions {
        let options = GenerateOptions::default()
            .with_client_dir(self.client.clone())
            .with_output_path(self.output.clone());

        match &self.library_dir {
            Some(dir) => options.with_library_dir(dir.clone()),
            None => options,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout stays clean for the summary
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let options = cli.options();

    let report = generate(&cli.prisma_yml, &options)
        .await
        .with_context(|| format!("Failed to generate nexus-prisma artifacts from {}", cli.prisma_yml.display()))?;

    if report.types.is_none() {
        warn!("type declarations were not generated, see the error above");
    }
    info!(static_files = report.static_files, "done");

    println!("Types generated at {}", options.output_path.display());
    Ok(())
}
