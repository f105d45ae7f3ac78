use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devops_ingest::azure::{
    AzureDevOpsClient, build_file_view_url, is_azure_repository_url, parse_repository_url,
    repository_slug,
};
use devops_ingest::paths::PlatformPaths;
use devops_ingest::{Config, Credential, Document, LineAwareSplitter, VERSION};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "devops-ingest")]
#[command(about = "Read Azure DevOps repositories and split their files for indexing")]
#[command(version = VERSION)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "DEVOPS_INGEST_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Environment variable holding the personal access token
    #[arg(long, global = true, value_name = "VAR")]
    pat_env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a repository URL and print its descriptor
    Parse { url: String },
    /// Check whether a URL looks like an Azure DevOps repository
    Check { url: String },
    /// Print file tree, README and branch as JSON
    Structure {
        url: String,
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// List repository files, one per line
    Files {
        url: String,
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Print the content of one file
    Cat {
        url: String,
        path: String,
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Print the web URL for a file
    ViewUrl {
        url: String,
        path: String,
        #[arg(short, long, default_value = "main")]
        branch: String,
    },
    /// Split a local file into line-numbered chunks
    Split {
        file: PathBuf,
        #[arg(long)]
        chunk_size: Option<usize>,
        #[arg(long)]
        overlap: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(var) = cli.pat_env {
        config.azure.pat_env_var = var;
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling in-flight requests");
            ctrl_c.cancel();
        }
    });

    match cli.command {
        Commands::Parse { url } => {
            let descriptor = parse_repository_url(&url)
                .context("Not a recognized Azure DevOps repository URL")?;
            let slug = repository_slug(&descriptor);
            let output = serde_json::json!({
                "descriptor": descriptor,
                "slug": slug,
                "cache_dir": PlatformPaths::repository_cache_dir(&slug),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Check { url } => {
            println!("{}", is_azure_repository_url(&url));
        }
        Commands::Structure { url, branch } => {
            let client = build_client(&url, &config, &cancel)?;
            let structure = client.fetch_repository_structure(branch.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&structure)?);
        }
        Commands::Files { url, branch } => {
            let client = build_client(&url, &config, &cancel)?;
            for path in client.list_files(branch.as_deref()).await? {
                println!("{}", path);
            }
        }
        Commands::Cat { url, path, branch } => {
            let client = build_client(&url, &config, &cancel)?;
            let content = client.fetch_file_content(&path, branch.as_deref()).await?;
            print!("{}", content);
        }
        Commands::ViewUrl { url, path, branch } => {
            println!("{}", build_file_view_url(&url, &path, &branch));
        }
        Commands::Split {
            file,
            chunk_size,
            overlap,
        } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let splitter = LineAwareSplitter::new(
                chunk_size.unwrap_or(config.splitter.chunk_size),
                overlap.unwrap_or(config.splitter.chunk_overlap),
            )?;
            let document = Document::for_file(file.display().to_string(), text);
            let chunks = splitter.split(&[document]);
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.apply_env_overrides();
            config.validate()?;
            config
        }
        None => Config::new()?,
    };
    Ok(config)
}

fn build_client(
    url: &str,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<AzureDevOpsClient> {
    let credential: Option<Credential> = config.resolve_credential();
    if credential.is_none() {
        tracing::info!(
            "No PAT found in ${}, sending unauthenticated requests",
            config.azure.pat_env_var
        );
    }

    let client = AzureDevOpsClient::from_config(url, credential, config)?
        .with_cancellation(cancel.clone());
    Ok(client)
}
