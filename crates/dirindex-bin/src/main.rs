use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use dirindex_core::config::IndexConfig;
use dirindex_core::format::ListingFormat;
use dirindex_core::handler::ListingHandler;
use dirindex_core::response::{BufferedResponse, WriterSink};
use dirindex_local::LocalDirectory;

#[derive(Parser, Debug)]
#[command(name = "dirindex")]
#[command(about = "Render directory listings as HTML or JSON")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long, env = "DIRINDEX_CONFIG_PATH", global = true)]
    config_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "DIRINDEX_LOG_LEVEL", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the listing of a directory
    Render {
        /// Directory to list
        dir: PathBuf,

        /// Request path the listing is served under
        #[arg(long, default_value = "/")]
        request_path: String,

        /// Output format (html or json)
        #[arg(long)]
        format: Option<ListingFormat>,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the listing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config_path.unwrap_or_else(IndexConfig::default_path);

    match cli.command {
        Commands::Render {
            dir,
            request_path,
            format,
            output,
        } => {
            let config = load_config(&config_path)?;
            let format = resolve_format(format, output.as_deref(), &config);
            render(&config, &dir, &request_path, format, output.as_deref())
        }
        Commands::InitConfig { force } => init_config(&config_path, force),
    }
}

fn load_config(path: &Path) -> Result<IndexConfig> {
    if path.exists() {
        info!("loading config from {}", path.display());
        IndexConfig::load(path)
    } else {
        Ok(IndexConfig::default())
    }
}

/// `--format` wins, then the output file extension, then the config default.
fn resolve_format(
    explicit: Option<ListingFormat>,
    output: Option<&Path>,
    config: &IndexConfig,
) -> ListingFormat {
    explicit
        .or_else(|| {
            output
                .and_then(|p| p.file_name())
                .and_then(|n| ListingFormat::from_file_name(&n.to_string_lossy()))
        })
        .unwrap_or(config.default_format)
}

fn render(
    config: &IndexConfig,
    dir: &Path,
    request_path: &str,
    format: ListingFormat,
    output: Option<&Path>,
) -> Result<()> {
    let handler = ListingHandler::new(config.markup_options());
    // Dropped at the end of this scope on every path
    let mut handle = LocalDirectory::open(dir)?;

    match output {
        Some(path) => {
            // Buffer first so a failed read never leaves a partial file
            let mut resp = BufferedResponse::new();
            handler.handle_request(&mut handle, request_path, format, &mut resp)?;
            std::fs::write(path, &resp.body)
                .with_context(|| format!("failed to write listing to {}", path.display()))?;
            info!(
                "wrote {} listing of {} to {} ({} bytes)",
                format,
                dir.display(),
                path.display(),
                resp.body.len()
            );
        }
        None => {
            let mut sink = WriterSink::new(io::stdout().lock());
            handler.handle_request(&mut handle, request_path, format, &mut sink)?;
        }
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    IndexConfig::default().save(path)?;
    info!("config written to {}", path.display());
    Ok(())
}
