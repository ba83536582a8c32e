use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use navtree::config::TreeConfig;
use navtree::services::fetch::HttpBackend;
use navtree::services::tracing_setup;
use navtree::view::nav_tree::{SessionStatus, ToggleOutcome, TreeSession};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Lazily loaded navigation tree for a content site
#[derive(Parser, Debug)]
#[command(name = "navtree")]
#[command(about = "Print the navigation tree leading to a page", long_about = None)]
#[command(version)]
struct Args {
    /// Page whose branch is loaded first
    #[arg(value_name = "PAGE_URL")]
    url: String,

    /// Node path to expand after the root is loaded (repeatable, applied in order)
    #[arg(long, value_name = "PATH")]
    expand: Vec<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(args: &Args) -> AnyhowResult<TreeConfig> {
    match &args.config {
        Some(path) => TreeConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(TreeConfig::default()),
    }
}

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if !tracing_setup::init_global(args.log_file.as_deref()) {
        eprintln!("Warning: logging is not available");
    }

    let config = load_config(&args)?;

    if args.dump_config {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let page_url = url::Url::parse(&args.url)
        .with_context(|| format!("Invalid page URL: {}", args.url))?;

    let backend = Arc::new(HttpBackend::new(Duration::from_secs(
        config.fetch_timeout_secs,
    )));
    let mut session = TreeSession::new(config, backend);

    let ready = matches!(
        session.load_root(page_url.as_str()).await,
        SessionStatus::Ready
    );
    if ready {
        for path in &args.expand {
            match session.click(path) {
                Some(ToggleOutcome::FetchStarted(request)) => {
                    tracing::debug!("Waiting for {}", request.url);
                    session.next_completion().await;
                }
                Some(_) => {}
                None => tracing::warn!("No expandable node at {}", path),
            }
        }
    }

    print!("{}", session.render_text());
    Ok(())
}
