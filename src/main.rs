use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use gavel::ai::{render_summary_comment, HttpAiReviewer};
use gavel::config::Settings;
use gavel::host::GerritClient;
use gavel::pipeline::{review_queue, spawn_processor, Evaluator};
use gavel::review::ReviewId;
use gavel::server::{router, AppState};
use gavel::storage::ReviewStore;

/// Automated code review for Gerrit changes
#[derive(Parser)]
#[command(name = "gavel")]
#[command(about = "Automated change review combining AI and rule-based analysis", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server and background processor (default command)
    Serve,
    /// Evaluate one change immediately and print the rendered report
    Review {
        /// Change identifier
        #[arg(long)]
        change_id: String,

        /// Revision to review (default: current)
        #[arg(long, default_value = "current")]
        revision: String,
    },
    /// Print a previously persisted review
    Show {
        /// Review identifier
        review_id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace,hyper=debug,tower=debug",
    };

    // Env vars take precedence over the verbosity flag
    let filter = tracing_subscriber::EnvFilter::try_from_env("GAVEL_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("gavel started with verbosity level: {}", cli.verbose);

    let result = match cli.command {
        Some(Commands::Review {
            change_id,
            revision,
        }) => run_review(cli.config, change_id, revision).await,
        Some(Commands::Show { review_id }) => run_show(cli.config, review_id),
        Some(Commands::Serve) | None => run_serve(cli.config).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_evaluator(settings: &Settings) -> anyhow::Result<Evaluator> {
    let host = Arc::new(GerritClient::new(&settings.gerrit)?);
    let reviewer = Arc::new(HttpAiReviewer::new(&settings.ai)?);
    let store = ReviewStore::new(settings.storage.review_dir.clone());

    Ok(Evaluator::new(
        host,
        reviewer,
        store,
        settings.scoring_weights(),
        settings.review.min_review_score,
        settings.review.auto_post_review,
    ))
}

async fn run_serve(config: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = Settings::load(config.as_deref())?;
    let evaluator = Arc::new(build_evaluator(&settings)?);

    let (queue, receiver) = review_queue(settings.review.queue_capacity);
    let poll_interval = Duration::from_millis(settings.review.poll_interval_ms);
    let processor = spawn_processor(receiver, evaluator, poll_interval);

    let state = Arc::new(AppState {
        queue,
        settings: settings.clone(),
        processor_state: processor.state_receiver(),
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    processor.shutdown().await;
    Ok(())
}

async fn run_review(
    config: Option<PathBuf>,
    change_id: String,
    revision: String,
) -> anyhow::Result<()> {
    let settings = Settings::load(config.as_deref())?;
    let evaluator = build_evaluator(&settings)?;

    let review = evaluator
        .evaluate(manual_change_info(&change_id, &revision))
        .await?;
    println!("{}", render_summary_comment(&review));
    println!(
        "\nReview {} saved (weighted score {:.2})",
        review.review_metadata.review_id, review.weighted_overall_score
    );
    Ok(())
}

/// One-shot reviews have no notification payload to draw identity from
fn manual_change_info(change_id: &str, revision: &str) -> gavel::host::ChangeInfo {
    gavel::host::ChangeInfo {
        change_id: change_id.to_string(),
        change_number: "0".to_string(),
        revision_id: revision.to_string(),
        project: String::new(),
        branch: String::new(),
        subject: "Manual review".to_string(),
        owner: "Manual".to_string(),
        owner_email: "manual@example.com".to_string(),
    }
}

fn run_show(config: Option<PathBuf>, review_id: String) -> anyhow::Result<()> {
    let settings = Settings::load(config.as_deref())?;
    let store = ReviewStore::new(settings.storage.review_dir);

    let review = store.load(&ReviewId::from_string(&review_id))?;
    println!("{}", serde_json::to_string_pretty(&review)?);
    Ok(())
}
