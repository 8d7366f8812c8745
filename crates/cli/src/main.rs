//! `vidflow` command-line client.
//!
//! Thin terminal front-end over [`vidflow_api`] and [`vidflow_stream`]:
//! scan channels, queue downloads, run workflows, and tail the live
//! event stream.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidflow_api::models::DownloadOptions;
use vidflow_api::{ApiConfig, VidFlowApi};
use vidflow_core::execution::ExecutionSnapshot;
use vidflow_core::StreamEvent;
use vidflow_stream::{ExecutionMonitor, StreamHub};

#[derive(Parser)]
#[command(name = "vidflow", about = "Command-line client for the VidFlow backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tail the live event stream to stdout.
    Watch,
    /// Scan a channel URL for videos.
    Scan {
        url: String,
        /// Maximum number of videos to fetch.
        #[arg(long)]
        max_videos: Option<u32>,
    },
    /// Queue a single video download.
    Download {
        url: String,
        /// Also download subtitles.
        #[arg(long)]
        subtitles: bool,
        /// Subtitle language code.
        #[arg(long, default_value = "en")]
        language: String,
        /// yt-dlp quality selector.
        #[arg(long, default_value = "best")]
        quality: String,
    },
    /// Workflow management.
    #[command(subcommand)]
    Workflows(WorkflowsCommand),
    /// Show one execution's current state.
    Status { execution_id: i64 },
}

#[derive(Subcommand)]
enum WorkflowsCommand {
    /// List stored workflows.
    List,
    /// Execute a workflow.
    Run {
        workflow_id: i64,
        /// Follow the execution until it finishes.
        #[arg(long)]
        follow: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ApiConfig::from_env();
    let api = VidFlowApi::new(&config);

    match cli.command {
        Command::Watch => watch(&config).await,
        Command::Scan { url, max_videos } => scan(&api, &url, max_videos).await,
        Command::Download {
            url,
            subtitles,
            language,
            quality,
        } => {
            let options = DownloadOptions {
                download_subtitles: subtitles,
                subtitle_language: language,
                quality,
                ..DownloadOptions::default()
            };
            download(&api, &url, options).await
        }
        Command::Workflows(WorkflowsCommand::List) => list_workflows(&api).await,
        Command::Workflows(WorkflowsCommand::Run {
            workflow_id,
            follow,
        }) => run_workflow(&api, &config, workflow_id, follow).await,
        Command::Status { execution_id } => status(&api, execution_id).await,
    }
}

async fn watch(config: &ApiConfig) -> anyhow::Result<()> {
    let hub = StreamHub::start(config);
    let mut rx = hub.subscribe();
    println!("Watching {} (ctrl-c to stop)", config.ws_url);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Ok(event) => print_event(&event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    eprintln!("(skipped {missed} events)");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    hub.shutdown().await;
    Ok(())
}

async fn scan(api: &VidFlowApi, url: &str, max_videos: Option<u32>) -> anyhow::Result<()> {
    let result = api
        .downloads()
        .scan_channel(url, max_videos)
        .await
        .context("channel scan failed")?;

    println!(
        "{} ({}) -- {} videos",
        result.channel.name, result.channel.platform, result.total_videos
    );
    for video in &result.videos {
        println!("  [{}] {}", video.id, video.title);
    }
    Ok(())
}

async fn download(api: &VidFlowApi, url: &str, options: DownloadOptions) -> anyhow::Result<()> {
    let record = api
        .downloads()
        .start(url, options)
        .await
        .context("download request failed")?;
    println!("Queued download {} ({:?})", record.id, record.status);
    Ok(())
}

async fn list_workflows(api: &VidFlowApi) -> anyhow::Result<()> {
    let workflows = api.workflows().list().await.context("listing workflows failed")?;
    if workflows.is_empty() {
        println!("No workflows saved.");
        return Ok(());
    }
    for workflow in workflows {
        println!(
            "[{}] {} ({} nodes{})",
            workflow.id,
            workflow.name,
            workflow.workflow_data.nodes.len(),
            if workflow.is_active { "" } else { ", inactive" },
        );
    }
    Ok(())
}

async fn run_workflow(
    api: &VidFlowApi,
    config: &ApiConfig,
    workflow_id: i64,
    follow: bool,
) -> anyhow::Result<()> {
    let snapshot = api
        .workflows()
        .execute(workflow_id)
        .await
        .context("workflow execution failed to start")?;
    println!("Execution {} started ({})", snapshot.id, snapshot.status);

    if !follow {
        return Ok(());
    }

    // Subscribe before seeding the monitor so no event slips past.
    let hub = StreamHub::start(config);
    let events = hub.subscribe();
    let mut monitor = ExecutionMonitor::start(api.clone(), events, snapshot.id)
        .await
        .context("could not load execution snapshot")?;

    let mut printed_lines = monitor.log().len();
    loop {
        let live = monitor.step().await.context("lost track of execution")?;
        for line in &monitor.log()[printed_lines.min(monitor.log().len())..] {
            println!("{line}");
        }
        printed_lines = monitor.log().len();
        if !live {
            break;
        }
    }

    println!("Execution {} finished: {}", monitor.execution_id(), monitor.status());
    hub.shutdown().await;
    Ok(())
}

async fn status(api: &VidFlowApi, execution_id: i64) -> anyhow::Result<()> {
    let snapshot = api
        .workflows()
        .execution(execution_id)
        .await
        .context("could not fetch execution")?;
    print_snapshot(&snapshot);
    Ok(())
}

fn print_snapshot(snapshot: &ExecutionSnapshot) {
    println!(
        "Execution {} (workflow {}): {}",
        snapshot.id, snapshot.workflow_id, snapshot.status
    );
    if let Some(error) = &snapshot.error_message {
        println!("  error: {error}");
    }
    for line in &snapshot.execution_log {
        println!("  {line}");
    }
}

fn print_event(event: &StreamEvent) {
    match event {
        StreamEvent::Log(data) => match &data.timestamp {
            Some(ts) => println!("[{ts}] {}", data.message),
            None => println!("{}", data.message),
        },
        other => println!("{other:?}"),
    }
}
