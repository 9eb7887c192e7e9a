/// YouTube TV session CLI - inspect and drive playback state
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tv_core::types::Video;
use tv_playback::ResumeOutcome;
use tv_session::{Session, SessionConfig};
use tv_storage::SqliteGateway;

#[derive(Parser)]
#[command(name = "tv-session")]
#[command(about = "YouTube TV playback session", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./tv.toml if present)
    #[arg(short, long, global = true, env = "TV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resume the last session and show what is playing
    Resume,
    /// Skip to the next video
    Next,
    /// Go back to the previous video
    Previous,
    /// Switch to the next color filter of the current playlist
    CycleFilter,
    /// Show watch history, most recent first
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tv_session=info,tv_storage=info,tv_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = SessionConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let gateway =
        SqliteGateway::connect(&config.storage.database_url, &config.storage.user_id).await?;
    let mut session = Session::start(Arc::new(gateway), &config).await?;

    match cli.command {
        Commands::Resume => {
            match session.resume_outcome() {
                ResumeOutcome::Resumed { .. } => println!("Resumed from history"),
                ResumeOutcome::FellBack { .. } => println!("No history to resume, picked a video"),
                ResumeOutcome::Empty => println!("No videos available"),
            }
            print_now_playing(&session);
        }
        Commands::Next => {
            session.go_next().await;
            print_now_playing(&session);
        }
        Commands::Previous => {
            session.go_previous().await;
            print_now_playing(&session);
        }
        Commands::CycleFilter => {
            match session.cycle_filter().await {
                Some(filter) => println!("Filter: {}", filter),
                None => println!("No active playlist"),
            }
            print_now_playing(&session);
        }
        Commands::History { limit } => {
            if session.history().next().is_none() {
                println!("History is empty");
            }
            for entry in session.history().take(limit) {
                println!(
                    "{}  {:<40}  {} [{}]",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.title,
                    entry.playlist_name,
                    entry.filter
                );
            }
        }
    }

    session.shutdown().await?;
    Ok(())
}

fn print_now_playing(session: &Session) {
    let controller = session.controller();
    let Some(video) = controller.current_video() else {
        println!("Nothing playing");
        return;
    };
    let playlist = controller
        .active_playlist()
        .map_or("?", |playlist| playlist.name.as_str());

    println!(
        "Now playing: {} ({}) in {} [{}]",
        video.title,
        format_progress(session, video),
        playlist,
        controller.active_filter()
    );
}

fn format_progress(session: &Session, video: &Video) -> String {
    let watched = if session.is_watched(video) {
        ", watched"
    } else {
        ""
    };
    format!(
        "{}s of {}s{}",
        session.progress_of(&video.id),
        video.duration_seconds,
        watched
    )
}
