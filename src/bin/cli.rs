use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use music_playlist_client as lib;
use lib::api::{http::HttpBackend, mock::MockBackend, Backend};
use lib::app::PlaylistApp;
use lib::config::Config;
use lib::models::{AuthMode, Playlist};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::rolling::RollingFileAppender;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "music-playlist-client", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use the in-memory backend with a small demo catalog
    #[arg(long)]
    offline: bool,

    #[arg(long, env = "MUSIC_PLAYLIST_EMAIL", default_value = "")]
    email: String,

    #[arg(long, env = "MUSIC_PLAYLIST_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (does not log in)
    Register,
    /// List playlists and their songs
    Playlists,
    /// Create a playlist
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update a playlist's name and description
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a playlist
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Search the song catalog
    Search { query: String },
    /// Search and add one of the results to a playlist
    Add {
        /// Target playlist id
        #[arg(long)]
        playlist: String,
        #[arg(long)]
        query: String,
        /// Index into the search results
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Validate config file and exit
    ConfigValidate,
}

fn init_logging(cfg: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let _ = LogTracer::init();
    std::fs::create_dir_all(&cfg.log_dir)
        .with_context(|| format!("creating log dir {}", cfg.log_dir.display()))?;
    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(&cfg.log_dir, "music-playlist.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber_global::set_global_default(subscriber)
        .context("setting global tracing subscriber")?;
    Ok(guard)
}

fn print_playlists(playlists: &[Playlist]) {
    if playlists.is_empty() {
        println!("No playlists.");
    }
    for p in playlists {
        println!("- {}: {}", p.id, p.name);
        if let Some(d) = p.description.as_deref().filter(|d| !d.is_empty()) {
            println!("    {}", d);
        }
        for s in &p.songs {
            println!("    * {} - {} ({})", s.name, s.artist, s.album);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref()).context("loading config")?;

    if let Commands::ConfigValidate = cli.command {
        println!("OK ({})", cfg.api_base());
        return Ok(());
    }

    let _guard = init_logging(&cfg)?;

    let backend: Arc<dyn Backend> = if cli.offline {
        Arc::new(MockBackend::demo())
    } else {
        Arc::new(HttpBackend::from_config(&cfg).context("building http backend")?)
    };
    let mut app = PlaylistApp::new(backend);

    if cli.email.is_empty() || cli.password.is_empty() {
        anyhow::bail!("--email and --password (or MUSIC_PLAYLIST_EMAIL/MUSIC_PLAYLIST_PASSWORD) are required");
    }

    // The offline backend starts empty, so every offline run registers first.
    if cli.offline || matches!(cli.command, Commands::Register) {
        app.authenticate(&cli.email, &cli.password, AuthMode::Register)
            .await
            .context("register")?;
        if matches!(cli.command, Commands::Register) {
            println!("Registered {}. Log in to continue.", cli.email);
            return Ok(());
        }
    }
    app.authenticate(&cli.email, &cli.password, AuthMode::Login)
        .await
        .context("login")?;

    match cli.command {
        Commands::Register | Commands::ConfigValidate => {}
        Commands::Playlists => {
            print_playlists(app.store().playlists());
        }
        Commands::Create { name, description } => {
            let store = app.store_mut();
            store.begin_create();
            store.set_name(&name);
            store.set_description(&description);
            let created = app.save_edit().await.context("create playlist")?;
            println!("Created {} ({})", created.name, created.id);
            print_playlists(app.store().playlists());
        }
        Commands::Update { id, name, description } => {
            let current = app
                .store()
                .find(&id)
                .cloned()
                .with_context(|| format!("no playlist with id {}", id))?;
            let store = app.store_mut();
            store.begin_edit(&current);
            if let Some(n) = name {
                store.set_name(&n);
            }
            if let Some(d) = description {
                store.set_description(&d);
            }
            let updated = app.save_edit().await.context("update playlist")?;
            println!("Updated {} ({})", updated.name, updated.id);
        }
        Commands::Delete { id } => {
            app.delete_playlist(&id).await.context("delete playlist")?;
            println!("Deleted {}", id);
            print_playlists(app.store().playlists());
        }
        Commands::Search { query } => {
            let results = app.search(&query).await.context("search")?;
            for (i, s) in results.iter().enumerate() {
                println!("[{}] {} - {} ({})", i, s.name, s.artist, s.album);
            }
        }
        Commands::Add { playlist, query, index } => {
            app.search(&query).await.context("search")?;
            let attached = app.attach_result(index, &playlist).await.context("add song")?;
            println!("{}", attached);
        }
    }
    Ok(())
}
