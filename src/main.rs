//! server_info - Server Status Dashboard Binary
//!
//! Polls a host's `system_info.json` and shows it in the terminal or as a web page.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use server_info::{
    poller::fetch_snapshot, web::AppState, ApiAddress, Board, BoardPublisher, Dashboard,
    DashboardConfig, Endpoint, EndpointFetcher, Renderer, Settings, SystemSnapshot,
    TerminalPrinter, WebConfig, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_INITIAL_DELAY_MS,
    DEFAULT_INTERVAL_MS, DEFAULT_WEB_PORT,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "server_info")]
#[command(about = "🖥️  server_info - Linux Server Status Dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Polls a host's system_info.json and renders it in the terminal or as a live web page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Endpoint to poll: an http(s) URL or a local file path
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Polling interval in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_MS)]
    interval: u64,

    /// Per-fetch timeout in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_FETCH_TIMEOUT_MS)]
    timeout: u64,

    /// Settings file holding the saved API address
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard in the terminal (default)
    Watch(WatchArgs),

    /// Serve the dashboard as a web page
    Serve(ServeArgs),

    /// Fetch a single snapshot and exit
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
struct WatchArgs {
    /// Delay before the first fetch in milliseconds
    #[arg(long, default_value_t = DEFAULT_INITIAL_DELAY_MS)]
    initial_delay: u64,

    /// Append updates instead of redrawing the screen
    #[arg(long)]
    no_clear: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Directory with icon assets, served under /static
    #[arg(long)]
    static_dir: Option<String>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Maximum WebSocket viewers
    #[arg(long, default_value_t = 100)]
    max_connections: usize,

    /// Heading shown on the dashboard page
    #[arg(long, default_value = "Linux Server Info")]
    title: String,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Watch(args)) => watch_command(&cli, args).await?,
        Some(Commands::Serve(args)) => serve_command(&cli, args).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(&cli, args).await?,
        None => {
            let args = WatchArgs {
                initial_delay: DEFAULT_INITIAL_DELAY_MS,
                no_clear: false,
            };
            watch_command(&cli, &args).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli, &directives))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// `RUST_LOG`-style `directives` win; otherwise the level comes from the flags.
fn log_filter(cli: &Cli, directives: &str) -> EnvFilter {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives)
}

/// Resolve the polled address: `--endpoint`, then the settings file, then the default.
fn resolve_address(cli: &Cli) -> anyhow::Result<ApiAddress> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let endpoint: Endpoint = match &cli.endpoint {
        Some(raw) => raw.parse()?,
        None => settings.endpoint()?,
    };

    let address = ApiAddress::new(endpoint);
    Ok(match &cli.settings {
        Some(path) => address.with_settings_path(path),
        None => address,
    })
}

fn dashboard_config(cli: &Cli, address: &ApiAddress, initial_delay_ms: u64) -> DashboardConfig {
    DashboardConfig::new(address.current())
        .with_interval_ms(cli.interval)
        .with_initial_delay_ms(initial_delay_ms)
        .with_fetch_timeout_ms(cli.timeout)
}

async fn watch_command(cli: &Cli, args: &WatchArgs) -> anyhow::Result<()> {
    let address = resolve_address(cli)?;
    let config = dashboard_config(cli, &address, args.initial_delay);
    let source = Arc::new(EndpointFetcher::new()?);

    println!("🖥️  server_info - polling {}", address.current());
    println!("   Press Ctrl+C to stop");
    println!();

    let handle = Dashboard::new(config, source, address)
        .with_observer(TerminalPrinter::new(std::io::stdout(), !args.no_clear))
        .start()?;

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;
    info!("Stopping dashboard");
    handle.stop();
    handle.join().await;

    Ok(())
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    let address = resolve_address(cli)?;
    let config = dashboard_config(cli, &address, 0);
    let source = Arc::new(EndpointFetcher::new()?);

    let web_config = WebConfig::new(&args.host, args.port)
        .with_cors(!args.no_cors)
        .with_static_path(args.static_dir.clone())
        .with_max_websocket_connections(args.max_connections)
        .with_title(&args.title);

    info!("Web server configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", !args.no_cors);
    info!("  - Max WebSocket viewers: {}", args.max_connections);
    info!("  - Polling interval: {}ms", cli.interval);

    let (publisher, board) = BoardPublisher::channel();
    let handle = Dashboard::new(config, source, address.clone())
        .with_observer(publisher)
        .start()?;

    let state = AppState::new(web_config.clone(), board, handle.subscribe_state(), address);
    let shutdown = handle.cancellation_token();

    let mut server = tokio::spawn(server_info::start_web_server(web_config, state, shutdown));

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            info!("Shutting down");
            handle.stop();
            handle.join().await;
            server.await??;
        }
        exited = &mut server => {
            error!("Web server exited, stopping dashboard");
            handle.stop();
            handle.join().await;
            exited??;
        }
    }

    Ok(())
}

async fn snapshot_command(cli: &Cli, args: &SnapshotArgs) -> anyhow::Result<()> {
    let address = resolve_address(cli)?;
    let endpoint = address.current();
    let source = EndpointFetcher::new()?;

    let snapshot = fetch_snapshot(
        &source,
        &endpoint,
        std::time::Duration::from_millis(cli.timeout),
    )
    .await
    .with_context(|| format!("Failed to fetch {}", endpoint))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        "pretty" => print_pretty_snapshot(&snapshot)?,
        other => anyhow::bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

fn print_pretty_snapshot(snapshot: &SystemSnapshot) -> anyhow::Result<()> {
    let mut board = Board::new();
    board.render(Some(snapshot), chrono::Utc::now());
    server_info::render::terminal::write_board(&mut std::io::stdout(), &board)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{Layer, Registry};

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "server_info",
            "--endpoint",
            "api/system_info.json",
            "serve",
            "--port",
            "9090",
            "--title",
            "pi-hole",
        ])
        .unwrap();
        assert_eq!(cli.endpoint.as_deref(), Some("api/system_info.json"));
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, 9090);
                assert_eq!(args.title, "pi-hole");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_log_level_follows_flags() {
        let quiet = Cli::try_parse_from(["server_info"]).unwrap();
        let verbose = Cli::try_parse_from(["server_info", "--verbose"]).unwrap();
        let debug = Cli::try_parse_from(["server_info", "--debug"]).unwrap();

        let hint = |cli: &Cli, directives: &str| {
            Layer::<Registry>::max_level_hint(&log_filter(cli, directives))
        };
        assert_eq!(hint(&quiet, ""), Some(LevelFilter::WARN));
        assert_eq!(hint(&verbose, ""), Some(LevelFilter::INFO));
        assert_eq!(hint(&debug, ""), Some(LevelFilter::DEBUG));
        assert_eq!(hint(&quiet, "trace"), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_debug_flag_enables_debug_events() {
        let cli = Cli::try_parse_from(["server_info", "--debug"]).unwrap();
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(log_filter(&cli, ""))
            .with_writer(std::io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(Level::DEBUG));
            assert!(!tracing::enabled!(Level::TRACE));
        });

        let cli = Cli::try_parse_from(["server_info"]).unwrap();
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(log_filter(&cli, ""))
            .with_writer(std::io::sink)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::INFO));
        });
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["server_info"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.interval, DEFAULT_INTERVAL_MS);
        assert_eq!(cli.timeout, DEFAULT_FETCH_TIMEOUT_MS);

        let address = resolve_address(&cli).unwrap();
        assert_eq!(address.current().to_string(), server_info::DEFAULT_ENDPOINT);
    }
}
