use bwip::db::{schema, seed};
use bwip::server::{config::ServerConfig, sync_task};
use bwip::version::VERSION;
use bwip::web::{AppState, create_axum_router};

use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create development data and exit
    Seed,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

async fn connect(config: &ServerConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    schema::ensure_schema(&db).await?;
    Ok(db)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

async fn serve(config: Arc<ServerConfig>, db: DatabaseConnection) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app_state = Arc::new(AppState::new(db, config.clone())?);
    if app_state.beach_source.is_mock() {
        info!("beaches.ie client is serving mock data.");
    }

    let sync_handle = sync_task::spawn(app_state.clone());

    let addr: SocketAddr = config.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "HTTP server listening");

    let app = create_axum_router(app_state);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sync_handle {
        handle.abort();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Checked before parsing to keep the plain version output.
    if std::env::args().any(|arg| arg == "--version") {
        println!("Server version: {VERSION}");
        return Ok(());
    }

    let args = Args::parse();

    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&server_config.log_dir);
    info!("Starting BWIP, version: {}", VERSION);

    let db = match connect(&server_config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to connect to the database.");
            return Err(e.into());
        }
    };

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(server_config, db).await,
        Command::Seed => {
            let summary = seed::run(&db).await?;
            println!(
                "Seed complete: {} authorities, {} templates, {} users, {} locations created.",
                summary.authorities, summary.templates, summary.users, summary.locations
            );
            println!("  Admin: admin@example.com / adminpassword");
            println!("  Demo:  demo@example.com / demopassword");
            Ok(())
        }
    }
}
