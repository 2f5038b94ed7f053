//! Skill-Link API server binary.
//!
//! Serves the HTTP API by default; `create-user` provisions an identity
//! with an explicit role (the only way to obtain mentors and admins).

use clap::{Parser, Subcommand};
use skilllink_api::AppState;
use skilllink_api::config::ApiConfig;
use skilllink_core::models::auth::Role;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "skilllink_api_server", about = "Skill-Link API server")]
struct Args {
    /// Port to listen on; overrides the port in `BIND_ADDR`.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = skilllink_api::config::DEFAULT_DATABASE_URL
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,

    /// Create an identity with the given role.
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SKILLLINK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "learner", value_parser = parse_role)]
        role: Role,
    },
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse::<Role>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,skilllink_api=debug,skilllink_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    config.pg_connection_url = args.database_url.clone();
    if let Some(port) = args.port {
        let host = config
            .bind_addr
            .rsplit_once(':')
            .map_or("127.0.0.1", |(host, _)| host)
            .to_string();
        config.bind_addr = format!("{host}:{port}");
    }

    info!(max_connections = args.max_connections, "configuring connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.pg_connection_url)
        .await?;

    info!("running database migrations");
    skilllink_api::migrate(&pool).await?;

    let state = AppState::postgres(config.clone(), pool)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state, &config.bind_addr).await,
        Command::CreateUser {
            name,
            email,
            password,
            role,
        } => {
            let user = state.gate.provision(&name, &email, &password, role).await?;
            info!(user_id = %user.id, email = %user.email, role = %user.role, "user created");
            Ok(())
        }
    }
}

async fn serve(state: AppState, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = skilllink_api::router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
