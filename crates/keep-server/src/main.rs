// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Keep provisioning and billing server binary.

use clap::{Parser, Subcommand};
use keep_server::{create_app_state, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Keep server - SCIM provisioning and billing HTTP server.
#[derive(Parser, Debug)]
#[command(name = "keep-server", about = "Keep provisioning and billing server", version)]
struct Args {
	/// Subcommands for keep-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Parse CLI arguments
	let args = Args::parse();

	// Handle subcommands that should not start the server
	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Load configuration
	let config = keep_server_config::load_config()?;

	// Setup tracing
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting keep-server"
	);

	// Create database pool and apply schema
	let pool = keep_server_db::create_pool(&config.database.url).await?;
	keep_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config).await;
	let router = create_router(state, &config);

	let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
	tracing::info!(addr = %listener.local_addr()?, "listening");

	axum::serve(listener, router).await?;

	Ok(())
}
