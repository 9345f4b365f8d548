//! Fontstrap command-line interface
//!
//! ```bash
//! fontstrap serve --config fontstrap.toml --addr 127.0.0.1:8000
//! fontstrap key
//! fontstrap clear
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use fontstrap::assets::CacheKey;
use fontstrap::conf::FontstrapSettings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fontstrap")]
#[command(about = "Serve a configurable Bootstrap bundle compiled from LESS", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Settings file (TOML or JSON)
	#[arg(short, long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Run the HTTP server
	Serve {
		/// Address to listen on
		#[arg(long, default_value = "127.0.0.1:8000")]
		addr: SocketAddr,
	},

	/// Print the cache entry name for the current settings
	Key,

	/// Remove every compiled bundle from the cache directory
	Clear,
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	let result = match fontstrap::load_settings(cli.config.as_deref()) {
		Ok(settings) => match cli.command {
			Commands::Serve { addr } => run_serve(settings, addr).await,
			Commands::Key => run_key(&settings),
			Commands::Clear => run_clear(settings).await,
		},
		Err(e) => Err(e),
	};

	if let Err(e) = result {
		eprintln!("Error: {:#}", e);
		process::exit(1);
	}
}

fn init_tracing(verbosity: u8) {
	let default_level = match verbosity {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
		)
		.init();
}

#[cfg(feature = "server")]
async fn run_serve(settings: FontstrapSettings, addr: SocketAddr) -> anyhow::Result<()> {
	use fontstrap::server::{HttpServer, shutdown_signal};
	use std::sync::Arc;

	tracing::info!(
		bundle = %settings.bootstrap_name,
		cache = %settings.cache_path.display(),
		font_awesome = settings.font_awesome,
		"starting fontstrap"
	);

	let (_fontstrap, chain) = fontstrap::app(settings);
	HttpServer::new(Arc::new(chain))
		.listen_with_shutdown(addr, shutdown_signal())
		.await
		.map_err(|e| anyhow::anyhow!(e))
}

#[cfg(not(feature = "server"))]
async fn run_serve(_settings: FontstrapSettings, _addr: SocketAddr) -> anyhow::Result<()> {
	anyhow::bail!("built without the `server` feature")
}

fn run_key(settings: &FontstrapSettings) -> anyhow::Result<()> {
	let key = CacheKey::derive(settings);
	println!("{}", settings.cache_path.join(key.file_name()).display());
	Ok(())
}

async fn run_clear(settings: FontstrapSettings) -> anyhow::Result<()> {
	let (fontstrap, _chain) = fontstrap::app(settings);
	let removed = fontstrap.store().sweep().await;
	println!("Removed {} cache entr{}", removed, if removed == 1 { "y" } else { "ies" });
	Ok(())
}
