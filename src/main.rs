use anyhow::Result;
use clap::Parser;
use hello_exporter::{config::Config, hello::HelloClient, metrics::ScrapeCollector, server};
use prometheus::Registry;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Username of Hello account (overrides config)
    #[arg(short, long, env = "HELLO_USERNAME")]
    username: Option<String>,

    /// Password of Hello account (overrides config)
    #[arg(short, long, env = "HELLO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Address to listen on (overrides config)
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,
}

// The blocking HTTP client must be created outside of the async runtime,
// so the runtime is built by hand instead of with #[tokio::main].
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Hello Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;

    // Override with CLI arguments if provided
    if let Some(username) = args.username {
        config.hello.username = username;
    }
    if let Some(password) = args.password {
        config.hello.password = secrecy::SecretString::from(password);
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }

    if let Err(e) = config.validate() {
        error!("Error in configuration: {}", e);
        std::process::exit(1);
    }

    info!("Configuration loaded successfully");
    info!("Login as {}", config.hello.username);

    let client = Arc::new(HelloClient::new(config.hello.clone())?);
    let registry = Arc::new(Registry::new());
    ScrapeCollector::register(&registry, client)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    // Start the metrics server
    if let Err(e) = runtime.block_on(server::start(&config.server.addr, registry)) {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
