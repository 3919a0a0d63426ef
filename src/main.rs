use anyhow::Context;
use clap::Parser;
use kagami::config::Config;
use kagami::proxy::ImageProxy;
use pingora_core::server::configuration::Opt;
use pingora_core::server::Server;
use pingora_core::services::listening::Service;
use std::path::PathBuf;

/// Kagami - URL-driven image transformation server built with Cloudflare's Pingora
#[derive(Parser, Debug)]
#[command(name = "kagami")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Build the configuration from environment variables instead of a file
    #[arg(long)]
    from_env: bool,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Upgrade workers gracefully
    #[arg(long)]
    upgrade: bool,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let config = if args.from_env {
        Config::from_env()
    } else {
        Config::from_file(&args.config)
    }
    .map_err(anyhow::Error::msg)
    .context("Failed to load configuration")?;

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    kagami::logging::init_subscriber(&config.logging)
        .map_err(anyhow::Error::msg)
        .context("Failed to initialize logging subsystem")?;

    tracing::info!(
        source = if args.from_env { "environment" } else { "file" },
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        backend = ?config.storage.backend,
        metrics_enabled = config.metrics.is_some(),
        "Configuration loaded successfully"
    );

    if args.test {
        tracing::info!("Configuration test passed");
        return Ok(());
    }

    // The S3 client is built before Pingora starts its own runtimes
    let bootstrap = tokio::runtime::Runtime::new().context("Failed to start bootstrap runtime")?;
    let proxy = bootstrap.block_on(ImageProxy::from_config(&config))?;

    let opt = Opt {
        daemon: args.daemon,
        test: args.test,
        upgrade: args.upgrade,
        ..Default::default()
    };

    let mut server = Server::new(Some(opt)).context("Failed to create Pingora server")?;
    server.bootstrap();

    let mut proxy_service = pingora_proxy::http_proxy_service(&server.configuration, proxy);
    proxy_service.threads = Some(config.server.threads);

    let listen_addr = config.server.listen_addr();
    proxy_service.add_tcp(&listen_addr);
    server.add_service(proxy_service);

    if let Some(metrics) = &config.metrics {
        let mut metrics_service = Service::prometheus_http_service();
        metrics_service.add_tcp(&metrics.address);
        server.add_service(metrics_service);
        tracing::info!(address = %metrics.address, "Prometheus metrics listener enabled");
    }

    tracing::info!(
        address = %listen_addr,
        threads = config.server.threads,
        "Starting Kagami image server"
    );

    // Blocks until shutdown
    server.run_forever();
}
