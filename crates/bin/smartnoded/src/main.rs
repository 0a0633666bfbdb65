//! # smartnoded: smartnode daemon
//!
//! Serves one observable resource until SIGINT or SIGTERM, then
//! unregisters it and exits after the shutdown grace delay.

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use smartnoded::cli::Cli;
use smartnoded::config::Config;
use smartnoded::node;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let profile = config.resource.profile;
    let transport = node::transport(profile);
    let node = node::start(&config, &transport).await?;

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, ?profile, "smartnoded listening");

    tokio::select! {
        result = axum::serve(listener, transport.router()).into_future() => {
            if let Err(err) = result {
                tracing::error!(error = %err, "http server stopped");
            }
        }
        () = shutdown_signal() => {}
    }

    node.shutdown().await;
    tracing::info!("smartnoded stopped");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!(signal = "SIGINT", "shutdown requested"),
        () = terminate => tracing::info!(signal = "SIGTERM", "shutdown requested"),
    }
}
