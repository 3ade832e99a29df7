/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::{sync::Arc, time::Duration};

use clap::Parser;
use s3_maildrop::{config::Cli, Session};
use tokio::{net::TcpListener, sync::watch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let bind_addr = (cli.bind, cli.port);
    let core = Arc::new(cli.into_core().unwrap_or_else(|err| {
        eprintln!("Configuration error: {err}");
        std::process::exit(1);
    }));

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(address = %listener.local_addr()?, "POP3 listener started");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, remote_addr)) => {
                        tracing::info!(remote = %remote_addr, "connection accepted");
                        let session =
                            Session::new(core.clone(), stream, remote_addr.ip(), shutdown_rx.clone());
                        tokio::spawn(session.run());
                    }
                    Err(err) => {
                        tracing::warn!(reason = %err, "failed to accept connection");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    // Let sessions observe the shutdown and write their goodbye line.
    shutdown_tx.send(true).ok();
    tokio::time::sleep(Duration::from_secs(1)).await;

    Ok(())
}
