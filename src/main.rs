use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use game_light::config::{Config, Mode};
use game_light::espn::EspnClient;
use game_light::kasa::KasaBulb;
use game_light::scheduler::Services;
use game_light::supervisor;
use game_light::timing::SystemClock;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("loading configuration")?;
    let display_tz = config.timezone().context("resolving display timezone")?;
    let timing = config.timing;

    let services = Services {
        provider: Arc::new(EspnClient::new(
            config.espn_base_url.clone(),
            timing.request_timeout(),
            timing.lookback(),
        )),
        light: Arc::new(KasaBulb::new(
            config.bulb.host.clone(),
            config.bulb.port,
            timing.request_timeout(),
        )),
        clock: Arc::new(SystemClock),
    };

    info!(
        mode = ?config.mode,
        bulb = %config.bulb.host,
        teams = config.teams.len(),
        "Starting game light"
    );

    match config.mode {
        Mode::FlashTest => {
            // validate() guarantees at least one team
            if let Some(team) = config.teams.first() {
                supervisor::flash_test(team, &services, &timing).await;
            }
        }
        Mode::Monitor => {
            tokio::select! {
                _ = supervisor::run_all(config.teams, services, timing, display_tz) => {
                    error!("Schedulers exited unexpectedly");
                }
                _ = shutdown_signal() => {
                    info!("Shutdown requested");
                }
            }
        }
    }

    Ok(())
}

/// Plain fmt output, `info` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
