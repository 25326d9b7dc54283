mod cli;
mod config;
mod error;
mod handlers;
mod ledger;
mod medicover;
mod models;
mod notify;
#[cfg(test)]
mod stub_server;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{CheckSettings, ConfigMap, MedicoverSettings, expand_home};
use crate::error::MedisnipError;
use crate::handlers::check::check_slots;
use crate::handlers::list::list_codes;
use crate::medicover::{MedicoverClient, MedicoverSession};
use crate::notify::PushoverNotifier;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("MediSnip - Medicover Appointment Sniper");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = expand_home(&cli.config);
    let config = ConfigMap::load(&config_path)
        .map_err(MedisnipError::Config)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let medicover = MedicoverSettings::from_config(&config)
        .map_err(MedisnipError::Config)
        .context("reading Medicover settings")?;

    // resolve check settings before logging in so bad config never hits the network
    let check = if cli.list {
        None
    } else {
        let settings = CheckSettings::from_config(&config)
            .map_err(MedisnipError::Config)
            .context("reading check settings")?;
        Some(settings)
    };

    let session = login(&medicover)
        .await
        .with_context(|| format!("logging in to {}", medicover.api_url))?;

    match check {
        None => {
            let locators = list_codes(&session)
                .await
                .context("listing doctor locators")?;
            info!(count = locators.len(), "listed doctor locators");
        }
        Some(settings) => {
            let notifier = PushoverNotifier::new(
                settings.pushover.api_url.clone(),
                settings.pushover.api_token.clone(),
                settings.pushover.user_key.clone(),
            )
            .context("setting up Pushover client")?;
            check_slots(&session, &notifier, &settings, Local::now().naive_local())
                .await
                .with_context(|| format!("checking slots for {}", settings.selector))?;
        }
    }

    Ok(())
}

async fn login(settings: &MedicoverSettings) -> Result<MedicoverSession, MedisnipError> {
    let client = MedicoverClient::new(settings.api_url.clone()).map_err(MedisnipError::Auth)?;
    info!(api = %settings.api_url, "MediSnip client initialized");

    let session = client
        .login(&settings.card_id, &settings.password)
        .await
        .map_err(MedisnipError::Auth)?;
    info!(person_id = ?session.person_id(), "session ready");
    Ok(session)
}
