// afd_notify - SMS delivery of NWS forecast discussion sections
//
// Copyright 2023 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use afd_notify::batch::{self, UserOutcome};
use afd_notify::client::ProductsClient;
use afd_notify::config;
use afd_notify::notify::SmsClient;
use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::Level;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;
const DEFAULT_API_URL: &str = "https://api.weather.gov/";
const DEFAULT_TWILIO_URL: &str = "https://api.twilio.com/";

#[derive(Debug, Parser)]
#[clap(name = "afd_notify", version = clap::crate_version!())]
struct AfdNotifyApplication {
    /// Path to the JSON document listing users and their section subscriptions
    #[clap(long, default_value = "users.json")]
    users: PathBuf,

    /// Path to the JSON document with Twilio account credentials
    #[clap(long, default_value = "config.json")]
    twilio_config: PathBuf,

    /// Base URL for the Weather.gov API
    #[clap(long, default_value_t = DEFAULT_API_URL.into())]
    api_url: String,

    /// Base URL for the Twilio API
    #[clap(long, default_value_t = DEFAULT_TWILIO_URL.into())]
    twilio_url: String,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,

    /// Timeout for requests to the Weather.gov and Twilio APIs, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    timeout_millis: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = AfdNotifyApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    let users = config::load_users(&opts.users).unwrap_or_else(|e| {
        tracing::error!(message = "unable to load users", error = %e);
        process::exit(1)
    });

    let twilio = config::load_twilio(&opts.twilio_config).unwrap_or_else(|e| {
        tracing::error!(message = "unable to load Twilio configuration", error = %e);
        process::exit(1)
    });

    let timeout = Duration::from_millis(opts.timeout_millis);
    let http_client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });

    let products = ProductsClient::new(http_client.clone(), &opts.api_url);
    let sms = SmsClient::new(http_client, &opts.twilio_url, &twilio);

    tracing::info!(
        message = "starting delivery batch",
        num_users = users.users.len(),
        api_url = %opts.api_url,
    );

    let summary = batch::run(&products, &sms, &users.users).await;
    for (user, outcome) in &summary.outcomes {
        match outcome {
            UserOutcome::FetchFailed(e) => {
                tracing::warn!(message = "user skipped", user = *user, error = %e);
            }
            UserOutcome::Processed { sent, missing, failed } => {
                tracing::info!(
                    message = "user processed",
                    user = *user,
                    sent = *sent,
                    missing = *missing,
                    failed = *failed,
                );
            }
        }
    }

    tracing::info!(
        message = "delivery batch complete",
        num_users = summary.outcomes.len(),
        failures = summary.has_failures(),
    );

    Ok(())
}
