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

use crate::client::{ClientError, ProductsClient};
use crate::config::User;
use crate::notify::SmsClient;
use crate::section::{self, SectionError};

/// Result of running the extractor for one subscription, in subscription order.
#[derive(Debug)]
pub struct ResolvedSection {
    pub name: String,
    pub outcome: Result<String, SectionError>,
}

/// What happened for a single user during a batch run.
///
/// A fetch failure for the user's base discussion is fatal for that user
/// only. Section misses and delivery failures are counted per user and
/// never stop the batch.
#[derive(Debug)]
pub enum UserOutcome {
    FetchFailed(ClientError),
    Processed { sent: usize, missing: usize, failed: usize },
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<(u64, UserOutcome)>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| match outcome {
            UserOutcome::FetchFailed(_) => true,
            UserOutcome::Processed { missing, failed, .. } => *missing > 0 || *failed > 0,
        })
    }
}

/// Fetch the latest discussion for a user's forecast office once and run the
/// extractor for each of their subscriptions against it.
pub async fn resolve_sections(client: &ProductsClient, user: &User) -> Result<Vec<ResolvedSection>, ClientError> {
    let product = client.latest_discussion(&user.location_id).await?;
    tracing::debug!(
        message = "fetched forecast discussion",
        product = %product.id,
        location = %user.location_id,
    );

    Ok(user
        .subscriptions
        .iter()
        .map(|name| ResolvedSection {
            name: name.clone(),
            outcome: section::extract_section(&product.product_text, name),
        })
        .collect())
}

/// Process every user sequentially, delivering one SMS per extracted section.
pub async fn run(products: &ProductsClient, sms: &SmsClient, users: &[User]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for user in users {
        let resolved = match resolve_sections(products, user).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::error!(
                    message = "unable to fetch discussion for user",
                    user = user.id,
                    location = %user.location_id,
                    error = %e,
                );
                summary.outcomes.push((user.id, UserOutcome::FetchFailed(e)));
                continue;
            }
        };

        let mut sent = 0;
        let mut missing = 0;
        let mut failed = 0;

        for section in resolved {
            let text = match section.outcome {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        message = "subscribed section missing from discussion",
                        user = user.id,
                        section = %section.name,
                        error = %e,
                    );
                    missing += 1;
                    continue;
                }
            };

            match sms.send(&user.phone, &text).await {
                Ok(()) => {
                    tracing::info!(message = "delivered section", user = user.id, section = %section.name);
                    sent += 1;
                }
                Err(e) => {
                    tracing::error!(
                        message = "unable to deliver section",
                        user = user.id,
                        section = %section.name,
                        error = %e,
                    );
                    failed += 1;
                }
            }
        }

        summary.outcomes.push((user.id, UserOutcome::Processed { sent, missing, failed }));
    }

    summary
}
