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

use crate::config::TwilioConfig;
use reqwest::{Client, StatusCode, Url};
use std::error;
use std::fmt;

#[derive(Debug)]
pub enum NotifyError {
    Transport(reqwest::Error),
    Remote(StatusCode, String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{}", e),
            Self::Remote(status, body) => write!(f, "unexpected status {}: {}", status, body),
        }
    }
}

impl error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

/// Client for the Twilio Messages API, sending one SMS per call.
pub struct SmsClient {
    client: Client,
    base_url: Url,
    account_sid: String,
    auth_token: String,
    from_phone: String,
}

impl SmsClient {
    const API_VERSION: &'static str = "2010-04-01";

    pub fn new(client: Client, base_url: &str, config: &TwilioConfig) -> Self {
        SmsClient {
            client,
            // TODO(56quarters): Handle this better
            base_url: Url::parse(base_url).unwrap(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_phone: config.from_phone.clone(),
        }
    }

    /// Send a single SMS to the given number. Any 2xx response counts as
    /// accepted; everything else fails with the response body preserved.
    pub async fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let request_url = self.messages_url();
        tracing::debug!(message = "making send message request", url = %request_url, to = %to);

        let params = [("From", self.from_phone.as_str()), ("To", to), ("Body", body)];
        let res = self
            .client
            .post(request_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = res.text().await.map_err(NotifyError::Transport)?;
            Err(NotifyError::Remote(status, body))
        }
    }

    fn messages_url(&self) -> Url {
        let mut url = self.base_url.clone();
        {
            url.path_segments_mut()
                .map(|mut p| {
                    p.clear()
                        .push(Self::API_VERSION)
                        .push("Accounts")
                        .push(&self.account_sid)
                        .push("Messages.json");
                })
                .expect("unable to modify message URL path segments");
        }

        url
    }
}
