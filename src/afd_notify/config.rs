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

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, io::Error),
    Decode(PathBuf, serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "unable to read {}: {}", path.display(), e),
            Self::Decode(path, e) => write!(f, "malformed JSON in {}: {}", path.display(), e),
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(_, e) => Some(e),
            Self::Decode(_, e) => Some(e),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Users {
    #[serde(alias = "users")]
    pub users: Vec<User>,
}

/// A subscriber: who they are, where to text them, which forecast office
/// their discussions come from, and which sections they want.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    #[serde(alias = "id")]
    pub id: u64,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    #[serde(alias = "locationId")]
    pub location_id: String,
    #[serde(alias = "phone")]
    pub phone: String,
    #[serde(alias = "subscriptions")]
    pub subscriptions: Vec<String>,
}

/// Twilio account credentials and the number messages are sent from.
///
/// The aliases accept the misspelled `twillio` prefixed keys used by
/// config files written for earlier versions of this tool.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TwilioConfig {
    #[serde(alias = "accountSid", alias = "twillioAccountSID")]
    pub account_sid: String,
    #[serde(alias = "authToken", alias = "twillioAuthToken")]
    pub auth_token: String,
    #[serde(alias = "fromPhone", alias = "twillioFromPhone")]
    pub from_phone: String,
}

pub fn load_users<P: AsRef<Path>>(path: P) -> Result<Users, ConfigError> {
    load_json(path.as_ref())
}

pub fn load_twilio<P: AsRef<Path>>(path: P) -> Result<TwilioConfig, ConfigError> {
    load_json(path.as_ref())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let bytes = fs::read(path).map_err(|e| ConfigError::Io(path.to_owned(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| ConfigError::Decode(path.to_owned(), e))
}
