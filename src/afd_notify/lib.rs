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

//! SMS delivery of NWS forecast discussion sections via api.weather.gov
//!
//! ## Features
//!
//! `afd_notify` fetches the latest Area Forecast Discussion issued by a [NWS forecast office]
//! using the [api.weather.gov] API, slices the named sections out of its free-text body
//! (`SYNOPSIS`, `MARINE`, `AVIATION`, and so on), and texts each section a user subscribes
//! to their phone via the [Twilio] Messages API. It runs as a batch job: one pass over the
//! configured users, one SMS per subscribed section, then exit.
//!
//! Discussions are free text with in-band markers: a section starts with a header like
//! `.SYNOPSIS...` and ends at the `&&` terminator. Extracted sections have their
//! forced line wrapping undone and their whitespace cleaned up before delivery so they
//! read sensibly as a text message.
//!
//! [NWS forecast office]: https://www.weather.gov/srh/nwsoffices
//! [api.weather.gov]: https://www.weather.gov/documentation/services-web-api
//! [Twilio]: https://www.twilio.com/docs/sms/api
//!
//! ## Build
//!
//! `afd_notify` is a Rust program and must be built from source using a [Rust toolchain](https://rustup.rs/).
//!
//! ```text
//! git clone git@github.com:56quarters/afd_notify.git && cd afd_notify
//! cargo build --release
//! ```
//!
//! ## Usage
//!
//! ### Picking a forecast office
//!
//! Discussions are fetched per forecast office. You can list the offices that issue
//! AFD products using the API itself, for example with `curl`:
//!
//! ```text
//! curl -sS 'https://api.weather.gov/products/types/afd/locations' | jq | less
//! ```
//!
//! `BOX` is the office ID for Boston/Norton MA. Each user's `locationId` in the users
//! file selects the office their discussions come from.
//!
//! ### Users
//!
//! Users and their section subscriptions are read from a JSON document, `users.json`
//! by default:
//!
//! ```json
//! {
//!   "users": [
//!     {
//!       "id": 1,
//!       "firstName": "Ada",
//!       "lastName": "Lovelace",
//!       "locationId": "BOX",
//!       "phone": "+16175551234",
//!       "subscriptions": ["synopsis", "marine"]
//!     }
//!   ]
//! }
//! ```
//!
//! ### Twilio credentials
//!
//! Twilio account credentials are read from a second JSON document, `config.json`
//! by default:
//!
//! ```json
//! {
//!   "accountSid": "ACXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX",
//!   "authToken": "your_auth_token",
//!   "fromPhone": "+16175550000"
//! }
//! ```
//!
//! ### Run
//!
//! ```text
//! ./afd_notify --users users.json --twilio-config config.json
//! ```
//!
//! The batch runs to completion even when individual users fail: a user whose
//! discussion cannot be fetched is skipped, a subscribed section missing from the
//! discussion is logged, and a failed send does not stop the remaining sends.
//!

pub mod batch;
pub mod client;
pub mod config;
pub mod notify;
pub mod section;
