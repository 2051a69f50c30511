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

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    Transport(reqwest::Error),
    Remote(StatusCode, String),
    Decode(serde_json::Error),
    NoProducts(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{}", e),
            Self::Remote(status, body) => write!(f, "unexpected status {}: {}", status, body),
            Self::Decode(e) => write!(f, "malformed response body: {}", e),
            Self::NoProducts(location) => write!(f, "no discussions issued for {}", location),
        }
    }
}

impl error::Error for ClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// Client for the text product endpoints of the Weather.gov API.
///
/// Products are issued per forecast office and listed most-recent-first.
/// Every call is a single attempt against the API, no retries or caching.
#[derive(Debug)]
pub struct ProductsClient {
    client: Client,
    base_url: Url,
}

impl ProductsClient {
    const USER_AGENT: &'static str = "afd_notify (https://github.com/56quarters/afd_notify)";
    const JSON_RESPONSE: &'static str = "application/geo+json";
    const DISCUSSION_CODE: &'static str = "afd";

    pub fn new(client: Client, base_url: &str) -> Self {
        ProductsClient {
            client,
            // TODO(56quarters): Handle this better
            base_url: Url::parse(base_url).unwrap(),
        }
    }

    /// Fetch the most recently issued Area Forecast Discussion for a forecast office.
    ///
    /// Lists AFD products for the office and fetches the full text of the first
    /// entry. Fails with `ClientError::NoProducts` if the office has none.
    pub async fn latest_discussion(&self, location_id: &str) -> Result<Product, ClientError> {
        let listing = self.products(Self::DISCUSSION_CODE, location_id).await?;
        let latest = listing
            .products
            .first()
            .ok_or_else(|| ClientError::NoProducts(location_id.to_owned()))?;

        self.product(&latest.id).await
    }

    pub async fn products(&self, product_type: &str, location_id: &str) -> Result<ProductListing, ClientError> {
        let request_url = self.products_url(product_type, location_id);
        tracing::debug!(message = "making product listing request", url = %request_url);

        self.make_request(request_url).await
    }

    pub async fn product(&self, product_id: &str) -> Result<Product, ClientError> {
        let request_url = self.product_url(product_id);
        tracing::debug!(message = "making product detail request", url = %request_url);

        self.make_request(request_url).await
    }

    async fn make_request<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let res = self
            .client
            .get(url)
            .header(USER_AGENT, Self::USER_AGENT)
            .header(ACCEPT, Self::JSON_RESPONSE)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(ClientError::Transport)?;
        if !status.is_success() {
            return Err(ClientError::Remote(status, body));
        }

        serde_json::from_str(&body).map_err(ClientError::Decode)
    }

    fn products_url(&self, product_type: &str, location_id: &str) -> Url {
        let encoded_type = utf8_percent_encode(product_type, NON_ALPHANUMERIC);
        let encoded_location = utf8_percent_encode(location_id, NON_ALPHANUMERIC);
        let mut url = self.base_url.clone();
        {
            url.path_segments_mut()
                .map(|mut p| {
                    p.clear()
                        .push("products")
                        .push("types")
                        .push(&encoded_type.to_string())
                        .push("locations")
                        .push(&encoded_location.to_string());
                })
                .expect("unable to modify product listing URL path segments");
        }

        url
    }

    fn product_url(&self, product_id: &str) -> Url {
        let encoded_id = utf8_percent_encode(product_id, NON_ALPHANUMERIC);
        let mut url = self.base_url.clone();
        {
            url.path_segments_mut()
                .map(|mut p| {
                    p.clear().push("products").push(&encoded_id.to_string());
                })
                .expect("unable to modify product detail URL path segments");
        }

        url
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProductListing {
    #[serde(alias = "@graph")]
    pub products: Vec<ProductSummary>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ProductSummary {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "wmoCollectiveId")]
    pub wmo_collective_id: Option<String>,
    #[serde(alias = "issuingOffice")]
    pub issuing_office: String,
    #[serde(alias = "issuanceTime")]
    pub issuance_time: String,
    #[serde(alias = "productCode")]
    pub product_code: String,
    #[serde(alias = "productName")]
    pub product_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Product {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "wmoCollectiveId")]
    pub wmo_collective_id: Option<String>,
    #[serde(alias = "issuingOffice")]
    pub issuing_office: String,
    #[serde(alias = "issuanceTime")]
    pub issuance_time: String,
    #[serde(alias = "productCode")]
    pub product_code: String,
    #[serde(alias = "productName")]
    pub product_name: String,
    #[serde(alias = "productText")]
    pub product_text: String,
}
