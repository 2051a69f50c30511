use afd_notify::client::{ClientError, ProductsClient};
use httpmock::prelude::*;
use reqwest::Client;
use serde_json::json;

fn listing_body() -> serde_json::Value {
    json!({
        "@graph": [
            {
                "id": "afdbox1750",
                "wmoCollectiveId": "FXUS61",
                "issuingOffice": "KBOX",
                "issuanceTime": "2025-08-07T17:50:00+00:00",
                "productCode": "AFD",
                "productName": "Area Forecast Discussion"
            },
            {
                "id": "afdbox0744",
                "wmoCollectiveId": "FXUS61",
                "issuingOffice": "KBOX",
                "issuanceTime": "2025-08-07T07:44:00+00:00",
                "productCode": "AFD",
                "productName": "Area Forecast Discussion"
            }
        ]
    })
}

fn detail_body() -> serde_json::Value {
    json!({
        "id": "afdbox1750",
        "wmoCollectiveId": "FXUS61",
        "issuingOffice": "KBOX",
        "issuanceTime": "2025-08-07T17:50:00+00:00",
        "productCode": "AFD",
        "productName": "Area Forecast Discussion",
        "productText": ".SYNOPSIS...High pressure builds offshore tonight.\n\n&&\n"
    })
}

#[tokio::test]
async fn test_latest_discussion_fetches_first_listed_product() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET)
            .path("/products/types/afd/locations/BOX")
            .header("accept", "application/geo+json");
        then.status(200)
            .header("content-type", "application/geo+json")
            .json_body(listing_body());
    });
    let detail = server.mock(|when, then| {
        when.method(GET)
            .path("/products/afdbox1750")
            .header("accept", "application/geo+json");
        then.status(200)
            .header("content-type", "application/geo+json")
            .json_body(detail_body());
    });

    let client = ProductsClient::new(Client::new(), &server.base_url());
    let product = client.latest_discussion("BOX").await.unwrap();

    listing.assert();
    detail.assert();
    assert_eq!(product.id, "afdbox1750");
    assert_eq!(product.issuing_office, "KBOX");
    assert!(product.product_text.contains(".SYNOPSIS..."));
}

#[tokio::test]
async fn test_latest_discussion_empty_listing() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET).path("/products/types/afd/locations/XYZ");
        then.status(200)
            .header("content-type", "application/geo+json")
            .json_body(json!({ "@graph": [] }));
    });

    let client = ProductsClient::new(Client::new(), &server.base_url());
    let res = client.latest_discussion("XYZ").await;

    listing.assert();
    assert!(matches!(res, Err(ClientError::NoProducts(ref loc)) if loc == "XYZ"));
}

#[tokio::test]
async fn test_products_non_success_preserves_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/products/types/afd/locations/BOX");
        then.status(503).body("upstream maintenance window");
    });

    let client = ProductsClient::new(Client::new(), &server.base_url());
    let res = client.products("afd", "BOX").await;

    match res {
        Err(ClientError::Remote(status, body)) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "upstream maintenance window");
        }
        other => panic!("expected ClientError::Remote, got {:?}", other),
    }
}

#[tokio::test]
async fn test_product_malformed_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/products/afdbox1750");
        then.status(200).body("<html>definitely not geojson</html>");
    });

    let client = ProductsClient::new(Client::new(), &server.base_url());
    let res = client.product("afdbox1750").await;

    assert!(matches!(res, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn test_listing_accepts_products_key() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/products/types/afd/locations/BOX");
        then.status(200)
            .header("content-type", "application/geo+json")
            .json_body(json!({ "products": listing_body()["@graph"] }));
    });

    let client = ProductsClient::new(Client::new(), &server.base_url());
    let listing = client.products("afd", "BOX").await.unwrap();

    assert_eq!(listing.products.len(), 2);
    assert_eq!(listing.products[0].id, "afdbox1750");
}
