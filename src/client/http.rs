use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::client::{ClientError, ListingSource};
use crate::domain::filter::FilterState;
use crate::domain::listing::Listing;
use crate::dto::api::FailurePayload;
use crate::forms::listing::ListingForm;
use crate::forms::validation_message;

/// HTTP client for the `/api` routes.
#[derive(Clone, Debug)]
pub struct ListingsClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ListingsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Sends `token` as a bearer token on authenticated calls.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Runs the search described by `state` (first page unless
    /// `state.start_index` is set).
    pub async fn search(&self, state: &FilterState) -> Result<Vec<Listing>, ClientError> {
        self.search_query(&state.encode()).await
    }

    /// Runs a search with a raw query string, e.g. `offer=true&limit=4`.
    pub async fn search_query(&self, query: &str) -> Result<Vec<Listing>, ClientError> {
        let url = format!("{}?{}", self.url("/listing/get"), query.trim_start_matches('?'));
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    pub async fn get_listing(&self, id: i32) -> Result<Listing, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/listing/get/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    /// Validates the form locally and submits it; invalid forms never reach
    /// the server.
    pub async fn create_listing(&self, form: &ListingForm) -> Result<Listing, ClientError> {
        form.validate()
            .map_err(|errors| ClientError::Validation(validation_message(&errors)))?;

        let request = self.client.post(self.url("/listing/create")).json(form);
        let response = self.authorized(request).send().await?;
        decode(response).await
    }
}

impl ListingSource for ListingsClient {
    async fn fetch_page(&self, query: &str) -> Result<Vec<Listing>, ClientError> {
        self.search_query(query).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

/// Reads the failure payload, falling back to the raw body.
fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<FailurePayload>(body) {
        Ok(payload) => ClientError::Api {
            status: payload.status_code,
            message: payload.message,
        },
        Err(_) => ClientError::Api {
            status,
            message: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingType;

    #[test]
    fn failure_payload_is_decoded() {
        let err = api_error(
            404,
            r#"{"success":false,"statusCode":404,"message":"Listing not found!"}"#,
        );
        assert!(matches!(
            err,
            ClientError::Api { status: 404, message } if message == "Listing not found!"
        ));
    }

    #[test]
    fn plain_body_is_kept() {
        let err = api_error(502, "Bad Gateway\n");
        assert!(matches!(
            err,
            ClientError::Api { status: 502, message } if message == "Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn invalid_listing_is_rejected_before_sending() {
        // Nothing listens on the discard port; validation must fail first.
        let client = ListingsClient::new("http://127.0.0.1:9").unwrap();
        let form = ListingForm {
            name: "Loft with a private garden".to_string(),
            description: "Green".to_string(),
            address: "2 Park Ave".to_string(),
            listing_type: ListingType::Sale,
            bedrooms: 2,
            bathrooms: 1,
            kitchens: 1,
            regular_price: 300_000,
            discount_price: 350_000,
            offer: true,
            parking: false,
            furnished: false,
            image_urls: vec!["https://cdn.example.com/loft.png".to_string()],
        };

        let err = client.create_listing(&form).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(message) if message == "Discount price must be lower than regular price"
        ));
    }

    #[test]
    fn urls_are_built_under_api() {
        let client = ListingsClient::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.url("/listing/get/3"),
            "http://localhost:8080/api/listing/get/3"
        );
    }
}
