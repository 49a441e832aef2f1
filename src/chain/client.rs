use serde::de::DeserializeOwned;

use super::{PurchaseReceipt, PurchaseRequest, RealEstateContract};
use crate::asset::Asset;
use crate::config::MarketplaceConfig;
use crate::error::ChainError;

/// HTTP client for the contract gateway
///
/// Endpoints:
/// - `GET  /listings`
/// - `GET  /owners/{account}/listings`
/// - `POST /purchases`
#[derive(Clone, Debug)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    contract_address: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            contract_address: None,
        }
    }

    pub fn from_config(config: &MarketplaceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
            contract_address: config.contract_address.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended by percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, ChainError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ChainError::Transport(format!("invalid gateway url {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ChainError::Transport(format!("gateway url {} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.contract_address {
            Some(address) => builder.query(&[("contract", address.as_str())]),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ChainError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ChainError::Decode(e.to_string()))
    }
}

impl RealEstateContract for GatewayClient {
    async fn view_owner_real_estates(&self, account: &str) -> Result<Vec<Asset>, ChainError> {
        log::debug!("viewOwnerRealEstates({})", account);
        let url = self.endpoint(&["owners", account, "listings"])?;
        self.send_json(self.request(reqwest::Method::GET, url)).await
    }

    async fn view_all_real_estate_listings(&self) -> Result<Vec<Asset>, ChainError> {
        log::debug!("viewAllRealEstateListings()");
        let url = self.endpoint(&["listings"])?;
        self.send_json(self.request(reqwest::Method::GET, url)).await
    }

    async fn buy_real_estate(&self, request: PurchaseRequest) -> Result<PurchaseReceipt, ChainError> {
        log::debug!(
            "buyRealEstate({}, {}) from {}",
            request.id,
            request.owner_id,
            request.buyer
        );
        let url = self.endpoint(&["purchases"])?;
        self.send_json(self.request(reqwest::Method::POST, url).json(&request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalised() {
        let client = GatewayClient::new("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_account_is_percent_encoded() {
        let client = GatewayClient::new("http://localhost:3001/");
        let url = client.endpoint(&["owners", "0x/a?b#c", "listings"]).unwrap();
        assert_eq!(url.path(), "/owners/0x%2Fa%3Fb%23c/listings");
        assert_eq!(url.query(), None);

        let nested = GatewayClient::new("http://localhost:3001/gateway");
        let url = nested.endpoint(&["listings"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/gateway/listings");
    }

    #[tokio::test]
    async fn test_invalid_gateway_url_is_transport_error() {
        let client = GatewayClient::new("not a url");
        let result = client.view_owner_real_estates("0xa").await;
        assert!(matches!(result, Err(ChainError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client = GatewayClient::new("http://127.0.0.1:9");
        let result = client.view_all_real_estate_listings().await;
        assert!(matches!(result, Err(ChainError::Transport(_))));
    }
}
