//! Axum HTTP handlers for the contract gateway endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::state::{RegistryError, SharedRegistry};
use crate::types::*;

/// Custom error type for handlers
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        (status, message).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let message = err.to_string();
        match err {
            RegistryError::UnknownAsset(_) => ApiError::NotFound(message),
            RegistryError::OwnerMismatch { .. } => ApiError::BadRequest(message),
            RegistryError::NotForSale(_) | RegistryError::Duplicate(_) => {
                ApiError::Conflict(message)
            }
        }
    }
}

async fn record_contract(registry: &SharedRegistry, query: ContractQuery) {
    if let Some(contract) = &query.contract {
        log::debug!("Request addressed to contract {}", contract);
    }
    registry.write().await.record_contract(query.contract);
}

/// GET /listings
/// viewAllRealEstateListings()
pub async fn get_all_listings(
    State(registry): State<SharedRegistry>,
    Query(query): Query<ContractQuery>,
) -> Json<Vec<ListedAsset>> {
    record_contract(&registry, query).await;
    Json(registry.read().await.all_listings())
}

/// GET /owners/{account}/listings
/// viewOwnerRealEstates(account)
pub async fn get_owner_listings(
    State(registry): State<SharedRegistry>,
    Path(account): Path<String>,
    Query(query): Query<ContractQuery>,
) -> Json<Vec<ListedAsset>> {
    record_contract(&registry, query).await;
    Json(registry.read().await.owned_by(&account))
}

/// POST /purchases
/// buyRealEstate(id, ownerId) from buyer; answers before confirmation
pub async fn submit_purchase(
    State(registry): State<SharedRegistry>,
    Query(query): Query<ContractQuery>,
    Json(req): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError> {
    let mut registry = registry.write().await;
    registry.record_contract(query.contract);
    let response = registry.submit_purchase(req)?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

// ============================================================================
// DEV HELPER ENDPOINTS (not part of the contract interface)
// ============================================================================

/// POST /dev/listings
/// Seed a holding
pub async fn seed_listing(
    State(registry): State<SharedRegistry>,
    Json(holding): Json<Holding>,
) -> Result<(StatusCode, Json<ListedAsset>), ApiError> {
    if holding.account.is_empty() {
        return Err(ApiError::BadRequest("account must not be empty".to_string()));
    }
    let asset = holding.asset.clone();
    registry.write().await.list(holding)?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// POST /dev/confirm
/// Apply every pending purchase
pub async fn confirm_pending(State(registry): State<SharedRegistry>) -> Json<ConfirmResponse> {
    let response = registry.write().await.confirm_pending();
    log::info!(
        "Confirmed {} purchase(s), rejected {}",
        response.confirmed.len(),
        response.rejected.len()
    );
    Json(response)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
