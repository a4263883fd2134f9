//! HTTP API for the Keygate license server.
//!
//! Thin plumbing over [`keygate_engine::LicenseEngine`]: each route
//! deserializes a request, calls one engine operation, and maps the
//! outcome to the status/message envelope the desktop client already
//! speaks. No entitlement decisions are made here.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use keygate_engine::{
    ActivateOutcome, CreateLicense, DeactivateOutcome, EngineError, LicenseEngine, VerifyOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

// ── Request shapes ───────────────────────────────────────────────

/// Body of the activate, verify, and deactivate routes.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ActivationRequest {
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub hwid: String,
}

/// Body of the create_license route.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateLicenseRequest {
    #[serde(default)]
    pub customer: String,
    /// Expiry date as `YYYY-MM-DD`.
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub max_activations: Option<u32>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Body of the delete_license route.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeleteLicenseRequest {
    #[serde(default)]
    pub license_key: String,
}

/// Admin credential, carried as the `key` query parameter.
#[derive(Deserialize, Debug)]
pub struct AdminKeyQuery {
    #[serde(default)]
    pub key: String,
}

// ── Response shapes ──────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ActivateResponse {
    pub status: String,
    pub message: String,
    pub expiry: NaiveDate,
    pub customer: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VerifyResponse {
    pub status: String,
    pub message: String,
    pub customer: String,
    pub product: String,
    pub version: String,
    pub expiry: NaiveDate,
    pub activated_hwids: Vec<String>,
    pub max_activations: u32,
    pub activations_used: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeactivateResponse {
    pub status: String,
    pub message: String,
    pub remaining_activations: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreateLicenseResponse {
    pub status: String,
    pub message: String,
    pub license_key: String,
}

/// Build the HTTP API router over an engine.
pub fn build_router(engine: Arc<LicenseEngine>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/activate", post(activate_handler))
        .route("/verify", post(verify_handler))
        .route("/deactivate", post(deactivate_handler))
        .route("/create_license", post(create_license_handler))
        .route("/delete_license", post(delete_license_handler))
        .with_state(engine)
}

// ── Handlers ─────────────────────────────────────────────────────

async fn home_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        message: "License server is online".to_string(),
    })
}

async fn activate_handler(
    State(engine): State<Arc<LicenseEngine>>,
    Json(request): Json<ActivationRequest>,
) -> Response {
    match engine.activate(&request.license_key, &request.hwid).await {
        Ok(
            ActivateOutcome::Activated { customer, expiry }
            | ActivateOutcome::AlreadyActive { customer, expiry },
        ) => ok_json(ActivateResponse {
            status: "ok".to_string(),
            message: "License activated successfully".to_string(),
            expiry,
            customer,
        }),
        Ok(ActivateOutcome::LimitReached) => {
            error_json(StatusCode::FORBIDDEN, "Activation limit reached")
        }
        Ok(ActivateOutcome::Expired) => error_json(StatusCode::FORBIDDEN, "License expired"),
        Err(err) => engine_error(err),
    }
}

async fn verify_handler(
    State(engine): State<Arc<LicenseEngine>>,
    Json(request): Json<ActivationRequest>,
) -> Response {
    match engine.verify(&request.license_key, &request.hwid).await {
        Ok(VerifyOutcome::Valid { summary, .. }) => ok_json(VerifyResponse {
            status: "ok".to_string(),
            message: "License verified successfully".to_string(),
            customer: summary.customer,
            product: summary.product,
            version: summary.version,
            expiry: summary.expiry,
            activated_hwids: summary
                .activated_hwids
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_activations: summary.max_activations,
            activations_used: summary.activations_used,
        }),
        Ok(VerifyOutcome::NotEnrolled) => error_json(
            StatusCode::FORBIDDEN,
            "Device not activated for this license",
        ),
        Ok(VerifyOutcome::LimitReached) => error_json(
            StatusCode::FORBIDDEN,
            "Activation limit reached. Please deactivate another device first.",
        ),
        Ok(VerifyOutcome::Expired) => error_json(StatusCode::FORBIDDEN, "License expired"),
        Err(err) => engine_error(err),
    }
}

async fn deactivate_handler(
    State(engine): State<Arc<LicenseEngine>>,
    Json(request): Json<ActivationRequest>,
) -> Response {
    match engine.deactivate(&request.license_key, &request.hwid).await {
        Ok(DeactivateOutcome::Deactivated { remaining }) => ok_json(DeactivateResponse {
            status: "ok".to_string(),
            message: format!("Device {} removed successfully.", request.hwid),
            remaining_activations: remaining,
        }),
        Ok(DeactivateOutcome::NotActive) => error_json(
            StatusCode::NOT_FOUND,
            "HWID not found under this license.",
        ),
        Err(err) => engine_error(err),
    }
}

async fn create_license_handler(
    State(engine): State<Arc<LicenseEngine>>,
    Query(admin): Query<AdminKeyQuery>,
    Json(request): Json<CreateLicenseRequest>,
) -> Response {
    let Ok(expiry) = NaiveDate::parse_from_str(request.expiry.trim(), "%Y-%m-%d") else {
        return error_json(StatusCode::BAD_REQUEST, "missing or invalid expiry");
    };

    let create = CreateLicense {
        customer: request.customer,
        expiry,
        max_activations: request.max_activations,
        product: request.product,
        version: request.version,
    };
    match engine.create_license(&admin.key, create).await {
        Ok(created) => ok_json(CreateLicenseResponse {
            status: "ok".to_string(),
            message: "License created successfully".to_string(),
            license_key: created.license_id.to_string(),
        }),
        Err(err) => engine_error(err),
    }
}

async fn delete_license_handler(
    State(engine): State<Arc<LicenseEngine>>,
    Query(admin): Query<AdminKeyQuery>,
    Json(request): Json<DeleteLicenseRequest>,
) -> Response {
    match engine.delete_license(&admin.key, &request.license_key).await {
        Ok(()) => ok_json(StatusResponse {
            status: "ok".to_string(),
            message: format!("License '{}' deleted successfully.", request.license_key),
        }),
        Err(EngineError::NotFound(id)) => error_json(
            StatusCode::NOT_FOUND,
            format!("License '{id}' not found"),
        ),
        Err(err) => engine_error(err),
    }
}

// ── Response helpers ─────────────────────────────────────────────

fn ok_json<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    let body = StatusResponse {
        status: "error".to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

fn engine_error(err: EngineError) -> Response {
    match &err {
        EngineError::InvalidInput(_) => error_json(StatusCode::BAD_REQUEST, err.to_string()),
        EngineError::NotFound(_) => error_json(StatusCode::NOT_FOUND, "Invalid license key"),
        EngineError::Unauthorized => error_json(StatusCode::FORBIDDEN, "Unauthorized request"),
        EngineError::StoreUnavailable(detail) => {
            warn!("request failed on storage: {}", detail);
            error_json(
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage temporarily unavailable, please retry",
            )
        }
        EngineError::KeyspaceExhausted(_) => {
            warn!("license key generation exhausted its attempts");
            error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not allocate a license key",
            )
        }
    }
}
