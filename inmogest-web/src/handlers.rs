//! HTTP request handlers
//!
//! Health check plus the agency resource that the authorization gate
//! protects. Storage is an in-memory map; persistence lives outside this
//! service's scope, but the handlers give the pipeline real endpoints to
//! guard.

use crate::{auth::CurrentUser, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as JsonExtractor,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, RwLock,
};
use tracing::info;

/// Health check response
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// A real-estate agency record.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: i64,
    pub nombre_comercial: String,
    pub razon_social: String,
    pub rfc_nit: String,
    pub telefono_principal: Option<String>,
    pub email_contacto: Option<String>,
    pub direccion_completa: Option<String>,
    pub ciudad: Option<String>,
    pub estado: Option<String>,
    pub codigo_postal: Option<String>,
    pub persona_contacto: Option<String>,
    pub fecha_registro: NaiveDate,
    pub estatus: String,
}

/// Payload for creating or updating an agency.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyRequest {
    pub nombre_comercial: String,
    pub razon_social: String,
    pub rfc_nit: String,
    pub telefono_principal: Option<String>,
    pub email_contacto: Option<String>,
    pub direccion_completa: Option<String>,
    pub ciudad: Option<String>,
    pub estado: Option<String>,
    pub codigo_postal: Option<String>,
    pub persona_contacto: Option<String>,
    pub estatus: Option<String>,
}

/// In-memory agency store shared through `AppState`.
#[derive(Debug, Clone, Default)]
pub struct AgencyStore {
    agencies: Arc<RwLock<HashMap<i64, Agency>>>,
    next_id: Arc<AtomicI64>,
}

impl AgencyStore {
    pub fn new() -> Self {
        Self {
            agencies: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn list(&self) -> Vec<Agency> {
        let agencies = self.agencies.read().expect("agency store poisoned");
        let mut all: Vec<Agency> = agencies.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        all
    }

    fn get(&self, id: i64) -> Option<Agency> {
        self.agencies
            .read()
            .expect("agency store poisoned")
            .get(&id)
            .cloned()
    }

    fn insert(&self, request: AgencyRequest) -> Agency {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let agency = Agency {
            id,
            nombre_comercial: request.nombre_comercial,
            razon_social: request.razon_social,
            rfc_nit: request.rfc_nit,
            telefono_principal: request.telefono_principal,
            email_contacto: request.email_contacto,
            direccion_completa: request.direccion_completa,
            ciudad: request.ciudad,
            estado: request.estado,
            codigo_postal: request.codigo_postal,
            persona_contacto: request.persona_contacto,
            fecha_registro: chrono::Utc::now().date_naive(),
            estatus: request.estatus.unwrap_or_else(|| "ACTIVE".to_string()),
        };
        self.agencies
            .write()
            .expect("agency store poisoned")
            .insert(id, agency.clone());
        agency
    }

    fn update(&self, id: i64, request: AgencyRequest) -> Option<Agency> {
        let mut agencies = self.agencies.write().expect("agency store poisoned");
        let existing = agencies.get_mut(&id)?;

        existing.nombre_comercial = request.nombre_comercial;
        existing.razon_social = request.razon_social;
        existing.rfc_nit = request.rfc_nit;
        existing.telefono_principal = request.telefono_principal;
        existing.email_contacto = request.email_contacto;
        existing.direccion_completa = request.direccion_completa;
        existing.ciudad = request.ciudad;
        existing.estado = request.estado;
        existing.codigo_postal = request.codigo_postal;
        existing.persona_contacto = request.persona_contacto;
        if let Some(estatus) = request.estatus {
            existing.estatus = estatus;
        }
        Some(existing.clone())
    }

    fn remove(&self, id: i64) -> bool {
        self.agencies
            .write()
            .expect("agency store poisoned")
            .remove(&id)
            .is_some()
    }
}

/// List all agencies
#[utoipa::path(
    get,
    path = "/api/v1/inmobiliarias",
    tag = "Agencies",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All agencies", body = [Agency]))
)]
pub async fn list_agencies(State(state): State<AppState>) -> Json<Vec<Agency>> {
    Json(state.agencies.list())
}

/// Get one agency by id
#[utoipa::path(
    get,
    path = "/api/v1/inmobiliarias/{id}",
    tag = "Agencies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The agency", body = Agency),
        (status = 404, description = "No such agency")
    )
)]
pub async fn get_agency(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Agency>, StatusCode> {
    state.agencies.get(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Create an agency
#[utoipa::path(
    post,
    path = "/api/v1/inmobiliarias",
    tag = "Agencies",
    security(("bearer_auth" = [])),
    request_body = AgencyRequest,
    responses((status = 201, description = "Created", body = Agency))
)]
pub async fn create_agency(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    JsonExtractor(request): JsonExtractor<AgencyRequest>,
) -> (StatusCode, Json<Agency>) {
    let agency = state.agencies.insert(request);
    info!(
        id = agency.id,
        by = %principal.username(),
        "agency created"
    );
    (StatusCode::CREATED, Json(agency))
}

/// Update an agency
#[utoipa::path(
    put,
    path = "/api/v1/inmobiliarias/{id}",
    tag = "Agencies",
    security(("bearer_auth" = [])),
    request_body = AgencyRequest,
    responses(
        (status = 200, description = "Updated", body = Agency),
        (status = 404, description = "No such agency")
    )
)]
pub async fn update_agency(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<AgencyRequest>,
) -> Result<Json<Agency>, StatusCode> {
    match state.agencies.update(id, request) {
        Some(agency) => {
            info!(id, by = %principal.username(), "agency updated");
            Ok(Json(agency))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Delete an agency
#[utoipa::path(
    delete,
    path = "/api/v1/inmobiliarias/{id}",
    tag = "Agencies",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such agency")
    )
)]
pub async fn delete_agency(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> StatusCode {
    if state.agencies.remove(id) {
        info!(id, by = %principal.username(), "agency deleted");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
