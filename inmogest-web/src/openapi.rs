//! OpenAPI specification
//!
//! Served at `/api-docs/openapi.json` with the Swagger UI mounted at
//! `/swagger-ui`, both on the exempt-path list, like the rest of the
//! documentation surface.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::handlers::{JwtResponse, MessageResponse};
use crate::auth::users::{LoginRequest, SignupRequest};
use crate::handlers::{Agency, AgencyRequest, HealthResponse};

/// Main OpenAPI specification for the Inmogest API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inmogest API",
        version = "0.1.0",
        description = "Real estate agency management backend"
    ),
    paths(
        crate::handlers::health_check,
        crate::auth::handlers::signin,
        crate::auth::handlers::signup,
        crate::handlers::list_agencies,
        crate::handlers::get_agency,
        crate::handlers::create_agency,
        crate::handlers::update_agency,
        crate::handlers::delete_agency,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            SignupRequest,
            JwtResponse,
            MessageResponse,
            Agency,
            AgencyRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Login and registration"),
        (name = "Agencies", description = "Agency management operations"),
    )
)]
pub struct ApiDoc;

/// Registers the bearer-token security scheme referenced by the
/// protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
