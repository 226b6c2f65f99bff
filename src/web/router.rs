//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use super::dto;
use super::error::{ErrorBody, ErrorCode, ErrorDetail};
use super::handlers::{self, AppState};
use super::middleware::{
    api_rate_limit, create_cors_layer, credential_rate_limit, jwt_auth, security_headers,
    RateLimitState,
};
use crate::appointment::AppointmentStatus;
use crate::config::WebConfig;
use crate::db::Role;
use crate::history::{
    CleansingFrequency, ClinicalHistory, Diet, FacialCare, FacialDiagnosis, GeneralData,
    Lifestyle, Pregnancy, PregnancyStatus, SkinType, StressLevel, Substances, Sunscreen,
    TreatmentPlan,
};

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leclat API",
        description = "Accounts, appointments, services, medical histories and contact messages"
    ),
    paths(
        handlers::register,
        handlers::login,
        handlers::forgot_password,
        handlers::validate_token,
        handlers::reset_password,
        handlers::profile,
        handlers::create_account,
        handlers::list_accounts,
        handlers::lookup_account,
        handlers::update_account,
        handlers::set_account_status,
        handlers::create_appointment,
        handlers::list_appointments,
        handlers::availability,
        handlers::slot_exists,
        handlers::update_appointment,
        handlers::cancel_appointment,
        handlers::activate_appointment,
        handlers::create_service,
        handlers::list_services,
        handlers::get_service,
        handlers::update_service,
        handlers::delete_service,
        handlers::create_history,
        handlers::list_histories,
        handlers::get_history,
        handlers::update_history,
        handlers::submit_contact,
        handlers::list_contact_messages,
        handlers::api_status,
    ),
    components(schemas(
        Role,
        AppointmentStatus,
        ErrorBody,
        ErrorDetail,
        ErrorCode,
        dto::RegisterRequest,
        dto::LoginRequest,
        dto::ForgotPasswordRequest,
        dto::ResetPasswordRequest,
        dto::UpdateAccountRequest,
        dto::CreateAccountRequest,
        dto::SetStatusRequest,
        dto::CreateAppointmentRequest,
        dto::UpdateAppointmentRequest,
        dto::ContactRequest,
        dto::CreateServiceRequest,
        dto::UpdateServiceRequest,
        dto::CreateHistoryRequest,
        dto::UpdateHistoryRequest,
        dto::AccountView,
        dto::AuthResponse,
        dto::MessageResponse,
        dto::ValidTokenResponse,
        dto::AppointmentView,
        dto::AvailabilityResponse,
        dto::ExistsResponse,
        dto::ContactView,
        dto::ServiceView,
        dto::HistoryView,
        GeneralData,
        ClinicalHistory,
        Pregnancy,
        PregnancyStatus,
        Lifestyle,
        StressLevel,
        Diet,
        Substances,
        FacialCare,
        Sunscreen,
        CleansingFrequency,
        FacialDiagnosis,
        SkinType,
        TreatmentPlan,
        dto::PaginationMeta,
        dto::StatusResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration, login and password reset"),
        (name = "accounts", description = "Account management"),
        (name = "appointments", description = "Appointment booking"),
        (name = "services", description = "Service catalog"),
        (name = "histories", description = "Client medical histories"),
        (name = "contact", description = "Contact form"),
        (name = "status", description = "Service status"),
    )
)]
pub struct ApiDoc;

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

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let issuer = app_state.issuer.clone();
    let rate_limits = Arc::new(RateLimitState::new(
        web_config.login_rate_limit,
        web_config.api_rate_limit,
    ));
    rate_limits.clone().start_cleanup_task();

    // Credential endpoints get the tighter per-client quota
    let credential_limits = rate_limits.clone();
    let credential_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/forgot-password", post(handlers::forgot_password))
        .layer(middleware::from_fn(move |req, next| {
            credential_rate_limit(credential_limits.clone(), req, next)
        }));

    let auth_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/validate-token/:token", get(handlers::validate_token))
        .route("/reset-password/:token", post(handlers::reset_password))
        .route("/profile", get(handlers::profile));

    let account_routes = Router::new()
        .route(
            "/",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route("/lookup", get(handlers::lookup_account))
        .route("/:id", put(handlers::update_account))
        .route("/:id/status", put(handlers::set_account_status));

    let appointment_routes = Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route("/availability", get(handlers::availability))
        .route("/exists", get(handlers::slot_exists))
        .route("/:id", put(handlers::update_appointment))
        .route("/:id/cancel", put(handlers::cancel_appointment))
        .route("/:id/activate", put(handlers::activate_appointment));

    let service_routes = Router::new()
        .route(
            "/",
            get(handlers::list_services).post(handlers::create_service),
        )
        .route(
            "/:id",
            get(handlers::get_service)
                .put(handlers::update_service)
                .delete(handlers::delete_service),
        );

    let history_routes = Router::new()
        .route(
            "/",
            get(handlers::list_histories).post(handlers::create_history),
        )
        .route("/national-id/:national_id", get(handlers::get_history))
        .route("/:id", put(handlers::update_history));

    let contact_routes = Router::new().route(
        "/",
        get(handlers::list_contact_messages).post(handlers::submit_contact),
    );

    let api_limits = rate_limits;
    let api_routes = Router::new()
        .merge(credential_routes)
        .merge(auth_routes)
        .nest("/accounts", account_routes)
        .nest("/appointments", appointment_routes)
        .nest("/services", service_routes)
        .nest("/histories", history_routes)
        .nest("/contact", contact_routes)
        .route("/status", get(handlers::api_status))
        .layer(middleware::from_fn(move |req, next| {
            api_rate_limit(api_limits.clone(), req, next)
        }));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(move |req, next| {
                    jwt_auth(issuer.clone(), req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Swagger UI at `/swagger-ui`, document at `/api-docs/openapi.json`.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = json["paths"].as_object().unwrap();

        for path in [
            "/api/register",
            "/api/login",
            "/api/forgot-password",
            "/api/validate-token/{token}",
            "/api/reset-password/{token}",
            "/api/profile",
            "/api/accounts/{id}",
            "/api/appointments/availability",
            "/api/services",
            "/api/services/{id}",
            "/api/histories",
            "/api/histories/{id}",
            "/api/histories/national-id/{national_id}",
            "/api/contact",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
    }

    #[tokio::test]
    async fn test_health_router() {
        let server = axum_test::TestServer::new(create_health_router()).unwrap();
        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }
}
