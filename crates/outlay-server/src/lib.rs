//! Outlay Web Server
//!
//! Axum-based REST API for the Outlay expense tracker.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (field checks, limit clamping)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use outlay_core::db::Database;
use outlay_core::models::FieldError;

mod handlers;

/// Maximum number of days a top-days query may return
pub const MAX_TOP_DAYS_LIMIT: i64 = 100;

/// Environment variable holding comma-separated allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "OUTLAY_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self { allowed_origins }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
}

/// Simple message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { db });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Users
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        // Statistics
        .route("/stats/top-days/:user_id", get(handlers::top_spending_days))
        .route(
            "/stats/monthly-change/:user_id",
            get(handlers::monthly_change),
        )
        .route("/stats/prediction/:user_id", get(handlers::prediction))
        .route("/stats/daily/:user_id", get(handlers::daily_totals))
        .route("/stats/report/:user_id", get(handlers::statistics_report))
        .route("/stats/compute", post(handlers::compute_statistics));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    };

    // CSP: same-origin scripts, inline styles allowed for the bundled UI
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.allowed_origins.is_empty() {
        info!(origins = ?config.allowed_origins, "CORS origins allowed");
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    details: Option<Vec<FieldError>>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            details: None,
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// 400 with per-field validation failures
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self {
            details: Some(details),
            ..Self::new(StatusCode::BAD_REQUEST, "Validation failed")
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = match self.details {
            Some(details) => Json(serde_json::json!({
                "error": self.message,
                "details": details,
            })),
            None => Json(serde_json::json!({
                "error": self.message
            })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Malformed path segments and query strings are client errors
        if let Some(rejection) = err.downcast_ref::<PathRejection>() {
            return Self::bad_request(&rejection.body_text());
        }
        if let Some(rejection) = err.downcast_ref::<QueryRejection>() {
            return Self::bad_request(&rejection.body_text());
        }

        // Domain errors carry a client-facing meaning; everything else is a 500
        if let Some(core) = err.downcast_ref::<outlay_core::Error>() {
            use outlay_core::Error as CoreError;
            match core {
                CoreError::NotFound(msg) => return Self::not_found(&format!("{} not found", msg)),
                CoreError::InvalidData(msg) => return Self::bad_request(msg),
                CoreError::Conflict(_) => return Self::conflict(&core.to_string()),
                CoreError::MalformedRecord { .. } | CoreError::InvalidUserScope { .. } => {
                    return Self::unprocessable(&core.to_string())
                }
                _ => {}
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            details: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
