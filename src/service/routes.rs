//! Axum routes for the booking service.

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::CatalogStats;
use crate::error::{BookingError, ErrorKind};
use crate::types::{SeatMask, ShowingKey};
use crate::BOOKING_SCHEMA_VERSION;

use super::middleware::{metrics_middleware, record_booking_outcome, request_id_middleware, RequestId};
use super::state::ServiceState;

/// Type alias for the shared handler state.
pub type AppState = ServiceState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// List of movie names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviesResponse {
    /// Movie names.
    pub movies: Vec<String>,
}

/// List of theater names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheatersResponse {
    /// Theater names.
    pub theaters: Vec<String>,
}

/// Every (movie, theater) showing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowingsResponse {
    /// Showing keys.
    pub showings: Vec<ShowingKey>,
}

/// Seat availability for one showing, taken from a single snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatsResponse {
    /// Movie name.
    pub movie: String,
    /// Theater name.
    pub theater: String,
    /// Free seats as a bit mask (seat `n` is bit `n - 1`).
    pub available_mask: SeatMask,
    /// Free seat numbers, ascending.
    pub available_seats: Vec<u32>,
    /// Booked seat numbers, ascending.
    pub booked_seats: Vec<u32>,
}

/// Request to book seats.
///
/// Seats are given either as a bit mask or as 1-based seat numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRequest {
    /// Movie name.
    pub movie: String,
    /// Theater name.
    pub theater: String,
    /// Seats as a bit mask. Parsed wide so oversized values reach validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_mask: Option<u64>,
    /// Seats as 1-based seat numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<Vec<u32>>,
}

impl BookRequest {
    /// Resolve the requested seats into a mask.
    fn requested_mask(&self) -> Result<SeatMask, ApiError> {
        match (self.seat_mask, &self.seats) {
            (Some(_), Some(_)) => Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_ARGUMENT", "Provide either seat_mask or seats, not both"),
            )),
            (Some(bits), None) => u32::try_from(bits)
                .map(SeatMask::from_bits)
                .map_err(|_| ApiError::from(BookingError::SeatMaskOutOfRange(bits))),
            (None, Some(numbers)) => Ok(SeatMask::from_seat_numbers(numbers)?),
            (None, None) => Err(BookingError::EmptySeatMask.into()),
        }
    }
}

/// Confirmation of a successful booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingReceipt {
    /// Unique id of this booking.
    pub booking_id: Uuid,
    /// Movie name.
    pub movie: String,
    /// Theater name.
    pub theater: String,
    /// Booked seats as a bit mask.
    pub seat_mask: SeatMask,
    /// Booked seat numbers, ascending.
    pub seats: Vec<u32>,
    /// When the booking was committed.
    pub booked_at: DateTime<Utc>,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the catalog is empty.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Schema version of the JSON payloads.
    pub schema_version: String,
    /// Catalog counts.
    pub catalog: CatalogStats,
    /// Hex fingerprint of the catalog's showings.
    pub catalog_fingerprint: String,
    /// Seconds since the service started.
    pub uptime_secs: i64,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    /// Always `alive`.
    pub status: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// True when the catalog has showings.
    pub ready: bool,
    /// Number of showings.
    pub showings: usize,
    /// Reason when not ready.
    pub details: Option<String>,
}

/// Structured error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Correlation ID for request tracing (matches `X-Request-Id`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            correlation_id: None,
            details: None,
        }
    }

    /// Add a correlation ID to the error.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Error response paired with its HTTP status.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// JSON body.
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }

    fn conflict(available: SeatMask) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            ErrorResponse::new(
                "SEAT_ALREADY_BOOKED",
                "The seat(s) you are booking are not available",
            )
            .with_details(format!("Available seats: {:?}", available.seat_numbers())),
        )
    }

    fn with_request_id(mut self, request_id: Option<&RequestId>) -> Self {
        if let Some(RequestId(id)) = request_id {
            self.body = self.body.with_correlation_id(id.clone());
        }
        self
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        let (status, code) = match err.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::InvalidArgument => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        };
        Self::new(status, ErrorResponse::new(code, err.to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_ARGUMENT", "Malformed booking request")
                .with_details(rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // Losing a seat race is an expected outcome
        if self.status == StatusCode::CONFLICT {
            tracing::info!(
                code = %self.body.code,
                correlation_id = ?self.body.correlation_id,
                "Booking conflict"
            );
        } else {
            tracing::warn!(
                code = %self.body.code,
                error = %self.body.error,
                correlation_id = ?self.body.correlation_id,
                "Request error"
            );
        }
        (self.status, Json(self.body)).into_response()
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// List all movies.
async fn list_movies_handler(State(state): State<Arc<AppState>>) -> Json<MoviesResponse> {
    Json(MoviesResponse {
        movies: owned(state.catalog.movies()),
    })
}

/// List theaters showing a movie.
async fn theaters_for_movie_handler(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    Path(movie): Path<String>,
) -> Result<Json<TheatersResponse>, ApiError> {
    let theaters = state
        .catalog
        .theaters_showing(&movie)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.as_deref()))?;
    Ok(Json(TheatersResponse {
        theaters: owned(theaters),
    }))
}

/// List all theaters.
async fn list_theaters_handler(State(state): State<Arc<AppState>>) -> Json<TheatersResponse> {
    Json(TheatersResponse {
        theaters: owned(state.catalog.theaters()),
    })
}

/// List movies showing at a theater.
async fn movies_at_theater_handler(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    Path(theater): Path<String>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let movies = state
        .catalog
        .movies_at(&theater)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.as_deref()))?;
    Ok(Json(MoviesResponse {
        movies: owned(movies),
    }))
}

/// List every showing.
async fn list_showings_handler(State(state): State<Arc<AppState>>) -> Json<ShowingsResponse> {
    Json(ShowingsResponse {
        showings: state.catalog.showings(),
    })
}

/// Seat availability of one showing.
async fn seats_handler(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    Path((movie, theater)): Path<(String, String)>,
) -> Result<Json<SeatsResponse>, ApiError> {
    let available = state
        .catalog
        .available_seats(&movie, &theater)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.as_deref()))?;

    Ok(Json(SeatsResponse {
        available_seats: available.seat_numbers(),
        booked_seats: available.complement().seat_numbers(),
        available_mask: available,
        movie,
        theater,
    }))
}

/// Book seats for one showing.
async fn book_handler(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    request: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<BookingReceipt>, ApiError> {
    let request_id = request_id.as_deref();

    let Json(request) = request.map_err(|rejection| {
        record_booking_outcome("invalid_argument", 0);
        ApiError::from(rejection).with_request_id(request_id)
    })?;

    let mask = request.requested_mask().map_err(|e| {
        record_booking_outcome("invalid_argument", 0);
        e.with_request_id(request_id)
    })?;

    match state.catalog.book(&request.movie, &request.theater, mask) {
        Ok(true) => {
            record_booking_outcome("booked", mask.count());
            Ok(Json(BookingReceipt {
                booking_id: Uuid::new_v4(),
                seats: mask.seat_numbers(),
                seat_mask: mask,
                movie: request.movie,
                theater: request.theater,
                booked_at: Utc::now(),
            }))
        }
        Ok(false) => {
            record_booking_outcome("conflict", mask.count());
            // Second snapshot, only for the error details
            let available = state
                .catalog
                .available_seats(&request.movie, &request.theater)
                .unwrap_or_default();
            Err(ApiError::conflict(available).with_request_id(request_id))
        }
        Err(e) => {
            record_booking_outcome(&e.kind().to_string(), mask.count());
            Err(ApiError::from(e).with_request_id(request_id))
        }
    }
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.catalog.stats();
    Json(HealthResponse {
        status: if stats.showings > 0 { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: BOOKING_SCHEMA_VERSION.to_string(),
        catalog: stats,
        catalog_fingerprint: state.catalog.fingerprint(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Liveness probe endpoint.
///
/// Returns 200 if the process is alive.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 when the catalog has at least one showing, 503 otherwise.
async fn readiness_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let showings = state.catalog.len();
    if showings > 0 {
        Ok(Json(ReadinessResponse {
            ready: true,
            showings,
            details: None,
        }))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                showings,
                details: Some("Catalog has no showings".to_string()),
            }),
        ))
    }
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the booking service.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Catalog queries
        .route("/api/movies", get(list_movies_handler))
        .route("/api/movies/:movie/theaters", get(theaters_for_movie_handler))
        .route("/api/theaters", get(list_theaters_handler))
        .route("/api/theaters/:theater/movies", get(movies_at_theater_handler))
        .route("/api/showings", get(list_showings_handler))
        .route("/api/showings/:movie/:theater/seats", get(seats_handler))
        // Booking
        .route("/api/book", post(book_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
