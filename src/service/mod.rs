//! Booking REST Service
//!
//! Exposes the catalog and seat booking as a JSON API.
//!
//! ## Endpoints
//!
//! - `GET /api/movies` - All movies
//! - `GET /api/movies/:movie/theaters` - Theaters showing a movie
//! - `GET /api/theaters` - All theaters
//! - `GET /api/theaters/:theater/movies` - Movies showing at a theater
//! - `GET /api/showings` - Every (movie, theater) showing
//! - `GET /api/showings/:movie/:theater/seats` - Seat availability
//! - `POST /api/book` - Book seats (200 receipt, 409 conflict, 404, 400)
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_booking_outcome, request_id_middleware, RequestId};
pub use routes::{create_router, AppState, BookRequest, BookingReceipt, ErrorResponse};
pub use state::{ServiceState, CATALOG_PATH_ENV};
