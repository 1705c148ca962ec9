//! # Smart Asset API
//!
//! Handles smart asset CRUD, compliance evaluation triggering,
//! and anchor verification.

use axum::Router;

/// Build the smart assets router.
pub fn router() -> Router {
    Router::new()
}
