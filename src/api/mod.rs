//! HTTP API module for the Absence Engine.
//!
//! This module provides the REST endpoints for the flat absence listing
//! and the calendar overview.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AbsencesQuery, OverviewQuery};
pub use response::{AbsenceDto, AbsencesResponse, ApiError, ApiErrorResponse};
pub use state::AppState;
