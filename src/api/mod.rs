//! HTTP API module for the Attendance Engine.
//!
//! This module provides the REST endpoints that resolve raw punches into
//! attendance reports and raw punch data sheets.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DataSheetRequest, ReportRequest, ScheduleEntryRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
