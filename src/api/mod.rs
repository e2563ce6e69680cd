//! Service boundary
//!
//! The call contracts a transport (HTTP or otherwise) builds on. No wire
//! framing lives here; the shapes in [`types`] are plain serde structs.

mod errors;
mod service;
pub mod types;

pub use errors::{ApiError, ApiResult};
pub use service::{AppContext, ChirpService};
pub use types::{AccountView, LoginResponse, RefreshResponse};
