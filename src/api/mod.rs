//! API Module
//!
//! HTTP handlers and routing for inspecting and administering the hosted
//! caches. The caches themselves have no network surface; this layer only
//! wraps their library API.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
