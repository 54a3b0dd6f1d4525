//! API Module
//!
//! HTTP handlers and routing that host cache nodes.
//!
//! # Endpoints
//! - `GET /nodes` - List deployed nodes
//! - `PUT /nodes/:name` - Deploy a node
//! - `DELETE /nodes/:name` - Undeploy a node
//! - `POST /nodes/:name/input` - Deliver a message to a node
//! - `GET /nodes/:name/status` - Node status and counters
//! - `GET /nodes/:name/cache` - Retained messages
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
