//! HTTP API for La Finquina.
//!
//! This crate exposes the farm actions of [`finquina_core`] over an Axum
//! server:
//!
//! - **REST endpoints** under `/api` for crops, trees, tasks, expenses,
//!   inventory, maker models, the photo journal, weather, search and
//!   the agronomy lookups (lunar calendar, rotation, companions)
//! - **CSV exports** of the crop notebook and the expense ledger
//! - **Uploads** (`POST /api/upload`) stored in the local blob store and
//!   served back under `/uploads`
//! - **`WebSocket` endpoint** (`/ws/revalidate`) streaming the paths each
//!   write invalidates
//!
//! # Render cache
//!
//! The dashboard and spending analytics are expensive (many queries plus
//! an inference call), so their JSON is cached in [`AppState`] for the
//! configured TTL. A background task listens on the revalidation bus
//! and drops entries as soon as a write touches their path.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod uploads;
pub mod ws;

pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{AppState, RenderCache};
