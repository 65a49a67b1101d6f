//! Axum router construction.
//!
//! Assembles the REST API, the upload endpoint, the static blob route
//! and the revalidation `WebSocket` into a single [`Router`] with CORS
//! and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use finquina_integrations::DEFAULT_PUBLIC_BASE;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::uploads::{self, UPLOAD_LIMIT};
use crate::ws;

/// Where stored blobs are served from: the store's public base when it
/// is a local path, `/uploads` otherwise.
fn blob_mount(public_base: &str) -> &str {
    if public_base.starts_with('/') && public_base.len() > 1 {
        public_base
    } else {
        DEFAULT_PUBLIC_BASE
    }
}

/// Build the complete router.
///
/// See [`handlers`] for the REST table. On top of it:
/// - `POST /api/upload` -- multipart photo upload
/// - `GET /uploads/*` -- stored blobs
/// - `GET /ws/revalidate` -- revalidation event stream
///
/// CORS allows any origin so a separately served front end can call the
/// API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let blobs = state.farm.blobs();
    let mount = blob_mount(blobs.public_base()).to_owned();
    let blob_files = ServeDir::new(blobs.root());

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/revalidate", get(ws::ws_revalidate))
        // Dashboard
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/notifications", get(handlers::notifications))
        // Crops
        .route(
            "/api/crops",
            get(handlers::list_crops).post(handlers::add_crop),
        )
        .route(
            "/api/crops/{id}",
            get(handlers::get_crop)
                .put(handlers::update_crop)
                .delete(handlers::delete_crop),
        )
        .route("/api/crops/{id}/status", put(handlers::update_crop_status))
        .route("/api/crops/{id}/logs", post(handlers::log_crop_progress))
        .route("/api/crops/{id}/rotation", get(handlers::crop_rotation))
        // Trees
        .route(
            "/api/trees",
            get(handlers::list_trees).post(handlers::add_tree),
        )
        .route("/api/trees/{id}", delete(handlers::delete_tree))
        // Tasks
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::add_task),
        )
        .route("/api/tasks/urgent", get(handlers::urgent_tasks))
        .route("/api/tasks/{id}/status", put(handlers::update_task_status))
        .route("/api/tasks/{id}", delete(handlers::delete_task))
        // Expenses
        .route(
            "/api/expenses",
            get(handlers::list_expenses).post(handlers::add_expense),
        )
        .route("/api/expenses/analytics", get(handlers::expense_analytics))
        .route("/api/expenses/{id}", delete(handlers::delete_expense))
        // Inventory
        .route(
            "/api/resources",
            get(handlers::list_resources).post(handlers::add_resource),
        )
        .route(
            "/api/resources/{id}/quantity",
            put(handlers::update_resource_quantity),
        )
        .route("/api/resources/{id}", delete(handlers::delete_resource))
        // Maker
        .route(
            "/api/maker",
            get(handlers::list_maker_models).post(handlers::add_maker_model),
        )
        // Journal
        .route(
            "/api/journal",
            get(handlers::list_journal).post(handlers::create_journal_entry),
        )
        .route("/api/journal/recent", get(handlers::recent_journal))
        .route("/api/journal/{id}", delete(handlers::delete_journal_entry))
        // Calendar, search, plant catalogue
        .route("/api/calendar", get(handlers::calendar))
        .route("/api/search", get(handlers::search))
        .route("/api/plants/search", get(handlers::search_plants))
        .route("/api/plants/{id}", get(handlers::plant_details))
        // Weather
        .route("/api/weather", get(handlers::current_weather))
        .route("/api/weather/history", get(handlers::weather_history))
        .route("/api/weather/irrigation", get(handlers::irrigation))
        .route("/api/weather/sync", post(handlers::sync_weather))
        .route("/api/weather/today", post(handlers::record_weather))
        // Agronomy lookups
        .route("/api/lunar", get(handlers::lunar))
        .route("/api/rotation/{crop_name}", get(handlers::rotation))
        .route("/api/compatibility", get(handlers::compatibility))
        .route(
            "/api/compatibility/plants",
            get(handlers::companion_plants),
        )
        // Exports
        .route("/api/export/crops.csv", get(handlers::export_crops))
        .route("/api/export/expenses.csv", get(handlers::export_expenses))
        // Uploads
        .route(
            "/api/upload",
            post(uploads::upload).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .nest_service(&mount, blob_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
