//! REST endpoint handlers.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/` | [`index`] |
//! | GET | `/api/dashboard` | [`dashboard`] |
//! | GET | `/api/notifications` | [`notifications`] |
//! | GET/POST | `/api/crops` | [`list_crops`], [`add_crop`] |
//! | GET/PUT/DELETE | `/api/crops/{id}` | [`get_crop`], [`update_crop`], [`delete_crop`] |
//! | PUT | `/api/crops/{id}/status` | [`update_crop_status`] |
//! | POST | `/api/crops/{id}/logs` | [`log_crop_progress`] |
//! | GET | `/api/crops/{id}/rotation` | [`crop_rotation`] |
//! | GET/POST | `/api/trees` | [`list_trees`], [`add_tree`] |
//! | DELETE | `/api/trees/{id}` | [`delete_tree`] |
//! | GET/POST | `/api/tasks` | [`list_tasks`], [`add_task`] |
//! | GET | `/api/tasks/urgent` | [`urgent_tasks`] |
//! | PUT | `/api/tasks/{id}/status` | [`update_task_status`] |
//! | DELETE | `/api/tasks/{id}` | [`delete_task`] |
//! | GET/POST | `/api/expenses` | [`list_expenses`], [`add_expense`] |
//! | GET | `/api/expenses/analytics` | [`expense_analytics`] |
//! | DELETE | `/api/expenses/{id}` | [`delete_expense`] |
//! | GET/POST | `/api/resources` | [`list_resources`], [`add_resource`] |
//! | PUT | `/api/resources/{id}/quantity` | [`update_resource_quantity`] |
//! | DELETE | `/api/resources/{id}` | [`delete_resource`] |
//! | GET/POST | `/api/maker` | [`list_maker_models`], [`add_maker_model`] |
//! | GET/POST | `/api/journal` | [`list_journal`], [`create_journal_entry`] |
//! | GET | `/api/journal/recent` | [`recent_journal`] |
//! | DELETE | `/api/journal/{id}` | [`delete_journal_entry`] |
//! | GET | `/api/calendar` | [`calendar`] |
//! | GET | `/api/search?q=` | [`search`] |
//! | GET | `/api/plants/search?q=` | [`search_plants`] |
//! | GET | `/api/plants/{id}` | [`plant_details`] |
//! | GET | `/api/weather` | [`current_weather`] |
//! | GET | `/api/weather/history` | [`weather_history`] |
//! | GET | `/api/weather/irrigation` | [`irrigation`] |
//! | POST | `/api/weather/sync` | [`sync_weather`] |
//! | POST | `/api/weather/today` | [`record_weather`] |
//! | GET | `/api/lunar?date=` | [`lunar`] |
//! | GET | `/api/rotation/{crop_name}` | [`rotation`] |
//! | GET | `/api/compatibility?a=&b=` | [`compatibility`] |
//! | GET | `/api/compatibility/plants` | [`companion_plants`] |
//! | GET | `/api/export/crops.csv` | [`export_crops`] |
//! | GET | `/api/export/expenses.csv` | [`export_expenses`] |
//!
//! Reads never fail: with the database offline they return empty lists.
//! Writes that could not be stored answer `503`, and writes against a
//! missing record answer `404`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{NaiveDate, Utc};
use finquina_agro::{
    Compatibility, IrrigationAdvice, LunarInfo, PlantInfo, fruit_trees, lunar_info, vegetables,
};
use finquina_ai::RotationAdvice;
use finquina_core::actions::export::export_filename;
use finquina_core::revalidate::{ANALYTICS, HOME};
use finquina_core::{
    CalendarEntry, CropDetail, JournalOutcome, Notification, ProgressOutcome, RotationInfo,
    SearchResults, rotation_info,
};
use finquina_integrations::{CurrentWeather, PlantDetails, PlantSummary};
use finquina_types::{
    Crop, CropId, CropLogEntry, CropLogId, CropStatusUpdate, CropUpdate, Expense, ExpenseId,
    MakerModel, NewCrop, NewExpense, NewMakerModel, NewResource, NewTask, NewTree,
    QuantityAdjustment, Resource, ResourceId, Task, TaskId, TaskStatusUpdate, Tree, TreeId,
    WeatherLog,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Shared state extractor used by every handler.
type AppStateRef = State<Arc<AppState>>;

/// A freshly stored record, or 503 when nothing was stored.
fn created<T>(what: &str, record: Option<T>) -> Result<(StatusCode, Json<T>), ApiError> {
    record
        .map(|r| (StatusCode::CREATED, Json(r)))
        .ok_or_else(|| ApiError::not_stored(what))
}

/// Why a write touched nothing: the database is down, or the record
/// does not exist.
fn missing(state: &AppState, what: &str, id: impl std::fmt::Display) -> ApiError {
    if state.farm.db().is_online() {
        ApiError::not_found(what, id)
    } else {
        ApiError::not_stored(what)
    }
}

fn no_content(
    state: &AppState,
    what: &str,
    id: impl std::fmt::Display,
    done: bool,
) -> Result<StatusCode, ApiError> {
    if done {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(missing(state, what, id))
    }
}

// ---------------------------------------------------------------------------
// Status and dashboard
// ---------------------------------------------------------------------------

/// Service status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    /// Farm name from the settings.
    pub farm: String,
    /// Whether the database is reachable.
    pub database_online: bool,
    /// Why it is not, if it is not.
    pub database_error: Option<String>,
    /// Whether any inference API key is configured.
    pub ai_configured: bool,
    /// Whether plant search has an API key.
    pub plants_configured: bool,
}

/// `GET /` -- service status.
pub async fn index(State(state): AppStateRef) -> Json<ServiceStatus> {
    let farm = &state.farm;
    Json(ServiceStatus {
        farm: farm.config().farm.name.clone(),
        database_online: farm.db().is_online(),
        database_error: farm.db().offline_reason().map(ToOwned::to_owned),
        ai_configured: farm.ai_configured(),
        plants_configured: farm.plants_configured(),
    })
}

/// `GET /api/dashboard` -- dashboard stats, render-cached.
pub async fn dashboard(State(state): AppStateRef) -> Result<Json<Value>, ApiError> {
    let body = state.cached(HOME, || state.farm.dashboard_stats()).await?;
    Ok(Json(body))
}

/// `GET /api/notifications`
pub async fn notifications(State(state): AppStateRef) -> Json<Vec<Notification>> {
    Json(state.farm.notifications().await)
}

// ---------------------------------------------------------------------------
// Crops
// ---------------------------------------------------------------------------

/// `GET /api/crops`
pub async fn list_crops(State(state): AppStateRef) -> Json<Vec<Crop>> {
    Json(state.farm.list_crops().await)
}

/// `POST /api/crops`
pub async fn add_crop(
    State(state): AppStateRef,
    Json(new): Json<NewCrop>,
) -> Result<(StatusCode, Json<Crop>), ApiError> {
    created("crop", state.farm.add_crop(&new).await?)
}

/// `GET /api/crops/{id}` -- crop with its journal.
pub async fn get_crop(
    State(state): AppStateRef,
    Path(id): Path<CropId>,
) -> Result<Json<CropDetail>, ApiError> {
    state
        .farm
        .get_crop(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("crop", id))
}

/// `PUT /api/crops/{id}`
pub async fn update_crop(
    State(state): AppStateRef,
    Path(id): Path<CropId>,
    Json(update): Json<CropUpdate>,
) -> Result<Json<Crop>, ApiError> {
    state
        .farm
        .update_crop(id, &update)
        .await?
        .map(Json)
        .ok_or_else(|| missing(&state, "crop", id))
}

/// `PUT /api/crops/{id}/status`
pub async fn update_crop_status(
    State(state): AppStateRef,
    Path(id): Path<CropId>,
    Json(update): Json<CropStatusUpdate>,
) -> Result<StatusCode, ApiError> {
    let changed = state.farm.update_crop_status(id, update.status).await;
    no_content(&state, "crop", id, changed)
}

/// `DELETE /api/crops/{id}`
pub async fn delete_crop(
    State(state): AppStateRef,
    Path(id): Path<CropId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.farm.delete_crop(id).await;
    no_content(&state, "crop", id, deleted)
}

/// Body of `POST /api/crops/{id}/logs`.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    /// Photo to analyse, usually a `/uploads/...` URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// The grower's note.
    #[serde(default)]
    pub note: String,
}

/// `POST /api/crops/{id}/logs` -- journal entry with AI analysis.
pub async fn log_crop_progress(
    State(state): AppStateRef,
    Path(id): Path<CropId>,
    Json(req): Json<ProgressRequest>,
) -> Result<Json<ProgressOutcome>, ApiError> {
    state
        .farm
        .log_crop_progress(id, req.image_url.as_deref(), &req.note)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("crop", id))
}

/// `GET /api/crops/{id}/rotation`
pub async fn crop_rotation(
    State(state): AppStateRef,
    Path(id): Path<CropId>,
) -> Result<Json<RotationAdvice>, ApiError> {
    state
        .farm
        .rotation_advice(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("crop {id} has no bed on record")))
}

// ---------------------------------------------------------------------------
// Trees
// ---------------------------------------------------------------------------

/// `GET /api/trees`
pub async fn list_trees(State(state): AppStateRef) -> Json<Vec<Tree>> {
    Json(state.farm.list_trees().await)
}

/// `POST /api/trees`
pub async fn add_tree(
    State(state): AppStateRef,
    Json(new): Json<NewTree>,
) -> Result<(StatusCode, Json<Tree>), ApiError> {
    created("tree", state.farm.add_tree(&new).await?)
}

/// `DELETE /api/trees/{id}`
pub async fn delete_tree(
    State(state): AppStateRef,
    Path(id): Path<TreeId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.farm.delete_tree(id).await;
    no_content(&state, "tree", id, deleted)
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// `GET /api/tasks`
pub async fn list_tasks(State(state): AppStateRef) -> Json<Vec<Task>> {
    Json(state.farm.list_tasks().await)
}

/// `GET /api/tasks/urgent`
pub async fn urgent_tasks(State(state): AppStateRef) -> Json<Vec<Task>> {
    Json(state.farm.urgent_tasks().await)
}

/// `POST /api/tasks`
pub async fn add_task(
    State(state): AppStateRef,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    created("task", state.farm.add_task(&new).await?)
}

/// `PUT /api/tasks/{id}/status`
pub async fn update_task_status(
    State(state): AppStateRef,
    Path(id): Path<TaskId>,
    Json(update): Json<TaskStatusUpdate>,
) -> Result<StatusCode, ApiError> {
    let changed = state.farm.update_task_status(id, update.status).await;
    no_content(&state, "task", id, changed)
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(state): AppStateRef,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.farm.delete_task(id).await;
    no_content(&state, "task", id, deleted)
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

/// `GET /api/expenses`
pub async fn list_expenses(State(state): AppStateRef) -> Json<Vec<Expense>> {
    Json(state.farm.list_expenses().await)
}

/// `POST /api/expenses`
pub async fn add_expense(
    State(state): AppStateRef,
    Json(new): Json<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    created("expense", state.farm.add_expense(&new).await?)
}

/// `DELETE /api/expenses/{id}`
pub async fn delete_expense(
    State(state): AppStateRef,
    Path(id): Path<ExpenseId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.farm.delete_expense(id).await;
    no_content(&state, "expense", id, deleted)
}

/// `GET /api/expenses/analytics` -- spending by category and month,
/// render-cached.
pub async fn expense_analytics(State(state): AppStateRef) -> Result<Json<Value>, ApiError> {
    let body = state
        .cached(ANALYTICS, || state.farm.expense_analytics())
        .await?;
    Ok(Json(body))
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// `GET /api/resources`
pub async fn list_resources(State(state): AppStateRef) -> Json<Vec<Resource>> {
    Json(state.farm.list_resources().await)
}

/// `POST /api/resources`
pub async fn add_resource(
    State(state): AppStateRef,
    Json(new): Json<NewResource>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    created("resource", state.farm.add_resource(&new).await?)
}

/// `PUT /api/resources/{id}/quantity` -- signed stock change.
pub async fn update_resource_quantity(
    State(state): AppStateRef,
    Path(id): Path<ResourceId>,
    Json(adjustment): Json<QuantityAdjustment>,
) -> Result<Json<Resource>, ApiError> {
    state
        .farm
        .update_resource_quantity(id, adjustment)
        .await
        .map(Json)
        .ok_or_else(|| missing(&state, "resource", id))
}

/// `DELETE /api/resources/{id}`
pub async fn delete_resource(
    State(state): AppStateRef,
    Path(id): Path<ResourceId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.farm.delete_resource(id).await;
    no_content(&state, "resource", id, deleted)
}

// ---------------------------------------------------------------------------
// Maker
// ---------------------------------------------------------------------------

/// `GET /api/maker`
pub async fn list_maker_models(State(state): AppStateRef) -> Json<Vec<MakerModel>> {
    Json(state.farm.list_maker_models().await)
}

/// `POST /api/maker`
pub async fn add_maker_model(
    State(state): AppStateRef,
    Json(new): Json<NewMakerModel>,
) -> Result<(StatusCode, Json<MakerModel>), ApiError> {
    created("maker model", state.farm.add_maker_model(&new).await?)
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// `GET /api/journal` -- every entry, newest first.
pub async fn list_journal(State(state): AppStateRef) -> Json<Vec<CropLogEntry>> {
    Json(state.farm.all_logs().await)
}

/// `GET /api/journal/recent` -- activity feed.
pub async fn recent_journal(State(state): AppStateRef) -> Json<Vec<CropLogEntry>> {
    Json(state.farm.recent_logs().await)
}

/// Body of `POST /api/journal`.
#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    /// Photo to analyse.
    #[serde(default)]
    pub image_url: String,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// `POST /api/journal` -- quick photo entry.
pub async fn create_journal_entry(
    State(state): AppStateRef,
    Json(req): Json<JournalRequest>,
) -> Result<Json<JournalOutcome>, ApiError> {
    let outcome = state
        .farm
        .create_journal_entry(&req.image_url, req.note.as_deref())
        .await?;
    Ok(Json(outcome))
}

/// `DELETE /api/journal/{id}` -- entry and its uploaded photo.
pub async fn delete_journal_entry(
    State(state): AppStateRef,
    Path(id): Path<CropLogId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.farm.delete_log(id).await;
    no_content(&state, "journal entry", id, deleted)
}

// ---------------------------------------------------------------------------
// Calendar and search
// ---------------------------------------------------------------------------

/// `GET /api/calendar`
pub async fn calendar(State(state): AppStateRef) -> Json<Vec<CalendarEntry>> {
    Json(state.farm.harvest_calendar().await)
}

/// Query parameters for the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search text.
    #[serde(default)]
    pub q: String,
}

/// `GET /api/search?q=`
pub async fn search(
    State(state): AppStateRef,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    Json(state.farm.global_search(&query.q).await)
}

/// `GET /api/plants/search?q=` -- species catalogue, names in Spanish.
pub async fn search_plants(
    State(state): AppStateRef,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<PlantSummary>> {
    Json(state.farm.search_plant_species(&query.q).await)
}

/// `GET /api/plants/{id}`
pub async fn plant_details(
    State(state): AppStateRef,
    Path(id): Path<i64>,
) -> Result<Json<PlantDetails>, ApiError> {
    state
        .farm
        .plant_details(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("plant", id))
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// `GET /api/weather` -- current conditions, `null` when the service is
/// unreachable.
pub async fn current_weather(State(state): AppStateRef) -> Json<Option<CurrentWeather>> {
    Json(state.farm.current_weather().await)
}

/// `GET /api/weather/history` -- the last week of recorded rain.
pub async fn weather_history(State(state): AppStateRef) -> Json<Vec<WeatherLog>> {
    Json(state.farm.recent_rainfall().await)
}

/// `GET /api/weather/irrigation`
pub async fn irrigation(State(state): AppStateRef) -> Json<IrrigationAdvice> {
    Json(state.farm.irrigation_advice().await)
}

/// Result of a weather sync.
#[derive(Debug, Serialize)]
pub struct SyncResult {
    /// Days written.
    pub synced: u64,
}

/// `POST /api/weather/sync` -- backfill recent daily history.
pub async fn sync_weather(State(state): AppStateRef) -> Json<SyncResult> {
    Json(SyncResult {
        synced: state.farm.sync_weather_history().await,
    })
}

/// `POST /api/weather/today` -- record today's reading.
pub async fn record_weather(State(state): AppStateRef) -> Result<StatusCode, ApiError> {
    if state.farm.record_today_weather().await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::Unavailable("weather not recorded".to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Agronomy lookups
//
// Pure lookups; async only because Axum handlers are.
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/lunar`.
#[derive(Debug, Deserialize)]
pub struct LunarQuery {
    /// Day to look up; today when absent.
    pub date: Option<NaiveDate>,
}

/// `GET /api/lunar?date=YYYY-MM-DD` -- phase and farming day at noon UTC.
#[allow(clippy::unused_async)]
pub async fn lunar(Query(query): Query<LunarQuery>) -> Json<LunarInfo> {
    let at = query
        .date
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .map_or_else(Utc::now, |d| d.and_utc());
    Json(lunar_info(at))
}

/// `GET /api/rotation/{crop_name}`
#[allow(clippy::unused_async)]
pub async fn rotation(Path(crop_name): Path<String>) -> Json<RotationInfo> {
    Json(rotation_info(&crop_name))
}

/// Query parameters for `GET /api/compatibility`.
#[derive(Debug, Deserialize)]
pub struct CompatibilityQuery {
    /// First plant.
    #[serde(default)]
    pub a: String,
    /// Second plant.
    #[serde(default)]
    pub b: String,
}

/// `GET /api/compatibility?a=&b=` -- `null` when either plant is unknown.
#[allow(clippy::unused_async)]
pub async fn compatibility(
    Query(query): Query<CompatibilityQuery>,
) -> Json<Option<Compatibility>> {
    Json(finquina_agro::compatibility(&query.a, &query.b))
}

/// The plant catalogue, split by kind.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionCatalogue {
    /// Fruit and nut trees.
    pub fruit_trees: Vec<&'static PlantInfo>,
    /// Vegetables.
    pub vegetables: Vec<&'static PlantInfo>,
}

/// `GET /api/compatibility/plants`
#[allow(clippy::unused_async)]
pub async fn companion_plants() -> Json<CompanionCatalogue> {
    Json(CompanionCatalogue {
        fruit_trees: fruit_trees().collect(),
        vegetables: vegetables().collect(),
    })
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

fn csv_download(prefix: &str, body: String) -> Response {
    let filename = export_filename(prefix, Utc::now().date_naive());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// `GET /api/export/crops.csv` -- the crop notebook.
pub async fn export_crops(State(state): AppStateRef) -> Response {
    csv_download("cuaderno", state.farm.export_crops().await)
}

/// `GET /api/export/expenses.csv` -- the expense ledger.
pub async fn export_expenses(State(state): AppStateRef) -> Response {
    csv_download("gastos", state.farm.export_expenses().await)
}
