//! Shared type definitions for La Finquina.
//!
//! This crate is the single source of truth for the entity records and
//! request payloads used across the workspace. Types flow downstream to
//! `TypeScript` via `ts-rs` for the web client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers around the integer primary keys
//! - [`enums`] -- Status and category enumerations stored as text
//! - [`structs`] -- Entity records (crops, trees, tasks, logs, expenses, ...)
//! - [`inputs`] -- Validated create/update payloads

pub mod enums;
pub mod ids;
pub mod inputs;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    CropStatus, ParseEnumError, ResourceCategory, TaskCategory, TaskPriority, TaskStatus,
};
pub use ids::{
    CropId, CropLogId, ExpenseId, MakerModelId, ResourceId, TaskId, TreeId, WeatherLogId,
};
pub use inputs::{
    CropStatusUpdate, CropUpdate, NewCrop, NewCropLog, NewExpense, NewMakerModel, NewResource,
    NewTask, NewTree, QuantityAdjustment, TaskStatusUpdate, WeatherReading, non_empty, unquote,
};
pub use structs::{
    Crop, CropLog, CropLogEntry, Expense, MakerModel, Resource, Task, Tree, WeatherLog,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings when export_all is called. Files land
        // in `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::CropId::export_all();
        let _ = crate::ids::TreeId::export_all();
        let _ = crate::ids::TaskId::export_all();
        let _ = crate::ids::CropLogId::export_all();
        let _ = crate::ids::ExpenseId::export_all();
        let _ = crate::ids::ResourceId::export_all();
        let _ = crate::ids::MakerModelId::export_all();
        let _ = crate::ids::WeatherLogId::export_all();

        let _ = crate::enums::CropStatus::export_all();
        let _ = crate::enums::TaskStatus::export_all();
        let _ = crate::enums::TaskPriority::export_all();
        let _ = crate::enums::TaskCategory::export_all();
        let _ = crate::enums::ResourceCategory::export_all();

        let _ = crate::structs::Crop::export_all();
        let _ = crate::structs::Tree::export_all();
        let _ = crate::structs::Task::export_all();
        let _ = crate::structs::CropLog::export_all();
        let _ = crate::structs::CropLogEntry::export_all();
        let _ = crate::structs::Expense::export_all();
        let _ = crate::structs::Resource::export_all();
        let _ = crate::structs::MakerModel::export_all();
        let _ = crate::structs::WeatherLog::export_all();

        let _ = crate::inputs::NewCrop::export_all();
        let _ = crate::inputs::CropUpdate::export_all();
        let _ = crate::inputs::NewTree::export_all();
        let _ = crate::inputs::NewTask::export_all();
        let _ = crate::inputs::NewExpense::export_all();
        let _ = crate::inputs::NewResource::export_all();
        let _ = crate::inputs::QuantityAdjustment::export_all();
        let _ = crate::inputs::NewMakerModel::export_all();
    }
}
