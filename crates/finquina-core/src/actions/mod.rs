//! Every operation the service exposes, as methods on [`Farm`].
//!
//! Reads never fail: when the database is offline or a query errors
//! they log and return an empty or neutral value. Writes return
//! `Option` (`None` when nothing was stored) or [`ActionError`] when the
//! input is rejected. Successful writes publish the affected paths on
//! the revalidation bus.
//!
//! # Submodules
//!
//! - [`crops`] -- Crop inventory, status, detail with journal.
//! - [`trees`] -- Fruit trees.
//! - [`tasks`] -- Tasks and the urgent list.
//! - [`expenses`] -- Expense ledger and analytics.
//! - [`resources`] -- Inventory with purchase and restock expenses.
//! - [`maker`] -- 3D-printable parts.
//! - [`journal`] -- Photo journal and crop progress analysis.
//! - [`dashboard`] -- Home page stats and daily advice.
//! - [`notifications`] -- Notification bell.
//! - [`rotation`] -- Bed rotation advice.
//! - [`calendar`] -- Harvest calendar.
//! - [`search`] -- Global search.
//! - [`plants`] -- Species catalogue lookup.
//! - [`weather`] -- Live weather, history sync, irrigation.
//! - [`export`] -- CSV exports.
//! - [`uploads`] -- Photo uploads.
//!
//! [`Farm`]: crate::Farm
//! [`ActionError`]: crate::ActionError

pub mod calendar;
pub mod crops;
pub mod dashboard;
pub mod expenses;
pub mod export;
pub mod journal;
pub mod maker;
pub mod notifications;
pub mod plants;
pub mod resources;
pub mod rotation;
pub mod search;
pub mod tasks;
pub mod trees;
pub mod uploads;
pub mod weather;
