//! Type-safe identifier wrappers around the `BIGSERIAL` primary keys.
//!
//! Every table in the farm database uses an auto-incremented integer key.
//! Wrapping them prevents passing a task ID where a crop ID is expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around an `i64` primary key.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner key value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a planted (or planned) crop.
    CropId
}

define_id! {
    /// Identifier of a fruit tree.
    TreeId
}

define_id! {
    /// Identifier of a farm task.
    TaskId
}

define_id! {
    /// Identifier of a journal entry attached to a crop.
    CropLogId
}

define_id! {
    /// Identifier of an expense record.
    ExpenseId
}

define_id! {
    /// Identifier of an inventory resource.
    ResourceId
}

define_id! {
    /// Identifier of a 3D-printable maker model.
    MakerModelId
}

define_id! {
    /// Identifier of a daily weather log.
    WeatherLogId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let id = CropId(42);
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "42");

        let back: TaskId = serde_json::from_str("7").unwrap_or(TaskId(0));
        assert_eq!(back, TaskId(7));
    }

    #[test]
    fn display_and_conversions() {
        let id = ResourceId::from(9);
        assert_eq!(id.to_string(), "9");
        assert_eq!(i64::from(id), 9);
        assert_eq!(id.into_inner(), 9);
    }
}
