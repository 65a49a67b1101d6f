//! Status and category enumerations stored as `TEXT` columns.
//!
//! Each enum round-trips through the exact string stored in the database
//! (`Planted`, `Pending`, `High`, ...). Parsing is strict: unknown values
//! produce a [`ParseEnumError`] so corrupted rows surface instead of being
//! silently coerced.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A stored string did not match any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    /// The enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Generates `as_str`, `Display`, `FromStr` and `ALL` for a text enum.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The string stored in the database for this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl core::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: stringify!($name),
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

text_enum! {
    /// Lifecycle state of a crop bed entry.
    CropStatus {
        /// Seeds or seedlings are in the ground.
        Planted => "Planted",
        /// The crop has been harvested.
        Harvested => "Harvested",
        /// The crop died or was abandoned.
        Failed => "Failed",
        /// Planned but not yet planted.
        Planned => "Planned",
    }
}

text_enum! {
    /// Completion state of a task.
    TaskStatus {
        /// Still to be done.
        Pending => "Pending",
        /// Completed.
        Done => "Done",
    }
}

text_enum! {
    /// Urgency of a task.
    TaskPriority {
        /// Can wait.
        Low => "Low",
        /// Default priority.
        Normal => "Normal",
        /// Needs attention soon; counted as urgent on the dashboard.
        High => "High",
    }
}

text_enum! {
    /// Area of the farm a task belongs to.
    TaskCategory {
        /// Beds, crops and trees.
        Garden => "Garden",
        /// Mowers, tillers and other machines.
        Machinery => "Machinery",
        /// Sheds, fences, irrigation.
        Infrastructure => "Infrastructure",
        /// Livestock and poultry.
        Animals => "Animals",
        /// Anything else.
        Other => "Other",
    }
}

text_enum! {
    /// Kind of inventory resource.
    ResourceCategory {
        /// Seeds and seedlings.
        Seeds => "Seeds",
        /// Fertilizer, compost and soil amendments.
        Fertilizer => "Fertilizer",
        /// Hand tools and small equipment.
        Tools => "Tools",
        /// Treatments such as diatomaceous earth.
        Treatments => "Treatments",
        /// Anything else.
        Other => "Other",
    }
}

impl ResourceCategory {
    /// Expense category used when purchasing a resource of this kind.
    pub const fn expense_category(self) -> &'static str {
        match self {
            Self::Seeds => "Semillas",
            Self::Fertilizer => "Abono",
            Self::Tools | Self::Treatments | Self::Other => "Herramientas",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl Default for TaskCategory {
    fn default() -> Self {
        Self::Garden
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::*;

    #[test]
    fn every_variant_round_trips_through_text() {
        for status in CropStatus::ALL {
            assert_eq!(CropStatus::from_str(status.as_str()), Ok(*status));
        }
        for priority in TaskPriority::ALL {
            assert_eq!(priority.as_str().parse::<TaskPriority>(), Ok(*priority));
        }
        for category in ResourceCategory::ALL {
            assert_eq!(category.to_string().parse::<ResourceCategory>(), Ok(*category));
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = "Sprouting".parse::<CropStatus>();
        assert!(err.is_err());
        let err = err.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("CropStatus"));
        assert!(err.contains("Sprouting"));
    }

    #[test]
    fn purchase_categories_follow_resource_kind() {
        assert_eq!(ResourceCategory::Seeds.expense_category(), "Semillas");
        assert_eq!(ResourceCategory::Fertilizer.expense_category(), "Abono");
        assert_eq!(ResourceCategory::Tools.expense_category(), "Herramientas");
    }

    #[test]
    fn serde_uses_variant_names() {
        let json = serde_json::to_string(&TaskStatus::Pending).unwrap_or_default();
        assert_eq!(json, "\"Pending\"");
    }
}
