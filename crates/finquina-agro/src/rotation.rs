//! Four-year crop rotation.
//!
//! Crops are grouped by what they take from (or give to) the soil. A bed
//! follows the cycle Legume -> Leaf -> Fruit -> Root -> Legume: legumes
//! fix nitrogen, leaf crops consume it, fruiting crops need potassium and
//! phosphorus, and root crops loosen the soil before the cycle restarts.

use serde::{Deserialize, Serialize};

/// Rotation group of a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RotationCategory {
    /// Nitrogen fixers (beans, peas).
    Leguminosa,
    /// Leafy, nitrogen-hungry crops.
    Hoja,
    /// Fruiting crops.
    Fruto,
    /// Roots, bulbs and tubers.
    Raiz,
    /// Not in any known list.
    Otro,
}

/// The cyclic rotation order.
pub const ROTATION_ORDER: [RotationCategory; 4] = [
    RotationCategory::Leguminosa,
    RotationCategory::Hoja,
    RotationCategory::Fruto,
    RotationCategory::Raiz,
];

/// Crop names per category, matched as case-insensitive substrings in
/// this order.
const CATEGORY_NAMES: [(RotationCategory, &[&str]); 4] = [
    (
        RotationCategory::Hoja,
        &["Lechuga", "Acelga", "Espinaca", "Col", "Brócoli", "Repollo", "Kale"],
    ),
    (
        RotationCategory::Fruto,
        &["Tomate", "Pimiento", "Berenjena", "Calabacín", "Pepino", "Calabaza", "Fresas"],
    ),
    (
        RotationCategory::Raiz,
        &["Zanahoria", "Rábano", "Cebolla", "Ajo", "Remolacha", "Patata", "Puerro"],
    ),
    (
        RotationCategory::Leguminosa,
        &["Habas", "Guisantes", "Alubias", "Judías"],
    ),
];

impl RotationCategory {
    /// Upper-case label (`LEGUMINOSA`, `HOJA`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leguminosa => "LEGUMINOSA",
            Self::Hoja => "HOJA",
            Self::Fruto => "FRUTO",
            Self::Raiz => "RAIZ",
            Self::Otro => "OTRO",
        }
    }

    /// Parse a label. Unknown labels map to [`RotationCategory::Otro`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "LEGUMINOSA" => Self::Leguminosa,
            "HOJA" => Self::Hoja,
            "FRUTO" => Self::Fruto,
            "RAIZ" | "RAÍZ" => Self::Raiz,
            _ => Self::Otro,
        }
    }

    /// What this group does to the soil.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Leguminosa => {
                "Plantas que fijan nitrógeno en el suelo (Habas, Guisantes). Ideales para regenerar."
            }
            Self::Hoja => "Consumidoras intensas de nitrógeno (Lechugas, Coles).",
            Self::Fruto => "Requieren potasio y fósforo (Tomate, Calabacín).",
            Self::Raiz => {
                "Ayudan a airear el suelo y requieren menos nutrientes superficiales (Zanahoria, Patata)."
            }
            Self::Otro => "Categoría general de cultivo.",
        }
    }
}

impl core::fmt::Display for RotationCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a crop by name.
pub fn rotation_type(crop_name: &str) -> RotationCategory {
    let name = crop_name.to_lowercase();
    CATEGORY_NAMES
        .iter()
        .find(|(_, names)| names.iter().any(|n| name.contains(&n.to_lowercase())))
        .map_or(RotationCategory::Otro, |(category, _)| *category)
}

/// The category that should follow `current` in a bed.
///
/// Unclassified crops restart the cycle at legumes.
pub const fn next_in_rotation(current: RotationCategory) -> RotationCategory {
    match current {
        RotationCategory::Leguminosa => RotationCategory::Hoja,
        RotationCategory::Hoja => RotationCategory::Fruto,
        RotationCategory::Fruto => RotationCategory::Raiz,
        RotationCategory::Raiz | RotationCategory::Otro => RotationCategory::Leguminosa,
    }
}
