//! Companion-planting reference for the fruit trees and vegetables grown
//! on the farm.
//!
//! Each plant lists its known interactions with other plants. Lookups are
//! directional first (what does `a` think of `b`), then reciprocal (what
//! does `b` think of `a`), then fall back to a neutral verdict.

use serde::Serialize;

/// How well two plants grow next to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompatibilityType {
    /// Strongly beneficial pairing.
    Excellent,
    /// Beneficial pairing.
    Good,
    /// No known interaction.
    Neutral,
    /// Mildly harmful pairing.
    Bad,
    /// One plant actively inhibits the other.
    Antagonistic,
}

/// One directional interaction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompatibilityRule {
    /// Plant id the rule points at.
    pub target: &'static str,
    /// Verdict.
    #[serde(rename = "type")]
    pub kind: CompatibilityType,
    /// Short agronomic explanation.
    pub reason: &'static str,
}

/// Result of a compatibility lookup.
///
/// Owned because the neutral fallback echoes the caller's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compatibility {
    /// Plant the verdict refers to.
    pub target: String,
    /// Verdict.
    #[serde(rename = "type")]
    pub kind: CompatibilityType,
    /// Short agronomic explanation.
    pub reason: String,
}

impl From<&CompatibilityRule> for Compatibility {
    fn from(rule: &CompatibilityRule) -> Self {
        Self {
            target: rule.target.to_owned(),
            kind: rule.kind,
            reason: rule.reason.to_owned(),
        }
    }
}

/// Whether a plant is a fruit tree or a vegetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlantKind {
    /// Perennial fruit or nut tree.
    FruitTree,
    /// Annual vegetable.
    Vegetable,
}

/// A catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlantInfo {
    /// Stable English identifier (`apple`, `tomato`, ...).
    pub id: &'static str,
    /// Display name, with the Asturian name in parentheses where common.
    pub name: &'static str,
    /// Tree or vegetable.
    pub kind: PlantKind,
    /// Growing notes.
    pub description: &'static str,
    /// Benefits to the rest of the farm.
    pub benefits: &'static [&'static str],
    /// Plants this one harms.
    pub rivals: &'static [&'static str],
    /// Pollination requirements.
    pub pollination: Option<&'static str>,
    /// Interaction rules.
    pub compatibilities: &'static [CompatibilityRule],
}

const fn rule(
    target: &'static str,
    kind: CompatibilityType,
    reason: &'static str,
) -> CompatibilityRule {
    CompatibilityRule {
        target,
        kind,
        reason,
    }
}

use CompatibilityType::{Antagonistic, Bad, Excellent, Good, Neutral};

/// Every plant in the catalogue: fruit trees first, then vegetables.
pub static ALL_PLANTS: &[PlantInfo] = &[
    PlantInfo {
        id: "apple",
        name: "Manzano (Pumar)",
        kind: PlantKind::FruitTree,
        description: "El rey de Asturias. Necesita espacio y buena aireación.",
        benefits: &["Atrae polinizadores", "Provee sombra ligera"],
        rivals: &[],
        pollination: Some(
            "Necesita otra variedad compatible para polinización cruzada (ej. Reineta + Golden).",
        ),
        compatibilities: &[
            rule("clover", Excellent, "Fija nitrógeno y cubre el suelo."),
            rule("garlic", Good, "Repele plagas y hongos."),
            rule("walnut", Antagonistic, "La juglona del nogal inhibe su crecimiento."),
            rule("hazelnut", Neutral, "Crecen bien cerca si hay espacio."),
        ],
    },
    PlantInfo {
        id: "pear",
        name: "Peral",
        kind: PlantKind::FruitTree,
        description: "Sensible al exceso de humedad en raíces. Gran productor.",
        benefits: &[],
        rivals: &[],
        pollination: Some("La mayoría requiere un polinizador cercano."),
        compatibilities: &[
            rule("apple", Good, "Comparten requerimientos similares."),
            rule("lavender", Excellent, "Atrae abejas esenciales para su fruto."),
            rule("walnut", Antagonistic, "Sensible al nogal."),
        ],
    },
    PlantInfo {
        id: "cherry",
        name: "Cerezo",
        kind: PlantKind::FruitTree,
        description: "Crecimiento rápido. Sensible a la mosca de la fruta.",
        benefits: &[],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("onion", Good, "Ayuda a repeler insectos."),
            rule("plum", Good, "Suelen llevarse bien en fincas mixtas."),
        ],
    },
    PlantInfo {
        id: "walnut",
        name: "Nogal (Nucal)",
        kind: PlantKind::FruitTree,
        description: "Árbol imponente. Produce juglona, una toxina alelopática.",
        benefits: &[],
        rivals: &["Manzano", "Peral", "Tomate", "Patata"],
        pollination: None,
        compatibilities: &[
            rule("grass", Bad, "Incluso la hierba crece con dificultad bajo su copa."),
            rule("currant", Good, "Las grosellas toleran mejor la juglona."),
        ],
    },
    PlantInfo {
        id: "hazelnut",
        name: "Avellano (Ablanal)",
        kind: PlantKind::FruitTree,
        description: "Típico del paisaje asturiano. Resistente y rústico.",
        benefits: &[],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("apple", Good, "Buen compañero de lindes."),
            rule("plum", Good, "Raíces compatibles."),
        ],
    },
    PlantInfo {
        id: "plum",
        name: "Ciruelo",
        kind: PlantKind::FruitTree,
        description: "Muy productivo en Asturias. Soporta bien el frío.",
        benefits: &[],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("cherry", Good, "Cuidados similares."),
            rule("garlic", Excellent, "Reduce el riesgo de hongos."),
        ],
    },
    PlantInfo {
        id: "lemon",
        name: "Limonero",
        kind: PlantKind::FruitTree,
        description: "Sensible a heladas. Necesita sol y reparo.",
        benefits: &[],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("rosemary", Good, "Protección biológica y estética."),
            rule("mint", Good, "Mantiene la humedad y ahuyenta el pulgón."),
        ],
    },
    PlantInfo {
        id: "tomato",
        name: "Tomate",
        kind: PlantKind::Vegetable,
        description: "Cultivo estrella del verano. Necesita mucho sol y riego regular.",
        benefits: &["Fácil de cultivar", "Alta producción"],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("basil", Excellent, "La albahaca mejora su sabor y protege de plagas."),
            rule("onion", Good, "Ayudan a repeler insectos."),
            rule("potato", Antagonistic, "Peligro de transmisión de tizón y virus."),
            rule("walnut", Antagonistic, "Muy sensible a la juglona."),
        ],
    },
    PlantInfo {
        id: "potato",
        name: "Patata",
        kind: PlantKind::Vegetable,
        description: "Tubérculo fundamental. Prefiere suelos sueltos.",
        benefits: &[],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("beans", Excellent, "Las judías fijan nitrógeno que la patata agradece."),
            rule("tomato", Bad, "Comparten plagas y enfermedades."),
        ],
    },
    PlantInfo {
        id: "onion",
        name: "Cebolla",
        kind: PlantKind::Vegetable,
        description: "Muy versátil. Ayuda a proteger otras plantas.",
        benefits: &[],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("carrot", Excellent, "La cebolla ahuyenta la mosca de la zanahoria."),
            rule("tomato", Excellent, "Gran pareja en el huerto."),
            rule("peas", Antagonistic, "La cebolla inhibe el crecimiento de las leguminosas."),
        ],
    },
    PlantInfo {
        id: "broccoli",
        name: "Brócoli",
        kind: PlantKind::Vegetable,
        description: "Cultivo de temporada fresca, rico en vitaminas.",
        benefits: &[],
        rivals: &[],
        pollination: None,
        compatibilities: &[
            rule("potato", Good, "Se ayudan en la absorción de nutrientes."),
            rule("onion", Good, "La cebolla camufla su olor ante las plagas."),
            rule("tomato", Bad, "Compiten por recursos y atraen plagas similares."),
        ],
    },
];

/// Reason given when no rule exists in either direction.
pub const NEUTRAL_REASON: &str = "No hay interacciones conocidas especiales.";

/// Iterate over the fruit trees in the catalogue.
pub fn fruit_trees() -> impl Iterator<Item = &'static PlantInfo> {
    ALL_PLANTS.iter().filter(|p| p.kind == PlantKind::FruitTree)
}

/// Iterate over the vegetables in the catalogue.
pub fn vegetables() -> impl Iterator<Item = &'static PlantInfo> {
    ALL_PLANTS.iter().filter(|p| p.kind == PlantKind::Vegetable)
}

/// Find a plant by exact id or case-insensitive name substring.
pub fn find_plant(query: &str) -> Option<&'static PlantInfo> {
    let needle = query.to_lowercase();
    ALL_PLANTS
        .iter()
        .find(|p| p.id == query || p.name.to_lowercase().contains(&needle))
}

/// Find the rule in `plant` that targets `other` (exact id or substring).
fn rule_for(plant: &'static PlantInfo, other: &str) -> Option<&'static CompatibilityRule> {
    let other_lower = other.to_lowercase();
    plant
        .compatibilities
        .iter()
        .find(|c| c.target == other || other_lower.contains(&c.target.to_lowercase()))
}

/// Look up how `first` and `second` grow together.
///
/// Returns `None` when `first` is not in the catalogue. Otherwise tries the
/// direct rule, then the reciprocal rule, and finally a neutral verdict.
pub fn compatibility(first: &str, second: &str) -> Option<Compatibility> {
    let plant = find_plant(first)?;

    if let Some(direct) = rule_for(plant, second) {
        return Some(direct.into());
    }

    if let Some(reciprocal) = find_plant(second).and_then(|other| rule_for(other, first)) {
        return Some(reciprocal.into());
    }

    Some(Compatibility {
        target: second.to_owned(),
        kind: CompatibilityType::Neutral,
        reason: NEUTRAL_REASON.to_owned(),
    })
}
