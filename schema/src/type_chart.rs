use crate::element::ElementType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry in the type-effectiveness table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeMatchup {
    pub attacking: ElementType,
    pub defending: ElementType,
    pub multiplier: f32,
}

/// Read-only type-effectiveness lookup table. Pairs not present default
/// to a neutral 1.0 contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeMatchup>", into = "Vec<TypeMatchup>")]
pub struct TypeChart {
    entries: HashMap<(ElementType, ElementType), f32>,
}

impl TypeChart {
    pub fn new(matchups: Vec<TypeMatchup>) -> Self {
        let entries = matchups
            .into_iter()
            .map(|m| ((m.attacking, m.defending), m.multiplier))
            .collect();
        Self { entries }
    }

    /// Table with no entries; every matchup is neutral.
    pub fn neutral() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Contribution of a single defending type against an attacking type.
    pub fn contribution(&self, attacking: ElementType, defending: ElementType) -> f32 {
        self.entries
            .get(&(attacking, defending))
            .copied()
            .unwrap_or(1.0)
    }
}

impl From<Vec<TypeMatchup>> for TypeChart {
    fn from(matchups: Vec<TypeMatchup>) -> Self {
        Self::new(matchups)
    }
}

impl From<TypeChart> for Vec<TypeMatchup> {
    fn from(chart: TypeChart) -> Self {
        let mut matchups: Vec<TypeMatchup> = chart
            .entries
            .into_iter()
            .map(|((attacking, defending), multiplier)| TypeMatchup {
                attacking,
                defending,
                multiplier,
            })
            .collect();
        matchups.sort_by_key(|m| (format!("{:?}", m.attacking), format!("{:?}", m.defending)));
        matchups
    }
}
