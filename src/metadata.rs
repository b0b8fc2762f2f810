//! Metadata lookup: the engine's read-only view of species, skill and item
//! templates plus the type chart. Battles never mutate any of this.

use crate::errors::{DataError, DataResult};
use schema::{ItemData, ItemId, SkillData, SkillId, SpeciesData, SpeciesId, TypeChart};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read-only access to game data. The engine is generic over this so tests
/// can supply a handful of fixtures instead of a full data set.
pub trait MetadataProvider {
    fn species(&self, id: SpeciesId) -> DataResult<&SpeciesData>;
    fn skill(&self, id: SkillId) -> DataResult<&SkillData>;
    fn item(&self, id: ItemId) -> DataResult<&ItemData>;
    fn type_chart(&self) -> &TypeChart;
}

/// In-memory metadata store backed by hash maps.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    species: HashMap<SpeciesId, SpeciesData>,
    skills: HashMap<SkillId, SkillData>,
    items: HashMap<ItemId, ItemData>,
    chart: TypeChart,
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MetadataFile {
    species: Vec<SpeciesData>,
    skills: Vec<SkillData>,
    items: Vec<ItemData>,
    type_chart: TypeChart,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self {
            species: HashMap::new(),
            skills: HashMap::new(),
            items: HashMap::new(),
            chart: TypeChart::neutral(),
        }
    }

    /// Load a complete data set from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())
            .map_err(|source| LoadError::Io {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        let parsed: MetadataFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| LoadError::Parse {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        let mut store = Self::new();
        for species in parsed.species {
            store.insert_species(species);
        }
        for skill in parsed.skills {
            store.insert_skill(skill);
        }
        for item in parsed.items {
            store.insert_item(item);
        }
        store.chart = parsed.type_chart;
        Ok(store)
    }

    pub fn insert_species(&mut self, data: SpeciesData) -> &mut Self {
        self.species.insert(data.id, data);
        self
    }

    pub fn insert_skill(&mut self, data: SkillData) -> &mut Self {
        self.skills.insert(data.id, data);
        self
    }

    pub fn insert_item(&mut self, data: ItemData) -> &mut Self {
        self.items.insert(data.id, data);
        self
    }

    pub fn set_type_chart(&mut self, chart: TypeChart) -> &mut Self {
        self.chart = chart;
        self
    }
}

impl MetadataProvider for MetadataStore {
    fn species(&self, id: SpeciesId) -> DataResult<&SpeciesData> {
        self.species.get(&id).ok_or(DataError::MissingSpecies(id))
    }

    fn skill(&self, id: SkillId) -> DataResult<&SkillData> {
        self.skills.get(&id).ok_or(DataError::MissingSkill(id))
    }

    fn item(&self, id: ItemId) -> DataResult<&ItemData> {
        self.items.get(&id).ok_or(DataError::MissingItem(id))
    }

    fn type_chart(&self) -> &TypeChart {
        &self.chart
    }
}

/// Failures loading metadata from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ids_surface_as_data_errors() {
        let store = MetadataStore::new();
        assert_eq!(
            store.species(SpeciesId(99)).unwrap_err(),
            DataError::MissingSpecies(SpeciesId(99))
        );
        assert_eq!(
            store.skill(SkillId(99)).unwrap_err(),
            DataError::MissingSkill(SkillId(99))
        );
        assert_eq!(
            store.item(ItemId(99)).unwrap_err(),
            DataError::MissingItem(ItemId(99))
        );
    }
}
