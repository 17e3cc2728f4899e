//! JSON catalogue source
//!
//! The source is a single object mapping raga name to a list of swara
//! indices:
//!
//! ```json
//! { "Mayamalavagowla": [0, 1, 4, 5, 7, 8, 11], "Mohanam": [0, 2, 4, 7, 9] }
//! ```
//!
//! Entries keep document order.

use crate::error::CatalogueError;
use crate::format::{Catalogue, RagaDefinition, SwaraSet};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::path::Path;

/// Raw entries exactly as they appear in the document
#[derive(Debug, Clone, Default)]
pub struct CatalogueJson {
    pub entries: Vec<(String, Vec<i64>)>,
}

impl<'de> Deserialize<'de> for CatalogueJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = CatalogueJson;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping raga names to lists of swara indices")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, indices)) = map.next_entry::<String, Vec<i64>>()? {
                    entries.push((name, indices));
                }
                Ok(CatalogueJson { entries })
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl CatalogueJson {
    /// Validate raw entries into a catalogue
    pub fn into_catalogue(self) -> Result<Catalogue, CatalogueError> {
        let definitions = self
            .entries
            .into_iter()
            .map(|(name, indices)| {
                let allowed = SwaraSet::from_raw(&name, &indices)?;
                Ok(RagaDefinition::new(name, allowed))
            })
            .collect::<Result<Vec<_>, CatalogueError>>()?;
        Catalogue::from_definitions(definitions)
    }
}

impl Catalogue {
    /// Parse a catalogue from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, CatalogueError> {
        let raw: CatalogueJson = serde_json::from_str(json)?;
        raw.into_catalogue()
    }

    /// Load a catalogue from a JSON file
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalogue = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} raga definitions from {}",
            catalogue.len(),
            path.display()
        );
        Ok(catalogue)
    }

    /// Load a catalogue, degrading to an empty one if the source is missing
    /// or malformed. Requests then rank ragas on missing swaras alone.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalogue) => catalogue,
            Err(e) => {
                log::warn!("Catalogue unavailable, continuing with an empty one: {}", e);
                Self::empty()
            }
        }
    }
}
