//! Catalogue data model

use crate::error::CatalogueError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Number of swarasthanas in an octave
pub const SWARA_COUNT: usize = 12;

/// Index of one of the twelve swarasthanas (0 = Sa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwaraIndex(u8);

impl SwaraIndex {
    /// Returns `None` when `index` is outside `0..12`
    pub fn new(index: usize) -> Option<Self> {
        if index < SWARA_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// All twelve indices in ascending order
    pub fn all() -> impl Iterator<Item = SwaraIndex> {
        (0..SWARA_COUNT as u8).map(SwaraIndex)
    }
}

impl fmt::Display for SwaraIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SwaraIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Set of swara indices, stored as a 12-bit mask.
///
/// Iteration is always ascending, so serialized sets are sorted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwaraSet(u16);

impl SwaraSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from raw integers, rejecting anything outside `0..=11`.
    /// Duplicates are tolerated.
    pub fn from_raw(raga: &str, indices: &[i64]) -> Result<Self, CatalogueError> {
        let mut set = Self::empty();
        for &index in indices {
            let swara = usize::try_from(index)
                .ok()
                .and_then(SwaraIndex::new)
                .ok_or_else(|| CatalogueError::IndexOutOfRange {
                    raga: raga.to_string(),
                    index,
                })?;
            set.insert(swara);
        }
        Ok(set)
    }

    pub fn insert(&mut self, swara: SwaraIndex) {
        self.0 |= 1 << swara.0;
    }

    pub fn contains(&self, swara: SwaraIndex) -> bool {
        self.0 & (1 << swara.0) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members of `self` that are not in `other`
    pub fn difference(&self, other: &SwaraSet) -> SwaraSet {
        SwaraSet(self.0 & !other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = SwaraIndex> + '_ {
        SwaraIndex::all().filter(move |s| self.contains(*s))
    }

    /// Sorted plain indices, as exposed in reports
    pub fn to_indices(&self) -> Vec<usize> {
        self.iter().map(SwaraIndex::get).collect()
    }
}

impl FromIterator<SwaraIndex> for SwaraSet {
    fn from_iter<I: IntoIterator<Item = SwaraIndex>>(iter: I) -> Self {
        let mut set = SwaraSet::empty();
        for swara in iter {
            set.insert(swara);
        }
        set
    }
}

impl fmt::Debug for SwaraSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(SwaraIndex::get)).finish()
    }
}

impl Serialize for SwaraSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A named scale and the swaras it permits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RagaDefinition {
    pub name: String,
    pub allowed: SwaraSet,
}

impl RagaDefinition {
    pub fn new(name: impl Into<String>, allowed: SwaraSet) -> Self {
        Self {
            name: name.into(),
            allowed,
        }
    }
}

/// Ordered, read-only collection of raga definitions.
///
/// Order is the order of the source document and is what ranking falls
/// back to when two ragas score the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    ragas: Vec<RagaDefinition>,
}

impl Catalogue {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalogue, rejecting duplicate names
    pub fn from_definitions(ragas: Vec<RagaDefinition>) -> Result<Self, CatalogueError> {
        for (i, raga) in ragas.iter().enumerate() {
            if ragas[..i].iter().any(|other| other.name == raga.name) {
                return Err(CatalogueError::DuplicateName(raga.name.clone()));
            }
        }
        Ok(Self { ragas })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RagaDefinition> {
        self.ragas.iter()
    }

    pub fn len(&self) -> usize {
        self.ragas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ragas.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RagaDefinition> {
        self.ragas.iter().find(|r| r.name == name)
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a RagaDefinition;
    type IntoIter = std::slice::Iter<'a, RagaDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
