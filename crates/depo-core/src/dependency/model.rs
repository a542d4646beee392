//! Dependency domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{DepoError, Result};

/// The client's view of one declared or resolved dependency.
///
/// `name` is the stable identity; every other field may be absent or change
/// across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DependencyRecord {
    /// Unique key within a project
    pub name: String,

    /// Registry display name (e.g. `owner/repo`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Source location of the dependency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Resolved version reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// User-specified version constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_constraint: Option<String>,

    /// Install status reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<bool>,
}

impl DependencyRecord {
    /// Creates a record carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.version_constraint = Some(constraint.into());
        self
    }

    /// Name shown in candidate lists: the full name when known.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }
}

/// Name-keyed snapshot of what the backend reports for the active project.
///
/// A snapshot is only ever built whole from a backend response; there is no
/// API for inserting or removing single records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DependencySet {
    records: BTreeMap<String, DependencyRecord>,
}

impl DependencySet {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from the list shape the backend returns.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if two records share a name.
    pub fn from_records(records: impl IntoIterator<Item = DependencyRecord>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for record in records {
            let name = record.name.clone();
            if map.insert(name.clone(), record).is_some() {
                return Err(DepoError::invariant(format!(
                    "duplicate dependency name '{}' in backend snapshot",
                    name
                )));
            }
        }
        Ok(Self { records: map })
    }

    pub fn get(&self, name: &str) -> Option<&DependencyRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in name order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.records.values()
    }
}

/// Candidates returned by a registry lookup, keyed by name.
///
/// Independent of [`DependencySet`]; never merged into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SearchResult {
    /// The query that produced these candidates
    pub query: String,
    candidates: BTreeMap<String, DependencyRecord>,
}

impl SearchResult {
    /// Creates an empty search result.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            candidates: BTreeMap::new(),
        }
    }

    /// Builds a result from the list shape the backend returns.
    ///
    /// Registries may list several sources under the same name; the first
    /// (highest ranked) one is kept.
    pub fn from_candidates(
        query: impl Into<String>,
        candidates: impl IntoIterator<Item = DependencyRecord>,
    ) -> Self {
        let mut map = BTreeMap::new();
        for candidate in candidates {
            map.entry(candidate.name.clone()).or_insert(candidate);
        }
        Self {
            query: query.into(),
            candidates: map,
        }
    }

    pub fn get(&self, name: &str) -> Option<&DependencyRecord> {
        self.candidates.get(name)
    }

    /// Looks up a candidate by case-insensitive name comparison.
    ///
    /// An exact match wins over a case-folded one.
    pub fn find_ignore_case(&self, name: &str) -> Option<&DependencyRecord> {
        self.candidates.get(name).or_else(|| {
            self.candidates
                .values()
                .find(|candidate| candidate.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.candidates.values()
    }
}
