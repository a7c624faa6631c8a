//! Static per-admission attributes and severity-group lookup tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Outcome recorded at ICU discharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DischargeStatus {
    Alive,
    Dead,
    Other,
    /// Missing or not coercible to text.
    #[default]
    Unknown,
}

impl DischargeStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Self::Unknown,
            "dead" => Self::Dead,
            "alive" => Self::Alive,
            _ => Self::Other,
        }
    }

    pub fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// Static attributes of one admission.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StaticRecord {
    pub discharge: DischargeStatus,
    /// Raw APACHE II diagnostic group code, `None` when not applicable.
    pub apache_ii_group: Option<f64>,
    pub apache_iv_group: Option<f64>,
}

/// Coarse phenotype category used as the phenotyping target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PhenotypeBucket(pub u32);

impl PhenotypeBucket {
    pub fn as_label(self) -> f64 {
        f64::from(self.0)
    }
}

/// Lookup from a raw severity group code to its phenotype bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct SeverityGroupMap(BTreeMap<i64, PhenotypeBucket>);

impl SeverityGroupMap {
    pub fn insert(&mut self, group: i64, bucket: PhenotypeBucket) {
        self.0.insert(group, bucket);
    }

    /// Bucket for a raw score; the score's integer part is the group code.
    pub fn bucket_for(&self, score: Option<f64>) -> Option<PhenotypeBucket> {
        let score = score.filter(|value| value.is_finite())?;
        self.0.get(&(score.trunc() as i64)).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, PhenotypeBucket)> for SeverityGroupMap {
    fn from_iter<I: IntoIterator<Item = (i64, PhenotypeBucket)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<BTreeMap<String, u32>> for SeverityGroupMap {
    type Error = ModelError;

    fn try_from(raw: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, bucket)| {
                key.trim()
                    .parse::<i64>()
                    .map(|group| (group, PhenotypeBucket(bucket)))
                    .map_err(|_| ModelError::InvalidGroupCode(key))
            })
            .collect()
    }
}

impl From<SeverityGroupMap> for BTreeMap<String, u32> {
    fn from(map: SeverityGroupMap) -> Self {
        map.0
            .into_iter()
            .map(|(group, bucket)| (group.to_string(), bucket.0))
            .collect()
    }
}

/// The two severity lookups, one per scoring system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityMaps {
    pub apache_ii: SeverityGroupMap,
    pub apache_iv: SeverityGroupMap,
}
