use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::PrefabSettings;
use crate::placement::PlacementError;

/// The prefabs a painter chooses from, in order.
#[derive(Debug, Clone, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(transparent)]
pub struct PrefabPalette {
    pub entries: Vec<PrefabSettings>,
}

impl PrefabPalette {
    pub fn new(entries: impl IntoIterator<Item = PrefabSettings>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Append a prefab.
    pub fn push(&mut self, settings: PrefabSettings) {
        self.entries.push(settings);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active entries in order.
    pub fn active(&self) -> impl Iterator<Item = &PrefabSettings> {
        self.entries.iter().filter(|entry| entry.active)
    }

    /// Pick an active prefab, weighted by its normalized probability.
    ///
    /// Entries with zero probability are never picked unless every active
    /// entry has zero probability, in which case the pick is uniform.
    pub fn select(&self, rng: &mut impl Rng) -> Result<&PrefabSettings, PlacementError> {
        if self.entries.is_empty() {
            return Err(PlacementError::EmptyPalette);
        }

        let total: f32 = self.active().map(weight).sum();

        if total <= 0.0 {
            let count = self.active().count();
            if count == 0 {
                return Err(PlacementError::NoActivePrefab);
            }
            let index = rng.random_range(0..count);
            return self.active().nth(index).ok_or(PlacementError::NoActivePrefab);
        }

        let random: f32 = rng.random();
        let mut bound = 0.0;
        let mut last_weighted = None;

        for entry in self.active() {
            let entry_weight = weight(entry);
            if entry_weight <= 0.0 {
                continue;
            }
            bound += entry_weight / total;
            if bound >= random {
                return Ok(entry);
            }
            last_weighted = Some(entry);
        }

        // Rounding can leave the final bound a hair below 1.0
        last_weighted.ok_or(PlacementError::NoActivePrefab)
    }
}

/// Selection weight; negative and non-finite probabilities count as zero.
fn weight(entry: &PrefabSettings) -> f32 {
    if entry.probability.is_finite() {
        entry.probability.max(0.0)
    } else {
        0.0
    }
}
