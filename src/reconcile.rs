//! Add/update/delete diffs between keyed entity collections.
//!
//! A [`Diff`] serializes to the flat shape particle engines consume:
//! `{"_add": [{"key": k, "state": v}, ...], "_delete": [k, ...], k: v, ...}`,
//! where the plain entries carry every key present in both collections.
//! Plain keys are written as map keys, i.e. strings in JSON, and parsed back
//! with [`FromStr`] when the diff is read.

use crate::model::monomer::{MonomerState, Particle, Topology};
use crate::model::types::{EntityId, Point3};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

const ADD_KEY: &str = "_add";
const DELETE_KEY: &str = "_delete";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Added<K, V> {
    pub key: K,
    pub state: V,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diff<K: Ord, V> {
    #[serde(rename = "_add")]
    pub add: Vec<Added<K, V>>,
    #[serde(rename = "_delete")]
    pub delete: Vec<K>,
    #[serde(flatten)]
    pub update: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for Diff<K, V> {
    fn default() -> Self {
        Self {
            add: Vec::new(),
            delete: Vec::new(),
            update: BTreeMap::new(),
        }
    }
}

impl<'de, K, V> Deserialize<'de> for Diff<K, V>
where
    K: Ord + FromStr + Deserialize<'de>,
    K::Err: fmt::Display,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DiffVisitor(PhantomData))
    }
}

struct DiffVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for DiffVisitor<K, V>
where
    K: Ord + FromStr + Deserialize<'de>,
    K::Err: fmt::Display,
    V: Deserialize<'de>,
{
    type Value = Diff<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map with optional `{ADD_KEY}` and `{DELETE_KEY}` entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut out = Diff::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                ADD_KEY => out.add = map.next_value()?,
                DELETE_KEY => out.delete = map.next_value()?,
                other => {
                    let parsed = other.parse::<K>().map_err(|e| {
                        de::Error::custom(format!("invalid diff key '{other}': {e}"))
                    })?;
                    let state = map.next_value()?;
                    if out.update.insert(parsed, state).is_some() {
                        return Err(de::Error::custom(format!("duplicate diff key '{other}'")));
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Computes the transition from `previous` to `current`.
pub fn diff<K, V>(previous: &BTreeMap<K, V>, current: &BTreeMap<K, V>) -> Diff<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    let mut out = Diff::default();
    for (key, state) in current {
        if previous.contains_key(key) {
            out.update.insert(key.clone(), state.clone());
        } else {
            out.add.push(Added {
                key: key.clone(),
                state: state.clone(),
            });
        }
    }
    out.delete = previous
        .keys()
        .filter(|key| !current.contains_key(*key))
        .cloned()
        .collect();
    out
}

impl<K: Ord + Clone, V: Clone> Diff<K, V> {
    /// Overwrites kept keys, inserts added ones and removes deleted ones.
    pub fn apply(&self, target: &mut BTreeMap<K, V>) {
        for key in &self.delete {
            target.remove(key);
        }
        for (key, state) in &self.update {
            target.insert(key.clone(), state.clone());
        }
        for added in &self.add {
            target.insert(added.key.clone(), added.state.clone());
        }
    }

    #[inline]
    pub fn added(&self) -> usize {
        self.add.len()
    }

    #[inline]
    pub fn deleted(&self) -> usize {
        self.delete.len()
    }
}

/// One tick's worth of change to a [`MonomerState`]: the box geometry plus
/// independent topology and particle diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonomerUpdate {
    pub box_center: Point3,
    pub box_size: f64,
    pub topologies: Diff<EntityId, Topology>,
    pub particles: Diff<EntityId, Particle>,
}

impl MonomerUpdate {
    pub fn between(previous: &MonomerState, current: &MonomerState) -> Self {
        Self {
            box_center: current.box_center,
            box_size: current.box_size,
            topologies: diff(&previous.topologies, &current.topologies),
            particles: diff(&previous.particles, &current.particles),
        }
    }
}

impl MonomerState {
    pub fn apply(&mut self, update: &MonomerUpdate) {
        self.box_center = update.box_center;
        self.box_size = update.box_size;
        update.topologies.apply(&mut self.topologies);
        update.particles.apply(&mut self.particles);
    }
}
