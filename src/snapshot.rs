//! Serde support for [`Vector`].
//!
//! A vector serializes as its [`VectorSnapshot`]: the items plus the
//! capacity and multiplier, so a round trip keeps the growth behavior.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SnapshotError;
use crate::vector::Vector;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorSnapshot {
    pub items: Vec<i64>,
    pub capacity: usize,
    pub multiplier: usize,
}

impl TryFrom<VectorSnapshot> for Vector {
    type Error = SnapshotError;

    /// Capacity is raised to the item count if the snapshot understates it,
    /// and rejected above [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    fn try_from(snapshot: VectorSnapshot) -> Result<Self, Self::Error> {
        Vector::from_snapshot(snapshot)
    }
}

impl Serialize for Vector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Vector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = VectorSnapshot::deserialize(deserializer)?;
        Vector::from_snapshot(snapshot).map_err(D::Error::custom)
    }
}
