//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for households
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub u32);

impl HouseholdId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Simulation step counter
pub type Step = u32;

/// 2D position in map coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Location> for geo::Point<f64> {
    fn from(loc: Location) -> Self {
        geo::Point::new(loc.x, loc.y)
    }
}

/// Building type of a household dwelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HousingType {
    Detached,
    Attached,
}

impl HousingType {
    /// Only detached houses can be elevated
    pub fn can_elevate(&self) -> bool {
        matches!(self, Self::Detached)
    }
}

/// Mean of a set of values, 0.0 for an empty set
pub fn mean_or_zero(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
