//! Spatial flood data
//!
//! The model only needs three questions answered about the map: where can a
//! household live, is a location inside the floodplain, and how deep does the
//! reference flood get there. [`FloodDataProvider`] captures that contract so a
//! raster-backed map can be dropped in; [`SyntheticFloodMap`] is a procedural
//! stand-in with a meandering river and a polygonal floodplain.

use geo::{Contains, LineString, Point, Polygon};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::FloodMapChoice;
use crate::core::types::Location;

pub trait FloodDataProvider: Send + Sync {
    /// Uniformly random location inside the map domain
    fn random_location(&self, rng: &mut ChaCha8Rng) -> Location;

    /// Whether a location lies inside the floodplain
    fn in_floodplain(&self, location: Location) -> bool;

    /// Reference-flood depth (m) at a location. Negative on high ground.
    fn estimated_depth(&self, location: Location) -> f64;
}

/// Side length of the square map domain (m)
const DOMAIN_SIZE: f64 = 10_000.0;

/// Vertex spacing along the river when building the floodplain polygon (m)
const POLYGON_RESOLUTION: f64 = 250.0;

/// Shape parameters of a synthetic flood scenario
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScenarioShape {
    /// Depth on the river centreline (m)
    peak_depth: f64,
    /// Distance from the centreline to the floodplain edge (m)
    floodplain_half_width: f64,
    /// Distance from the centreline at which depth reaches zero (m)
    dry_distance: f64,
}

impl ScenarioShape {
    fn for_choice(choice: FloodMapChoice) -> Self {
        match choice {
            FloodMapChoice::Harvey => Self {
                peak_depth: 3.0,
                floodplain_half_width: 2500.0,
                dry_distance: 3500.0,
            },
            FloodMapChoice::Year100 => Self {
                peak_depth: 1.5,
                floodplain_half_width: 1500.0,
                dry_distance: 2200.0,
            },
            FloodMapChoice::Year500 => Self {
                peak_depth: 2.2,
                floodplain_half_width: 2000.0,
                dry_distance: 2800.0,
            },
        }
    }
}

pub struct SyntheticFloodMap {
    shape: ScenarioShape,
    floodplain: Polygon<f64>,
}

impl SyntheticFloodMap {
    pub fn new(choice: FloodMapChoice) -> Self {
        let shape = ScenarioShape::for_choice(choice);
        let floodplain = build_floodplain(shape.floodplain_half_width);
        Self { shape, floodplain }
    }
}

/// River centreline y-coordinate at a given x
fn river_centreline(x: f64) -> f64 {
    DOMAIN_SIZE / 2.0 + 800.0 * (x / 1500.0).sin()
}

fn build_floodplain(half_width: f64) -> Polygon<f64> {
    let steps = (DOMAIN_SIZE / POLYGON_RESOLUTION) as usize;
    let xs: Vec<f64> = (0..=steps).map(|i| i as f64 * POLYGON_RESOLUTION).collect();

    let mut ring: Vec<(f64, f64)> = xs
        .iter()
        .map(|&x| (x, river_centreline(x) - half_width))
        .collect();
    ring.extend(
        xs.iter()
            .rev()
            .map(|&x| (x, river_centreline(x) + half_width)),
    );

    Polygon::new(LineString::from(ring), vec![])
}

impl FloodDataProvider for SyntheticFloodMap {
    fn random_location(&self, rng: &mut ChaCha8Rng) -> Location {
        Location::new(rng.gen_range(0.0..DOMAIN_SIZE), rng.gen_range(0.0..DOMAIN_SIZE))
    }

    fn in_floodplain(&self, location: Location) -> bool {
        self.floodplain.contains(&Point::from(location))
    }

    fn estimated_depth(&self, location: Location) -> f64 {
        let distance = (location.y - river_centreline(location.x)).abs();
        self.shape.peak_depth * (1.0 - distance / self.shape.dry_distance)
    }
}
