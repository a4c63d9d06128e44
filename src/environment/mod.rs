//! External collaborators of the core model
//!
//! Social network topology, the spatial flood provider, and the depth-damage curve.

pub mod damage;
pub mod flood_map;
pub mod network;

pub use damage::basic_flood_damage;
pub use flood_map::{FloodDataProvider, SyntheticFloodMap};
pub use network::SocialNetwork;
