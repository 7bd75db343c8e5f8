//! Wire identity, endpoints, and runtime charge state.

use geo_types::Coord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plane {
    U,
    V,
    Y,
}

/// A single physical wire within one plane family.
///
/// `charge` and `cell_ids` are runtime state populated after construction —
/// they are excluded from serialization, which only ever persists geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    pub id: usize,
    pub plane: Plane,
    /// Signed Y-intercept (U/V) or Z-coordinate (Y) in the canonical frame.
    pub location: f64,
    pub endpoints: (Coord<f64>, Coord<f64>),
    #[serde(skip, default)]
    pub charge: f64,
    #[serde(skip, default)]
    pub cell_ids: Vec<usize>,
}

impl Wire {
    pub fn new(id: usize, plane: Plane, location: f64, endpoints: (Coord<f64>, Coord<f64>)) -> Self {
        Self {
            id,
            plane,
            location,
            endpoints,
            charge: 0.0,
            cell_ids: Vec::new(),
        }
    }
}
