//! Persistence: a geometry-only snapshot of a built [`crate::tiling::Tiling`].
//!
//! Only wire and cell geometry round-trips. Runtime state — wire and cell
//! charge, hit classification — is never written (see the `#[serde(skip)]`
//! fields on [`crate::wire::Wire`] and [`crate::cell::Cell`]) and always
//! comes back zeroed/`HitType::None` on load.

use crate::cell::Cell;
use crate::error::Result;
use crate::params::{DerivedParams, DetectorParams};
use crate::tiling::Tiling;
use crate::wire::{Plane, Wire};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TilingSnapshot {
    pub params: DetectorParams,
    pub u_wires: Vec<Wire>,
    pub v_wires: Vec<Wire>,
    pub y_wires: Vec<Wire>,
    pub cells: Vec<Cell>,
}

impl TilingSnapshot {
    pub fn from_tiling(tiling: &Tiling) -> Self {
        Self {
            params: tiling.params().clone(),
            u_wires: tiling.wires(Plane::U).to_vec(),
            v_wires: tiling.wires(Plane::V).to_vec(),
            y_wires: tiling.wires(Plane::Y).to_vec(),
            cells: tiling.cells().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Rebuilds a [`Tiling`] from stored geometry without regenerating it —
    /// cheaper than [`Tiling::build`] when the geometry is already trusted.
    /// `params` is re-validated here: a snapshot loaded from untrusted or
    /// hand-edited JSON is not known-good just because it deserialized.
    pub fn into_tiling(self) -> Result<Tiling> {
        let derived = DerivedParams::compute(&self.params)?;
        Ok(Tiling::from_parts(
            self.params,
            derived,
            self.u_wires,
            self.v_wires,
            self.y_wires,
            self.cells,
        ))
    }
}
