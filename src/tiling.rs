//! Tiling index (T): owns the generated wires and built cells, and keeps
//! the bidirectional wire<->cell index.

use crate::cell::{self, Cell};
use crate::error::Result;
use crate::hit;
use crate::params::{DerivedParams, DetectorParams};
use crate::plane;
use crate::wire::{Plane, Wire};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The fully built tiling for one detector face: three wire families plus
/// every cell their intersections form.
pub struct Tiling {
    params: DetectorParams,
    derived: DerivedParams,
    u_wires: Vec<Wire>,
    v_wires: Vec<Wire>,
    y_wires: Vec<Wire>,
    cells: Vec<Cell>,
}

impl Tiling {
    /// Validates `params`, generates all wires, and constructs every cell.
    pub fn build(params: DetectorParams) -> Result<Self> {
        let derived = DerivedParams::compute(&params)?;
        let (u_wires, v_wires, y_wires) = plane::generate_all(&params, &derived);
        let cells = cell::construct_cells(&params, &derived);

        let mut tiling = Self {
            params,
            derived,
            u_wires,
            v_wires,
            y_wires,
            cells,
        };
        tiling.index_cells();
        Ok(tiling)
    }

    /// Rebuilds a tiling from already-generated geometry (e.g. loaded from
    /// a [`crate::serialize::TilingSnapshot`]), re-deriving the wire<->cell
    /// index rather than regenerating the geometry itself.
    pub fn from_parts(
        params: DetectorParams,
        derived: DerivedParams,
        u_wires: Vec<Wire>,
        v_wires: Vec<Wire>,
        y_wires: Vec<Wire>,
        cells: Vec<Cell>,
    ) -> Self {
        let mut tiling = Self {
            params,
            derived,
            u_wires,
            v_wires,
            y_wires,
            cells,
        };
        tiling.index_cells();
        tiling
    }

    /// Appends each cell's id to the `cell_ids` of every wire it genuinely
    /// bounds, skipping virtual wire ids (§4.4) — those exist only as
    /// identifiers and never resolve to a real `Wire`.
    fn index_cells(&mut self) {
        for cell in &self.cells {
            if cell::is_real_wire_id(cell.u_wire_id, self.u_wires.len()) {
                self.u_wires[cell.u_wire_id as usize].cell_ids.push(cell.id);
            }
            if cell::is_real_wire_id(cell.v_wire_id, self.v_wires.len()) {
                self.v_wires[cell.v_wire_id as usize].cell_ids.push(cell.id);
            }
            if cell::is_real_wire_id(cell.y_wire_id, self.y_wires.len()) {
                self.y_wires[cell.y_wire_id as usize].cell_ids.push(cell.id);
            }
        }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn derived(&self) -> &DerivedParams {
        &self.derived
    }

    pub fn wires(&self, plane: Plane) -> &[Wire] {
        match plane {
            Plane::U => &self.u_wires,
            Plane::V => &self.v_wires,
            Plane::Y => &self.y_wires,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cell(&self, id: usize) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Cells bounded by the given wire, or `None` for an out-of-range id.
    /// A cell referencing a virtual wire id never appears in any wire's
    /// list, so this never needs to distinguish "virtual" from "absent".
    pub fn cells_on_wire(&self, plane: Plane, wire_id: usize) -> Option<&[usize]> {
        self.wires(plane).get(wire_id).map(|w| w.cell_ids.as_slice())
    }

    /// The (U, V, Y) wire ids bounding a cell. Each may be a virtual id —
    /// use [`cell::is_real_wire_id`] against the matching `wires(plane).len()`
    /// before treating it as an index.
    pub fn wires_of_cell(&self, cell_id: usize) -> Option<(i64, i64, i64)> {
        self.cells
            .get(cell_id)
            .map(|c| (c.u_wire_id, c.v_wire_id, c.y_wire_id))
    }

    /// Finds the cell bounded by exactly this (U, V, Y) triple, if one was
    /// built. O(cells on the Y wire) rather than a linear scan.
    pub fn cell_for_triple(&self, u_id: i64, v_id: i64, y_id: i64) -> Option<&Cell> {
        if !cell::is_real_wire_id(y_id, self.y_wires.len()) {
            return None;
        }
        self.y_wires[y_id as usize]
            .cell_ids
            .iter()
            .map(|&id| &self.cells[id])
            .find(|c| c.u_wire_id == u_id && c.v_wire_id == v_id)
    }

    /// Adds `amount` to a cell's true charge and to the charge of every
    /// real (non-virtual) wire bounding it. Silently does nothing for an
    /// out-of-range `cell_id` (query-time errors are never fatal, §7).
    pub fn inject_charge(&mut self, cell_id: usize, amount: f64) {
        let Some(cell) = self.cells.get_mut(cell_id) else {
            return;
        };
        cell.true_charge += amount;
        let (u, v, y) = (cell.u_wire_id, cell.v_wire_id, cell.y_wire_id);

        if cell::is_real_wire_id(u, self.u_wires.len()) {
            self.u_wires[u as usize].charge += amount;
        }
        if cell::is_real_wire_id(v, self.v_wires.len()) {
            self.v_wires[v as usize].charge += amount;
        }
        if cell::is_real_wire_id(y, self.y_wires.len()) {
            self.y_wires[y as usize].charge += amount;
        }
    }

    /// Classifies every cell's hit type from the current wire charges
    /// (§4.5). Idempotent: re-running without further charge injection
    /// reproduces the same classification.
    pub fn classify_hits(&mut self) {
        let u = &self.u_wires;
        let v = &self.v_wires;
        let y = &self.y_wires;

        #[cfg(feature = "parallel")]
        {
            self.cells
                .par_iter_mut()
                .for_each(|c| hit::classify(c, u, v, y));
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.cells.iter_mut().for_each(|c| hit::classify(c, u, v, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_succeeds_at_baseline() {
        let t = Tiling::build(DetectorParams::default()).unwrap();
        assert!(!t.cells().is_empty());
        assert!(!t.wires(Plane::U).is_empty());
        assert!(!t.wires(Plane::V).is_empty());
        assert_eq!(t.wires(Plane::Y).len(), 10);
    }

    #[test]
    fn wire_cell_index_is_consistent() {
        let t = Tiling::build(DetectorParams::default()).unwrap();
        for cell in t.cells() {
            for (plane, id) in [
                (Plane::U, cell.u_wire_id),
                (Plane::V, cell.v_wire_id),
                (Plane::Y, cell.y_wire_id),
            ] {
                if cell::is_real_wire_id(id, t.wires(plane).len()) {
                    assert!(t.wires(plane)[id as usize].cell_ids.contains(&cell.id));
                }
            }
        }
    }

    #[test]
    fn cell_for_triple_matches_wires_of_cell() {
        let t = Tiling::build(DetectorParams::default()).unwrap();
        let cell = &t.cells()[0];
        let (u, v, y) = t.wires_of_cell(cell.id).unwrap();
        let found = t.cell_for_triple(u, v, y).unwrap();
        assert_eq!(found.id, cell.id);
    }

    #[test]
    fn invalid_params_reject_build() {
        let mut p = DetectorParams::default();
        p.num_y_wires = 0;
        assert!(Tiling::build(p).is_err());
    }

    #[test]
    fn inject_charge_then_classify_is_idempotent() {
        let mut t = Tiling::build(DetectorParams::default()).unwrap();
        let id = t.cells()[0].id;
        t.inject_charge(id, 5.0);
        t.classify_hits();
        let first = t.cell(id).unwrap().hit_type;
        t.classify_hits();
        let second = t.cell(id).unwrap().hit_type;
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_cell_id_is_silently_ignored() {
        let mut t = Tiling::build(DetectorParams::default()).unwrap();
        t.inject_charge(usize::MAX, 5.0);
        assert!(t.cell(usize::MAX).is_none());
    }
}
