//! Cell builder (C): enumerates wire triples that form a cell, builds each
//! cell's polygonal boundary clipped to the face, and computes centroid
//! and area.

use crate::geom::{self, EdgeKind, EPSILON};
use crate::params::{DerivedParams, DetectorParams};
use geo_types::Coord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitType {
    None,
    Real,
    Fake,
}

impl Default for HitType {
    fn default() -> Self {
        HitType::None
    }
}

/// A geometric cell bounded by one strip from each of the three wire
/// families. `true_charge`, `reco_charge` and `hit_type` are runtime state,
/// mutated after construction by charge injection and [`crate::hit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub id: usize,
    pub vertices: Vec<Coord<f64>>,
    pub center: Coord<f64>,
    pub area: f64,
    /// Bounding wire ids. May be negative or exceed the generated wire
    /// count for that plane — a "virtual" wire id (§4.3) — callers must
    /// check `id >= 0 && (id as usize) < wires.len()` before indexing.
    pub u_wire_id: i64,
    pub v_wire_id: i64,
    pub y_wire_id: i64,
    #[serde(skip, default)]
    pub true_charge: f64,
    #[serde(skip, default)]
    pub reco_charge: f64,
    #[serde(skip, default)]
    pub hit_type: HitType,
}

/// `id < wires.len()` guard shared by the tiling index and by consumers.
pub fn is_real_wire_id(id: i64, wire_count: usize) -> bool {
    id >= 0 && (id as usize) < wire_count
}

/// Running state carried across the Y-wire walk (§4.3).
struct Offsets {
    z: f64,
    u_offset: f64,
    v_offset: f64,
}

impl Offsets {
    fn new(p: &DetectorParams, d: &DerivedParams) -> Self {
        let mut u_offset = d.max_height - p.first_y_wire_u_offset;
        while u_offset < d.max_height - (d.u_spacing_on_wire - d.u_delta_y) / 2.0 - EPSILON {
            u_offset += d.u_spacing_on_wire;
        }

        let mut v_offset = d.effective_v_offset;
        while v_offset > (d.v_spacing_on_wire + d.v_delta_y) / 2.0 + EPSILON {
            v_offset -= d.v_spacing_on_wire;
        }

        Self {
            z: d.z0,
            u_offset,
            v_offset,
        }
    }

    fn advance(&mut self, p: &DetectorParams, d: &DerivedParams) {
        self.z += p.y_pitch;
        self.u_offset += d.u_delta_y;
        self.v_offset += d.v_delta_y;

        while self.u_offset < d.max_height - (d.u_spacing_on_wire - d.u_delta_y) / 2.0 - EPSILON {
            self.u_offset += d.u_spacing_on_wire;
        }
        while self.v_offset < (d.v_delta_y - d.v_spacing_on_wire) / 2.0 - EPSILON {
            self.v_offset += d.v_spacing_on_wire;
        }
    }
}

/// `forms_cell` predicate (§4.3): does the U band at `u_y` and the V band
/// at `v_y` overlap enough, given the Y-strip width, to define a cell?
fn forms_cell(u_y: f64, v_y: f64, d: &DerivedParams, y_pitch: f64) -> bool {
    let tan_u = d.angle_u_rad.tan();
    let tan_v = d.angle_v_rad.tan();

    let delta_y = if u_y > v_y {
        (u_y - d.u_spacing_on_wire / 2.0) - (v_y + d.v_spacing_on_wire / 2.0)
    } else {
        (v_y - d.v_spacing_on_wire / 2.0) - (u_y + d.u_spacing_on_wire / 2.0)
    };

    if u_y + d.u_spacing_on_wire / 2.0 < -EPSILON && v_y + d.v_spacing_on_wire / 2.0 < -EPSILON {
        false
    } else if u_y - d.u_spacing_on_wire / 2.0 > d.max_height + EPSILON
        && v_y - d.v_spacing_on_wire / 2.0 > d.max_height + EPSILON
    {
        false
    } else if delta_y < EPSILON {
        true
    } else if u_y == v_y {
        true
    } else {
        ((tan_u * tan_v * delta_y) / (tan_u + tan_v)).abs() - y_pitch / 2.0 < EPSILON
    }
}

/// Enumerates the up-to-12 candidate polygon vertices for the cell at
/// `(z_y, u_y, v_y)`, selects the ones that actually bound the cell, clips
/// against whichever face edges the cell's U∩V bounding box violates, and
/// returns the final clockwise vertex list. Empty/degenerate (<3 vertex)
/// cells are returned as an empty Vec and must be dropped by the caller.
fn get_cell_vertices(z_y: f64, u_y: f64, v_y: f64, d: &DerivedParams, y_pitch: f64) -> Vec<Coord<f64>> {
    let u_slope = 1.0 / d.angle_u_rad.tan();
    let v_slope = -1.0 / d.angle_v_rad.tan();

    let u1_intercept = u_y - d.u_spacing_on_wire / 2.0;
    let u2_intercept = u_y + d.u_spacing_on_wire / 2.0;
    let v1_intercept = v_y - d.v_spacing_on_wire / 2.0;
    let v2_intercept = v_y + d.v_spacing_on_wire / 2.0;

    let y1_z = z_y - y_pitch / 2.0;
    let y2_z = z_y + y_pitch / 2.0;

    let uv = |us: f64, ui: f64, vs: f64, vi: f64| geom::intersect_uv(z_y, us, ui, vs, vi);
    let u1v1 = uv(u_slope, u1_intercept, v_slope, v1_intercept);
    let u1v2 = uv(u_slope, u1_intercept, v_slope, v2_intercept);
    let u2v1 = uv(u_slope, u2_intercept, v_slope, v1_intercept);
    let u2v2 = uv(u_slope, u2_intercept, v_slope, v2_intercept);
    let (u1v1, u1v2, u2v1, u2v2) = match (u1v1, u1v2, u2v1, u2v2) {
        (Ok(a), Ok(b), Ok(c), Ok(dd)) => (a, b, c, dd),
        _ => return Vec::new(),
    };

    let uv_points = [u1v1, u1v2, u2v1, u2v2];
    let uv_min_z = uv_points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let uv_max_z = uv_points
        .iter()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let uv_min_y = uv_points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let uv_max_y = uv_points
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut vertices = Vec::with_capacity(12);

    let y_candidates = [
        geom::intersect_y(z_y, y1_z, u_slope, u1_intercept),
        geom::intersect_y(z_y, y1_z, u_slope, u2_intercept),
        geom::intersect_y(z_y, y1_z, v_slope, v1_intercept),
        geom::intersect_y(z_y, y1_z, v_slope, v2_intercept),
        geom::intersect_y(z_y, y2_z, u_slope, u1_intercept),
        geom::intersect_y(z_y, y2_z, u_slope, u2_intercept),
        geom::intersect_y(z_y, y2_z, v_slope, v1_intercept),
        geom::intersect_y(z_y, y2_z, v_slope, v2_intercept),
    ];
    for p in y_candidates {
        if p.y > uv_min_y + EPSILON
            && p.y < uv_max_y - EPSILON
            && p.x > uv_min_z + EPSILON
            && p.x < uv_max_z - EPSILON
        {
            vertices.push(p);
        }
    }

    for p in uv_points {
        if p.x >= y1_z - EPSILON && p.x <= y2_z + EPSILON {
            vertices.push(p);
        }
    }

    if vertices.len() < 3 {
        return Vec::new();
    }

    geom::sort_cw(&mut vertices);

    if uv_min_z < d.face_z_min + EPSILON {
        vertices = geom::clip_edge(&vertices, EdgeKind::Left, d.face_z_min);
    } else if uv_max_z > d.face_z_max - EPSILON {
        vertices = geom::clip_edge(&vertices, EdgeKind::Right, d.face_z_max);
    }

    if uv_min_y < EPSILON {
        vertices = geom::clip_edge(&vertices, EdgeKind::Bottom, 0.0);
    } else if uv_max_y > d.max_height - EPSILON {
        vertices = geom::clip_edge(&vertices, EdgeKind::Top, d.max_height);
    }

    if vertices.len() < 3 {
        return Vec::new();
    }
    vertices
}

fn wire_id_u(z_y: f64, u_y: f64, d: &DerivedParams, p: &DetectorParams) -> i64 {
    let v = (z_y / d.angle_u_rad.tan() + d.max_height
        - d.z0 / d.angle_u_rad.tan()
        - p.first_y_wire_u_offset
        - u_y)
        / d.u_spacing_on_wire;
    v.round() as i64
}

fn wire_id_v(z_y: f64, v_y: f64, d: &DerivedParams) -> i64 {
    let v = (z_y / d.angle_v_rad.tan() - d.z0 / d.angle_v_rad.tan() - d.effective_v_offset + v_y)
        / d.v_spacing_on_wire;
    v.round() as i64
}

fn wire_id_y(z_y: f64, d: &DerivedParams, p: &DetectorParams) -> i64 {
    ((z_y - d.z0) / p.y_pitch).round() as i64
}

fn try_build_cell(
    next_id: usize,
    z_y: f64,
    u_y: f64,
    v_y: f64,
    p: &DetectorParams,
    d: &DerivedParams,
) -> Option<Cell> {
    let vertices = get_cell_vertices(z_y, u_y, v_y, d, p.y_pitch);
    if vertices.len() < 3 {
        return None;
    }
    let center = geom::polygon_centroid(&vertices);
    let area = geom::polygon_area(&vertices);

    Some(Cell {
        id: next_id,
        u_wire_id: wire_id_u(z_y, u_y, d, p),
        v_wire_id: wire_id_v(z_y, v_y, d),
        y_wire_id: wire_id_y(z_y, d, p),
        vertices,
        center,
        area,
        true_charge: 0.0,
        reco_charge: 0.0,
        hit_type: HitType::None,
    })
}

fn construct_cell_chain(cells: &mut Vec<Cell>, z_y: f64, u_offset: f64, v_offset: f64, p: &DetectorParams, d: &DerivedParams) {
    let num_u_crosses = (((d.u_delta_y - d.u_spacing_on_wire) / 2.0 + u_offset) / d.u_spacing_on_wire)
        .ceil() as i64
        + 1;
    let num_v_crosses = ((d.max_height - (d.v_delta_y + d.v_spacing_on_wire) / 2.0 - v_offset)
        / d.v_spacing_on_wire)
        .ceil() as i64
        + 1;

    for ind_u in 0..num_u_crosses.max(0) {
        let mut emitted_any = false;
        for ind_v in 0..num_v_crosses.max(0) {
            let u_y = u_offset - ind_u as f64 * d.u_spacing_on_wire;
            let v_y = v_offset + ind_v as f64 * d.v_spacing_on_wire;
            if forms_cell(u_y, v_y, d, p.y_pitch) {
                emitted_any = true;
                if let Some(cell) = try_build_cell(cells.len(), z_y, u_y, v_y, p, d) {
                    cells.push(cell);
                }
            } else if emitted_any {
                break;
            }
        }
    }
}

/// Walks every Y wire and builds the full cell set (§4.3).
pub fn construct_cells(p: &DetectorParams, d: &DerivedParams) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut offsets = Offsets::new(p, d);

    for _ in 0..p.num_y_wires {
        construct_cell_chain(&mut cells, offsets.z, offsets.u_offset, offsets.v_offset, p, d);
        offsets.advance(p, d);
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DerivedParams;

    fn baseline() -> (DetectorParams, DerivedParams) {
        let p = DetectorParams::default();
        let d = DerivedParams::compute(&p).unwrap();
        (p, d)
    }

    #[test]
    fn builds_some_cells_at_baseline() {
        let (p, d) = baseline();
        let cells = construct_cells(&p, &d);
        assert!(!cells.is_empty());
        for c in &cells {
            assert!(c.vertices.len() >= 3);
            assert!(c.area > 0.0, "area must be positive (CW winding)");
        }
    }

    #[test]
    fn single_y_wire_cells_span_one_strip() {
        let mut p = DetectorParams::default();
        p.num_y_wires = 1;
        let d = DerivedParams::compute(&p).unwrap();
        let cells = construct_cells(&p, &d);
        assert!(!cells.is_empty());
        for c in &cells {
            assert_eq!(c.y_wire_id, 0);
            for v in &c.vertices {
                assert!(v.x >= d.z0 - p.y_pitch / 2.0 - EPSILON);
                assert!(v.x <= d.z0 + p.y_pitch / 2.0 + EPSILON);
            }
        }
    }

    #[test]
    fn cells_stay_within_face_rectangle() {
        let (p, d) = baseline();
        let cells = construct_cells(&p, &d);
        for c in &cells {
            for v in &c.vertices {
                assert!(v.x >= d.face_z_min - 1e-6 && v.x <= d.face_z_max + 1e-6);
                assert!(v.y >= -1e-6 && v.y <= d.max_height + 1e-6);
            }
        }
    }

    #[test]
    fn total_area_does_not_exceed_face_area() {
        let (p, d) = baseline();
        let cells = construct_cells(&p, &d);
        let total: f64 = cells.iter().map(|c| c.area).sum();
        let face_area = (d.face_z_max - d.face_z_min) * d.max_height;
        assert!(total <= face_area + 1e-6, "{total} > {face_area}");
    }

    #[test]
    fn ninety_degree_angles_do_not_panic() {
        let mut p = DetectorParams::default();
        p.angle_u_deg = 90.0;
        p.angle_v_deg = 90.0;
        p.num_y_wires = 4;
        let d = DerivedParams::compute(&p).unwrap();
        let cells = construct_cells(&p, &d);
        for c in &cells {
            assert!(c.area.is_finite());
            assert!(c.center.x.is_finite() && c.center.y.is_finite());
        }
    }
}
