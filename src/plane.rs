//! Plane generator (P): for each wire family, the ordered sequence of
//! wire locations that fit inside the detector face.

use crate::geom::{self, EPSILON};
use crate::params::{DerivedParams, DetectorParams};
use crate::wire::{Plane, Wire};
use geo_types::Coord;

/// Generates the Y family: exactly `num_y_wires` axial wires spanning the
/// full face height.
pub fn generate_y_wires(p: &DetectorParams, d: &DerivedParams) -> Vec<Wire> {
    (0..p.num_y_wires)
        .map(|i| {
            let z = d.z0 + i as f64 * p.y_pitch;
            Wire::new(
                i,
                Plane::Y,
                z,
                (Coord { x: z, y: 0.0 }, Coord { x: z, y: d.max_height }),
            )
        })
        .collect()
}

/// Generates the U family (inclined, leaning with `+1/tan(angle_u)`).
pub fn generate_u_wires(p: &DetectorParams, d: &DerivedParams) -> Vec<Wire> {
    let offset_u = p.first_y_wire_u_offset * d.angle_u_rad.sin()
        / (std::f64::consts::PI - d.diag_angle_rad - d.angle_u_rad).sin();
    let count = (((d.diag_length - offset_u) * (d.diag_angle_rad + d.angle_u_rad).sin())
        / p.u_pitch)
        .floor()
        .max(0.0) as usize;

    let slope = 1.0 / d.angle_u_rad.tan();
    let base_intercept =
        d.max_height - d.z0 / d.angle_u_rad.tan() - p.first_y_wire_u_offset;

    (0..count)
        .map(|i| {
            let location = p.first_y_wire_u_offset * d.angle_u_rad.sin() + i as f64 * p.u_pitch;
            let intercept = base_intercept - d.u_spacing_on_wire * i as f64;
            let (p1, p2) = geom::clip_line_to_rect(
                slope,
                intercept,
                d.face_z_min,
                d.face_z_max,
                0.0,
                d.max_height,
            );
            Wire::new(i, Plane::U, location, (p1, p2))
        })
        .collect()
}

/// Generates the V family (inclined, leaning with `-1/tan(angle_v)`, the
/// opposite sense to U — §9 fixes the sign that the original source got
/// inconsistent between its two call sites).
pub fn generate_v_wires(p: &DetectorParams, d: &DerivedParams) -> Vec<Wire> {
    let offset_v = d.effective_v_offset * d.angle_v_rad.sin()
        / (std::f64::consts::PI - d.diag_angle_rad - d.angle_v_rad).sin();
    let count = (((d.diag_length - offset_v) * (d.diag_angle_rad + d.angle_v_rad).sin())
        / p.v_pitch)
        .floor()
        .max(0.0) as usize;

    let slope = -1.0 / d.angle_v_rad.tan();
    let base_intercept = d.z0 / d.angle_v_rad.tan() + d.effective_v_offset;

    (0..count)
        .map(|i| {
            let location = d.effective_v_offset * d.angle_v_rad.sin() + i as f64 * p.v_pitch;
            let intercept = base_intercept + d.v_spacing_on_wire * i as f64;
            let (p1, p2) = geom::clip_line_to_rect(
                slope,
                intercept,
                d.face_z_min,
                d.face_z_max,
                0.0,
                d.max_height,
            );
            Wire::new(i, Plane::V, location, (p1, p2))
        })
        .collect()
}

/// Generates all three families at once.
pub fn generate_all(p: &DetectorParams, d: &DerivedParams) -> (Vec<Wire>, Vec<Wire>, Vec<Wire>) {
    (
        generate_u_wires(p, d),
        generate_v_wires(p, d),
        generate_y_wires(p, d),
    )
}

/// True if `v` lies strictly inside `(lo, hi)` with an ε margin — matches
/// the "inside a range" contract from §4.1.
pub fn strictly_inside(v: f64, lo: f64, hi: f64) -> bool {
    v > lo + EPSILON && v < hi - EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DerivedParams;

    #[test]
    fn y_plane_has_exactly_n_wires() {
        let p = DetectorParams::default();
        let d = DerivedParams::compute(&p).unwrap();
        let ys = generate_y_wires(&p, &d);
        assert_eq!(ys.len(), p.num_y_wires);
        assert_eq!(ys[0].location, d.z0);
    }

    #[test]
    fn u_and_v_counts_match_under_symmetry() {
        // Symmetric angles and zero offsets: U and V families must be
        // the same size by the detector's left-right symmetry.
        let p = DetectorParams::default();
        let d = DerivedParams::compute(&p).unwrap();
        let us = generate_u_wires(&p, &d);
        let vs = generate_v_wires(&p, &d);
        assert_eq!(us.len(), vs.len());
        assert!(!us.is_empty());
    }

    #[test]
    fn single_y_wire_spans_whole_strip() {
        let mut p = DetectorParams::default();
        p.num_y_wires = 1;
        let d = DerivedParams::compute(&p).unwrap();
        let ys = generate_y_wires(&p, &d);
        assert_eq!(ys.len(), 1);
        assert_eq!(ys[0].id, 0);
    }
}
