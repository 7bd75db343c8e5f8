//! 2D geometry primitives used to build and clip cell polygons.
//!
//! Points are kept as plain `geo_types::Coord<f64>` in a (Z, Y) frame: the
//! first field is the detector's beam-axis coordinate, the second is height.

use crate::error::{Result, TilingError};
use geo_types::Coord;

pub const EPSILON: f64 = 1e-10;

/// Which face edge a clip pass is cutting against. Numbered to match the
/// four clip passes in `cell::get_cell_vertices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Left,
    Right,
    Bottom,
    Top,
}

/// Intersection of two non-parallel lines `y = slope_i * (z - z_offset) + intercept_i`.
///
/// Returns `DegenerateIntersection` when the slopes coincide to within
/// [`EPSILON`]; callers must not invoke this on parallel U/V lines.
pub fn intersect_uv(
    z_offset: f64,
    slope1: f64,
    intercept1: f64,
    slope2: f64,
    intercept2: f64,
) -> Result<Coord<f64>> {
    if (slope2 - slope1).abs() < EPSILON {
        return Err(TilingError::DegenerateIntersection);
    }
    let y = (slope2 * intercept1 - slope1 * intercept2) / (slope2 - slope1);
    let z = z_offset + (y - intercept1) / slope1;
    Ok(Coord { x: z, y })
}

/// Intersection of a Y wire's vertical line with a U or V line.
pub fn intersect_y(z_offset: f64, y_wire_z: f64, slope: f64, intercept: f64) -> Coord<f64> {
    Coord {
        x: y_wire_z,
        y: slope * (y_wire_z - z_offset) + intercept,
    }
}

/// Arithmetic mean of the vertices. Deliberately **not** the area-weighted
/// centroid: the source algorithm sorts vertices clockwise around this
/// simpler point, and downstream consumers rely on that exact ordering.
pub fn polygon_centroid(vertices: &[Coord<f64>]) -> Coord<f64> {
    let n = vertices.len() as f64;
    let (sx, sy) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
    Coord {
        x: sx / n,
        y: sy / n,
    }
}

/// Shoelace area, `½ · Σ (zᵢ₋₁+zᵢ)(yᵢ₋₁-yᵢ)`. Positive for clockwise winding
/// in the (Z, Y) plane.
pub fn polygon_area(vertices: &[Coord<f64>]) -> f64 {
    let n = vertices.len();
    if n == 0 {
        return 0.0;
    }
    let mut area = 0.0;
    let mut prev = n - 1;
    for ind in 0..n {
        area += (vertices[prev].x + vertices[ind].x) * (vertices[prev].y - vertices[ind].y);
        prev = ind;
    }
    area / 2.0
}

/// Sorts vertices clockwise (in (Z, Y) space) around the arithmetic-mean
/// centroid. Ties in angle are left in whatever order `sort_by` produces;
/// the data never exercises exact ties in practice.
pub fn sort_cw(vertices: &mut [Coord<f64>]) {
    let center = polygon_centroid(vertices);
    vertices.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        // Descending angle => clockwise.
        angle_b
            .partial_cmp(&angle_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn vertex_outside(vertex: Coord<f64>, edge: EdgeKind, edge_val: f64) -> bool {
    match edge {
        EdgeKind::Left => vertex.x < edge_val - EPSILON,
        EdgeKind::Right => vertex.x > edge_val + EPSILON,
        EdgeKind::Bottom => vertex.y < edge_val - EPSILON,
        EdgeKind::Top => vertex.y > edge_val + EPSILON,
    }
}

/// Clips a (clockwise-sorted) polygon against one of the four face edges.
///
/// For each edge of the input polygon that straddles the clip line, the
/// intersection point is inserted; every original vertex that is not on the
/// exterior side is kept. The result is re-sorted clockwise. Returns the
/// input unchanged if nothing lies outside.
pub fn clip_edge(vertices: &[Coord<f64>], edge: EdgeKind, edge_val: f64) -> Vec<Coord<f64>> {
    let num_outside = vertices
        .iter()
        .filter(|&&v| vertex_outside(v, edge, edge_val))
        .count();
    if num_outside == 0 {
        return vertices.to_vec();
    }

    let n = vertices.len();
    let mut out = Vec::with_capacity(n + 2);

    for ind in 0..n {
        let other = (ind + 1) % n;
        let (z1, y1) = (vertices[ind].x, vertices[ind].y);
        let (z2, y2) = (vertices[other].x, vertices[other].y);

        if z1 != z2 {
            let slope = (y2 - y1) / (z2 - z1);
            let intercept = y1 - slope * z1;
            match edge {
                EdgeKind::Left | EdgeKind::Right => {
                    if straddles(edge_val, z1, z2) {
                        out.push(Coord {
                            x: edge_val,
                            y: slope * edge_val + intercept,
                        });
                    }
                }
                EdgeKind::Bottom | EdgeKind::Top => {
                    if straddles(edge_val, y1, y2) {
                        out.push(Coord {
                            x: (edge_val - intercept) / slope,
                            y: edge_val,
                        });
                    }
                }
            }
        } else if matches!(edge, EdgeKind::Bottom | EdgeKind::Top) && straddles(edge_val, y1, y2) {
            out.push(Coord { x: z1, y: edge_val });
        }
    }

    for &v in vertices {
        if !vertex_outside(v, edge, edge_val) {
            out.push(v);
        }
    }

    sort_cw(&mut out);
    out
}

/// True iff `val` lies strictly between `a` and `b` (in either order), with
/// an ε margin on both sides.
fn straddles(val: f64, a: f64, b: f64) -> bool {
    (val > a + EPSILON && val < b - EPSILON) || (val > b + EPSILON && val < a - EPSILON)
}

/// Clips the infinite line `y = slope*z + intercept` to the rectangle
/// `[z_min, z_max] x [y_min, y_max]`, returning its two endpoints within
/// the rectangle. Used only to give wires display-friendly endpoints; cell
/// construction recomputes slopes/intercepts from scratch and never reads
/// `Wire::endpoints`.
pub fn clip_line_to_rect(
    slope: f64,
    intercept: f64,
    z_min: f64,
    z_max: f64,
    y_min: f64,
    y_max: f64,
) -> (Coord<f64>, Coord<f64>) {
    let (mut z_lo, mut z_hi) = (z_min, z_max);
    if slope.abs() > EPSILON {
        let z_at_ymin = (y_min - intercept) / slope;
        let z_at_ymax = (y_max - intercept) / slope;
        let (za, zb) = if z_at_ymin <= z_at_ymax {
            (z_at_ymin, z_at_ymax)
        } else {
            (z_at_ymax, z_at_ymin)
        };
        z_lo = z_lo.max(za);
        z_hi = z_hi.min(zb);
    }
    if z_lo > z_hi {
        std::mem::swap(&mut z_lo, &mut z_hi);
    }
    let p1 = Coord {
        x: z_lo,
        y: slope * z_lo + intercept,
    };
    let p2 = Coord {
        x: z_hi,
        y: slope * z_hi + intercept,
    };
    (p1, p2)
}
