//! Detector configuration: the immutable input to the whole pipeline.

use crate::error::{Result, TilingError};
use serde::{Deserialize, Serialize};

/// Configuration recognized by the core. `plot_mode` is accepted for
/// compatibility with upstream configuration sources but is unused here —
/// rendering is not part of this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorParams {
    pub angle_u_deg: f64,
    pub angle_v_deg: f64,
    pub num_y_wires: usize,
    #[serde(default)]
    pub plot_mode: u32,
    pub y_pitch: f64,
    pub u_pitch: f64,
    pub v_pitch: f64,
    pub height_to_width_ratio: f64,
    pub first_y_wire_u_offset: f64,
    pub first_y_wire_v_offset: f64,
    #[serde(default)]
    pub left_edge_offset_z: f64,
    #[serde(default)]
    pub right_edge_offset_z: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            angle_u_deg: 60.0,
            angle_v_deg: 60.0,
            num_y_wires: 10,
            plot_mode: 0,
            y_pitch: 0.30,
            u_pitch: 0.30,
            v_pitch: 0.30,
            height_to_width_ratio: 0.5,
            first_y_wire_u_offset: 0.0,
            first_y_wire_v_offset: 0.0,
            left_edge_offset_z: 0.0,
            right_edge_offset_z: 0.0,
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<()> {
        if self.num_y_wires < 1 {
            return Err(TilingError::InvalidParameters(
                "num_y_wires must be >= 1".into(),
            ));
        }
        for (name, pitch) in [
            ("y_pitch", self.y_pitch),
            ("u_pitch", self.u_pitch),
            ("v_pitch", self.v_pitch),
        ] {
            if pitch <= 0.0 {
                return Err(TilingError::InvalidParameters(format!(
                    "{name} must be positive, got {pitch}"
                )));
            }
        }
        for (name, angle) in [
            ("angle_u_deg", self.angle_u_deg),
            ("angle_v_deg", self.angle_v_deg),
        ] {
            if !(angle > 0.0 && angle < 180.0) {
                return Err(TilingError::InvalidParameters(format!(
                    "{name} must be in (0, 180), got {angle}"
                )));
            }
        }
        let angle_u_rad = self.angle_u_deg.to_radians();
        let angle_v_rad = self.angle_v_deg.to_radians();
        if angle_u_rad.sin().abs() < crate::geom::EPSILON
            || angle_u_rad.tan().abs() < crate::geom::EPSILON
        {
            return Err(TilingError::DegenerateGeometry(
                "angle_u produces sin or tan of zero".into(),
            ));
        }
        if angle_v_rad.sin().abs() < crate::geom::EPSILON
            || angle_v_rad.tan().abs() < crate::geom::EPSILON
        {
            return Err(TilingError::DegenerateGeometry(
                "angle_v produces sin or tan of zero".into(),
            ));
        }
        Ok(())
    }

    /// Z-coordinate of the first Y wire: Z₀ = pY/2.
    pub fn first_y_wire_z(&self) -> f64 {
        self.y_pitch / 2.0
    }
}

/// Quantities derived once from a validated [`DetectorParams`].
#[derive(Debug, Clone)]
pub struct DerivedParams {
    pub max_height: f64,
    pub face_z_min: f64,
    pub face_z_max: f64,
    pub z0: f64,
    pub angle_u_rad: f64,
    pub angle_v_rad: f64,
    pub diag_length: f64,
    pub diag_angle_rad: f64,
    pub u_spacing_on_wire: f64,
    pub v_spacing_on_wire: f64,
    /// `first_y_wire_v_offset` after the U-lattice-aligning rebase (§4.2).
    /// This is the only adjustment ever made to an input parameter; it is
    /// stored here rather than mutating `DetectorParams`, which stays
    /// immutable for the object's whole lifetime.
    pub effective_v_offset: f64,
    pub u_delta_y: f64,
    pub v_delta_y: f64,
}

impl DerivedParams {
    pub fn compute(p: &DetectorParams) -> Result<Self> {
        p.validate()?;

        let n = p.num_y_wires as f64;
        let max_height = p.height_to_width_ratio * p.y_pitch * n;
        let z0 = p.first_y_wire_z();
        let face_z_min = z0 - p.y_pitch / 2.0 + p.left_edge_offset_z;
        let face_z_max = z0 + (n - 0.5) * p.y_pitch - p.right_edge_offset_z;

        let angle_u_rad = p.angle_u_deg.to_radians();
        let angle_v_rad = p.angle_v_deg.to_radians();

        let diag_length = (((n - 1.0) * p.y_pitch).powi(2)
            + ((n - 1.0) * p.y_pitch * p.height_to_width_ratio).powi(2))
        .sqrt();
        let diag_angle_rad = (1.0_f64).atan2(p.height_to_width_ratio);

        let u_spacing_on_wire = (p.u_pitch / angle_u_rad.sin()).abs();
        let v_spacing_on_wire = (p.v_pitch / angle_v_rad.sin()).abs();

        // Rebase V so the U/V lattices align (§4.2): fold the U offset into
        // its own spacing, then derive V's offset from what remains of the
        // face height.
        let temp_u = p.first_y_wire_u_offset.rem_euclid(u_spacing_on_wire);
        let effective_v_offset = (max_height - temp_u).rem_euclid(v_spacing_on_wire);

        let u_delta_y = p.y_pitch / angle_u_rad.tan();
        let v_delta_y = -p.y_pitch / angle_v_rad.tan();

        Ok(Self {
            max_height,
            face_z_min,
            face_z_max,
            z0,
            angle_u_rad,
            angle_v_rad,
            diag_length,
            diag_angle_rad,
            u_spacing_on_wire,
            v_spacing_on_wire,
            effective_v_offset,
            u_delta_y,
            v_delta_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let p = DetectorParams::default();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_pitch_rejected() {
        let mut p = DetectorParams::default();
        p.y_pitch = 0.0;
        assert!(matches!(
            p.validate(),
            Err(TilingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn degenerate_angle_rejected() {
        let mut p = DetectorParams::default();
        p.angle_u_deg = 180.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn derived_matches_baseline() {
        let p = DetectorParams::default();
        let d = DerivedParams::compute(&p).unwrap();
        assert!((d.max_height - 0.5 * 0.30 * 10.0).abs() < 1e-12);
    }
}
