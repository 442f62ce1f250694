//! Projection of bench coordinates onto the drawing plane.
//!
//! The bench itself is the `z = 0` plane; 3D viewers pass full points.

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Affine map from world to screen coordinates:
/// ```text
/// screen_x = x[0] * wx + x[1] * wy + x[2] * wz + tx
/// screen_y = y[0] * wx + y[1] * wy + y[2] * wz + ty
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineProjection {
    /// Coefficients of screen_x
    pub x: [f64; 3],
    /// Coefficients of screen_y
    pub y: [f64; 3],
    pub tx: f64,
    pub ty: f64,
}

impl AffineProjection {
    /// Classic isometric view (x right-down, y left-down, z up) scaled by `scale`
    pub fn isometric(scale: f64) -> Self {
        let (s, c) = 30.0_f64.to_radians().sin_cos();
        Self {
            x: [c * scale, -c * scale, 0.0],
            y: [s * scale, s * scale, -scale],
            tx: 0.0,
            ty: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Top view, drops z
    #[default]
    Xy,
    /// Front view, drops y
    Xz,
    /// Side view, drops x
    Yz,
    Affine(AffineProjection),
}

impl Projection {
    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        match self {
            Projection::Xy => Point2::new(p.x, p.y),
            Projection::Xz => Point2::new(p.x, p.z),
            Projection::Yz => Point2::new(p.y, p.z),
            Projection::Affine(a) => Point2::new(
                a.x[0] * p.x + a.x[1] * p.y + a.x[2] * p.z + a.tx,
                a.y[0] * p.x + a.y[1] * p.y + a.y[2] * p.z + a.ty,
            ),
        }
    }

    /// Project a point of the bench plane
    pub fn project_bench(&self, p: &Point2<f64>) -> Point2<f64> {
        self.project(&Point3::new(p.x, p.y, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_projections() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Projection::Xy.project(&p), Point2::new(1.0, 2.0));
        assert_eq!(Projection::Xz.project(&p), Point2::new(1.0, 3.0));
        assert_eq!(Projection::Yz.project(&p), Point2::new(2.0, 3.0));
    }

    #[test]
    fn test_affine_projection() {
        let shift = Projection::Affine(AffineProjection {
            x: [2.0, 0.0, 0.0],
            y: [0.0, -1.0, 0.0],
            tx: 10.0,
            ty: 5.0,
        });
        assert_eq!(shift.project_bench(&Point2::new(1.0, 1.0)), Point2::new(12.0, 4.0));

        // z axis maps straight up in the isometric view
        let iso = Projection::Affine(AffineProjection::isometric(1.0));
        let up = iso.project(&Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(up, Point2::new(0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_projection_json() {
        let p: Projection = serde_json::from_str(r#"{"type": "xz"}"#).unwrap();
        assert_eq!(p, Projection::Xz);
    }
}
