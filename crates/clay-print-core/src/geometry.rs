//! Oriented poses in 3D space
//!
//! A [`Frame`] is a point plus two orthonormal in-plane axes. The third
//! axis (the local normal) is derived as `xaxis × yaxis`.

use crate::error::InputError;
use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};

/// Axes shorter than this are considered degenerate
const AXIS_EPSILON: f64 = 1e-9;

/// Position and orientation in 3D space
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    point: Point3<f64>,
    xaxis: Vector3<f64>,
    yaxis: Vector3<f64>,
    /// Optional label carried over from the input file
    pub name: Option<String>,
}

impl Frame {
    /// Build a frame from a point and two axes.
    ///
    /// The x axis is normalized and the y axis is re-orthogonalized against
    /// it, so slightly skewed input produces a proper right-handed frame.
    /// Zero-length or parallel axes are rejected.
    pub fn new(
        point: Point3<f64>,
        xaxis: Vector3<f64>,
        yaxis: Vector3<f64>,
    ) -> Result<Self, InputError> {
        let x_norm = xaxis.norm();
        let y_norm = yaxis.norm();
        if !x_norm.is_finite() || !y_norm.is_finite() || !point.coords.iter().all(|v| v.is_finite())
        {
            return Err(InputError::InvalidPose {
                reason: "pose contains non-finite values".to_string(),
            });
        }
        if x_norm < AXIS_EPSILON || y_norm < AXIS_EPSILON {
            return Err(InputError::InvalidPose {
                reason: "axis vector has zero length".to_string(),
            });
        }

        let x = xaxis / x_norm;
        let z = x.cross(&(yaxis / y_norm));
        let z_norm = z.norm();
        if z_norm < AXIS_EPSILON {
            return Err(InputError::InvalidPose {
                reason: "x and y axes are parallel".to_string(),
            });
        }
        let z = z / z_norm;
        let y = z.cross(&x);

        Ok(Self {
            point,
            xaxis: x,
            yaxis: y,
            name: None,
        })
    }

    /// Build a frame from raw component slices as found in input files.
    ///
    /// Each slice must hold exactly three values.
    pub fn from_components(point: &[f64], xaxis: &[f64], yaxis: &[f64]) -> Result<Self, InputError> {
        let point = Point3::from(vector3(point, "point")?);
        Self::new(point, vector3(xaxis, "xaxis")?, vector3(yaxis, "yaxis")?)
    }

    /// World XY frame at the given point
    pub fn world_xy(point: Point3<f64>) -> Self {
        Self {
            point,
            xaxis: Vector3::x(),
            yaxis: Vector3::y(),
            name: None,
        }
    }

    /// Attach a name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn point(&self) -> &Point3<f64> {
        &self.point
    }

    pub fn xaxis(&self) -> &Vector3<f64> {
        &self.xaxis
    }

    pub fn yaxis(&self) -> &Vector3<f64> {
        &self.yaxis
    }

    /// Local Z axis
    pub fn normal(&self) -> Vector3<f64> {
        self.xaxis.cross(&self.yaxis)
    }

    /// Orientation as a unit quaternion
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        let matrix = Matrix3::from_columns(&[self.xaxis, self.yaxis, self.normal()]);
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(matrix))
    }

    /// Move the point by `distance` along the local normal. Orientation is kept.
    pub fn translate_along_normal(&mut self, distance: f64) {
        self.point += self.normal() * distance;
    }
}

fn vector3(values: &[f64], field: &str) -> Result<Vector3<f64>, InputError> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(InputError::InvalidPose {
            reason: format!("{} has {} components, expected 3", field, values.len()),
        }),
    }
}
