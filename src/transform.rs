//! Homogeneous 4x4 placement transforms
//!
//! Transforms travel as text: 16 whitespace-separated numbers in row-major
//! order, so the identity is `1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1`. Points are
//! treated as column vectors with `w = 1`; translation therefore lives in the
//! last column (text positions 4, 8 and 12).

use std::fmt;
use std::ops::Mul;
use std::str::FromStr;

use nalgebra::{Matrix4, Vector3, Vector4};

use crate::error::{Error, Result};
use crate::mesh_ops::Point3d;

/// Number of values in the text form
const VALUE_COUNT: usize = 16;

/// A 4x4 homogeneous transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform4 {
    matrix: Matrix4<f64>,
}

impl Transform4 {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Build a transform from rows
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self {
            matrix: Matrix4::from_row_slice(&flat),
        }
    }

    /// The matrix as rows
    pub fn rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.matrix[(r, c)];
            }
        }
        rows
    }

    /// A pure translation
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(x, y, z)),
        }
    }

    /// A scale along each axis
    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)),
        }
    }

    /// Parse the 16-number text form
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the text does not hold exactly 16 tokens
    /// or when any token is not a finite number.
    ///
    /// # Example
    ///
    /// ```
    /// use paint3mf::Transform4;
    ///
    /// let t = Transform4::deserialize("1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1").unwrap();
    /// assert_eq!(t, Transform4::identity());
    /// ```
    pub fn deserialize(text: &str) -> Result<Self> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != VALUE_COUNT {
            return Err(Error::decode_with_context(
                "transform",
                &format!("expected {} values, got {}", VALUE_COUNT, tokens.len()),
            ));
        }

        let mut values = [0.0_f64; VALUE_COUNT];
        for (slot, token) in values.iter_mut().zip(&tokens) {
            *slot = token
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    Error::decode_with_context("transform", &format!("'{}' is not a number", token))
                })?;
        }

        Ok(Self {
            matrix: Matrix4::from_row_slice(&values),
        })
    }

    /// Format as the 16-number text form
    ///
    /// Values use the shortest representation that parses back to the same
    /// `f64`, so `deserialize(serialize(t)) == t`.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Apply the transform to a point (`w = 1`, result `w` dropped)
    pub fn apply(&self, point: Point3d) -> Point3d {
        let (x, y, z) = point;
        let v = self.matrix * Vector4::new(x, y, z, 1.0);
        (v.x, v.y, v.z)
    }
}

impl Default for Transform4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Transform4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            for c in 0..4 {
                if r + c > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", self.matrix[(r, c)])?;
            }
        }
        Ok(())
    }
}

impl FromStr for Transform4 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::deserialize(s)
    }
}

/// `a * b` applies `b` first, then `a`
impl Mul for Transform4 {
    type Output = Transform4;

    fn mul(self, rhs: Transform4) -> Transform4 {
        Transform4 {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
