#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for 2D polar velocity vectors."]
#![doc = ""]
#![doc = "This crate provides a vector expressed as magnitude and direction (in degrees)"]
#![doc = "whose Cartesian `(x, y)` projection is recomputed on every change."]

use core::f32::consts::PI;
use core::fmt;
use libm::{atan2f, cosf, hypotf, sinf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Convert an angle from degrees to radians.
///
/// No normalization is applied; `450.0` maps to `2.5 * PI`.
pub fn deg_to_rad(angle: f32) -> f32 {
    angle * PI / 180.0
}

/// Convert an angle from radians to degrees.
///
/// No normalization is applied; `-PI` maps to `-180.0`.
pub fn rad_to_deg(theta: f32) -> f32 {
    theta * 180.0 / PI
}

/// A 2‑D vector stored in polar form `(r, θ)`.
///
/// The direction is public-facing in degrees (measured from the +x axis towards +y).
/// The Cartesian components are derived and always kept consistent with the
/// magnitude and direction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarVector {
    magnitude: f32,
    direction: f32,
    theta: f32,
    x: f32,
    y: f32,
}

impl PolarVector {
    /// Construct a new vector.
    ///
    /// # Arguments
    ///
    /// * `magnitude`: Length of the vector.
    /// * `direction`: Direction of the vector in degrees.
    pub fn new(magnitude: f32, direction: f32) -> Self {
        let mut v = PolarVector {
            magnitude,
            ..Default::default()
        };
        v.set_direction(direction);
        v
    }

    /// Construct a vector from Cartesian components.
    ///
    /// # Arguments
    ///
    /// * `x`: Horizontal component.
    /// * `y`: Vertical component.
    pub fn from_cartesian(x: f32, y: f32) -> Self {
        PolarVector::new(hypotf(x, y), rad_to_deg(atan2f(y, x)))
    }

    /// Returns the magnitude (length) of the vector.
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Sets the magnitude, keeping the current direction.
    pub fn set_magnitude(&mut self, value: f32) {
        self.magnitude = value;
        self.project();
    }

    /// Returns the direction of the vector in degrees.
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Sets the direction in degrees, keeping the current magnitude.
    pub fn set_direction(&mut self, degrees: f32) {
        self.direction = degrees;
        self.theta = deg_to_rad(degrees);
        self.project();
    }

    /// Returns the direction of the vector in radians.
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Horizontal component in the Cartesian plane.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component in the Cartesian plane.
    pub fn y(&self) -> f32 {
        self.y
    }

    fn project(&mut self) {
        self.x = self.magnitude * cosf(self.theta);
        self.y = self.magnitude * sinf(self.theta);
    }
}

impl fmt::Display for PolarVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(r: {:.2}, θ: {:.2}°)", self.magnitude, self.direction)
    }
}
