use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

const EPSILON: f32 = 0.0001;

/// A position in y-down pixel space, or in normalized `[0, 1]` units for
/// the gradient grid.
///
/// Arithmetic goes through [`glam::Vec2`]; the struct itself stays a plain
/// serializable pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn vec(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn magnitude(&self) -> f32 {
        self.vec().length()
    }

    pub fn distance(&self, other: Point) -> f32 {
        self.vec().distance(other.vec())
    }

    /// Z of the 3D cross product. Positive when `other` turns clockwise
    /// from `self` on screen.
    pub fn cross(&self, other: &Point) -> f32 {
        self.vec().perp_dot(other.vec())
    }

    /// Uniform scale about `center`.
    pub fn scaled_about(&self, center: Point, factor: f32) -> Point {
        center + (*self - center) * factor
    }

    pub fn lerp(&self, other: Point, t: f32) -> Point {
        self.vec().lerp(other.vec(), t).into()
    }

    pub fn is_finite(&self) -> bool {
        self.vec().is_finite()
    }

    pub fn approx_eq(&self, other: &Point) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        p.vec()
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        (self.vec() + rhs.vec()).into()
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        (self.vec() - rhs.vec()).into()
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        (self.vec() * rhs).into()
    }
}
