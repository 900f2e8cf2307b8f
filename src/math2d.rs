//! 2D vector math and simple shape queries.
//!
//! All types are small `Copy` values over `f32`:
//!
//! - [`V2`]: vector with the usual operators, dot/cross products and helpers
//! - [`Rotation`]: sine/cosine pair
//! - [`Transform`]: rotation followed by translation
//! - [`Halfspace`], [`Aabb`], [`Circle`]: shapes with overlap tests
//! - [`Ray`] and [`RayHit`]: ray casts against each shape
//!
//! # Examples
//!
//! ```
//! use cutekit::math2d::{Aabb, Circle, Ray, V2};
//!
//! let wall = Aabb::new(V2::new(4.0, -1.0), V2::new(5.0, 1.0));
//! let ball = Circle::new(V2::new(3.5, 0.0), 0.75);
//! assert!(ball.overlaps_aabb(&wall));
//!
//! let ray = Ray::new(V2::ZERO, V2::new(1.0, 0.0), 10.0);
//! let hit = ray.cast_aabb(&wall).unwrap();
//! assert_eq!(hit.t, 4.0);
//! assert_eq!(hit.n, V2::new(-1.0, 0.0));
//! ```

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2D vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct V2 {
    pub x: f32,
    pub y: f32,
}

impl V2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Z component of the 3D cross product.
    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> f32 {
        self.x.mul_add(other.y, -(self.y * other.x))
    }

    /// Counter-clockwise perpendicular, `(-y, x)`.
    #[inline]
    #[must_use]
    pub const fn skew(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Clockwise perpendicular, `(y, -x)`.
    #[inline]
    #[must_use]
    pub const fn cw_skew(self) -> Self {
        Self::new(self.y, -self.x)
    }

    #[inline]
    #[must_use]
    pub fn len_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    #[must_use]
    pub fn len(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    #[must_use]
    pub fn norm(self) -> Self {
        let len = self.len();
        if len == 0.0 { Self::ZERO } else { self / len }
    }

    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).len()
    }

    /// Linear interpolation; `t` is not clamped.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            (other.x - self.x).mul_add(t, self.x),
            (other.y - self.y).mul_add(t, self.y),
        )
    }

    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[inline]
    #[must_use]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    #[inline]
    #[must_use]
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Component-wise product.
    #[inline]
    #[must_use]
    pub fn hadamard(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }
}

impl Add for V2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for V2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for V2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<V2> for f32 {
    type Output = V2;

    fn mul(self, rhs: V2) -> V2 {
        rhs * self
    }
}

impl Div<f32> for V2 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for V2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for V2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for V2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for V2 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl From<(f32, f32)> for V2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Rotation stored as sine and cosine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub s: f32,
    pub c: f32,
}

impl Rotation {
    pub const IDENTITY: Self = Self { s: 0.0, c: 1.0 };

    /// Counter-clockwise rotation by `radians`.
    #[must_use]
    pub fn from_angle(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self { s, c }
    }

    #[must_use]
    pub fn angle(self) -> f32 {
        self.s.atan2(self.c)
    }

    /// Where this rotation sends the unit x axis.
    #[must_use]
    pub const fn x_axis(self) -> V2 {
        V2::new(self.c, self.s)
    }

    #[must_use]
    pub const fn y_axis(self) -> V2 {
        V2::new(-self.s, self.c)
    }

    /// Rotate a vector.
    #[must_use]
    pub fn apply(self, v: V2) -> V2 {
        V2::new(
            self.c.mul_add(v.x, -(self.s * v.y)),
            self.s.mul_add(v.x, self.c * v.y),
        )
    }

    /// Rotate a vector by the inverse rotation.
    #[must_use]
    pub fn apply_inv(self, v: V2) -> V2 {
        V2::new(
            self.c.mul_add(v.x, self.s * v.y),
            (-self.s).mul_add(v.x, self.c * v.y),
        )
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        Self {
            s: -self.s,
            c: self.c,
        }
    }

    /// `self` applied after `other`.
    #[must_use]
    pub fn then_after(self, other: Self) -> Self {
        Self {
            s: self.s.mul_add(other.c, self.c * other.s),
            c: self.c.mul_add(other.c, -(self.s * other.s)),
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation followed by translation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub r: Rotation,
    pub p: V2,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        r: Rotation::IDENTITY,
        p: V2::ZERO,
    };

    #[must_use]
    pub fn new(p: V2, radians: f32) -> Self {
        Self {
            r: Rotation::from_angle(radians),
            p,
        }
    }

    /// Map a local point into world space.
    #[must_use]
    pub fn apply(self, v: V2) -> V2 {
        self.r.apply(v) + self.p
    }

    /// Map a world point into local space.
    #[must_use]
    pub fn apply_inv(self, v: V2) -> V2 {
        self.r.apply_inv(v - self.p)
    }

    /// `self` applied after `other`: `(self * other).apply(v) == self.apply(other.apply(v))`.
    #[must_use]
    pub fn then_after(self, other: Self) -> Self {
        Self {
            r: self.r.then_after(other.r),
            p: self.r.apply(other.p) + self.p,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Self {
        let r = self.r.inverse();
        Self {
            r,
            p: -r.apply(self.p),
        }
    }
}

impl Mul<V2> for Transform {
    type Output = V2;

    fn mul(self, rhs: V2) -> V2 {
        self.apply(rhs)
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.then_after(rhs)
    }
}

/// Line with the solid side opposite the normal. Points `p` satisfy
/// `n.dot(p) == d` on the boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Halfspace {
    /// Unit normal.
    pub n: V2,
    pub d: f32,
}

impl Halfspace {
    /// Halfspace through `point` with normal `n` (normalized here).
    #[must_use]
    pub fn new(n: V2, point: V2) -> Self {
        let n = n.norm();
        Self { n, d: n.dot(point) }
    }

    /// Signed distance; positive on the normal side.
    #[must_use]
    pub fn distance(self, p: V2) -> f32 {
        self.n.dot(p) - self.d
    }

    /// Closest point on the boundary line.
    #[must_use]
    pub fn project(self, p: V2) -> V2 {
        p - self.n * self.distance(p)
    }

    /// Where segment `a..b` crosses the boundary, given their distances.
    #[must_use]
    pub fn intersect(a: V2, b: V2, da: f32, db: f32) -> V2 {
        a + (b - a) * (da / (da - db))
    }

    #[must_use]
    pub fn transformed(self, tx: Transform) -> Self {
        let n = tx.r.apply(self.n);
        Self {
            n,
            d: tx.p.dot(n) + self.d,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: V2,
    pub max: V2,
}

impl Aabb {
    /// Box spanning two corners in any order.
    #[must_use]
    pub fn new(a: V2, b: V2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[must_use]
    pub fn from_center(center: V2, half_extents: V2) -> Self {
        let h = half_extents.abs();
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    #[must_use]
    pub fn from_points(points: &[V2]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(first, first), |bb, &p| Self {
            min: bb.min.min(p),
            max: bb.max.max(p),
        }))
    }

    #[must_use]
    pub fn center(self) -> V2 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn extents(self) -> V2 {
        self.max - self.min
    }

    #[must_use]
    pub fn half_extents(self) -> V2 {
        self.extents() * 0.5
    }

    #[must_use]
    pub fn area(self) -> f32 {
        let e = self.extents();
        e.x * e.y
    }

    #[must_use]
    pub fn contains_point(self, p: V2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[must_use]
    pub fn contains(self, other: &Self) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Boxes that only touch at an edge overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y)
    }

    /// Closest point inside the box.
    #[must_use]
    pub fn clamp_point(self, p: V2) -> V2 {
        p.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn union(self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn expanded(self, amount: f32) -> Self {
        let a = V2::splat(amount);
        Self::new(self.min - a, self.max + a)
    }
}

/// Circle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Circle {
    pub p: V2,
    pub r: f32,
}

impl Circle {
    #[must_use]
    pub const fn new(p: V2, r: f32) -> Self {
        Self { p, r }
    }

    #[must_use]
    pub fn contains_point(self, p: V2) -> bool {
        (p - self.p).len_sq() <= self.r * self.r
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let r = self.r + other.r;
        (other.p - self.p).len_sq() <= r * r
    }

    #[must_use]
    pub fn overlaps_aabb(&self, bb: &Aabb) -> bool {
        let closest = bb.clamp_point(self.p);
        (self.p - closest).len_sq() <= self.r * self.r
    }

    #[must_use]
    pub fn bounds(self) -> Aabb {
        Aabb::from_center(self.p, V2::splat(self.r))
    }
}

/// Ray segment from `p` along unit direction `d` for at most `t` units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub p: V2,
    pub d: V2,
    pub t: f32,
}

/// Result of a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the ray.
    pub t: f32,
    /// Surface normal at the hit, facing the ray origin.
    pub n: V2,
}

impl Ray {
    /// The direction is normalized here.
    #[must_use]
    pub fn new(p: V2, d: V2, t: f32) -> Self {
        Self { p, d: d.norm(), t }
    }

    /// Ray from `a` to `b`.
    #[must_use]
    pub fn between(a: V2, b: V2) -> Self {
        Self::new(a, b - a, a.distance(b))
    }

    #[must_use]
    pub fn at(self, t: f32) -> V2 {
        self.p + self.d * t
    }

    #[must_use]
    pub fn end(self) -> V2 {
        self.at(self.t)
    }

    fn within(self, t: f32) -> bool {
        (0.0..=self.t).contains(&t)
    }

    /// Cast against a halfspace boundary from either side.
    #[must_use]
    pub fn cast_halfspace(&self, h: &Halfspace) -> Option<RayHit> {
        let denom = h.n.dot(self.d);
        if denom == 0.0 {
            return None;
        }
        let t = -h.distance(self.p) / denom;
        self.within(t).then(|| RayHit {
            t,
            n: if denom < 0.0 { h.n } else { -h.n },
        })
    }

    /// Cast against a circle. Rays starting inside do not hit.
    #[must_use]
    pub fn cast_circle(&self, c: &Circle) -> Option<RayHit> {
        let m = self.p - c.p;
        let b = m.dot(self.d);
        let cc = c.r.mul_add(-c.r, m.len_sq());
        if cc < 0.0 {
            return None;
        }
        let disc = b.mul_add(b, -cc);
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        if !self.within(t) {
            return None;
        }
        Some(RayHit {
            t,
            n: (self.at(t) - c.p).norm(),
        })
    }

    /// Cast against a box using the slab method. Rays starting inside do not
    /// hit.
    #[must_use]
    pub fn cast_aabb(&self, bb: &Aabb) -> Option<RayHit> {
        if bb.contains_point(self.p) {
            return None;
        }
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = V2::ZERO;

        for (origin, dir, lo, hi, axis) in [
            (self.p.x, self.d.x, bb.min.x, bb.max.x, V2::X),
            (self.p.y, self.d.y, bb.min.y, bb.max.y, V2::Y),
        ] {
            if dir == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let (t0, t1) = ((lo - origin) * inv, (hi - origin) * inv);
            let (near, far, n) = if t0 < t1 {
                (t0, t1, -axis)
            } else {
                (t1, t0, axis)
            };
            if near > t_enter {
                t_enter = near;
                normal = n;
            }
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }

        self.within(t_enter).then_some(RayHit {
            t: t_enter,
            n: normal,
        })
    }
}
