//! Planar geometry used by the tactical core
//!
//! Field coordinates follow the simulator: x grows toward the opponent goal,
//! angles are degrees in (-180, 180] measured from the +x axis.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

const EPS: f64 = 1.0e-6;

/// 2D vector / field point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a vector from length and direction.
    pub fn polar(r: f64, dir: AngleDeg) -> Self {
        Self {
            x: r * dir.cos(),
            y: r * dir.sin(),
        }
    }

    pub fn r2(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn r(self) -> f64 {
        self.r2().sqrt()
    }

    pub fn dist(self, other: Vec2) -> f64 {
        (self - other).r()
    }

    pub fn dist2(self, other: Vec2) -> f64 {
        (self - other).r2()
    }

    /// Direction of the vector. The zero vector points along +x.
    pub fn th(self) -> AngleDeg {
        if self.r2() < EPS * EPS {
            return AngleDeg::new(0.0);
        }
        AngleDeg::new(self.y.atan2(self.x).to_degrees())
    }

    pub fn abs_x(self) -> f64 {
        self.x.abs()
    }

    pub fn abs_y(self) -> f64 {
        self.y.abs()
    }

    pub fn rotated(self, deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }

    pub fn normalized(self) -> Self {
        let len = self.r();
        if len > EPS {
            self / len
        } else {
            Self::ZERO
        }
    }

    /// Same direction, new length. A zero vector stays zero.
    pub fn with_length(self, len: f64) -> Self {
        self.normalized() * len
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, o: Vec2) {
        self.x += o.x;
        self.y += o.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, o: Vec2) {
        self.x -= o.x;
        self.y -= o.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, k: f64) -> Vec2 {
        Vec2::new(self.x / k, self.y / k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Angle in degrees, always normalized into (-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct AngleDeg(f64);

impl AngleDeg {
    pub fn new(deg: f64) -> Self {
        Self(normalize_deg(deg))
    }

    pub fn degree(self) -> f64 {
        self.0
    }

    pub fn abs(self) -> f64 {
        self.0.abs()
    }

    pub fn sin(self) -> f64 {
        self.0.to_radians().sin()
    }

    pub fn cos(self) -> f64 {
        self.0.to_radians().cos()
    }

    /// True when `self` lies counter-clockwise-before `other` by less than 180°.
    pub fn is_left_of(self, other: AngleDeg) -> bool {
        let diff = (other - self).degree();
        diff > 0.0 && diff < 180.0
    }

    /// True when `self` lies on the counter-clockwise arc from `start` to `end`.
    pub fn is_within(self, start: AngleDeg, end: AngleDeg) -> bool {
        let span = (end.0 - start.0).rem_euclid(360.0);
        let offset = (self.0 - start.0).rem_euclid(360.0);
        offset <= span + EPS
    }

    /// Bisector of the arc running counter-clockwise from `left` to `right`.
    pub fn bisect(left: AngleDeg, right: AngleDeg) -> AngleDeg {
        let rel = right - left;
        let result = AngleDeg::new(left.0 + rel.degree() * 0.5);
        if left.is_left_of(right) {
            result
        } else {
            AngleDeg::new(result.0 + 180.0)
        }
    }
}

impl From<f64> for AngleDeg {
    fn from(deg: f64) -> Self {
        AngleDeg::new(deg)
    }
}

impl From<AngleDeg> for f64 {
    fn from(a: AngleDeg) -> f64 {
        a.0
    }
}

impl Sub for AngleDeg {
    type Output = AngleDeg;
    fn sub(self, o: AngleDeg) -> AngleDeg {
        AngleDeg::new(self.0 - o.0)
    }
}

impl Add<f64> for AngleDeg {
    type Output = AngleDeg;
    fn add(self, deg: f64) -> AngleDeg {
        AngleDeg::new(self.0 + deg)
    }
}

impl Sub<f64> for AngleDeg {
    type Output = AngleDeg;
    fn sub(self, deg: f64) -> AngleDeg {
        AngleDeg::new(self.0 - deg)
    }
}

fn normalize_deg(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let mut d = deg.rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Arcsine in degrees with the argument clamped into [-1, 1].
pub fn asin_deg(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Line `a·x + b·y + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    a: f64,
    b: f64,
    c: f64,
}

impl Line2 {
    pub fn through(p1: Vec2, p2: Vec2) -> Self {
        let a = -(p2.y - p1.y);
        let b = p2.x - p1.x;
        let c = -a * p1.x - b * p1.y;
        Self { a, b, c }
    }

    pub fn from_angle(origin: Vec2, dir: AngleDeg) -> Self {
        Self::through(origin, origin + Vec2::polar(1.0, dir))
    }

    pub fn dist(&self, p: Vec2) -> f64 {
        let norm = (self.a * self.a + self.b * self.b).sqrt();
        if norm < EPS {
            return 0.0;
        }
        (self.a * p.x + self.b * p.y + self.c).abs() / norm
    }

    /// Intersection point, `None` for parallel lines.
    pub fn intersection(&self, other: &Line2) -> Option<Vec2> {
        let det = self.a * other.b - other.a * self.b;
        if det.abs() < EPS {
            return None;
        }
        Some(Vec2::new(
            (self.b * other.c - other.b * self.c) / det,
            (other.a * self.c - self.a * other.c) / det,
        ))
    }
}

/// Half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray2 {
    pub origin: Vec2,
    pub dir: AngleDeg,
}

impl Ray2 {
    pub fn new(origin: Vec2, dir: AngleDeg) -> Self {
        Self { origin, dir }
    }

    /// Whether `p` lies ahead of the origin along the ray direction.
    pub fn in_right_dir(&self, p: Vec2) -> bool {
        let rel = p - self.origin;
        rel.r2() < EPS || (rel.th() - self.dir).abs() < 10.0
    }

    pub fn intersection(&self, line: &Line2) -> Option<Vec2> {
        let hit = Line2::from_angle(self.origin, self.dir).intersection(line)?;
        self.in_right_dir(hit).then_some(hit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle2 {
    pub center: Vec2,
    pub radius: f64,
}

impl Circle2 {
    pub fn new(center: Vec2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.center.dist2(p) <= self.radius * self.radius
    }

    /// Number of points where the segment `from`-`to` crosses the circle boundary.
    pub fn segment_intersections(&self, from: Vec2, to: Vec2) -> usize {
        let d = to - from;
        let f = from - self.center;
        let a = d.r2();
        if a < EPS {
            return 0;
        }
        let b = 2.0 * (f.x * d.x + f.y * d.y);
        let c = f.r2() - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return 0;
        }
        let sq = disc.sqrt();
        let t1 = (-b - sq) / (2.0 * a);
        let t2 = (-b + sq) / (2.0 * a);
        let hits = [t1, t2].iter().filter(|t| (0.0..=1.0).contains(*t)).count();
        if disc.abs() < EPS {
            hits.min(1)
        } else {
            hits
        }
    }
}

/// Annular wedge around `center`, from `start` counter-clockwise to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector2 {
    pub center: Vec2,
    pub min_r: f64,
    pub max_r: f64,
    pub start: AngleDeg,
    pub end: AngleDeg,
}

impl Sector2 {
    pub fn new(center: Vec2, min_r: f64, max_r: f64, start: AngleDeg, end: AngleDeg) -> Self {
        Self {
            center,
            min_r,
            max_r,
            start,
            end,
        }
    }

    /// Symmetric wedge of `half_width` degrees around `bearing`.
    pub fn around(center: Vec2, min_r: f64, max_r: f64, bearing: AngleDeg, half_width: f64) -> Self {
        Self::new(center, min_r, max_r, bearing - half_width, bearing + half_width)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let rel = p - self.center;
        let r2 = rel.r2();
        if r2 < self.min_r * self.min_r || r2 > self.max_r * self.max_r {
            return false;
        }
        rel.th().is_within(self.start, self.end)
    }
}

/// Axis-aligned rectangle given by its corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect2 {
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y))
    }

    /// Where a ray starting inside the rectangle leaves it.
    pub fn exit_point(&self, ray: &Ray2) -> Option<Vec2> {
        if !self.contains(ray.origin) {
            return None;
        }
        let dir = Vec2::polar(1.0, ray.dir);
        let axis_t = |o: f64, d: f64, lo: f64, hi: f64| {
            if d > EPS {
                (hi - o) / d
            } else if d < -EPS {
                (lo - o) / d
            } else {
                f64::INFINITY
            }
        };
        let t = axis_t(ray.origin.x, dir.x, self.min.x, self.max.x)
            .min(axis_t(ray.origin.y, dir.y, self.min.y, self.max.y));
        t.is_finite().then(|| ray.origin + dir * t)
    }
}
