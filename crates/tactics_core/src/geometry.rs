//! Rectangle and circle value types used by the world views and the
//! strike targeting heuristic.
//!
//! A [`Rect`] is the bounding box of a set of unit positions. The empty
//! rect is representable and acts as the identity for union, so a view
//! over zero units is well defined.

use serde::{Deserialize, Serialize};

use crate::math::{Fixed, Vec2Fixed};

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner (min x, min y). `None` for the empty rect.
    corners: Option<(Vec2Fixed, Vec2Fixed)>,
}

impl Rect {
    /// The empty rectangle (contains nothing, union identity).
    pub const EMPTY: Self = Self { corners: None };

    /// Rectangle covering a single point.
    #[must_use]
    pub const fn from_point(p: Vec2Fixed) -> Self {
        Self {
            corners: Some((p, p)),
        }
    }

    /// Rectangle from explicit min/max corners.
    ///
    /// Corners are normalized so `min <= max` on both axes.
    #[must_use]
    pub fn from_corners(a: Vec2Fixed, b: Vec2Fixed) -> Self {
        let min = Vec2Fixed::new(a.x.min(b.x), a.y.min(b.y));
        let max = Vec2Fixed::new(a.x.max(b.x), a.y.max(b.y));
        Self {
            corners: Some((min, max)),
        }
    }

    /// Whether this is the empty rectangle.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.corners.is_none()
    }

    /// Grow the rectangle to cover `p`.
    #[must_use]
    pub fn union_point(self, p: Vec2Fixed) -> Self {
        match self.corners {
            None => Self::from_point(p),
            Some((min, max)) => Self {
                corners: Some((
                    Vec2Fixed::new(min.x.min(p.x), min.y.min(p.y)),
                    Vec2Fixed::new(max.x.max(p.x), max.y.max(p.y)),
                )),
            },
        }
    }

    /// Union of two rectangles.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        match other.corners {
            None => self,
            Some((min, max)) => self.union_point(min).union_point(max),
        }
    }

    /// Whether `p` lies inside the rectangle (inclusive edges).
    #[must_use]
    pub fn contains(&self, p: Vec2Fixed) -> bool {
        match self.corners {
            None => false,
            Some((min, max)) => p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y,
        }
    }

    /// Center point. Empty rect centers on the origin.
    #[must_use]
    pub fn center(&self) -> Vec2Fixed {
        match self.corners {
            None => Vec2Fixed::ZERO,
            Some((min, max)) => Vec2Fixed::new(
                (min.x + max.x) / Fixed::from_num(2),
                (min.y + max.y) / Fixed::from_num(2),
            ),
        }
    }

    /// Top-left corner, or the origin for the empty rect.
    #[must_use]
    pub fn location(&self) -> Vec2Fixed {
        self.corners.map_or(Vec2Fixed::ZERO, |(min, _)| min)
    }

    /// Width (zero for the empty rect).
    #[must_use]
    pub fn width(&self) -> Fixed {
        self.corners
            .map_or(Fixed::ZERO, |(min, max)| max.x - min.x)
    }

    /// Height (zero for the empty rect).
    #[must_use]
    pub fn height(&self) -> Fixed {
        self.corners
            .map_or(Fixed::ZERO, |(min, max)| max.y - min.y)
    }
}

/// Circle used as the blast template for area-effect strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    /// Blast center.
    pub center: Vec2Fixed,
    /// Blast radius.
    #[serde(with = "crate::math::fixed_serde")]
    pub radius: Fixed,
}

impl Circle {
    /// Create a circle at `center` with `radius`.
    #[must_use]
    pub const fn new(center: Vec2Fixed, radius: Fixed) -> Self {
        Self { center, radius }
    }

    /// Whether `p` lies within the circle (inclusive boundary).
    ///
    /// Compares squared distances to stay in fixed-point math.
    #[must_use]
    pub fn contains(&self, p: Vec2Fixed) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> Vec2Fixed {
        Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    #[test]
    fn test_empty_rect_is_union_identity() {
        let r = Rect::from_corners(v(10, 10), v(20, 30));
        assert_eq!(Rect::EMPTY.union(r), r);
        assert_eq!(r.union(Rect::EMPTY), r);
        assert!(!Rect::EMPTY.contains(v(0, 0)));
    }

    #[test]
    fn test_union_point_expands_bounds() {
        let r = Rect::from_point(v(5, 5)).union_point(v(-5, 15));
        assert!(r.contains(v(0, 10)));
        assert!(!r.contains(v(6, 10)));
        assert_eq!(r.width(), Fixed::from_num(10));
        assert_eq!(r.height(), Fixed::from_num(10));
    }

    #[test]
    fn test_rect_center_and_location() {
        let r = Rect::from_corners(v(0, 0), v(10, 20));
        assert_eq!(r.center(), v(5, 10));
        assert_eq!(r.location(), v(0, 0));
    }

    #[test]
    fn test_circle_contains_boundary_inclusive() {
        let c = Circle::new(v(0, 0), Fixed::from_num(5));
        assert!(c.contains(v(3, 4)));
        assert!(c.contains(v(5, 0)));
        assert!(!c.contains(v(5, 1)));
    }
}
