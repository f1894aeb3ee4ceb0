//! # Integer geometry
//!
//! Points, rectangles and walls shared by the grid, the coverage decomposition and the graph. All
//! coordinates are integers: world units for walls and visit points, cell indices for grid
//! rectangles.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use util::raise_error;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A 2D integer point, either a world position or a cell index depending on context.
pub type Point = Vector2<i32>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Axis aligned integer rectangle.
///
/// `max()` is exclusive when the rectangle describes a set of cells, and is the far corner when
/// it describes a region of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub position: Point,
    pub size: Point,
}

/// A straight obstacle segment in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub start: Point,
    pub end: Point,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A direction a rectangle may grow in by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowDirection {
    PosX,
    NegX,
    PosY,
    NegY,
}

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Order in which zones are grown. Each direction is grown to saturation before the next one is
/// tried, so changing this order changes the shape of every zone.
pub const GROWTH_ORDER: [GrowDirection; 4] = [
    GrowDirection::PosX,
    GrowDirection::NegX,
    GrowDirection::PosY,
    GrowDirection::NegY,
];

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Rect {
    /// Create a new rectangle.
    ///
    /// # Panics
    /// - If either component of `size` is negative.
    pub fn new(position: Point, size: Point) -> Self {
        if size.x < 0 || size.y < 0 {
            raise_error!("Rect created with a negative size ({}, {})", size.x, size.y);
        }

        Self { position, size }
    }

    /// Create a rectangle from its components.
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(Point::new(x, y), Point::new(w, h))
    }

    /// A one by one rectangle at the given point.
    pub fn unit(point: Point) -> Self {
        Self {
            position: point,
            size: Point::new(1, 1),
        }
    }

    pub fn empty() -> Self {
        Self {
            position: Point::zeros(),
            size: Point::zeros(),
        }
    }

    pub fn min(&self) -> Point {
        self.position
    }

    pub fn max(&self) -> Point {
        self.position + self.size
    }

    /// Integer centre of the rectangle, rounded towards the position.
    pub fn centre(&self) -> Point {
        self.position + self.size / 2
    }

    /// True if `point` lies in `[min, max)` on both axes.
    pub fn contains(&self, point: &Point) -> bool {
        let max = self.max();

        point.x >= self.position.x && point.x < max.x && point.y >= self.position.y && point.y < max.y
    }

    /// True if this rectangle lies entirely within `other`.
    pub fn is_inside(&self, other: &Rect) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());

        min.x >= other_min.x && min.y >= other_min.y && max.x <= other_max.x && max.y <= other_max.y
    }

    pub fn area(&self) -> i32 {
        self.size.x * self.size.y
    }

    pub fn is_empty(&self) -> bool {
        self.size.x == 0 || self.size.y == 0
    }

    /// Return the rectangle grown by one cell in the given direction.
    pub fn extend(&self, direction: GrowDirection) -> Rect {
        let mut rect = *self;

        match direction {
            GrowDirection::PosX => rect.size.x += 1,
            GrowDirection::NegX => {
                rect.position.x -= 1;
                rect.size.x += 1;
            }
            GrowDirection::PosY => rect.size.y += 1,
            GrowDirection::NegY => {
                rect.position.y -= 1;
                rect.size.y += 1;
            }
        }

        rect
    }

    /// Intersection of two rectangles, empty if they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let min = Point::new(
            self.position.x.max(other.position.x),
            self.position.y.max(other.position.y),
        );
        let self_max = self.max();
        let other_max = other.max();
        let max = Point::new(self_max.x.min(other_max.x), self_max.y.min(other_max.y));

        if max.x <= min.x || max.y <= min.y {
            Rect {
                position: min,
                size: Point::zeros(),
            }
        } else {
            Rect {
                position: min,
                size: max - min,
            }
        }
    }

    /// Iterate over every cell covered by the rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let min = self.min();
        let max = self.max();

        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| Point::new(x, y)))
    }
}

impl Wall {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// True if the wall touches the closed world rectangle.
    pub fn intersects(&self, rect: &Rect) -> bool {
        segment_intersects_rect(&self.start, &self.end, rect)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert an integer point into a floating point vector.
pub fn to_f64(point: &Point) -> Vector2<f64> {
    Vector2::new(point.x as f64, point.y as f64)
}

/// Euclidean distance between two integer points.
pub fn distance(a: &Point, b: &Point) -> f64 {
    (to_f64(b) - to_f64(a)).norm()
}

/// Test a segment against a closed rectangle.
///
/// Segments touching an edge or corner count as intersecting, as do segments lying entirely
/// inside the rectangle. Degenerate segments are treated as points.
pub fn segment_intersects_rect(a: &Point, b: &Point, rect: &Rect) -> bool {
    // Canonical endpoint order so the result is identical for both directions
    let (a, b) = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };

    let a = to_f64(a);
    let b = to_f64(b);
    let min = to_f64(&rect.min());
    let max = to_f64(&rect.max());
    let d = b - a;

    // Clip the segment parameter against each slab in turn
    let mut t_enter = 0.0f64;
    let mut t_exit = 1.0f64;

    for axis in 0..2 {
        if d[axis] == 0.0 {
            if a[axis] < min[axis] || a[axis] > max[axis] {
                return false;
            }
            continue;
        }

        let mut t_near = (min[axis] - a[axis]) / d[axis];
        let mut t_far = (max[axis] - a[axis]) / d[axis];
        if t_near > t_far {
            std::mem::swap(&mut t_near, &mut t_far);
        }

        t_enter = t_enter.max(t_near);
        t_exit = t_exit.min(t_far);

        if t_enter > t_exit {
            return false;
        }
    }

    true
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rect_extend() {
        let r = Rect::unit(Point::new(2, 2));

        assert_eq!(r.extend(GrowDirection::PosX), Rect::from_xywh(2, 2, 2, 1));
        assert_eq!(r.extend(GrowDirection::NegX), Rect::from_xywh(1, 2, 2, 1));
        assert_eq!(r.extend(GrowDirection::PosY), Rect::from_xywh(2, 2, 1, 2));
        assert_eq!(r.extend(GrowDirection::NegY), Rect::from_xywh(2, 1, 1, 2));
    }

    #[test]
    fn test_rect_queries() {
        let r = Rect::from_xywh(0, 0, 3, 3);

        assert!(r.contains(&Point::new(0, 0)));
        assert!(r.contains(&Point::new(2, 2)));
        assert!(!r.contains(&Point::new(3, 0)));
        assert_eq!(r.centre(), Point::new(1, 1));
        assert_eq!(r.area(), 9);

        assert!(Rect::from_xywh(1, 1, 2, 2).is_inside(&r));
        assert!(!Rect::from_xywh(1, 1, 3, 2).is_inside(&r));

        assert_eq!(r.cells().count(), 9);
        assert_eq!(r.cells().nth(1), Some(Point::new(1, 0)));

        assert!(Rect::from_xywh(5, 5, 0, 2).is_empty());
        assert!(r
            .intersection(&Rect::from_xywh(3, 0, 2, 2))
            .is_empty());
        assert_eq!(
            r.intersection(&Rect::from_xywh(-1, 1, 3, 5)),
            Rect::from_xywh(0, 1, 2, 2)
        );
    }

    #[test]
    #[should_panic]
    fn test_negative_size_panics() {
        Rect::from_xywh(0, 0, -1, 2);
    }

    #[test]
    fn test_segment_intersection() {
        let r = Rect::from_xywh(10, 10, 10, 10);

        // Crossing
        assert!(segment_intersects_rect(&Point::new(0, 15), &Point::new(30, 15), &r));
        // Fully inside
        assert!(segment_intersects_rect(&Point::new(12, 12), &Point::new(18, 14), &r));
        // Touching an edge and a corner
        assert!(segment_intersects_rect(&Point::new(20, 0), &Point::new(20, 30), &r));
        assert!(segment_intersects_rect(&Point::new(0, 0), &Point::new(10, 10), &r));
        // Diagonal through the corners only
        assert!(segment_intersects_rect(&Point::new(0, 30), &Point::new(30, 0), &r));
        // Misses
        assert!(!segment_intersects_rect(&Point::new(0, 0), &Point::new(9, 30), &r));
        assert!(!segment_intersects_rect(&Point::new(21, 0), &Point::new(21, 30), &r));
        assert!(!segment_intersects_rect(&Point::new(0, 0), &Point::new(5, 5), &r));
        // Degenerate segment
        assert!(segment_intersects_rect(&Point::new(15, 15), &Point::new(15, 15), &r));
        assert!(!segment_intersects_rect(&Point::new(25, 15), &Point::new(25, 15), &r));
    }
}
