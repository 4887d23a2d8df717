use super::dir::Dir;
use std::fmt::{Debug, Error, Formatter};

// INVARIANT: (0, 0) is the bottom-left tile, y grows upwards
#[derive(Eq, PartialEq, Copy, Clone, Hash)]
pub struct GridPoint {
    pub x: isize,
    pub y: isize,
}

/// Width and height of a board, stored as the point one past the top-right corner
pub type GridDim = GridPoint;

impl GridPoint {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn translate(self, dir: Dir, dist: usize) -> Self {
        let (dx, dy) = dir.offset();
        let dist = dist as isize;
        Self {
            x: self.x + dx * dist,
            y: self.y + dy * dist,
        }
    }

    // O(1)
    pub fn manhattan_distance(self, other: Self) -> usize {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Whether `pos` lies inside a board of dimension `self`
    pub fn contains(self, pos: Self) -> bool {
        (0..self.x).contains(&pos.x) && (0..self.y).contains(&pos.y)
    }

    /// Number of tiles on a board of dimension `self`
    pub fn area(self) -> usize {
        (self.x.max(0) * self.y.max(0)) as usize
    }
}

impl Debug for GridPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}

#[test]
fn test_manhattan_distance() {
    [
        ((0, 0), (0, 0), 0),
        ((0, 0), (0, 1), 1),
        ((0, 0), (1, 0), 1),
        ((0, 0), (0, 10), 10),
        ((0, 0), (0, -10), 10),
        ((0, 10), (0, 0), 10),
        ((1, 1), (2, 2), 2),
        ((0, 0), (2, 2), 4),
        ((3, -1), (-1, 3), 8),
    ]
    .iter()
    .for_each(|&((x1, y1), (x2, y2), d)| {
        let p1 = GridPoint::new(x1, y1);
        let p2 = GridPoint::new(x2, y2);
        assert_eq!(p1.manhattan_distance(p2), d);
    });
}

#[test]
fn test_translate_and_contains() {
    let dim = GridPoint::new(3, 2);
    let p = GridPoint::new(2, 1);
    assert!(dim.contains(p));
    assert!(!dim.contains(p.translate(Dir::R, 1)));
    assert!(!dim.contains(p.translate(Dir::U, 1)));
    assert_eq!(p.translate(Dir::L, 2), GridPoint::new(0, 1));
    assert_eq!(dim.area(), 6);
    assert_eq!(GridPoint::new(-1, 4).area(), 0);
    assert_eq!(format!("{:?}", p), "<2, 1>");
}
