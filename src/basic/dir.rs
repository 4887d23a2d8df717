use std::ops::{Add, Neg};

use Dir::*;

// defined in clockwise order starting at U
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Display)]
pub enum Dir {
    U = 0,
    R = 1,
    D = 2,
    L = 3,
}

impl From<u8> for Dir {
    fn from(num: u8) -> Self {
        match num % 4 {
            0 => U,
            1 => R,
            2 => D,
            _ => L,
        }
    }
}

impl Neg for Dir {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self + 2
    }
}

/// Turn clockwise by `rhs` quarter turns
impl Add<u8> for Dir {
    type Output = Self;

    fn add(self, rhs: u8) -> Self::Output {
        Self::from(self as u8 + rhs % 4)
    }
}

impl Dir {
    // clockwise order starting from U
    pub fn iter() -> impl Iterator<Item = Self> {
        [U, R, D, L].iter().copied()
    }

    /// Unit offset `(dx, dy)`, y grows upwards
    pub fn offset(self) -> (isize, isize) {
        match self {
            U => (0, 1),
            R => (1, 0),
            D => (0, -1),
            L => (-1, 0),
        }
    }
}

#[test]
fn test_dir_math() {
    let test_plus = [(U, 1, R), (U, 2, D), (D, 3, R), (L, 4, L)];

    for &(start, add, expect) in &test_plus {
        assert_eq!(start + add, expect);
    }

    for dir in Dir::iter() {
        assert_eq!(-(-dir), dir);
        let (dx, dy) = dir.offset();
        let (ox, oy) = (-dir).offset();
        assert_eq!((dx + ox, dy + oy), (0, 0));
    }
    assert_eq!(-L, R);
}
