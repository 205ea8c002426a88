//! Neighbour directions and randomized direction preference lists.

use std::slice::Iter;

use rand::Rng;

/// One of the eight neighbours of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    LeftUp,
    RightUp,
    LeftDown,
    RightDown,
}

impl Direction {
    /// Column and row offset of the neighbour in this direction.
    pub fn offset(self) -> (isize, isize) {
        use Direction::*;
        let dx = match self {
            Left | LeftUp | LeftDown => -1,
            Right | RightUp | RightDown => 1,
            Up | Down => 0,
        };
        let dy = match self {
            Up | LeftUp | RightUp => -1,
            Down | LeftDown | RightDown => 1,
            Left | Right => 0,
        };
        (dx, dy)
    }

    pub fn is_downward(self) -> bool {
        matches!(self, Direction::Down | Direction::LeftDown | Direction::RightDown)
    }
}

/// A fixed [`Direction`], or a pair that is tried in a random order.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtDirection {
    One(Direction),
    Random(Direction, Direction),
}

/// Iterates an [`ExtDirection`] list in order, expanding every
/// [`ExtDirection::Random`] pair into both directions.
///
/// The coin flips for all pairs are drawn up front, so the iterator does not
/// hold on to the RNG while the caller resolves collisions.
pub struct ExtDirIterator<'a> {
    dirs: Iter<'a, ExtDirection>,
    /// Bit `i` set means the `i`-th pair yields its second direction first.
    flips: u64,
    pair: u32,
    pending: Option<Direction>,
}

impl<'a> ExtDirIterator<'a> {
    pub fn new<R: Rng>(dirs: &'a [ExtDirection], rng: &mut R) -> Self {
        let mut flips = 0u64;
        let pairs = dirs
            .iter()
            .filter(|d| matches!(d, ExtDirection::Random(..)))
            .count()
            .min(64);
        for i in 0..pairs {
            if rng.random::<bool>() {
                flips |= 1 << i;
            }
        }
        Self {
            dirs: dirs.iter(),
            flips,
            pair: 0,
            pending: None,
        }
    }
}

impl Iterator for ExtDirIterator<'_> {
    type Item = Direction;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(d) = self.pending.take() {
            return Some(d);
        }

        match *self.dirs.next()? {
            ExtDirection::One(d) => Some(d),
            ExtDirection::Random(a, b) => {
                let swapped = self.pair < 64 && self.flips & (1 << self.pair) != 0;
                self.pair += 1;
                let (first, second) = if swapped { (b, a) } else { (a, b) };
                self.pending = Some(second);
                Some(first)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use Direction::*;
    use ExtDirection::{One, Random};

    #[test]
    fn fixed_directions_keep_their_order() {
        let dirs = [One(Down), One(Up), One(Left)];
        let mut rng = StdRng::seed_from_u64(1);
        let got: Vec<_> = ExtDirIterator::new(&dirs, &mut rng).collect();
        assert_eq!(got, vec![Down, Up, Left]);
    }

    #[test]
    fn random_pairs_yield_both_directions_after_preceding_ones() {
        let dirs = [One(Down), Random(RightDown, LeftDown), Random(Right, Left)];
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let got: Vec<_> = ExtDirIterator::new(&dirs, &mut rng).collect();
            assert_eq!(got.len(), 5);
            assert_eq!(got[0], Down);
            assert!(got[1..3].contains(&RightDown) && got[1..3].contains(&LeftDown));
            assert!(got[3..5].contains(&Right) && got[3..5].contains(&Left));
        }
    }

    #[test]
    fn random_pairs_use_both_orders() {
        let dirs = [Random(Right, Left)];
        let mut seen_right_first = false;
        let mut seen_left_first = false;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            match ExtDirIterator::new(&dirs, &mut rng).next() {
                Some(Right) => seen_right_first = true,
                Some(Left) => seen_left_first = true,
                other => panic!("unexpected first direction {other:?}"),
            }
        }
        assert!(seen_right_first && seen_left_first);
    }

    #[test]
    fn offsets_point_at_neighbours() {
        assert_eq!(Up.offset(), (0, -1));
        assert_eq!(RightDown.offset(), (1, 1));
        assert_eq!(LeftUp.offset(), (-1, -1));
        assert!(LeftDown.is_downward());
        assert!(!Right.is_downward());
    }
}
