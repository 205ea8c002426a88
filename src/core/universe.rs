//! Row-major grid storage.
//!
//! Cells live in a flat `Vec` indexed by `y * width + x`.  The simulation
//! walks indices directly; [`Position`] is only used at the edges (neighbour
//! lookup, painting).

use super::direction::Direction;

/// Column / row coordinate of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Universe<T> {
    pub area: Vec<T>,
    pub width: usize,
    pub height: usize,
}

impl<T: Clone + Default> Universe<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            area: vec![T::default(); width * height],
            width,
            height,
        }
    }
}

impl<T> Universe<T> {
    pub fn len(&self) -> usize {
        self.area.len()
    }

    pub fn is_empty(&self) -> bool {
        self.area.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn i_to_pos(&self, index: usize) -> Position {
        Position {
            x: index % self.width,
            y: index / self.width,
        }
    }

    pub fn pos_to_i(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        if self.contains(pos) {
            self.area.get(self.pos_to_i(pos))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        if self.contains(pos) {
            let i = self.pos_to_i(pos);
            self.area.get_mut(i)
        } else {
            None
        }
    }

    /// Index of the neighbour of `index` in `dir`, or `None` past the edge.
    pub fn neighbor_index(&self, index: usize, dir: Direction) -> Option<usize> {
        let Position { x, y } = self.i_to_pos(index);
        let (dx, dy) = dir.offset();
        let x = x.checked_add_signed(dx)?;
        let y = y.checked_add_signed(dy)?;
        let pos = Position { x, y };
        self.contains(pos).then(|| self.pos_to_i(pos))
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.area.swap(a, b);
    }

    /// Rows of cells, top row first.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.area.chunks(self.width.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_position_agree() {
        let u: Universe<u8> = Universe::new(4, 3);
        assert_eq!(u.len(), 12);
        assert_eq!(u.i_to_pos(6), Position::new(2, 1));
        assert_eq!(u.pos_to_i(Position::new(3, 2)), 11);
    }

    #[test]
    fn neighbours_do_not_wrap_around_edges() {
        let u: Universe<u8> = Universe::new(4, 3);
        // Right edge of the first row must not reach the second row.
        assert_eq!(u.neighbor_index(3, Direction::Right), None);
        assert_eq!(u.neighbor_index(4, Direction::Left), None);
        assert_eq!(u.neighbor_index(0, Direction::Up), None);
        assert_eq!(u.neighbor_index(9, Direction::Down), None);
        assert_eq!(u.neighbor_index(5, Direction::RightDown), Some(10));
        assert_eq!(u.neighbor_index(5, Direction::LeftUp), Some(0));
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let mut u: Universe<u8> = Universe::new(2, 2);
        assert!(u.get(Position::new(2, 0)).is_none());
        assert!(u.get_mut(Position::new(0, 2)).is_none());
        *u.get_mut(Position::new(1, 1)).unwrap() = 9;
        assert_eq!(u.area[3], 9);
    }
}
