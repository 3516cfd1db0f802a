use crate::state::Position;

/// Set of board cells packed into a row-major 64-bit mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Zone(u64);

impl Zone {
    pub const EMPTY: Self = Self(0);

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Adds a cell; off-board positions are ignored.
    pub fn insert(&mut self, position: Position) {
        if let Some(bit) = position.bit_index() {
            self.0 |= 1 << bit;
        }
    }

    pub fn contains(self, position: Position) -> bool {
        position
            .bit_index()
            .is_some_and(|bit| self.0 & (1 << bit) != 0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Cells in row-major order.
    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bits = self.0;
        core::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let bit = bits.trailing_zeros() as i32;
            bits &= bits - 1;
            Some(Position::new(bit / 8, bit % 8))
        })
    }

    pub fn positions(self) -> Vec<Position> {
        self.iter().collect()
    }
}

impl FromIterator<Position> for Zone {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut zone = Zone::EMPTY;
        for position in iter {
            zone.insert(position);
        }
        zone
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Zone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}
