//! Named per-node information columns.

/// A per-node value tracked by [`super::SolutionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// How many more neighbors in the solution a node needs, `max(0, K - covered)`.
    KRemaining,
    /// Number of neighbors that are still non-dominated.
    Degree,
    /// Composite priority used by the hybrid greedy operators.
    Weight,
}

impl Column {
    /// All columns in declaration order.
    pub const ALL: [Column; 3] = [Column::KRemaining, Column::Degree, Column::Weight];

    const fn bit(self) -> u8 {
        match self {
            Column::KRemaining => 0b001,
            Column::Degree => 0b010,
            Column::Weight => 0b100,
        }
    }
}

/// Small set of [`Column`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnSet(u8);

impl ColumnSet {
    pub const EMPTY: ColumnSet = ColumnSet(0);

    /// Builds a set from a slice of columns.
    pub const fn of(columns: &[Column]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < columns.len() {
            bits |= columns[i].bit();
            i += 1;
        }
        ColumnSet(bits)
    }

    pub fn contains(self, column: Column) -> bool {
        self.0 & column.bit() != 0
    }

    #[must_use]
    pub fn with(self, column: Column) -> Self {
        ColumnSet(self.0 | column.bit())
    }

    #[must_use]
    pub fn union(self, other: ColumnSet) -> Self {
        ColumnSet(self.0 | other.0)
    }

    /// Returns true when every column of `other` is also in `self`.
    pub fn is_superset(self, other: ColumnSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        iter.into_iter().fold(ColumnSet::EMPTY, ColumnSet::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_operations() {
        let a = ColumnSet::of(&[Column::KRemaining]);
        let b = ColumnSet::of(&[Column::Degree, Column::Weight]);
        let all = a.union(b);

        assert!(all.contains(Column::Weight));
        assert!(all.is_superset(a));
        assert!(!a.is_superset(all));
        assert_eq!(all.iter().collect::<Vec<_>>(), Column::ALL.to_vec());
        assert!(ColumnSet::EMPTY.is_empty());
        assert_eq!(
            [Column::Degree].into_iter().collect::<ColumnSet>(),
            ColumnSet::EMPTY.with(Column::Degree)
        );
    }
}
