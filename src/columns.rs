//! Submodule defining the ordered column list shared by every rendered row.

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexSet as IndexSetRaw;

/// `IndexSet` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexSet<T> = IndexSetRaw<T, hashbrown::DefaultHashBuilder>;

/// Ordered, non-empty list of column names in declaration order.
///
/// The position of a column in the list is the position of its value in
/// every value row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ColumnList {
    names: IndexSet<String>,
}

/// Reasons a sequence of names cannot form a [`ColumnList`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnListError {
    /// No column names were given.
    #[error("Empty column list")]
    Empty,
    /// The same column name appears twice.
    #[error("Duplicate column name: {0}")]
    Duplicate(String),
}

impl ColumnList {
    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; a column list holds at least one name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate the column names in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for ColumnList {
    type Error = ColumnListError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        if names.is_empty() {
            return Err(ColumnListError::Empty);
        }
        let mut set = IndexSet::with_capacity_and_hasher(
            names.len(),
            hashbrown::DefaultHashBuilder::default(),
        );
        for name in names {
            if set.contains(&name) {
                return Err(ColumnListError::Duplicate(name));
            }
            set.insert(name);
        }
        Ok(Self { names: set })
    }
}
