//! Variable references per row
//!
//! Tracks which variable names each row reads, and the reverse: which rows
//! read a given name. Only used for highlighting; totals never consult it.

use std::collections::{BTreeMap, BTreeSet};

/// Row → referenced names, plus name → referencing rows
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationMap {
    /// Indexed by row; `None` when the row references nothing
    rows: Vec<Option<Vec<String>>>,
    /// Name → rows that reference it
    referenced_by: BTreeMap<String, BTreeSet<usize>>,
}

impl RelationMap {
    /// Create an empty relation map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the names `row` references, replacing anything recorded before
    pub fn set(&mut self, row: usize, names: impl IntoIterator<Item = String>) {
        self.clear(row);

        let names: BTreeSet<String> = names.into_iter().collect();
        if self.rows.len() <= row {
            self.rows.resize(row + 1, None);
        }
        if names.is_empty() {
            return;
        }
        for name in &names {
            self.referenced_by
                .entry(name.clone())
                .or_default()
                .insert(row);
        }
        self.rows[row] = Some(names.into_iter().collect());
    }

    /// Remove everything recorded for a row
    pub fn clear(&mut self, row: usize) {
        let previous = match self.rows.get_mut(row) {
            Some(slot) => slot.take(),
            None => return,
        };
        for name in previous.into_iter().flatten() {
            if let Some(rows) = self.referenced_by.get_mut(&name) {
                rows.remove(&row);
                if rows.is_empty() {
                    self.referenced_by.remove(&name);
                }
            }
        }
    }

    /// Names the row references, sorted
    pub fn for_row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).and_then(|names| names.as_deref())
    }

    /// Rows that reference `name`, ascending
    pub fn rows_referencing(&self, name: &str) -> impl Iterator<Item = usize> + '_ {
        self.referenced_by
            .get(name)
            .into_iter()
            .flat_map(|rows| rows.iter().copied())
    }

    /// Rows to highlight when `row` is selected: every row that reads its
    /// pseudo-variable or any of the `names` it binds
    pub fn dependents_of(&self, row: usize, names: &[&str]) -> Vec<usize> {
        let row_name = crate::Ledger::row_variable(row);
        let mut result = BTreeSet::new();
        for name in std::iter::once(row_name.as_str()).chain(names.iter().copied()) {
            result.extend(self.rows_referencing(name));
        }
        result.remove(&row);
        result.into_iter().collect()
    }

    /// Number of rows with at least one reference
    pub fn len(&self) -> usize {
        self.rows.iter().filter(|names| names.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_and_lookup() {
        let mut relations = RelationMap::new();
        relations.set(2, names(&["R1", "R0", "R0"]));
        relations.set(3, names(&["R0"]));

        assert_eq!(relations.for_row(2), Some(&names(&["R0", "R1"])[..]));
        assert_eq!(relations.for_row(0), None);
        assert_eq!(relations.rows_referencing("R0").collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(relations.len(), 2);
    }

    #[test]
    fn test_set_replaces_previous_entry() {
        let mut relations = RelationMap::new();
        relations.set(1, names(&["Frogs"]));
        relations.set(1, names(&["stuff"]));

        assert_eq!(relations.rows_referencing("Frogs").count(), 0);
        assert_eq!(relations.rows_referencing("stuff").collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_empty_set_clears_row() {
        let mut relations = RelationMap::new();
        relations.set(0, names(&["x"]));
        relations.set(0, Vec::new());
        assert_eq!(relations.for_row(0), None);
        assert!(relations.is_empty());
    }

    #[test]
    fn test_dependents_of() {
        let mut relations = RelationMap::new();
        relations.set(2, names(&["R0", "R1"]));
        relations.set(4, names(&["Frogs"]));
        relations.set(5, names(&["R0"]));

        assert_eq!(relations.dependents_of(0, &[]), vec![2, 5]);
        assert_eq!(relations.dependents_of(3, &["Frogs"]), vec![4]);
    }
}
