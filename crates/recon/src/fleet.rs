use std::collections::HashMap;

use serde::Serialize;

/// Current mileage per train. Read-only to the engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FleetMileageTable {
    mileage: HashMap<String, f64>,
}

/// Trim and upper-case a train identifier so lookups ignore stray
/// whitespace and letter case.
pub fn normalize_train_id(train_id: &str) -> String {
    train_id.trim().to_ascii_uppercase()
}

impl FleetMileageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a train's mileage. The first entry for a train wins.
    pub fn insert(&mut self, train_id: &str, mileage: f64) -> bool {
        let key = normalize_train_id(train_id);
        if self.mileage.contains_key(&key) {
            return false;
        }
        self.mileage.insert(key, mileage);
        true
    }

    pub fn resolve(&self, train_id: &str) -> Option<f64> {
        self.mileage.get(&normalize_train_id(train_id)).copied()
    }

    pub fn len(&self) -> usize {
        self.mileage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mileage.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for FleetMileageTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (train, mileage) in iter {
            table.insert(train.as_ref(), mileage);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_trimmed_and_case_folded() {
        let table: FleetMileageTable = [(" t101 ", 5000.0)].into_iter().collect();
        assert_eq!(table.resolve("T101"), Some(5000.0));
        assert_eq!(table.resolve("  t101"), Some(5000.0));
        assert_eq!(table.resolve("T102"), None);
    }

    #[test]
    fn first_entry_wins() {
        let mut table = FleetMileageTable::new();
        assert!(table.insert("T1", 10.0));
        assert!(!table.insert("t1 ", 20.0));
        assert_eq!(table.resolve("T1"), Some(10.0));
        assert_eq!(table.len(), 1);
    }
}
