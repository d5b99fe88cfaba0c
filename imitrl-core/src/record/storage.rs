//! Aggregation of records.
use super::{Record, RecordValue};
use std::collections::BTreeSet;

/// Stores records and aggregates them.
///
/// Scalars are averaged over the records containing the key. For the other
/// value types the most recent value is kept.
#[derive(Debug, Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn mean(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().sum::<f32>() / vs.len() as f32)
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn keys(&self) -> BTreeSet<String> {
        self.data
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect()
    }

    fn last(&self, key: &str) -> Option<RecordValue> {
        self.data
            .iter()
            .rev()
            .find_map(|record| record.get(key).cloned())
    }

    /// Aggregates the stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.keys() {
            let scalars: Vec<f32> = self
                .data
                .iter()
                .filter_map(|r| match r.get(&key) {
                    Some(RecordValue::Scalar(v)) => Some(*v),
                    _ => None,
                })
                .collect();

            if !scalars.is_empty() {
                record.insert(key, mean(&scalars));
            } else if let Some(value) = self.last(&key) {
                record.insert(key, value);
            }
        }

        self.data.clear();
        record
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_aggregate_mean() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("loss", 1.0));
        storage.store(Record::from_scalar("loss", 3.0));
        storage.store(Record::from_slice(&[
            ("loss", RecordValue::Scalar(5.0)),
            ("algorithm", RecordValue::String("GAIL".to_string())),
        ]));

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("loss").unwrap(), 3.0);
        assert_eq!(record.get_string("algorithm").unwrap(), "GAIL");
        assert!(storage.is_empty());
    }
}
