//! Aggregator Module
//! Group-and-sum of record counts by crime type, state or year.

use crate::data::table::{ANO, ESTADO, REGISTROS, TIPO_CRIME};
use crate::data::RecordTable;
use polars::prelude::*;
use std::cmp::Ordering;

/// A column that can be used as a grouping key.
pub trait GroupKey: Clone + Ord {
    /// Read the key column of a grouped frame. Null keys come back as `None`.
    fn extract(column: &Column) -> PolarsResult<Vec<Option<Self>>>;
}

impl GroupKey for String {
    fn extract(column: &Column) -> PolarsResult<Vec<Option<Self>>> {
        let values = column.as_materialized_series().str()?;
        Ok(values
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }
}

impl GroupKey for i32 {
    fn extract(column: &Column) -> PolarsResult<Vec<Option<Self>>> {
        let values = column.as_materialized_series().i32()?;
        Ok(values.into_iter().collect())
    }
}

/// Key to summed `registros`.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<K> {
    entries: Vec<(K, f64)>,
}

impl<K> Default for Aggregate<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: GroupKey> Aggregate<K> {
    pub fn from_entries(entries: Vec<(K, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(K, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, key: &K) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, total)| *total)
    }

    #[cfg(test)]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }

    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Largest sum first; equal sums ordered by key.
    pub fn by_total_desc(mut self) -> Self {
        self.entries.sort_by(|(ka, a), (kb, b)| match b.total_cmp(a) {
            Ordering::Equal => ka.cmp(kb),
            other => other,
        });
        self
    }

    /// Ascending key order (chronological for years).
    pub fn by_key_asc(mut self) -> Self {
        self.entries.sort_by(|(ka, _), (kb, _)| ka.cmp(kb));
        self
    }

    /// Entry with the largest sum, ties going to the smallest key.
    pub fn top(&self) -> Option<(&K, f64)> {
        self.entries
            .iter()
            .min_by(|(ka, a), (kb, b)| match b.total_cmp(a) {
                Ordering::Equal => ka.cmp(kb),
                other => other,
            })
            .map(|(k, total)| (k, *total))
    }

    pub fn first(&self) -> Option<&(K, f64)> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&(K, f64)> {
        self.entries.last()
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Sum `value_column` per distinct `key_column` value.
    ///
    /// Rows with a null key are skipped. Entry order is unspecified; callers
    /// sort with [`Aggregate::by_total_desc`] or [`Aggregate::by_key_asc`].
    pub fn aggregate_by<K: GroupKey>(
        table: &RecordTable,
        key_column: &str,
        value_column: &str,
    ) -> PolarsResult<Aggregate<K>> {
        if table.is_empty() {
            return Ok(Aggregate::default());
        }

        let grouped = table
            .frame()
            .clone()
            .lazy()
            .group_by([col(key_column)])
            .agg([col(value_column).cast(DataType::Float64).sum()])
            .collect()?;

        let keys = K::extract(grouped.column(key_column)?)?;
        let sums = grouped.column(value_column)?.as_materialized_series();
        let sums = sums.f64()?;

        let entries = keys
            .into_iter()
            .zip(sums)
            .filter_map(|(key, sum)| Some((key?, sum.unwrap_or(0.0))))
            .collect();

        Ok(Aggregate::from_entries(entries))
    }

    pub fn by_crime_type(table: &RecordTable) -> PolarsResult<Aggregate<String>> {
        Self::aggregate_by(table, TIPO_CRIME, REGISTROS)
    }

    pub fn by_state(table: &RecordTable) -> PolarsResult<Aggregate<String>> {
        Self::aggregate_by(table, ESTADO, REGISTROS)
    }

    pub fn by_year(table: &RecordTable) -> PolarsResult<Aggregate<i32>> {
        Self::aggregate_by(table, ANO, REGISTROS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::sample_table;

    fn table() -> RecordTable {
        sample_table(&[
            ("Roubo", "SP", 2023, 100.0),
            ("Furto", "SP", 2023, 40.0),
            ("Roubo", "RJ", 2022, 60.0),
            ("Furto", "MG", 2021, 60.0),
            ("Roubo", "SP", 2021, 10.0),
        ])
    }

    #[test]
    fn sums_per_key() {
        let by_type = Aggregator::by_crime_type(&table()).unwrap();
        assert_eq!(by_type.len(), 2);
        assert_eq!(by_type.get(&"Roubo".to_string()), Some(170.0));
        assert_eq!(by_type.get(&"Furto".to_string()), Some(100.0));
    }

    #[test]
    fn group_sums_cover_table_total() {
        let table = table();
        let total = table.total_registros().unwrap();
        let by_state = Aggregator::by_state(&table).unwrap();
        let by_year = Aggregator::by_year(&table).unwrap();
        assert!((by_state.total() - total).abs() < 1e-9);
        assert!((by_year.total() - total).abs() < 1e-9);
    }

    #[test]
    fn ordering_helpers() {
        let table = table();

        let states = Aggregator::by_state(&table).unwrap().by_total_desc();
        assert_eq!(states.keys(), vec!["SP", "MG", "RJ"]);

        let years = Aggregator::by_year(&table).unwrap().by_key_asc();
        assert_eq!(years.keys(), vec![2021, 2022, 2023]);
        assert_eq!(years.first(), Some(&(2021, 70.0)));
        assert_eq!(years.last(), Some(&(2023, 140.0)));
    }

    #[test]
    fn top_breaks_ties_by_key() {
        let aggregate = Aggregate::from_entries(vec![
            ("RJ".to_string(), 60.0),
            ("MG".to_string(), 60.0),
            ("BA".to_string(), 10.0),
        ]);
        assert_eq!(aggregate.top(), Some((&"MG".to_string(), 60.0)));
    }

    #[test]
    fn empty_table_gives_empty_aggregate() {
        let empty = table().empty_like();
        let aggregate = Aggregator::by_crime_type(&empty).unwrap();
        assert!(aggregate.is_empty());
        assert!(aggregate.top().is_none());
    }

    #[test]
    fn missing_key_column_is_an_error() {
        assert!(Aggregator::aggregate_by::<String>(&table(), "municipio", REGISTROS).is_err());
    }
}
