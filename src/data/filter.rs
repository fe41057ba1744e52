//! Filter Engine Module
//! Year / state / crime type selection and the filtered view.

use crate::data::table::{ANO, ESTADO, TIPO_CRIME};
use crate::data::RecordTable;
use polars::prelude::*;
use std::collections::BTreeSet;

/// Distinct values offered by the sidebar, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub states: Vec<String>,
    pub crime_types: Vec<String>,
}

impl FilterOptions {
    /// Enumerate options from the full, coerced table.
    pub fn from_table(table: &RecordTable) -> PolarsResult<Self> {
        let df = table.frame();

        let years: BTreeSet<i32> = df
            .column(ANO)?
            .as_materialized_series()
            .i32()?
            .into_iter()
            .flatten()
            .collect();

        Ok(Self {
            years: years.into_iter().collect(),
            states: distinct_strings(df, ESTADO)?,
            crime_types: distinct_strings(df, TIPO_CRIME)?,
        })
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }
}

fn distinct_strings(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
    let values: BTreeSet<String> = df
        .column(column)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(values.into_iter().collect())
}

/// Current user selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub year: Option<i32>,
    pub states: BTreeSet<String>,
    pub crime_types: BTreeSet<String>,
}

impl FilterSelection {
    /// Most recent year, every state, every crime type.
    pub fn defaults(options: &FilterOptions) -> Self {
        Self {
            year: options.latest_year(),
            states: options.states.iter().cloned().collect(),
            crime_types: options.crime_types.iter().cloned().collect(),
        }
    }

    /// Carry a previous selection over to freshly enumerated options.
    ///
    /// `known` are the options the selection was made against. Values that
    /// disappeared are dropped; values absent from `known` are new and start
    /// selected, like the defaults. An unavailable year falls back to the most
    /// recent one.
    pub fn reconcile(&self, known: &FilterOptions, options: &FilterOptions) -> Self {
        let year = self
            .year
            .filter(|y| options.years.contains(y))
            .or_else(|| options.latest_year());

        Self {
            year,
            states: carry_over(&self.states, &known.states, &options.states),
            crime_types: carry_over(&self.crime_types, &known.crime_types, &options.crime_types),
        }
    }
}

fn carry_over(
    selected: &BTreeSet<String>,
    known: &[String],
    available: &[String],
) -> BTreeSet<String> {
    available
        .iter()
        .filter(|value| selected.contains(*value) || !known.contains(*value))
        .cloned()
        .collect()
}

pub struct FilterEngine;

impl FilterEngine {
    /// Rows matching `ano == year AND estado in states AND tipo_crime in types`.
    ///
    /// Empty state or type sets select nothing. The input is not modified.
    pub fn filter(
        table: &RecordTable,
        year: Option<i32>,
        states: &BTreeSet<String>,
        crime_types: &BTreeSet<String>,
    ) -> PolarsResult<RecordTable> {
        let Some(year) = year else {
            return Ok(table.empty_like());
        };
        if states.is_empty() || crime_types.is_empty() {
            return Ok(table.empty_like());
        }

        let states = Series::new("states".into(), states.iter().cloned().collect::<Vec<_>>());
        let crime_types = Series::new(
            "crime_types".into(),
            crime_types.iter().cloned().collect::<Vec<_>>(),
        );

        let filtered = table
            .frame()
            .clone()
            .lazy()
            .filter(
                col(ANO)
                    .eq(lit(year))
                    .and(col(ESTADO).is_in(lit(states)))
                    .and(col(TIPO_CRIME).is_in(lit(crime_types))),
            )
            .collect()?;

        Ok(RecordTable::new(filtered))
    }

    pub fn apply(table: &RecordTable, selection: &FilterSelection) -> PolarsResult<RecordTable> {
        Self::filter(
            table,
            selection.year,
            &selection.states,
            &selection.crime_types,
        )
    }
}
