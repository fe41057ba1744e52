//! Schema Guard Module
//! Column presence checks and type coercion for freshly loaded tables.

use crate::data::table::{ANO, EXPECTED_COLUMNS, REGISTROS};
use crate::data::RecordTable;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid year {value:?} at data row {}", row + 1)]
    InvalidYear { row: usize, value: String },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Outcome of the column presence check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub missing_columns: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.missing_columns.is_empty()
    }

    /// User-facing warning, if any column is missing.
    pub fn warning(&self) -> Option<String> {
        if self.is_valid() {
            return None;
        }
        Some(format!(
            "As colunas esperadas são: 'tipo_crime', 'estado', 'ano', 'registros'. \
             Verifique se o CSV está com esses nomes (faltando: {}).",
            self.missing_columns.join(", ")
        ))
    }
}

pub struct SchemaGuard;

impl SchemaGuard {
    /// Check that every expected column is present. Never fails.
    pub fn validate(table: &RecordTable) -> ValidationResult {
        let missing_columns = EXPECTED_COLUMNS
            .iter()
            .filter(|name| !table.has_column(name))
            .map(|name| name.to_string())
            .collect();

        ValidationResult { missing_columns }
    }

    /// Coerce `ano` to integers and `registros` to floats, in place.
    ///
    /// A year that does not parse aborts with [`SchemaError::InvalidYear`].
    /// A record count that does not parse becomes `0`. Already coerced
    /// columns are left untouched.
    pub fn coerce(table: &mut RecordTable) -> Result<(), SchemaError> {
        Self::coerce_years(table)?;
        Self::coerce_registros(table)?;
        Ok(())
    }

    fn coerce_years(table: &mut RecordTable) -> Result<(), SchemaError> {
        let column = table.frame().column(ANO)?;
        if column.dtype() == &DataType::Int32 {
            return Ok(());
        }

        let text = column.cast(&DataType::String)?;
        let text = text.as_materialized_series().str()?;

        let mut years: Vec<i32> = Vec::with_capacity(text.len());
        for (row, value) in text.into_iter().enumerate() {
            match value.and_then(parse_year) {
                Some(year) => years.push(year),
                None => {
                    return Err(SchemaError::InvalidYear {
                        row,
                        value: value.unwrap_or_default().to_string(),
                    })
                }
            }
        }

        table
            .frame_mut()
            .with_column(Column::new(ANO.into(), years))?;
        Ok(())
    }

    fn coerce_registros(table: &mut RecordTable) -> Result<(), SchemaError> {
        let column = table.frame().column(REGISTROS)?;
        if column.dtype() == &DataType::Float64 {
            return Ok(());
        }

        let text = column.cast(&DataType::String)?;
        let text = text.as_materialized_series().str()?;

        let mut zeroed = 0usize;
        let values: Vec<f64> = text
            .into_iter()
            .map(|value| {
                value.and_then(parse_count).unwrap_or_else(|| {
                    zeroed += 1;
                    0.0
                })
            })
            .collect();

        if zeroed > 0 {
            log::debug!("{zeroed} non-numeric '{REGISTROS}' values treated as 0");
        }

        table
            .frame_mut()
            .with_column(Column::new(REGISTROS.into(), values))?;
        Ok(())
    }
}

/// Parse a year, accepting integral floats such as `2023.0`.
fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() <= i32::MAX as f64 {
        Some(float as i32)
    } else {
        None
    }
}

fn parse_count(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_table(columns: &[(&str, &[&str])]) -> RecordTable {
        let columns = columns
            .iter()
            .map(|(name, values)| Column::new((*name).into(), values.to_vec()))
            .collect();
        RecordTable::new(DataFrame::new(columns).unwrap())
    }

    #[test]
    fn validate_accepts_full_schema() {
        let table = text_table(&[
            ("tipo_crime", &["Roubo"]),
            ("estado", &["SP"]),
            ("ano", &["2023"]),
            ("registros", &["10"]),
        ]);
        let result = SchemaGuard::validate(&table);
        assert!(result.is_valid());
        assert!(result.warning().is_none());
    }

    #[test]
    fn validate_reports_missing_columns_in_order() {
        let table = text_table(&[("tipo_crime", &["Roubo"]), ("ano", &["2023"])]);
        let result = SchemaGuard::validate(&table);
        assert_eq!(result.missing_columns, vec!["estado", "registros"]);
        assert!(result.warning().unwrap().contains("estado, registros"));
    }

    #[test]
    fn coerce_types_columns() {
        let mut table = text_table(&[
            ("tipo_crime", &["Roubo", "Furto", "Furto"]),
            ("estado", &["SP", "RJ", "MG"]),
            ("ano", &["2022", " 2023 ", "2024.0"]),
            ("registros", &["10", "n/d", ""]),
        ]);

        SchemaGuard::coerce(&mut table).unwrap();

        let rows = table.records().unwrap();
        let anos: Vec<i32> = rows.iter().map(|r| r.ano).collect();
        let registros: Vec<f64> = rows.iter().map(|r| r.registros).collect();
        assert_eq!(anos, vec![2022, 2023, 2024]);
        assert_eq!(registros, vec![10.0, 0.0, 0.0]);
    }

    #[test]
    fn coerce_twice_is_a_no_op() {
        let mut table = text_table(&[
            ("tipo_crime", &["Roubo"]),
            ("estado", &["SP"]),
            ("ano", &["2022"]),
            ("registros", &["7.5"]),
        ]);

        SchemaGuard::coerce(&mut table).unwrap();
        let once = table.clone();
        SchemaGuard::coerce(&mut table).unwrap();

        assert!(once.frame().equals(table.frame()));
    }

    #[test]
    fn malformed_year_halts() {
        let mut table = text_table(&[
            ("tipo_crime", &["Roubo", "Furto"]),
            ("estado", &["SP", "RJ"]),
            ("ano", &["2022", "dois mil"]),
            ("registros", &["1", "2"]),
        ]);

        let err = SchemaGuard::coerce(&mut table).unwrap_err();
        match err {
            SchemaError::InvalidYear { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "dois mil");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_year_column_fails_on_access() {
        let mut table = text_table(&[("tipo_crime", &["Roubo"]), ("registros", &["1"])]);
        let err = SchemaGuard::coerce(&mut table).unwrap_err();
        assert!(matches!(err, SchemaError::PolarsError(_)));
    }

    #[test]
    fn parse_year_rejects_fractions() {
        assert_eq!(parse_year("2023"), Some(2023));
        assert_eq!(parse_year("2023.5"), None);
        assert_eq!(parse_year(""), None);
    }
}
