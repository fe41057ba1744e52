//! Record Table Module
//! In-memory crime record table backed by a Polars DataFrame.

use polars::prelude::*;

pub const TIPO_CRIME: &str = "tipo_crime";
pub const ESTADO: &str = "estado";
pub const ANO: &str = "ano";
pub const REGISTROS: &str = "registros";

/// The four columns every crime CSV must carry.
pub const EXPECTED_COLUMNS: [&str; 4] = [TIPO_CRIME, ESTADO, ANO, REGISTROS];

/// A single crime record row.
#[derive(Debug, Clone, PartialEq)]
pub struct CrimeRecord {
    pub tipo_crime: String,
    pub estado: String,
    pub ano: i32,
    pub registros: f64,
}

/// Ordered crime records. Row order follows the source file.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    df: DataFrame,
}

impl RecordTable {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub(crate) fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    #[cfg(test)]
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().iter().any(|c| c.as_str() == name)
    }

    /// Empty table with the same columns.
    pub fn empty_like(&self) -> Self {
        Self::new(self.df.clear())
    }

    /// Sum of `registros` over every row.
    pub fn total_registros(&self) -> PolarsResult<f64> {
        let series = self.df.column(REGISTROS)?.as_materialized_series();
        Ok(series.f64()?.sum().unwrap_or(0.0))
    }

    /// Materialize typed rows. Requires a coerced table.
    pub fn records(&self) -> PolarsResult<Vec<CrimeRecord>> {
        let tipos = self.df.column(TIPO_CRIME)?.as_materialized_series().str()?;
        let estados = self.df.column(ESTADO)?.as_materialized_series().str()?;
        let anos = self.df.column(ANO)?.as_materialized_series().i32()?;
        let registros = self.df.column(REGISTROS)?.as_materialized_series().f64()?;

        let rows = tipos
            .into_iter()
            .zip(estados)
            .zip(anos)
            .zip(registros)
            .filter_map(|(((tipo, estado), ano), valor)| {
                Some(CrimeRecord {
                    tipo_crime: tipo.unwrap_or_default().to_string(),
                    estado: estado.unwrap_or_default().to_string(),
                    ano: ano?,
                    registros: valor.unwrap_or(0.0),
                })
            })
            .collect();

        Ok(rows)
    }
}

/// Build a coerced table from `(tipo_crime, estado, ano, registros)` tuples.
#[cfg(test)]
pub(crate) fn sample_table(rows: &[(&str, &str, i32, f64)]) -> RecordTable {
    let tipos: Vec<&str> = rows.iter().map(|r| r.0).collect();
    let estados: Vec<&str> = rows.iter().map(|r| r.1).collect();
    let anos: Vec<i32> = rows.iter().map(|r| r.2).collect();
    let registros: Vec<f64> = rows.iter().map(|r| r.3).collect();

    let df = DataFrame::new(vec![
        Column::new(TIPO_CRIME.into(), tipos),
        Column::new(ESTADO.into(), estados),
        Column::new(ANO.into(), anos),
        Column::new(REGISTROS.into(), registros),
    ])
    .unwrap();

    RecordTable::new(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_preserve_file_order() {
        let table = sample_table(&[
            ("Roubo", "SP", 2023, 10.0),
            ("Furto", "RJ", 2022, 5.0),
            ("Roubo", "SP", 2023, 10.0),
        ]);

        let rows = table.records().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].tipo_crime, "Roubo");
        assert_eq!(rows[1].estado, "RJ");
        assert_eq!(rows[1].ano, 2022);
        assert_eq!(rows[0], rows[2]);
    }

    #[test]
    fn total_sums_every_row() {
        let table = sample_table(&[("Roubo", "SP", 2023, 10.5), ("Furto", "RJ", 2022, 4.5)]);
        assert!((table.total_registros().unwrap() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_like_keeps_columns() {
        let table = sample_table(&[("Roubo", "SP", 2023, 1.0)]);
        let empty = table.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.column_names(), table.column_names());
        assert!(empty.records().unwrap().is_empty());
    }
}
