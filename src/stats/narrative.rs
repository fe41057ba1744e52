//! Narrative Generator Module
//! Short trend report over the full, unfiltered table.

use crate::data::RecordTable;
use crate::stats::{Aggregate, Aggregator};
use polars::prelude::PolarsResult;

/// Direction of change between the first and last year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increase,
    Decrease,
    Stable,
}

impl Trend {
    pub fn classify(initial: f64, last: f64) -> Self {
        if last > initial {
            Trend::Increase
        } else if last < initial {
            Trend::Decrease
        } else {
            Trend::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Increase => "aumento",
            Trend::Decrease => "queda",
            Trend::Stable => "estabilidade",
        }
    }
}

/// Comparison of the earliest and latest year in an evolution aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSummary {
    pub first_year: i32,
    pub last_year: i32,
    pub first_value: f64,
    pub last_value: f64,
    pub trend: Trend,
}

impl TrendSummary {
    /// Needs at least two distinct years; endpoints are taken by key order.
    pub fn from_evolution(evolution: &Aggregate<i32>) -> Option<Self> {
        if evolution.len() < 2 {
            return None;
        }
        let chronological = evolution.clone().by_key_asc();
        let &(first_year, first_value) = chronological.first()?;
        let &(last_year, last_value) = chronological.last()?;

        Some(Self {
            first_year,
            last_year,
            first_value,
            last_value,
            trend: Trend::classify(first_value, last_value),
        })
    }
}

pub struct NarrativeGenerator;

impl NarrativeGenerator {
    /// Up to four report lines. Never depends on the active filters.
    pub fn summarize(table: &RecordTable, evolution: &Aggregate<i32>) -> PolarsResult<Vec<String>> {
        let mut lines = Vec::new();

        let total = table.total_registros()?;
        lines.push(format!(
            "Total de registros na base: {} ocorrências (todas as categorias).",
            format_thousands(total)
        ));

        let by_type = Aggregator::by_crime_type(table)?;
        if let Some((tipo, sum)) = by_type.top() {
            lines.push(format!(
                "O tipo de crime com maior número de registros é {tipo}, com {} ocorrências.",
                format_thousands(sum)
            ));
        }

        let by_state = Aggregator::by_state(table)?;
        if let Some((estado, _)) = by_state.top() {
            lines.push(format!(
                "O estado com maior volume total de crimes é {estado}."
            ));
        }

        if let Some(summary) = TrendSummary::from_evolution(evolution) {
            lines.push(format!(
                "Entre {} e {}, observa-se um {} no total de crimes registrados (de {} para {}).",
                summary.first_year,
                summary.last_year,
                summary.trend.label(),
                format_thousands(summary.first_value),
                format_thousands(summary.last_value)
            ));
        }

        Ok(lines)
    }
}

/// Truncate to an integer and group thousands with `.`: `1234567.9` -> `1.234.567`.
pub fn format_thousands(value: f64) -> String {
    let truncated = value.trunc() as i64;
    let digits = truncated.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if truncated < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::sample_table;

    fn evolution(points: &[(i32, f64)]) -> Aggregate<i32> {
        Aggregate::from_entries(points.to_vec())
    }

    #[test]
    fn classifies_trend() {
        let up = TrendSummary::from_evolution(&evolution(&[(2022, 100.0), (2023, 150.0)])).unwrap();
        assert_eq!(up.trend, Trend::Increase);
        assert_eq!((up.first_value, up.last_value), (100.0, 150.0));

        let down = TrendSummary::from_evolution(&evolution(&[(2022, 150.0), (2023, 100.0)])).unwrap();
        assert_eq!(down.trend, Trend::Decrease);

        let flat = TrendSummary::from_evolution(&evolution(&[(2022, 120.0), (2023, 120.0)])).unwrap();
        assert_eq!(flat.trend, Trend::Stable);
    }

    #[test]
    fn single_year_has_no_trend() {
        assert!(TrendSummary::from_evolution(&evolution(&[(2023, 10.0)])).is_none());
    }

    #[test]
    fn trend_uses_key_order_endpoints() {
        let summary =
            TrendSummary::from_evolution(&evolution(&[(2020, 50.0), (2015, 10.0), (2018, 99.0)]))
                .unwrap();
        assert_eq!(summary.first_year, 2015);
        assert_eq!(summary.last_year, 2020);
        assert_eq!(summary.trend, Trend::Increase);
    }

    #[test]
    fn formats_with_dot_grouping() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1.000");
        assert_eq!(format_thousands(1234567.9), "1.234.567");
        assert_eq!(format_thousands(-12345.0), "-12.345");
    }

    #[test]
    fn summary_lines() {
        let table = sample_table(&[
            ("Roubo", "SP", 2022, 800.0),
            ("Furto", "RJ", 2022, 200.0),
            ("Roubo", "RJ", 2023, 1500.0),
        ]);
        let evolution = Aggregator::by_year(&table).unwrap();

        let lines = NarrativeGenerator::summarize(&table, &evolution).unwrap();
        assert_eq!(
            lines,
            vec![
                "Total de registros na base: 2.500 ocorrências (todas as categorias).",
                "O tipo de crime com maior número de registros é Roubo, com 2.300 ocorrências.",
                "O estado com maior volume total de crimes é RJ.",
                "Entre 2022 e 2023, observa-se um aumento no total de crimes registrados (de 1.000 para 1.500).",
            ]
        );
    }

    #[test]
    fn trend_line_wording_is_fixed() {
        let falling = sample_table(&[("Roubo", "SP", 2022, 300.0), ("Roubo", "SP", 2023, 100.0)]);
        let lines = NarrativeGenerator::summarize(&falling, &Aggregator::by_year(&falling).unwrap())
            .unwrap();
        assert_eq!(
            lines[3],
            "Entre 2022 e 2023, observa-se um queda no total de crimes registrados (de 300 para 100)."
        );

        let flat = sample_table(&[("Roubo", "SP", 2022, 50.0), ("Furto", "SP", 2023, 50.0)]);
        let lines =
            NarrativeGenerator::summarize(&flat, &Aggregator::by_year(&flat).unwrap()).unwrap();
        assert!(lines[3].contains("observa-se um estabilidade"));
    }

    #[test]
    fn single_year_summary_omits_trend() {
        let table = sample_table(&[("Roubo", "SP", 2023, 5.0)]);
        let evolution = Aggregator::by_year(&table).unwrap();

        let lines = NarrativeGenerator::summarize(&table, &evolution).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(!lines.iter().any(|l| l.starts_with("Entre")));
    }

    #[test]
    fn empty_table_only_reports_total() {
        let table = sample_table(&[("Roubo", "SP", 2023, 5.0)]).empty_like();
        let lines = NarrativeGenerator::summarize(&table, &Aggregate::default()).unwrap();
        assert_eq!(
            lines,
            vec!["Total de registros na base: 0 ocorrências (todas as categorias)."]
        );
    }
}
