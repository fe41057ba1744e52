//! Dashboard pipeline.
//!
//! Load, validate, coerce, filter, aggregate and summarize. [`render`] is pure
//! and knows nothing about the GUI; [`run`] wraps it with the cached load.

use crate::config::DashboardConfig;
use crate::data::{
    CrimeRecord, DataLoader, FilterEngine, FilterOptions, FilterSelection, LoaderError,
    RecordTable, SchemaGuard,
};
use crate::stats::{Aggregate, Aggregator, NarrativeGenerator};
use anyhow::Context;
use polars::prelude::PolarsResult;

/// Shown in place of a bar chart when the filtered view is empty.
pub const EMPTY_FILTER_MESSAGE: &str = "Ajuste os filtros para visualizar dados.";

/// Content of one bar chart slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPanel {
    Bars(Aggregate<String>),
    Placeholder(String),
}

impl ChartPanel {
    fn from_filtered(aggregate: Aggregate<String>) -> Self {
        if aggregate.is_empty() {
            ChartPanel::Placeholder(EMPTY_FILTER_MESSAGE.to_string())
        } else {
            ChartPanel::Bars(aggregate.by_total_desc())
        }
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ChartPanel::Placeholder(_))
    }
}

/// Everything the dashboard draws for one selection.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub filtered: RecordTable,
    pub rows: Vec<CrimeRecord>,
    pub by_type: ChartPanel,
    pub by_state: ChartPanel,
    /// Full table, chronological.
    pub evolution: Aggregate<i32>,
    pub narrative: Vec<String>,
}

/// One completed pipeline run.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub view: ViewModel,
    pub options: FilterOptions,
    pub selection: FilterSelection,
    pub warnings: Vec<String>,
}

/// Build the view model for a coerced table and a selection.
pub fn render(table: &RecordTable, selection: &FilterSelection) -> PolarsResult<ViewModel> {
    let filtered = FilterEngine::apply(table, selection)?;
    let rows = filtered.records()?;

    let by_type = ChartPanel::from_filtered(Aggregator::by_crime_type(&filtered)?);
    let by_state = ChartPanel::from_filtered(Aggregator::by_state(&filtered)?);

    let evolution = Aggregator::by_year(table)?.by_key_asc();
    let narrative = NarrativeGenerator::summarize(table, &evolution)?;

    Ok(ViewModel {
        filtered,
        rows,
        by_type,
        by_state,
        evolution,
        narrative,
    })
}

/// Full run against the configured data file.
///
/// `previous` is the last selection together with the options it was made
/// against; it is reconciled with the freshly enumerated options. Without it
/// the default selection is used.
pub fn run(
    loader: &mut DataLoader,
    config: &DashboardConfig,
    previous: Option<(&FilterSelection, &FilterOptions)>,
) -> anyhow::Result<DashboardRun> {
    let loaded = loader.load(&config.data_path)?;

    let validation = SchemaGuard::validate(&loaded);
    let warnings: Vec<String> = validation.warning().into_iter().collect();
    if !warnings.is_empty() {
        log::warn!("Missing columns: {:?}", validation.missing_columns);
    }

    // Later failures carry the schema warning.
    let (view, options, selection) = match prepare(&loaded, previous) {
        Ok(prepared) => prepared,
        Err(err) => {
            return Err(match warnings.first() {
                Some(warning) => err.context(warning.clone()),
                None => err,
            });
        }
    };

    log::debug!(
        "Pipeline run: year={:?}, {} states, {} types -> {} rows",
        selection.year,
        selection.states.len(),
        selection.crime_types.len(),
        view.rows.len()
    );

    Ok(DashboardRun {
        view,
        options,
        selection,
        warnings,
    })
}

/// Coerce, enumerate options, settle the selection and render.
fn prepare(
    loaded: &RecordTable,
    previous: Option<(&FilterSelection, &FilterOptions)>,
) -> anyhow::Result<(ViewModel, FilterOptions, FilterSelection)> {
    let mut table = loaded.clone();
    SchemaGuard::coerce(&mut table)?;

    let options =
        FilterOptions::from_table(&table).context("Falha ao listar as opções de filtro")?;
    let selection = match previous {
        Some((selection, known)) => selection.reconcile(known, &options),
        None => FilterSelection::defaults(&options),
    };

    let view = render(&table, &selection).context("Falha ao montar o painel")?;
    Ok((view, options, selection))
}

/// Message shown to the user when a run fails.
pub fn user_message(err: &anyhow::Error, config: &DashboardConfig) -> String {
    match err.downcast_ref::<LoaderError>() {
        Some(LoaderError::FileNotFound(_)) => format!(
            "Arquivo `{}` não encontrado em {}. \
             Coloque o CSV com esse nome no mesmo diretório do aplicativo.",
            config.data_path.display(),
            config.resolved_data_path().display()
        ),
        _ => format!("Erro ao processar os dados: {err:#}"),
    }
}
