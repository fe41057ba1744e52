//! Dashboard configuration.

use std::path::PathBuf;

/// Data file read on every run, relative to the working directory.
pub const DATA_FILE: &str = "crimes.csv";

/// Dashboard settings. Nothing here is read from flags or the environment.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_FILE),
            window_title: "Análise de Crimes - FGV".to_string(),
            window_size: [1400.0, 900.0],
            min_window_size: [1000.0, 700.0],
        }
    }
}

impl DashboardConfig {
    /// Absolute location of the data file, for user-facing messages.
    pub fn resolved_data_path(&self) -> PathBuf {
        std::env::current_dir()
            .map(|dir| dir.join(&self.data_path))
            .unwrap_or_else(|_| self.data_path.clone())
    }
}
