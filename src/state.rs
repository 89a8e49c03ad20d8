use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::data::aggregate::{compute, Report, View};
use crate::data::filter::{Dimension, FilterSelection};
use crate::data::loader;
use crate::data::model::Datasets;

// ---------------------------------------------------------------------------
// Login session
// ---------------------------------------------------------------------------

/// Login form contents and outcome.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub logged_in: bool,
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded tables; replaced only by a successful folder reload.
    pub data: Datasets,

    /// Current sidebar selections.
    pub selection: FilterSelection,

    /// Active page.
    pub view: View,

    /// Aggregates of the active page for the current selection (cached).
    pub report: Report,

    pub session: Session,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start with everything selected on the overview page.
    pub fn new(config: AppConfig, data: Datasets) -> Self {
        let selection = FilterSelection::all(&data.dimensions);
        let view = View::default();
        let report = compute(view, &data, &selection);
        Self {
            config,
            data,
            selection,
            view,
            report,
            session: Session::default(),
            status_message: None,
        }
    }

    /// Recompute the active report after a filter or page change.
    pub fn refresh(&mut self) {
        self.report = compute(self.view, &self.data, &self.selection);
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.refresh();
        }
    }

    pub fn toggle_year(&mut self, year: i32) {
        self.selection.toggle_year(year);
        self.refresh();
    }

    pub fn toggle_quarter(&mut self, quarter: &str) {
        self.selection.toggle_quarter(quarter);
        self.refresh();
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.selection.toggle_category(category);
        self.refresh();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        self.selection.select_all(dim, &self.data.dimensions);
        self.refresh();
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.select_none(dim);
        self.refresh();
    }

    // -- Session --

    /// Check the login form against the configured account.
    pub fn try_login(&mut self) -> bool {
        let session = &mut self.session;
        if self
            .config
            .credentials
            .verify(&session.username, &session.password)
        {
            log::info!("User '{}' logged in", session.username);
            session.logged_in = true;
            session.error = None;
        } else {
            log::warn!("Rejected login for '{}'", session.username);
            session.error = Some("Invalid username or password".to_string());
        }
        session.password.clear();
        session.logged_in
    }

    pub fn logout(&mut self) {
        log::info!("User '{}' logged out", self.session.username);
        self.session = Session::default();
    }

    // -- Data --

    /// Load the three tables from another directory. On failure the current
    /// tables stay in place.
    pub fn reload_from(&mut self, dir: &Path) -> Result<()> {
        let config = self.config.with_data_dir(dir);
        let data = loader::load(&config.data)
            .with_context(|| format!("loading data from {}", dir.display()))?;
        self.config = config;
        self.selection = FilterSelection::all(&data.dimensions);
        self.data = data;
        self.status_message = None;
        self.refresh();
        Ok(())
    }

    /// Write the active report as pretty JSON.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.report)
            .with_context(|| format!("writing {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} to {}", self.view.label(), path.display());
        Ok(())
    }
}
