use std::path::{Path, PathBuf};

use polars::prelude::IdxSize;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::config::LabelingConfig;
use crate::error::LabelkitError;
use crate::schema;
use crate::session::LabelingSession;

#[pyclass(name = "LabelingSession")]
pub struct PyLabelingSession {
    inner: LabelingSession,
}

#[pymethods]
impl PyLabelingSession {
    /// Create a session from a TOML config file, or from defaults when omitted.
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<String>) -> PyResult<Self> {
        let config = match config_path {
            Some(p) => LabelingConfig::load(&PathBuf::from(p))?,
            None => LabelingConfig::default(),
        };
        Ok(Self {
            inner: LabelingSession::new(config)?,
        })
    }

    fn sources(&self) -> PyResult<Vec<String>> {
        Ok(self
            .inner
            .sources()?
            .iter()
            .map(|p| p.display().to_string())
            .collect())
    }

    /// Load a trajectory file. Returns its vessel key.
    fn open(&mut self, path: &str) -> PyResult<String> {
        let trajectory = self.inner.open(Path::new(path))?;
        Ok(trajectory.vessel_key().to_string())
    }

    #[pyo3(signature = (start=None, end=None))]
    fn select(&mut self, start: Option<i64>, end: Option<i64>) -> PyResult<(usize, usize)> {
        let range = self.inner.select(start, end)?;
        Ok((range.start(), range.end()))
    }

    fn label(&mut self, category: &str) -> PyResult<(usize, usize)> {
        let range = self.inner.label(category)?;
        Ok((range.start(), range.end()))
    }

    fn save(&mut self) -> PyResult<()> {
        Ok(self.inner.save()?)
    }

    /// Label the selection and save in one step.
    fn label_segment(&mut self, category: &str) -> PyResult<(usize, usize)> {
        let range = self.inner.label_segment(category)?;
        Ok((range.start(), range.end()))
    }

    /// `(total_rows, labeled_rows, labeled_percentage)`
    fn coverage(&self) -> PyResult<(usize, usize, f64)> {
        let stats = self.inner.coverage()?;
        Ok((stats.total_rows, stats.labeled_rows, stats.labeled_percentage))
    }

    /// Full view model of the current selection as JSON.
    fn view_json(&self) -> PyResult<String> {
        Ok(self.inner.view()?.to_json()?)
    }

    /// Selected rows as a DataFrame with an `index` column holding row positions.
    fn table(&self) -> PyResult<PyDataFrame> {
        let trajectory = self.inner.trajectory().ok_or(LabelkitError::NotLoaded)?;
        let range = self
            .inner
            .selection()
            .ok_or(LabelkitError::InvalidRange {
                start: 0,
                end: 0,
                len: trajectory.len(),
            })?;
        let df = trajectory
            .to_frame()?
            .with_row_index("index".into(), Some(0 as IdxSize))
            .map_err(LabelkitError::from)?
            .slice(range.start() as i64, range.len());
        Ok(PyDataFrame(df))
    }

    #[getter]
    fn label_options(&self) -> Vec<String> {
        self.inner.label_options().as_slice().to_vec()
    }

    #[getter]
    fn dirty(&self) -> bool {
        self.inner.is_dirty()
    }
}

/// Export default column names as a Python submodule
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let columns = PyModule::new(m.py(), "columns")?;
    columns.add("VESSEL_KEY", schema::point::VESSEL_KEY)?;
    columns.add("TIMESTAMP", schema::point::TIMESTAMP)?;
    columns.add("LATITUDE", schema::point::LATITUDE)?;
    columns.add("LONGITUDE", schema::point::LONGITUDE)?;
    columns.add("SPEED_OVER_GROUND", schema::point::SPEED_OVER_GROUND)?;
    columns.add("HEADING", schema::point::HEADING)?;
    columns.add("LABEL", schema::point::LABEL)?;
    m.add_submodule(&columns)?;
    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLabelingSession>()?;
    add_schema_exports(m)?;
    Ok(())
}
