use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::LabelingConfig;
use crate::editor;
use crate::error::{LabelkitError, Result};
use crate::model::{LabelCategory, LabelOptions, Trajectory};
use crate::persist;
use crate::selection::{self, SelectionRange};
use crate::store::{self, CoverageStats};
use crate::view::{self, ViewModel};

/// One analyst working on one file at a time.
///
/// Every operation either succeeds completely or leaves the session exactly
/// as it was, so the views derived from it never show a half-applied edit.
pub struct LabelingSession {
    config: LabelingConfig,
    options: LabelOptions,
    trajectory: Option<Trajectory>,
    selection: Option<SelectionRange>,
    dirty: bool,
}

impl LabelingSession {
    pub fn new(config: LabelingConfig) -> Result<Self> {
        config.validate()?;
        let options = LabelOptions::new(&config.label_options);
        Ok(Self {
            config,
            options,
            trajectory: None,
            selection: None,
            dirty: false,
        })
    }

    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    pub fn label_options(&self) -> &LabelOptions {
        &self.options
    }

    /// Files in the configured data directory.
    pub fn sources(&self) -> Result<Vec<PathBuf>> {
        store::discover(&self.config.data_dir, &self.config.file_extension)
    }

    /// Load `path`, discarding the current trajectory, and select the default window.
    pub fn open(&mut self, path: &Path) -> Result<&Trajectory> {
        let trajectory = store::load(path, &self.config)?;
        if self.dirty {
            warn!(
                path = %self.trajectory.as_ref().map(|t| t.source().display().to_string()).unwrap_or_default(),
                "discarding unsaved labels"
            );
        }
        let selection = selection::select(&trajectory, None, None, self.config.default_window).ok();
        self.selection = selection;
        self.dirty = false;
        Ok(self.trajectory.insert(trajectory))
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    /// Whether labels were applied since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Select a window; missing bounds fall back to the default window.
    pub fn select(&mut self, start: Option<i64>, end: Option<i64>) -> Result<SelectionRange> {
        let trajectory = self.loaded()?;
        let range = selection::select(trajectory, start, end, self.config.default_window)?;
        self.selection = Some(range);
        Ok(range)
    }

    /// Label the current selection in memory.
    pub fn label(&mut self, category: &str) -> Result<SelectionRange> {
        let category = LabelCategory::new(category)?;
        let trajectory = self.loaded()?;
        let range = self.current_selection()?;
        if !self.options.contains(&category) {
            info!(label = %category, "label is not one of the configured options");
        }
        let updated = editor::apply(trajectory, range, &category)?;
        self.trajectory = Some(updated);
        self.dirty = true;
        Ok(range)
    }

    /// Merge the in-memory labels into the source file.
    ///
    /// On success the trajectory is rebuilt from what was written, so labels
    /// another session stored since our load become visible.
    pub fn save(&mut self) -> Result<()> {
        let trajectory = self.loaded()?;
        let merged = persist::save(trajectory)?;
        let reloaded = store::trajectory_from_frame(merged, trajectory.source(), &self.config)?;
        self.trajectory = Some(reloaded);
        self.dirty = false;
        Ok(())
    }

    /// Label the current selection and save, as a single action.
    ///
    /// If the save fails the in-memory labels are rolled back too.
    pub fn label_segment(&mut self, category: &str) -> Result<SelectionRange> {
        let before = self.trajectory.clone();
        let was_dirty = self.dirty;
        let range = self.label(category)?;
        if let Err(e) = self.save() {
            self.trajectory = before;
            self.dirty = was_dirty;
            return Err(e);
        }
        Ok(range)
    }

    pub fn coverage(&self) -> Result<CoverageStats> {
        Ok(store::coverage(self.loaded()?))
    }

    /// Fresh snapshot of every view for the current selection.
    pub fn view(&self) -> Result<ViewModel> {
        view::project(self.loaded()?, self.current_selection()?)
    }

    fn loaded(&self) -> Result<&Trajectory> {
        self.trajectory.as_ref().ok_or(LabelkitError::NotLoaded)
    }

    fn current_selection(&self) -> Result<SelectionRange> {
        let len = self.loaded()?.len();
        self.selection.ok_or(LabelkitError::InvalidRange {
            start: 0,
            end: 0,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_track(dir: &TempDir, rows: usize) -> PathBuf {
        let mut csv = String::from("cfr,datetime,latitude,longitude,sog,heading\n");
        for i in 0..rows {
            csv.push_str(&format!(
                "ESP1,2024-03-01 10:{:02}:00,43.{:02},-8.5,{},{}\n",
                i % 60,
                i,
                i % 7,
                (i * 10) % 360
            ));
        }
        let path = dir.path().join("track.csv");
        fs::write(&path, csv).unwrap();
        path
    }

    fn session() -> LabelingSession {
        LabelingSession::new(LabelingConfig::default()).unwrap()
    }

    #[test]
    fn test_requires_loaded_trajectory() {
        let mut s = session();
        assert!(matches!(s.select(None, None), Err(LabelkitError::NotLoaded)));
        assert!(matches!(s.view(), Err(LabelkitError::NotLoaded)));
    }

    #[test]
    fn test_open_selects_default_window() {
        let dir = TempDir::new().unwrap();
        let path = write_track(&dir, 12);
        let mut s = session();
        s.open(&path).unwrap();
        let range = s.selection().unwrap();
        assert_eq!((range.start(), range.end()), (0, 11));
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_blank_label_keeps_state() {
        let dir = TempDir::new().unwrap();
        let path = write_track(&dir, 5);
        let mut s = session();
        s.open(&path).unwrap();
        let err = s.label("  ").unwrap_err();
        assert!(matches!(err, LabelkitError::LabelValidation(_)));
        assert_eq!(s.coverage().unwrap().labeled_rows, 0);
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_invalid_select_keeps_previous_selection() {
        let dir = TempDir::new().unwrap();
        let path = write_track(&dir, 10);
        let mut s = session();
        s.open(&path).unwrap();
        s.select(Some(2), Some(4)).unwrap();
        assert!(s.select(Some(8), Some(3)).is_err());
        let range = s.selection().unwrap();
        assert_eq!((range.start(), range.end()), (2, 4));
    }

    #[test]
    fn test_label_then_view_reflects_change() {
        let dir = TempDir::new().unwrap();
        let path = write_track(&dir, 6);
        let mut s = session();
        s.open(&path).unwrap();
        s.select(Some(1), Some(3)).unwrap();
        s.label("Searching").unwrap();
        assert!(s.is_dirty());

        let vm = s.view().unwrap();
        assert_eq!(vm.coverage.labeled_rows, 3);
        assert_eq!(vm.segments.len(), 2);
        assert!(vm.segments.iter().all(|seg| seg.color == crate::view::Color::Green));
    }

    #[test]
    fn test_label_segment_persists() {
        let dir = TempDir::new().unwrap();
        let path = write_track(&dir, 6);
        let mut s = session();
        s.open(&path).unwrap();
        s.select(Some(0), Some(1)).unwrap();
        s.label_segment("In port").unwrap();
        assert!(!s.is_dirty());

        let mut other = session();
        other.open(&path).unwrap();
        assert_eq!(other.coverage().unwrap().labeled_rows, 2);
    }

    #[test]
    fn test_failed_save_rolls_back_label() {
        let dir = TempDir::new().unwrap();
        let path = write_track(&dir, 4);
        let mut s = session();
        s.open(&path).unwrap();
        // file grows behind the session's back
        write_track(&dir, 5);

        s.select(Some(0), Some(1)).unwrap();
        let err = s.label_segment("Searching").unwrap_err();
        assert!(matches!(err, LabelkitError::PersistenceSchema(_)));
        assert_eq!(s.coverage().unwrap().labeled_rows, 0);
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_open_other_file_discards_state() {
        let dir = TempDir::new().unwrap();
        let first = write_track(&dir, 4);
        let mut s = session();
        s.open(&first).unwrap();
        s.label("Searching").unwrap();

        let second = dir.path().join("other.csv");
        fs::write(
            &second,
            "cfr,datetime,latitude,longitude,sog,heading\nESP2,2024-03-01 10:00:00,1,1,0,0\n",
        )
        .unwrap();
        s.open(&second).unwrap();
        assert_eq!(s.trajectory().unwrap().vessel_key(), "ESP2");
        assert_eq!(s.coverage().unwrap().labeled_rows, 0);
        assert!(!s.is_dirty());
    }
}
