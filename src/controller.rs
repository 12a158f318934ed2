//! Viewer state and the events that change it.

use std::time::Instant;

use crate::config::{ViewerConfig, WORLD_ID};
use crate::frame::{build_frame, Frame};
use crate::kde::{epanechnikov, EvaluationGrid};
use crate::loader::Dataset;
use crate::playback::{self, Playback};
use crate::scene::Scene;
use crate::search::TreeFilter;

/// Rating axis used when the dataset has no stats at all.
const FALLBACK_RATING_RANGE: (f64, f64) = (1000.0, 3000.0);

/// Ordered, bounded set of selected region ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
    limit: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionFull {
    pub limit: usize,
}

impl Selection {
    /// A selection holding only the all-federation entry.
    pub fn new(limit: usize) -> Self {
        let mut selection = Self::empty(limit);
        if limit > 0 {
            selection.ids.push(WORLD_ID.to_owned());
        }
        selection
    }

    pub fn empty(limit: usize) -> Self {
        Self {
            ids: Vec::new(),
            limit,
        }
    }

    /// Adds `id`. `Ok(false)` if it was already selected.
    pub fn insert(&mut self, id: &str) -> Result<bool, SelectionFull> {
        if self.contains(id) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(SelectionFull { limit: self.limit });
        }
        self.ids.push(id.to_owned());
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.limit
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Input from the UI.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Checkbox { id: String, checked: bool },
    Slider(usize),
    TogglePlay,
    Search(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The checkbox already matched the selection.
    Unchanged,
    /// The selection is full; the checkbox must go back to unchecked.
    Rejected,
}

/// Owns the dataset and all interactive state. Every state change that
/// affects the chart recomputes the frame synchronously.
#[derive(Debug)]
pub struct Controller {
    dataset: Dataset,
    config: ViewerConfig,
    grid: EvaluationGrid,
    selection: Selection,
    month_index: usize,
    playback: Playback,
    filter: TreeFilter,
    frame: Frame,
    scene: Scene,
    notice: Option<String>,
}

impl Controller {
    pub fn new(dataset: Dataset, config: ViewerConfig) -> Self {
        let (min, max) = dataset
            .stats
            .map(|s| (s.min_rating, s.max_rating))
            .unwrap_or(FALLBACK_RATING_RANGE);
        let grid = EvaluationGrid::linspace(min, max, config.grid_size);

        let mut controller = Self {
            selection: Selection::new(config.max_selection),
            month_index: 0,
            playback: Playback::new(config.tick_interval),
            filter: TreeFilter::default(),
            frame: Frame::default(),
            scene: Scene::new(config.fade_seconds),
            notice: None,
            grid,
            dataset,
            config,
        };
        controller.recompute();
        controller
    }

    pub fn handle(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::Checkbox { id, checked } => {
                self.on_checkbox(&id, checked);
            }
            UiEvent::Slider(index) => self.on_slider(index),
            UiEvent::TogglePlay => {
                self.on_play_toggle(now);
            }
            UiEvent::Search(term) => self.on_search(&term),
        }
    }

    pub fn on_checkbox(&mut self, id: &str, checked: bool) -> ToggleOutcome {
        let outcome = if checked {
            match self.selection.insert(id) {
                Ok(true) => ToggleOutcome::Added,
                Ok(false) => ToggleOutcome::Unchanged,
                Err(SelectionFull { limit }) => {
                    log::info!("rejected {id}: selection already holds {limit} regions");
                    self.notice = Some(format!(
                        "You can compare at most {limit} regions at once. \
                         Deselect one before adding another."
                    ));
                    ToggleOutcome::Rejected
                }
            }
        } else if self.selection.remove(id) {
            ToggleOutcome::Removed
        } else {
            ToggleOutcome::Unchanged
        };

        if matches!(outcome, ToggleOutcome::Added | ToggleOutcome::Removed) {
            log::debug!("selection {outcome:?} {id}, now {}", self.selection.len());
            self.recompute();
        }
        outcome
    }

    pub fn on_slider(&mut self, index: usize) {
        let last = self.months().len().saturating_sub(1);
        self.month_index = index.min(last);
        self.recompute();
    }

    /// Returns whether playback is running afterwards.
    pub fn on_play_toggle(&mut self, now: Instant) -> bool {
        let playing = self.playback.toggle(now);
        log::debug!("playback {}", if playing { "started" } else { "stopped" });
        playing
    }

    /// Advances one month if a tick is due. Returns whether it did.
    ///
    /// Playback holds while a notice is open; the pending tick fires once
    /// it is dismissed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.notice.is_some() || !self.playback.poll(now) {
            return false;
        }
        self.month_index = playback::next_index(self.month_index, self.months().len());
        self.recompute();
        true
    }

    pub fn on_search(&mut self, term: &str) {
        self.filter = TreeFilter::new(&self.dataset.root, term);
    }

    fn recompute(&mut self) {
        let Some(month) = self.months().get(self.month_index).cloned() else {
            self.frame = Frame::default();
            self.scene.apply(&[]);
            return;
        };
        let _span = tracing::info_span!("recompute", %month, selected = self.selection.len())
            .entered();

        self.frame = build_frame(
            &self.dataset.table,
            &self.dataset.index,
            &month,
            self.selection.iter(),
            self.config.min_samples,
        );
        let curves = self
            .frame
            .curves(&self.grid, epanechnikov(self.config.bandwidth));
        self.scene.apply(&curves);
    }

    pub fn months(&self) -> &[String] {
        self.dataset.table.months()
    }

    pub fn month(&self) -> Option<&str> {
        self.months().get(self.month_index).map(String::as_str)
    }

    pub fn month_index(&self) -> usize {
        self.month_index
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn filter(&self) -> &TreeFilter {
        &self.filter
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Rating axis bounds.
    pub fn x_range(&self) -> (f64, f64) {
        (
            self.grid.min().unwrap_or(FALLBACK_RATING_RANGE.0),
            self.grid.max().unwrap_or(FALLBACK_RATING_RANGE.1),
        )
    }

    /// Density axis top. Fixed by the stats so the axis does not jump
    /// while animating; falls back to the tallest curve on screen.
    pub fn y_max(&self) -> f64 {
        let fixed = self
            .dataset
            .stats
            .map(|s| s.max_density * self.config.density_buffer)
            .filter(|y| y.is_finite() && *y > 0.0);
        fixed.unwrap_or_else(|| {
            let tallest = self
                .scene
                .elements()
                .iter()
                .flat_map(|e| e.points.iter().map(|p| p[1]))
                .fold(0.0, f64::max);
            if tallest > 0.0 {
                tallest * 1.1
            } else {
                1e-3
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::sample_table;
    use crate::hierarchy::{sample_tree, HierarchyStats, Structure};

    fn controller() -> Controller {
        let config = ViewerConfig::default();
        let table = sample_table();
        let records = table.records().to_vec();
        let structure = Structure {
            root: sample_tree(),
            stats: None,
        };
        Controller::new(Dataset::new(records, structure, &config), config)
    }

    #[test]
    fn starts_with_world_on_first_month() {
        let c = controller();
        assert_eq!(c.month(), Some("2014-12"));
        assert_eq!(c.selection().iter().collect::<Vec<_>>(), ["World"]);
        assert_eq!(c.frame().entries.len(), 1);
        assert_eq!(c.scene().legend().len(), 1);
    }

    const MAX: usize = crate::config::MAX_SELECTION;

    #[test]
    fn selection_never_exceeds_limit() {
        let mut c = controller();
        let ids = ["Asia", "Europe", "IND", "NOR", "CHN", "ENG", "IRI", "Southern Asia"];
        for id in ids {
            c.on_checkbox(id, true);
            assert!(c.selection().len() <= MAX);
        }
        for id in ids.iter().rev() {
            c.on_checkbox(id, false);
            c.on_checkbox(id, true);
            assert!(c.selection().len() <= MAX);
        }
    }

    #[test]
    fn seventh_checkbox_is_rejected_with_notice() {
        let mut c = controller();
        for id in ["Asia", "Europe", "IND", "NOR", "CHN"] {
            assert_eq!(c.on_checkbox(id, true), ToggleOutcome::Added);
        }
        assert_eq!(c.selection().len(), 6);
        let before = c.selection().clone();

        assert_eq!(c.on_checkbox("ENG", true), ToggleOutcome::Rejected);
        assert_eq!(c.selection(), &before);
        assert!(!c.selection().contains("ENG"));
        assert!(c.notice().is_some());

        c.dismiss_notice();
        assert!(c.notice().is_none());
    }

    #[test]
    fn unchecking_everything_is_legal() {
        let mut c = controller();
        assert_eq!(c.on_checkbox("World", false), ToggleOutcome::Removed);
        assert!(c.selection().is_empty());
        assert!(c.frame().entries.is_empty());
        assert!(c.scene().legend().is_empty());
        assert_eq!(c.on_checkbox("World", false), ToggleOutcome::Unchanged);
    }

    #[test]
    fn slider_sets_and_clamps_month() {
        let mut c = controller();
        c.on_slider(1);
        assert_eq!(c.month(), Some("2015-01"));
        assert_eq!(c.frame().month, "2015-01");
        c.on_slider(99);
        assert_eq!(c.month_index(), 1);
    }

    #[test]
    fn playback_advances_and_wraps() {
        let mut c = controller();
        let t0 = Instant::now();
        let tick = c.config().tick_interval;
        assert!(c.on_play_toggle(t0));

        assert!(c.on_tick(t0 + tick));
        assert_eq!(c.month_index(), 1);
        assert!(c.on_tick(t0 + tick * 2));
        assert_eq!(c.month_index(), 0);

        assert!(!c.on_play_toggle(t0 + tick * 2));
        assert!(!c.on_tick(t0 + tick * 5));
        assert_eq!(c.month_index(), 0);
    }

    #[test]
    fn playback_holds_while_notice_is_open() {
        let mut c = controller();
        let t0 = Instant::now();
        let tick = c.config().tick_interval;
        c.on_play_toggle(t0);
        for id in ["Asia", "Europe", "IND", "NOR", "CHN", "ENG"] {
            c.on_checkbox(id, true);
        }
        assert!(c.notice().is_some());

        assert!(!c.on_tick(t0 + tick));
        assert!(!c.on_tick(t0 + tick * 4));
        assert_eq!(c.month_index(), 0);
        assert!(c.is_playing());

        c.dismiss_notice();
        assert!(c.on_tick(t0 + tick * 5));
        assert_eq!(c.month_index(), 1);
    }

    #[test]
    fn y_axis_ignores_overflowing_stats() {
        let config = ViewerConfig::default();
        let structure = Structure {
            root: sample_tree(),
            stats: Some(HierarchyStats {
                min_rating: 1000.0,
                max_rating: 3000.0,
                max_density: f64::MAX,
            }),
        };
        let records = sample_table().records().to_vec();
        let c = Controller::new(Dataset::new(records, structure, &config), config);
        let y = c.y_max();
        assert!(y.is_finite() && y > 0.0, "{y}");
    }

    #[test]
    fn search_leaves_selection_alone() {
        let mut c = controller();
        c.on_checkbox("NOR", true);
        let before = c.selection().clone();
        c.handle(UiEvent::Search("Ind".into()), Instant::now());
        assert_eq!(c.selection(), &before);
        assert!(c.filter().is_visible("IND"));
        assert!(!c.filter().is_visible("NOR"));
    }

    #[test]
    fn y_axis_is_fixed_by_stats() {
        let c = controller();
        let stats = c.dataset().stats.unwrap();
        assert_eq!(c.y_max(), stats.max_density * 3.5);
        assert_eq!(c.x_range(), (stats.min_rating, stats.max_rating));
    }
}
