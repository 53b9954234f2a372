use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::color::CategoryColors;
use crate::config::DashboardConfig;
use crate::data::export;
use crate::data::filter::{FilterCriteria, apply, filtered_indices};
use crate::data::model::{DeliveryDataset, DeliveryRecord};
use crate::data::stats::{LOWESS_FRAC, LOWESS_ITERATIONS, lowess};
use crate::error::Result;
use crate::predictor::RatingModel;

/// Slider ranges and defaults of the predict tab.
pub const TIME_RANGE: (f64, f64) = (10.0, 120.0);
pub const DISTANCE_RANGE: (f64, f64) = (1.0, 20.0);
const DEFAULT_TIME: f64 = 30.0;
const DEFAULT_DISTANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Map,
    Trends,
    Predict,
    RawData,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Map, Tab::Trends, Tab::Predict, Tab::RawData];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Map => "📍 Map",
            Tab::Trends => "📊 Trends",
            Tab::Predict => "🔮 Predict",
            Tab::RawData => "📈 Raw Data",
        }
    }
}

/// Which categorical column a facet operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Cuisine,
    Weather,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state of one dashboard window, independent of rendering.
///
/// `dataset` and `model` are shared and never mutated; `criteria` belongs to
/// this session only.
pub struct AppState {
    pub dataset: Arc<DeliveryDataset>,
    pub model: Arc<RatingModel>,
    pub config: DashboardConfig,

    /// Active filter selections.
    pub criteria: FilterCriteria,

    /// Lowest value the minimum-rating slider offers: the default bound,
    /// which sits below 1 only when the data does.
    pub rating_floor: f64,

    /// Indices of records passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// LOWESS rating-over-time line per visible cuisine (cached).
    pub trend_lines: Vec<(String, Vec<[f64; 2]>)>,

    pub tab: Tab,

    /// Predict-tab inputs.
    pub predict_time: f64,
    pub predict_distance: f64,

    pub cuisine_colors: CategoryColors,
    pub weather_colors: CategoryColors,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<DeliveryDataset>, model: Arc<RatingModel>, config: DashboardConfig) -> Self {
        let criteria = FilterCriteria::all(&dataset);
        let visible_indices = filtered_indices(&dataset.records, &criteria);
        let trend_lines = trend_lines(&dataset.records, &visible_indices);
        Self {
            cuisine_colors: CategoryColors::new(&dataset.cuisines),
            weather_colors: CategoryColors::new(&dataset.weather_conditions),
            dataset,
            model,
            config,
            rating_floor: criteria.min_rating,
            criteria,
            visible_indices,
            trend_lines,
            tab: Tab::Map,
            predict_time: DEFAULT_TIME,
            predict_distance: DEFAULT_DISTANCE,
            status_message: None,
        }
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset.records, &self.criteria);
        self.trend_lines = trend_lines(&self.dataset.records, &self.visible_indices);
        log::debug!(
            "Filter matched {} of {} records",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// Records of the current filtered view, in dataset order.
    pub fn visible_records(&self) -> impl Iterator<Item = &DeliveryRecord> + '_ {
        self.visible_indices.iter().map(|&i| &self.dataset.records[i])
    }

    fn allowed_mut(&mut self, facet: Facet) -> &mut std::collections::BTreeSet<String> {
        match facet {
            Facet::Cuisine => &mut self.criteria.allowed_cuisines,
            Facet::Weather => &mut self.criteria.allowed_weather,
        }
    }

    /// Set whether a single value of a facet is allowed.
    pub fn set_allowed(&mut self, facet: Facet, value: &str, allowed: bool) {
        let selected = self.allowed_mut(facet);
        let changed = if allowed {
            selected.insert(value.to_string())
        } else {
            selected.remove(value)
        };
        if changed {
            self.refilter();
        }
    }

    /// Select all values of a facet.
    pub fn select_all(&mut self, facet: Facet) {
        let all = match facet {
            Facet::Cuisine => self.dataset.cuisines.clone(),
            Facet::Weather => self.dataset.weather_conditions.clone(),
        };
        *self.allowed_mut(facet) = all;
        self.refilter();
    }

    /// Deselect all values of a facet. The view becomes empty.
    pub fn select_none(&mut self, facet: Facet) {
        self.allowed_mut(facet).clear();
        self.refilter();
    }

    pub fn set_min_rating(&mut self, min_rating: f64) {
        if self.criteria.min_rating != min_rating {
            self.criteria.min_rating = min_rating;
            self.refilter();
        }
    }

    /// Model output for the current slider values.
    pub fn prediction(&self) -> f64 {
        self.model.predict(self.predict_time, self.predict_distance)
    }

    /// Write the current filtered view to `path` and report in the status line.
    pub fn export_visible(&mut self, path: &Path) -> Result<usize> {
        let view = apply(&self.dataset.records, &self.criteria);
        let result = export::export_file(path, &view);
        match &result {
            Ok(_) => {
                self.status_message =
                    Some(format!("Exported {} rows to {}", view.len(), path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        result
    }
}

/// Delivery time → rating trend for each cuisine among `indices`, by name.
fn trend_lines(records: &[DeliveryRecord], indices: &[usize]) -> Vec<(String, Vec<[f64; 2]>)> {
    let mut by_cuisine: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for &i in indices {
        let rec = &records[i];
        by_cuisine
            .entry(rec.cuisine_type.as_str())
            .or_default()
            .push([rec.delivery_time_mins, rec.rating]);
    }
    by_cuisine
        .into_iter()
        .map(|(cuisine, points)| {
            (cuisine.to_string(), lowess(&points, LOWESS_FRAC, LOWESS_ITERATIONS))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::fixtures::sample_records;

    fn state() -> AppState {
        let dataset = Arc::new(DeliveryDataset::from_records(sample_records()));
        let model = Arc::new(RatingModel::train(&dataset.records).unwrap());
        AppState::new(dataset, model, DashboardConfig::default())
    }

    #[test]
    fn starts_with_everything_visible() {
        let st = state();
        assert_eq!(st.visible_indices, (0..7).collect::<Vec<_>>());
        assert_eq!(st.tab, Tab::Map);
        assert_eq!((st.predict_time, st.predict_distance), (30.0, 5.0));
    }

    #[test]
    fn toggling_a_value_refilters() {
        let mut st = state();
        st.set_allowed(Facet::Cuisine, "Chinese", false);
        assert_eq!(st.visible_indices, vec![0, 1, 3, 4, 6]);
        st.set_allowed(Facet::Cuisine, "Chinese", true);
        assert_eq!(st.visible_indices.len(), 7);
    }

    #[test]
    fn select_none_then_all() {
        let mut st = state();
        st.select_none(Facet::Weather);
        assert!(st.visible_indices.is_empty());
        st.select_all(Facet::Weather);
        assert_eq!(st.visible_indices.len(), 7);
    }

    #[test]
    fn rating_slider_refilters() {
        let mut st = state();
        st.set_min_rating(4.0);
        let ratings: Vec<f64> = st.visible_records().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![4.5, 4.8]);
    }

    #[test]
    fn filters_never_touch_the_model() {
        let mut st = state();
        let before = (*st.model).clone();
        st.select_none(Facet::Cuisine);
        st.set_min_rating(5.0);
        assert_eq!(*st.model, before);
        assert_eq!(st.prediction(), before.predict(30.0, 5.0));
    }

    #[test]
    fn exports_the_visible_view() {
        let mut st = state();
        st.set_allowed(Facet::Weather, "Rainy", false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.csv");
        st.export_visible(&path).unwrap();
        let reloaded = load_file(&path).unwrap();
        let expected: Vec<DeliveryRecord> = st.visible_records().cloned().collect();
        assert_eq!(reloaded.records, expected);
        assert!(st.status_message.unwrap().starts_with("Exported 4 rows"));
    }

    #[test]
    fn failed_export_sets_status() {
        let mut st = state();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.csv");
        assert!(st.export_visible(&path).is_err());
        assert!(st.status_message.unwrap().starts_with("Error"));
    }

    #[test]
    fn trend_lines_follow_the_filter() {
        let mut st = state();
        let names: Vec<&str> = st.trend_lines.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Chinese", "Indian", "Italian"]);
        let indian = &st.trend_lines[1].1;
        let times: Vec<f64> = indian.iter().map(|p| p[0]).collect();
        assert_eq!(times, vec![25.0, 38.0, 50.0]);

        st.set_allowed(Facet::Cuisine, "Indian", false);
        let names: Vec<&str> = st.trend_lines.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Chinese", "Italian"]);

        st.select_none(Facet::Weather);
        assert!(st.trend_lines.is_empty());
    }
}
