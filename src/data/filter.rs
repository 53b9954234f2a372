use std::collections::BTreeSet;

use super::model::{DeliveryDataset, DeliveryRecord};

/// Lowest rating a user can select; the default lower bound.
pub const DEFAULT_MIN_RATING: f64 = 1.0;

// ---------------------------------------------------------------------------
// Filter criteria: the active predicates for one session
// ---------------------------------------------------------------------------

/// Conjunction of three predicates over a [`DeliveryRecord`].
///
/// An empty allowed set matches nothing; there is no "empty means all".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub allowed_cuisines: BTreeSet<String>,
    pub min_rating: f64,
    pub allowed_weather: BTreeSet<String>,
}

impl FilterCriteria {
    /// Criteria that let every record of `dataset` through.
    ///
    /// The rating bound is [`DEFAULT_MIN_RATING`], lowered to the dataset's
    /// minimum when the data contains smaller ratings.
    pub fn all(dataset: &DeliveryDataset) -> Self {
        let min_rating = dataset
            .min_rating
            .map_or(DEFAULT_MIN_RATING, |m| m.min(DEFAULT_MIN_RATING));
        Self {
            allowed_cuisines: dataset.cuisines.clone(),
            min_rating,
            allowed_weather: dataset.weather_conditions.clone(),
        }
    }

    /// Whether a single record passes all predicates.
    pub fn matches(&self, record: &DeliveryRecord) -> bool {
        self.allowed_cuisines.contains(&record.cuisine_type)
            && record.rating >= self.min_rating
            && self.allowed_weather.contains(&record.weather_condition)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass the criteria, in input order.
pub fn filtered_indices(records: &[DeliveryRecord], criteria: &FilterCriteria) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Return copies of the records that pass the criteria, in input order.
/// The input is never modified.
pub fn apply(records: &[DeliveryRecord], criteria: &FilterCriteria) -> Vec<DeliveryRecord> {
    records
        .iter()
        .filter(|rec| criteria.matches(rec))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::fixtures::{record, sample_records};

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn full_criteria_returns_everything_in_order() {
        let ds = DeliveryDataset::from_records(sample_records());
        let criteria = FilterCriteria::all(&ds);
        assert_eq!(criteria.min_rating, 1.0);
        assert_eq!(apply(&ds.records, &criteria), ds.records);
        assert_eq!(
            filtered_indices(&ds.records, &criteria),
            (0..ds.len()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn default_bound_drops_below_one_when_data_does() {
        let mut records = sample_records();
        records.push(record("Odd One", "Thai", "Foggy", 0.5, 30.0, 2.0));
        let ds = DeliveryDataset::from_records(records);
        let criteria = FilterCriteria::all(&ds);
        assert_eq!(criteria.min_rating, 0.5);
        assert_eq!(apply(&ds.records, &criteria).len(), ds.len());
    }

    #[test]
    fn predicates_are_conjunctive() {
        let ds = DeliveryDataset::from_records(sample_records());
        let criteria = FilterCriteria {
            allowed_cuisines: set(&["Indian", "Italian"]),
            min_rating: 3.5,
            allowed_weather: set(&["Sunny"]),
        };
        let names: Vec<String> = apply(&ds.records, &criteria)
            .into_iter()
            .map(|r| r.restaurant)
            .collect();
        assert_eq!(names, vec!["Spice Route", "Pasta Point"]);
        assert_eq!(filtered_indices(&ds.records, &criteria), vec![0, 4]);
    }

    #[test]
    fn rating_bound_is_inclusive() {
        let ds = DeliveryDataset::from_records(sample_records());
        let mut criteria = FilterCriteria::all(&ds);
        criteria.min_rating = 3.0;
        let indices = filtered_indices(&ds.records, &criteria);
        assert!(indices.contains(&6), "rating 3.0 must pass a bound of 3.0");
    }

    #[test]
    fn empty_cuisine_set_yields_nothing() {
        let ds = DeliveryDataset::from_records(sample_records());
        let mut criteria = FilterCriteria::all(&ds);
        criteria.allowed_cuisines.clear();
        for min_rating in [0.0, 1.0, 5.0] {
            criteria.min_rating = min_rating;
            assert!(apply(&ds.records, &criteria).is_empty());
        }
    }

    #[test]
    fn empty_weather_set_yields_nothing() {
        let ds = DeliveryDataset::from_records(sample_records());
        let mut criteria = FilterCriteria::all(&ds);
        criteria.allowed_weather.clear();
        assert!(filtered_indices(&ds.records, &criteria).is_empty());
    }

    #[test]
    fn nan_rating_never_matches() {
        let mut records = sample_records();
        records[0].rating = f64::NAN;
        let ds = DeliveryDataset::from_records(records);
        let criteria = FilterCriteria::all(&ds);
        assert!(!filtered_indices(&ds.records, &criteria).contains(&0));
    }

    #[test]
    fn source_is_untouched() {
        let records = sample_records();
        let before = records.clone();
        let ds = DeliveryDataset::from_records(records);
        let mut criteria = FilterCriteria::all(&ds);
        criteria.min_rating = 4.0;
        let _ = apply(&ds.records, &criteria);
        assert_eq!(ds.records, before);
    }

    const CUISINES: [&str; 4] = ["Indian", "Italian", "Chinese", "Thai"];
    const WEATHER: [&str; 3] = ["Sunny", "Rainy", "Stormy"];

    fn arb_record() -> impl Strategy<Value = DeliveryRecord> {
        (0..CUISINES.len(), 0..WEATHER.len(), 0.0f64..6.0, 5.0f64..120.0, 0.5f64..20.0).prop_map(
            |(c, w, rating, time, distance)| {
                record("R", CUISINES[c], WEATHER[w], rating, time, distance)
            },
        )
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (
            proptest::sample::subsequence(CUISINES.to_vec(), 0..=CUISINES.len()),
            0.0f64..6.0,
            proptest::sample::subsequence(WEATHER.to_vec(), 0..=WEATHER.len()),
        )
            .prop_map(|(cuisines, min_rating, weather)| FilterCriteria {
                allowed_cuisines: set(&cuisines),
                min_rating,
                allowed_weather: set(&weather),
            })
    }

    proptest! {
        #[test]
        fn output_is_an_ordered_subset_satisfying_criteria(
            records in proptest::collection::vec(arb_record(), 0..40),
            criteria in arb_criteria(),
        ) {
            let indices = filtered_indices(&records, &criteria);
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            for &i in &indices {
                prop_assert!(criteria.matches(&records[i]));
            }
            let view = apply(&records, &criteria);
            let expected: Vec<DeliveryRecord> = indices.iter().map(|&i| records[i].clone()).collect();
            prop_assert_eq!(view, expected);
        }

        #[test]
        fn filtering_is_idempotent(
            records in proptest::collection::vec(arb_record(), 0..40),
            criteria in arb_criteria(),
        ) {
            let once = apply(&records, &criteria);
            let twice = apply(&once, &criteria);
            prop_assert_eq!(once, twice);
        }
    }
}
