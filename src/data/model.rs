use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Column names of the input and export format, in canonical order.
pub const COLUMNS: [&str; 8] = [
    "restaurant",
    "cuisine_type",
    "weather_condition",
    "rating",
    "delivery_time_mins",
    "distance_km",
    "latitude",
    "longitude",
];

// ---------------------------------------------------------------------------
// DeliveryRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// A single delivery observation.
///
/// Field order matches [`COLUMNS`]; the serde derive relies on it when
/// writing rows back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Restaurant name. Not unique across rows.
    pub restaurant: String,
    pub cuisine_type: String,
    pub weather_condition: String,
    /// Customer rating, nominally 1–5 (not enforced).
    pub rating: f64,
    pub delivery_time_mins: f64,
    pub distance_km: f64,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// DeliveryDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed facet indices.
///
/// Built once and never mutated afterwards; filtered views are index lists
/// or copies, never edits of `records`.
#[derive(Debug, Clone)]
pub struct DeliveryDataset {
    /// All records, in file order.
    pub records: Vec<DeliveryRecord>,
    /// Sorted distinct cuisine types.
    pub cuisines: BTreeSet<String>,
    /// Sorted distinct weather conditions.
    pub weather_conditions: BTreeSet<String>,
    /// Smallest finite rating, `None` if there is none.
    pub min_rating: Option<f64>,
    /// Largest finite rating, `None` if there is none.
    pub max_rating: Option<f64>,
}

impl DeliveryDataset {
    /// Build facet indices from the loaded records.
    pub fn from_records(records: Vec<DeliveryRecord>) -> Self {
        let mut cuisines = BTreeSet::new();
        let mut weather_conditions = BTreeSet::new();
        let mut min_rating: Option<f64> = None;
        let mut max_rating: Option<f64> = None;

        for rec in &records {
            cuisines.insert(rec.cuisine_type.clone());
            weather_conditions.insert(rec.weather_condition.clone());
            if rec.rating.is_finite() {
                min_rating = Some(min_rating.map_or(rec.rating, |m| m.min(rec.rating)));
                max_rating = Some(max_rating.map_or(rec.rating, |m| m.max(rec.rating)));
            }
        }

        DeliveryDataset {
            records,
            cuisines,
            weather_conditions,
            min_rating,
            max_rating,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
