use nalgebra::{DMatrix, DVector};

use crate::data::model::DeliveryRecord;
use crate::error::{DashboardError, Result};

/// Neutral rating that predictions are compared against in the UI.
pub const BASELINE_RATING: f64 = 3.0;

/// Intercept plus one weight per predictor.
const PARAMETERS: usize = 3;

// ---------------------------------------------------------------------------
// Rating model: rating ≈ intercept + a·time + b·distance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub time_weight: f64,
    pub distance_weight: f64,
}

/// Ordinary least-squares fit of rating on delivery time and distance.
///
/// Trained once on the full dataset and read-only afterwards; filter
/// selections never reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingModel {
    pub intercept: f64,
    pub coefficients: Coefficients,
    /// Rows used in the fit.
    pub samples: usize,
    /// Coefficient of determination on the training rows. `None` when all
    /// ratings are identical.
    pub r_squared: Option<f64>,
}

impl RatingModel {
    /// Fit the model.
    ///
    /// Fails with `InsufficientData` when there are fewer rows than fitted
    /// parameters, when a training value is not finite, or when the two
    /// predictors plus intercept are linearly dependent.
    pub fn train(records: &[DeliveryRecord]) -> Result<Self> {
        let n = records.len();
        if n < PARAMETERS {
            return Err(insufficient(n, "fewer rows than fitted parameters"));
        }
        if let Some(row) = records.iter().position(|r| {
            !(r.rating.is_finite() && r.delivery_time_mins.is_finite() && r.distance_km.is_finite())
        }) {
            return Err(insufficient(n, &format!("row {} has a non-finite value", row + 1)));
        }

        let design = DMatrix::from_fn(n, PARAMETERS, |i, j| match j {
            0 => 1.0,
            1 => records[i].delivery_time_mins,
            _ => records[i].distance_km,
        });
        let target = DVector::from_iterator(n, records.iter().map(|r| r.rating));

        let svd = design.clone().svd(true, true);
        let tolerance = svd.singular_values.max() * f64::EPSILON * n as f64;
        if svd.rank(tolerance) < PARAMETERS {
            return Err(insufficient(n, "predictors are collinear"));
        }
        let beta = svd
            .solve(&target, tolerance)
            .map_err(|e| insufficient(n, e))?;

        let residuals = &design * &beta - &target;
        let mean = target.mean();
        let ss_tot: f64 = target.iter().map(|y| (y - mean).powi(2)).sum();
        let ss_res = residuals.norm_squared();
        let r_squared = (ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot);

        let model = RatingModel {
            intercept: beta[0],
            coefficients: Coefficients {
                time_weight: beta[1],
                distance_weight: beta[2],
            },
            samples: n,
            r_squared,
        };
        log::info!("Fitted rating model on {n} rows: {}", model.equation());
        Ok(model)
    }

    /// Predicted rating. Not clamped to 1–5.
    pub fn predict(&self, time_mins: f64, distance_km: f64) -> f64 {
        self.intercept
            + self.coefficients.time_weight * time_mins
            + self.coefficients.distance_weight * distance_km
    }

    pub fn equation(&self) -> String {
        format!(
            "Rating = {:.2} + {:.2}*Time + {:.2}*Distance",
            self.intercept, self.coefficients.time_weight, self.coefficients.distance_weight
        )
    }
}

/// How far a prediction sits above (positive) or below the baseline.
pub fn delta_vs_baseline(prediction: f64) -> f64 {
    prediction - BASELINE_RATING
}

fn insufficient(rows: usize, reason: &str) -> DashboardError {
    DashboardError::InsufficientData {
        rows,
        required: PARAMETERS,
        reason: reason.to_string(),
    }
}
