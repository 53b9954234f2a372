use std::collections::BTreeMap;

use super::model::DeliveryRecord;

/// Five-number summary used by the box charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

impl BoxSummary {
    /// Summarize the finite values; `None` when there are none.
    ///
    /// Quartiles interpolate linearly between order statistics.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        Some(BoxSummary {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            count: sorted.len(),
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// One summary per group among the records at `indices`, sorted by key.
/// Groups with no finite values are left out.
///
/// Keys can be anything ordered, e.g. a cuisine name or a
/// `(cuisine, weather)` pair.
pub fn group_summaries<'a, G, K, V>(
    records: &'a [DeliveryRecord],
    indices: &[usize],
    key: K,
    value: V,
) -> Vec<(G, BoxSummary)>
where
    G: Ord,
    K: Fn(&'a DeliveryRecord) -> G,
    V: Fn(&DeliveryRecord) -> f64,
{
    let mut groups: BTreeMap<G, Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let rec = &records[i];
        groups.entry(key(rec)).or_default().push(value(rec));
    }

    groups
        .into_iter()
        .filter_map(|(group, values)| BoxSummary::from_values(values).map(|s| (group, s)))
        .collect()
}

// ---------------------------------------------------------------------------
// LOWESS trend line
// ---------------------------------------------------------------------------

/// Share of the points that each local fit looks at.
pub const LOWESS_FRAC: f64 = 2.0 / 3.0;
/// Robustifying passes after the first fit.
pub const LOWESS_ITERATIONS: usize = 3;

/// Locally weighted linear regression (Cleveland's LOWESS).
///
/// Each point is fitted from its `frac · n` nearest neighbours in x with
/// tricube weights; every further iteration down-weights points with large
/// residuals using bisquare weights. Returns `[x, fitted]` for every finite
/// input point, sorted by x.
pub fn lowess(points: &[[f64; 2]], frac: f64, iterations: usize) -> Vec<[f64; 2]> {
    let mut sorted: Vec<[f64; 2]> = points
        .iter()
        .copied()
        .filter(|[x, y]| x.is_finite() && y.is_finite())
        .collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let n = sorted.len();
    if n == 0 {
        return Vec::new();
    }
    let xs: Vec<f64> = sorted.iter().map(|p| p[0]).collect();
    let ys: Vec<f64> = sorted.iter().map(|p| p[1]).collect();
    let k = ((frac * n as f64 + 1e-10) as usize).max(2).min(n);

    let mut robustness = vec![1.0; n];
    let mut fitted = ys.clone();
    for pass in 0..=iterations {
        fitted = local_fits(&xs, &ys, k, &robustness, &fitted);
        if pass == iterations {
            break;
        }

        let residuals: Vec<f64> = ys.iter().zip(&fitted).map(|(y, f)| (y - f).abs()).collect();
        let scale = 6.0 * median(&residuals);
        if scale <= 0.0 {
            break;
        }
        robustness = residuals.iter().map(|r| bisquare(r / scale)).collect();
    }

    xs.into_iter().zip(fitted).map(|(x, f)| [x, f]).collect()
}

/// One weighted linear fit per point. `previous` is kept where every
/// neighbour has zero weight.
fn local_fits(xs: &[f64], ys: &[f64], k: usize, robustness: &[f64], previous: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut left = 0;
    let mut fits = Vec::with_capacity(n);

    for i in 0..n {
        let x = xs[i];
        // Slide the k-point window while its right neighbour is closer.
        while left + k < n && x - xs[left] > xs[left + k] - x {
            left += 1;
        }
        let window = left..left + k;
        let radius = (x - xs[left]).max(xs[left + k - 1] - x);

        let weights: Vec<f64> = window
            .clone()
            .map(|j| {
                let w = if radius > 0.0 {
                    tricube((xs[j] - x).abs() / radius)
                } else {
                    1.0
                };
                w * robustness[j]
            })
            .collect();

        let sw: f64 = weights.iter().sum();
        if sw <= 0.0 {
            fits.push(previous[i]);
            continue;
        }
        let mean_x = window.clone().zip(&weights).map(|(j, w)| w * xs[j]).sum::<f64>() / sw;
        let mean_y = window.clone().zip(&weights).map(|(j, w)| w * ys[j]).sum::<f64>() / sw;
        let (sxx, sxy) = window.zip(&weights).fold((0.0, 0.0), |(sxx, sxy), (j, w)| {
            let dx = xs[j] - mean_x;
            (sxx + w * dx * dx, sxy + w * dx * (ys[j] - mean_y))
        });

        let slope = if sxx > 1e-12 * sw * radius * radius {
            sxy / sxx
        } else {
            0.0
        };
        fits.push(mean_y + slope * (x - mean_x));
    }
    fits
}

fn tricube(u: f64) -> f64 {
    if u < 1.0 { (1.0 - u.powi(3)).powi(3) } else { 0.0 }
}

fn bisquare(u: f64) -> f64 {
    if u < 1.0 { (1.0 - u * u).powi(2) } else { 0.0 }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::sample_records;

    #[test]
    fn odd_count_quartiles() {
        let s = BoxSummary::from_values([5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!((s.min, s.q1, s.median, s.q3, s.max), (1.0, 2.0, 3.0, 4.0, 5.0));
        assert_eq!(s.count, 5);
    }

    #[test]
    fn even_count_interpolates() {
        let s = BoxSummary::from_values([1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((s.q1 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn single_value_collapses() {
        let s = BoxSummary::from_values([4.2]).unwrap();
        assert_eq!((s.min, s.median, s.max), (4.2, 4.2, 4.2));
    }

    #[test]
    fn empty_and_non_finite_give_none() {
        assert_eq!(BoxSummary::from_values(Vec::new()), None);
        assert_eq!(BoxSummary::from_values([f64::NAN, f64::INFINITY]), None);
    }

    #[test]
    fn groups_only_the_given_indices() {
        let records = sample_records();
        let groups = group_summaries(&records, &[0, 2, 3, 5], |r| r.cuisine_type.as_str(), |r| r.rating);
        let names: Vec<&str> = groups.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Chinese", "Indian"]);
        let chinese = &groups[0].1;
        assert_eq!(chinese.count, 2);
        assert_eq!((chinese.min, chinese.max), (1.4, 2.1));
    }

    #[test]
    fn no_indices_no_groups() {
        let records = sample_records();
        let groups = group_summaries(&records, &[], |r| r.weather_condition.as_str(), |r| r.delivery_time_mins);
        assert!(groups.is_empty());
    }

    #[test]
    fn groups_by_cuisine_and_weather() {
        let records = sample_records();
        let all: Vec<usize> = (0..records.len()).collect();
        let groups = group_summaries(
            &records,
            &all,
            |r| (r.cuisine_type.as_str(), r.weather_condition.as_str()),
            |r| r.rating,
        );
        let keys: Vec<(&str, &str)> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                ("Chinese", "Rainy"),
                ("Chinese", "Sunny"),
                ("Indian", "Rainy"),
                ("Indian", "Sunny"),
                ("Italian", "Rainy"),
                ("Italian", "Sunny"),
            ]
        );
        let indian_sunny = &groups[3].1;
        assert_eq!(indian_sunny.count, 2);
        assert_eq!((indian_sunny.min, indian_sunny.max), (3.0, 4.5));
    }

    #[test]
    fn lowess_reproduces_a_straight_line() {
        let points: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 3.0 * i as f64 - 2.0]).collect();
        let fit = lowess(&points, 0.5, LOWESS_ITERATIONS);
        assert_eq!(fit.len(), 10);
        for [x, y] in fit {
            assert!((y - (3.0 * x - 2.0)).abs() < 1e-9, "x={x} y={y}");
        }
    }

    #[test]
    fn lowess_sorts_by_x_and_skips_non_finite() {
        let points = [[5.0, 1.0], [1.0, 2.0], [f64::NAN, 3.0], [3.0, 2.5], [4.0, f64::INFINITY]];
        let fit = lowess(&points, LOWESS_FRAC, LOWESS_ITERATIONS);
        let xs: Vec<f64> = fit.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);
        assert!(fit.iter().all(|p| p[1].is_finite()));
    }

    #[test]
    fn lowess_small_inputs() {
        assert!(lowess(&[], LOWESS_FRAC, LOWESS_ITERATIONS).is_empty());
        assert_eq!(lowess(&[[1.0, 1.0]], LOWESS_FRAC, LOWESS_ITERATIONS), vec![[1.0, 1.0]]);
        let two = lowess(&[[3.0, 5.0], [1.0, 1.0]], LOWESS_FRAC, LOWESS_ITERATIONS);
        assert_eq!(two, vec![[1.0, 1.0], [3.0, 5.0]]);
    }

    #[test]
    fn lowess_constant_x_gives_the_mean() {
        let fit = lowess(&[[2.0, 1.0], [2.0, 3.0], [2.0, 5.0]], 1.0, LOWESS_ITERATIONS);
        for [x, y] in fit {
            assert_eq!(x, 2.0);
            assert!((y - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn robustness_passes_ignore_an_outlier() {
        // 2x + 1 with ±0.5 jitter, one spike of +30 at x = 20.
        let points: Vec<[f64; 2]> = (0..41)
            .map(|i| {
                let x = i as f64;
                let jitter = if i % 2 == 1 { 0.5 } else { -0.5 };
                let spike = if i == 20 { 30.0 } else { 0.0 };
                [x, 2.0 * x + 1.0 + jitter + spike]
            })
            .collect();

        let plain = lowess(&points, LOWESS_FRAC, 0);
        assert!((plain[20][1] - 41.0).abs() > 1.0);

        let robust = lowess(&points, LOWESS_FRAC, LOWESS_ITERATIONS);
        assert!((robust[20][1] - 41.0).abs() < 0.5);
        for [x, y] in &robust {
            assert!((y - (2.0 * x + 1.0)).abs() < 0.2, "x={x} y={y}");
        }
    }
}
