// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Small, allocation-light statistics shared by the estimators.
//!
//! Everything here is a pure function over slices so it can be used from the
//! hot path without owning any state.

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`), or `None` for an empty slice.
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    Some(sum_sq / values.len() as f64)
}

/// Population standard deviation, or `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    population_variance(values).map(f64::sqrt)
}

/// Coefficient of variation (`σ / μ`), or `None` for an empty slice.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let sigma = std_dev(values)?;
    Some(sigma / avg)
}

/// Upper median of an ascending-sorted slice: the element at index `len / 2`.
///
/// Even-length input does not average the two middle elements.
pub fn upper_median(sorted: &[f64]) -> Option<f64> {
    sorted.get(sorted.len() / 2).copied()
}

/// Differences between consecutive timestamps, keeping only positive ones.
pub fn positive_deltas<I>(timestamps: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut deltas = Vec::new();
    let mut previous: Option<f64> = None;
    for t in timestamps {
        if let Some(prev) = previous {
            let delta = t - prev;
            if delta > 0.0 {
                deltas.push(delta);
            }
        }
        previous = Some(t);
    }
    deltas
}

/// Scores the regularity of a list of positive intervals in `[0, 1]`.
///
/// The score is `1 - cv`, clamped. Identical intervals score `1.0`; an empty
/// list scores `0.0`.
pub fn stability_score(intervals: &[f64]) -> f64 {
    match coefficient_of_variation(intervals) {
        Some(cv) if cv.is_finite() => (1.0 - cv).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_variance() {
        let values = [5.0, 15.0, 5.0, 15.0];
        assert_eq!(mean(&values), Some(10.0));
        assert_relative_eq!(population_variance(&values).unwrap(), 25.0);
        assert_relative_eq!(std_dev(&values).unwrap(), 5.0);
        assert_relative_eq!(coefficient_of_variation(&values).unwrap(), 0.5);
    }

    #[test]
    fn empty_input_has_no_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_variance(&[]), None);
        assert_eq!(upper_median(&[]), None);
    }

    #[test]
    fn upper_median_picks_index_half_len() {
        assert_eq!(upper_median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(upper_median(&[1.0, 2.0, 3.0, 4.0]), Some(3.0));
        assert_eq!(upper_median(&[7.0]), Some(7.0));
    }

    #[test]
    fn positive_deltas_skip_duplicates_and_reversals() {
        let deltas = positive_deltas([0.0, 1.0, 1.0, 3.0, 2.0, 4.0]);
        assert_eq!(deltas, vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn constant_intervals_are_perfectly_stable() {
        assert_relative_eq!(stability_score(&[8.0; 20]), 1.0);
    }

    #[test]
    fn empty_intervals_are_maximally_unstable() {
        assert_eq!(stability_score(&[]), 0.0);
    }

    #[test]
    fn score_decreases_with_dispersion() {
        let tight = stability_score(&[9.0, 10.0, 11.0, 10.0]);
        let loose = stability_score(&[5.0, 10.0, 15.0, 10.0]);
        let wild = stability_score(&[1.0, 1.0, 1.0, 100.0]);
        assert!(tight > loose);
        assert!(loose > wild);
        assert_eq!(wild, 0.0);
    }
}
