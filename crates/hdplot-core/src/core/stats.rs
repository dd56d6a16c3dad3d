//! Descriptive statistics behind the box-and-strip panels.

/// Summary of one (group, variable) sample as drawn by a notched box plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within `q1 - 1.5 IQR`.
    pub whisker_low: f64,
    /// Largest observation within `q3 + 1.5 IQR`.
    pub whisker_high: f64,
    pub notch_low: f64,
    pub notch_high: f64,
    pub min: f64,
    pub max: f64,
}

const WHISKER_RANGE: f64 = 1.5;
const NOTCH_FACTOR: f64 = 1.57;

impl BoxStats {
    /// Computes box statistics of the finite values in `values`.
    ///
    /// Returns `None` when no finite value remains.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;

        let low_fence = q1 - WHISKER_RANGE * iqr;
        let high_fence = q3 + WHISKER_RANGE * iqr;
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);

        let half_notch = NOTCH_FACTOR * iqr / (sorted.len() as f64).sqrt();

        Some(Self {
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            notch_low: median - half_notch,
            notch_high: median + half_notch,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Values of `values` outside the whiskers.
    pub fn outliers<'a>(&self, values: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        let (low, high) = (self.whisker_low, self.whisker_high);
        values
            .iter()
            .copied()
            .filter(move |v| v.is_finite() && (*v < low || *v > high))
    }
}

/// Linear-interpolation quantile of an ascending, non-empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
