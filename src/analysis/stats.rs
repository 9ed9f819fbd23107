/// Descriptive statistics for a numeric column
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Calculate statistics over the non-null values of a column.
    ///
    /// `std_dev` is the sample standard deviation (n - 1); it is NaN for a
    /// single value, and every statistic but `count` is NaN for no values.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn calculate(name: &str, values: &[Option<f64>]) -> Self {
        let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
        let count = sorted.len();

        if count == 0 {
            return Self {
                name: name.to_string(),
                count,
                mean: f64::NAN,
                std_dev: f64::NAN,
                min: f64::NAN,
                q1: f64::NAN,
                median: f64::NAN,
                q3: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let variance =
                sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        } else {
            f64::NAN
        };

        sorted.sort_by(f64::total_cmp);

        Self {
            name: name.to_string(),
            count,
            mean,
            std_dev,
            min: sorted[0],
            q1: percentile(&sorted, 25.0),
            median: percentile(&sorted, 50.0),
            q3: percentile(&sorted, 75.0),
            max: sorted[count - 1],
        }
    }

    /// Table cells in `describe` order: count, mean, std, min, 25%, 50%, 75%, max
    #[must_use]
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.name.clone(), format!("{}", self.count)];
        cells.extend(
            [
                self.mean,
                self.std_dev,
                self.min,
                self.q1,
                self.median,
                self.q3,
                self.max,
            ]
            .iter()
            .map(|v| format_float(*v)),
        );
        cells
    }
}

/// Format a statistic to six decimals, `NaN` for missing
#[must_use]
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Calculate percentile using linear interpolation
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let k = (p / 100.0) * (sorted.len() - 1) as f64;
    let f = k.floor() as usize;
    let c = k.ceil() as usize;

    if f == c {
        sorted[f]
    } else {
        let d0 = sorted[f] * (c as f64 - k);
        let d1 = sorted[c] * (k - f as f64);
        d0 + d1
    }
}

/// Mean of the non-null values, NaN when there are none
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Pearson correlation over pairwise-complete observations.
///
/// Only positions where both sides are present take part. Returns NaN with
/// fewer than two such pairs or when either side has zero variance.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }

    (cov / denom).clamp(-1.0, 1.0)
}
