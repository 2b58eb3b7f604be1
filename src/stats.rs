use crate::error::{MetricsError, Result};

pub fn ratio(
    numerator: f64,
    denominator: f64,
    metric: &'static str,
    denominator_name: &'static str,
) -> Result<f64> {
    if denominator == 0.0 {
        return Err(MetricsError::DivisionByZero {
            metric,
            denominator: denominator_name,
        });
    }
    Ok(numerator / denominator)
}

pub fn percentage(
    numerator: f64,
    denominator: f64,
    metric: &'static str,
    denominator_name: &'static str,
) -> Result<f64> {
    Ok(ratio(numerator, denominator, metric, denominator_name)? * 100.0)
}

/// Linear-interpolation quantile of an ascending slice at rank `q * (n - 1)`,
/// evaluated from the nearer endpoint so equal neighbours return that value exactly.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = rank - lower as f64;

    let a = sorted[lower];
    let b = sorted[upper];
    let diff = b - a;
    if frac >= 0.5 {
        Some(b - diff * (1.0 - frac))
    } else {
        Some(a + diff * frac)
    }
}
