//! Descriptive statistics over plain slices.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator).
///
/// `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() as f64 - 1.0)).sqrt())
}

/// Coefficient of determination `1 - SSE/SST`.
///
/// `None` when the inputs are empty/mismatched or `actual` has zero variance.
pub fn r_squared(actual: &[f64], fitted: &[f64]) -> Option<f64> {
    if actual.len() != fitted.len() {
        return None;
    }
    let m = mean(actual)?;
    let sse: f64 = actual.iter().zip(fitted).map(|(a, f)| (a - f) * (a - f)).sum();
    let sst: f64 = actual.iter().map(|a| (a - m) * (a - m)).sum();
    if sst <= 0.0 || !sst.is_finite() {
        return None;
    }
    Some(1.0 - sse / sst)
}
