use crate::analyzer::quarterly::Observation;

/// (index value, amount) pairs for rows where both are present.
pub fn scatter_points(observations: &[Observation]) -> Vec<(f64, f64)> {
    observations
        .iter()
        .filter_map(|o| Some((o.index_value?, o.amount?)))
        .collect()
}

/// Pearson correlation between the two coordinates of `points`.
/// Returns None for fewer than two points or a constant coordinate.
pub fn compute_correlation(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (numerator, var_x, var_y) = points.iter().fold((0.0, 0.0, 0.0), |acc, (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (acc.0 + dx * dy, acc.1 + dx * dx, acc.2 + dy * dy)
    });

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}
