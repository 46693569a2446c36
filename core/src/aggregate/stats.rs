pub struct StatsHelper;

impl StatsHelper {
    /// `count / total * 100`, or 0 when `total` is 0.
    pub fn percentage(count: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64 * 100.0
    }

    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}
