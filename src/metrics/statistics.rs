use serde::{Deserialize, Serialize};

/// Summary statistics for a collection of costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Statistics {
    /// Compute statistics from a slice of values
    pub fn from_slice(values: &[f64]) -> Self {
        if values.is_empty() {
            return Statistics {
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                max: 0.0,
                count: 0,
            };
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;

        let variance = values.iter()
            .map(|&x| (x - mean).powi(2))
            .sum::<f64>() / count as f64;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Statistics {
            mean,
            std: variance.sqrt(),
            min,
            max,
            count,
        }
    }
}
