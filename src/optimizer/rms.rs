use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};

/// Root-mean-square normalized gradient ascent
///
/// Keeps an exponentially decayed estimate of each parameter's squared
/// gradient and divides the step by its square root, so every parameter
/// moves at a rate independent of its gradient's scale.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RmsNormalizer {
    pub decay: f64,
    pub epsilon: f64,
    mean_square: Array1<f64>,
}

impl RmsNormalizer {
    pub fn new(dim: usize, decay: f64, epsilon: f64) -> Self {
        RmsNormalizer {
            decay,
            epsilon,
            mean_square: Array1::zeros(dim),
        }
    }

    pub fn mean_square(&self) -> &Array1<f64> {
        &self.mean_square
    }

    /// `params += step_size · g / (√ms + ε)` after folding `g²` into `ms`.
    pub fn ascend(&mut self, params: &mut Array1<f64>, gradient: &Array1<f64>, step_size: f64) {
        let decay = self.decay;
        let epsilon = self.epsilon;

        Zip::from(&mut self.mean_square)
            .and(params)
            .and(gradient)
            .for_each(|ms, p, &g| {
                *ms = decay * *ms + (1.0 - decay) * g * g;
                *p += step_size * g / (ms.sqrt() + epsilon);
            });
    }
}
