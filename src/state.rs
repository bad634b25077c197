use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{DpgError, Result};
use crate::linalg;

/// Actor and critic parameter vectors
///
/// `theta` parameterizes the policy, `w` and `v` are the two critic blocks
/// (advantage and state-value parts for a compatible critic).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub theta: Array1<f64>,
    pub w: Array1<f64>,
    pub v: Array1<f64>,
}

/// Borrowed view of [`Parameters`] handed to collaborators
#[derive(Clone, Copy, Debug)]
pub struct ParameterView<'a> {
    pub theta: ArrayView1<'a, f64>,
    pub w: ArrayView1<'a, f64>,
    pub v: ArrayView1<'a, f64>,
}

impl Parameters {
    pub fn new(theta: Array1<f64>, w: Array1<f64>, v: Array1<f64>) -> Self {
        Parameters { theta, w, v }
    }

    pub fn view(&self) -> ParameterView<'_> {
        ParameterView {
            theta: self.theta.view(),
            w: self.w.view(),
            v: self.v.view(),
        }
    }

    /// Critic blocks stacked as `[v; w]`, the layout the recursive estimators use.
    pub fn critic_stacked(&self) -> Array1<f64> {
        linalg::stack(self.v.view(), self.w.view())
    }

    /// Inverse of [`Parameters::critic_stacked`].
    pub fn set_critic_stacked(&mut self, stacked: &Array1<f64>) -> Result<()> {
        DpgError::check_len("stacked critic", self.v.len() + self.w.len(), stacked.len())?;
        let (v, w) = linalg::split(stacked.view(), self.v.len());
        self.v.assign(&v);
        self.w.assign(&w);
        Ok(())
    }

    /// Move every block a fraction `tau` of the way toward `source`.
    pub fn track(&mut self, source: &Parameters, tau: f64) {
        soft_update(&mut self.theta, &source.theta, tau);
        soft_update(&mut self.w, &source.w, tau);
        soft_update(&mut self.v, &source.v, tau);
    }
}

/// `target ← τ·source + (1−τ)·target`
pub fn soft_update(target: &mut Array1<f64>, source: &Array1<f64>, tau: f64) {
    Zip::from(target)
        .and(source)
        .for_each(|t, &s| *t = tau * s + (1.0 - tau) * *t);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_soft_update_blends() {
        let mut target = array![0.0, 10.0];
        soft_update(&mut target, &array![1.0, 0.0], 0.25);
        assert_eq!(target, array![0.25, 7.5]);
    }

    #[test]
    fn test_critic_stacking_roundtrip() {
        let mut params = Parameters::new(array![1.0], array![2.0, 3.0], array![4.0]);
        assert_eq!(params.critic_stacked(), array![4.0, 2.0, 3.0]);

        params.set_critic_stacked(&array![-1.0, -2.0, -3.0]).unwrap();
        assert_eq!(params.v, array![-1.0]);
        assert_eq!(params.w, array![-2.0, -3.0]);
        assert!(params.set_critic_stacked(&array![0.0]).is_err());
    }
}
