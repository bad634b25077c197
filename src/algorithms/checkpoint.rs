use crate::state::Parameters;

/// Outcome of comparing an evaluation cost with the best so far
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// New best; the live parameters were snapshotted
    Improved,
    /// Cost exceeded `ratio × best`; caller should roll back
    Diverged,
    /// Neither
    Held,
}

/// Best-known parameters and their evaluation cost
#[derive(Clone, Debug)]
pub struct Checkpoint {
    best: Parameters,
    best_cost: f64,
    ratio: f64,
}

impl Checkpoint {
    /// Start with `initial` as the fallback and no recorded cost.
    pub fn new(initial: &Parameters, ratio: f64) -> Self {
        Checkpoint {
            best: initial.clone(),
            best_cost: f64::INFINITY,
            ratio,
        }
    }

    /// A non-finite cost counts as divergence once any finite best exists.
    pub fn assess(&mut self, cost: f64, live: &Parameters) -> Verdict {
        if cost < self.best_cost {
            self.best_cost = cost;
            self.best = live.clone();
            Verdict::Improved
        } else if cost > self.ratio * self.best_cost || (cost.is_nan() && self.best_cost.is_finite()) {
            Verdict::Diverged
        } else {
            Verdict::Held
        }
    }

    pub fn best(&self) -> &Parameters {
        &self.best
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub fn into_best(self) -> Parameters {
        self.best
    }
}
