use serde::{Deserialize, Serialize};

/// The three live step sizes of a run, plus the reserved auxiliary one
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSizes {
    pub actor: f64,
    pub critic_w: f64,
    pub critic_v: f64,
    /// Never applied to any parameter
    pub auxiliary: f64,
}

impl StepSizes {
    pub fn new(actor: f64, critic_w: f64, critic_v: f64, auxiliary: f64) -> Self {
        StepSizes {
            actor,
            critic_w,
            critic_v,
            auxiliary,
        }
    }

    /// Multiply the actor and critic step sizes by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.actor *= factor;
        self.critic_w *= factor;
        self.critic_v *= factor;
    }
}

/// Step decay: every `interval` iterations the step sizes are multiplied by `factor`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepSchedule {
    pub interval: usize,
    pub factor: f64,
}

impl StepSchedule {
    pub fn new(interval: usize, factor: f64) -> Self {
        StepSchedule { interval, factor }
    }

    /// Apply the schedule after 1-based iteration `iteration`; true if it fired.
    pub fn apply(&self, iteration: usize, steps: &mut StepSizes) -> bool {
        if iteration % self.interval == 0 {
            steps.scale(self.factor);
            true
        } else {
            false
        }
    }

    /// Multiplier accumulated by the end of `iteration`, ignoring divergence events
    pub fn multiplier(&self, iteration: usize) -> f64 {
        self.factor.powi((iteration / self.interval) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_fires_on_interval() {
        let schedule = StepSchedule::new(3, 0.5);
        let mut steps = StepSizes::new(1.0, 2.0, 4.0, 8.0);
        let fired: Vec<bool> = (1..=6).map(|i| schedule.apply(i, &mut steps)).collect();

        assert_eq!(fired, vec![false, false, true, false, false, true]);
        assert_eq!(steps, StepSizes::new(0.25, 0.5, 1.0, 8.0));
        assert_eq!(schedule.multiplier(6), 0.25);
    }
}
