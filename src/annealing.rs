//! Temperature schedule for the adaptive phase.
//!
//! The temperature drops by a fixed step each time `patience` consecutive
//! trials fail to improve the population, and the search ends once that
//! happens at the floor temperature.

/// Floating-point slack used when comparing temperatures.
pub const TEMPERATURE_EPSILON: f64 = 1e-9;

/// Slack allowed between the last cooling step and the floor, scaled by
/// the step size.
///
/// Shared by config validation and the schedule, so a span accepted as a
/// whole number of steps always lands on the floor in exactly that many.
pub fn floor_tolerance(drop: f64) -> f64 {
    TEMPERATURE_EPSILON * drop.max(1.0)
}

/// Outcome of [`AnnealingSchedule::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealingStep {
    /// Keep searching at the current temperature.
    Continue,
    /// The temperature was lowered and the counter reset.
    Cooled,
    /// `patience` unsuccessful trials at the floor temperature.
    Terminate,
}

/// Temperature and unsuccessful-trial bookkeeping.
#[derive(Debug, Clone)]
pub struct AnnealingSchedule {
    temperature: f64,
    end_temperature: f64,
    drop: f64,
    patience: usize,
    unsuccessful_trials: usize,
}

impl AnnealingSchedule {
    /// Creates a schedule starting at `start_temperature`.
    ///
    /// `patience` is the number of consecutive unsuccessful trials that
    /// triggers a cooling step; the search uses its population size.
    pub fn new(start_temperature: f64, end_temperature: f64, drop: f64, patience: usize) -> Self {
        Self {
            temperature: start_temperature,
            end_temperature,
            drop,
            patience,
            unsuccessful_trials: 0,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn unsuccessful_trials(&self) -> usize {
        self.unsuccessful_trials
    }

    /// Whether the temperature has reached the floor.
    pub fn at_floor(&self) -> bool {
        self.temperature <= self.end_temperature
    }

    /// Records the outcome of one adaptive trial.
    pub fn record(&mut self, improved: bool) {
        if improved {
            self.unsuccessful_trials = 0;
        } else {
            self.unsuccessful_trials += 1;
        }
    }

    /// Cooling and termination check, run after [`record`](Self::record).
    pub fn advance(&mut self) -> AnnealingStep {
        if self.unsuccessful_trials != self.patience {
            return AnnealingStep::Continue;
        }
        if self.at_floor() {
            return AnnealingStep::Terminate;
        }
        self.temperature = self.cooled();
        self.unsuccessful_trials = 0;
        AnnealingStep::Cooled
    }

    /// Next temperature. Snaps to the floor when the step lands on or
    /// below it, so rounding drift cannot skip the floor.
    fn cooled(&self) -> f64 {
        let next = self.temperature - self.drop;
        if next <= self.end_temperature + floor_tolerance(self.drop) {
            self.end_temperature
        } else {
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_success_resets_counter() {
        let mut s = AnnealingSchedule::new(10.0, 1.0, 3.0, 3);
        s.record(false);
        s.record(false);
        assert_eq!(s.unsuccessful_trials(), 2);
        s.record(true);
        assert_eq!(s.unsuccessful_trials(), 0);
        assert_eq!(s.advance(), AnnealingStep::Continue);
    }

    #[test]
    fn test_cools_after_patience() {
        let mut s = AnnealingSchedule::new(10.0, 1.0, 3.0, 2);
        s.record(false);
        assert_eq!(s.advance(), AnnealingStep::Continue);
        s.record(false);
        assert_eq!(s.advance(), AnnealingStep::Cooled);
        assert_eq!(s.temperature(), 7.0);
        assert_eq!(s.unsuccessful_trials(), 0);
    }

    #[test]
    fn test_full_schedule_terminates_at_floor() {
        let mut s = AnnealingSchedule::new(10.0, 1.0, 3.0, 1);
        let mut temperatures = vec![s.temperature()];
        loop {
            s.record(false);
            match s.advance() {
                AnnealingStep::Cooled => temperatures.push(s.temperature()),
                AnnealingStep::Terminate => break,
                AnnealingStep::Continue => unreachable!("patience is 1"),
            }
        }
        assert_eq!(temperatures, vec![10.0, 7.0, 4.0, 1.0]);
        assert_eq!(s.unsuccessful_trials(), 1);
    }

    #[test]
    fn test_rounding_drift_snaps_to_floor() {
        // 1.0 - 0.3 - 0.3 - 0.3 is 0.09999999999999998 in binary floating point.
        let mut s = AnnealingSchedule::new(1.0, 0.1, 0.3, 1);
        for _ in 0..3 {
            s.record(false);
            assert_eq!(s.advance(), AnnealingStep::Cooled);
        }
        assert_eq!(s.temperature(), 0.1);
        s.record(false);
        assert_eq!(s.advance(), AnnealingStep::Terminate);
    }

    #[test]
    fn test_large_step_snaps_within_relative_tolerance() {
        // Off by 5e-7 from a whole step of 1000.
        let mut s = AnnealingSchedule::new(1001.0000005, 1.0, 1000.0, 1);
        s.record(false);
        assert_eq!(s.advance(), AnnealingStep::Cooled);
        assert_eq!(s.temperature(), 1.0);
        s.record(false);
        assert_eq!(s.advance(), AnnealingStep::Terminate);
    }

    #[test]
    fn test_floor_tolerance_scales_with_large_steps() {
        assert_eq!(floor_tolerance(0.3), TEMPERATURE_EPSILON);
        assert_eq!(floor_tolerance(1000.0), 1000.0 * TEMPERATURE_EPSILON);
    }

    #[test]
    fn test_start_at_floor_terminates_directly() {
        let mut s = AnnealingSchedule::new(1.0, 1.0, 1.0, 2);
        s.record(false);
        assert_eq!(s.advance(), AnnealingStep::Continue);
        s.record(false);
        assert_eq!(s.advance(), AnnealingStep::Terminate);
        assert_eq!(s.temperature(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_temperature_never_increases(
            steps in 1usize..6,
            drop in 0.1f64..5.0,
            patience in 1usize..4,
            outcomes in prop::collection::vec(any::<bool>(), 1..200),
        ) {
            let end = 0.5;
            let start = end + drop * steps as f64;
            let mut s = AnnealingSchedule::new(start, end, drop, patience);
            for improved in outcomes {
                let before = s.temperature();
                s.record(improved);
                let at_floor = s.at_floor();
                let counter = s.unsuccessful_trials();
                match s.advance() {
                    AnnealingStep::Continue => prop_assert_eq!(s.temperature(), before),
                    AnnealingStep::Cooled => {
                        prop_assert!(s.temperature() < before);
                        prop_assert!((before - s.temperature() - drop).abs() < 1e-6);
                        prop_assert_eq!(s.unsuccessful_trials(), 0);
                    }
                    AnnealingStep::Terminate => {
                        prop_assert!(at_floor);
                        prop_assert_eq!(counter, patience);
                        break;
                    }
                }
                prop_assert!(s.temperature() >= end);
            }
        }
    }
}
