use serde::Serialize;
use serde::de::DeserializeOwned;

use super::super::evaluator::{DimensionUpdate, Evaluation};
use super::{DimensionState, HardwareAlertState, PingAlertState};

/// A persisted alert record that absorbs one cycle of evaluator output.
pub trait AlertRecord: Serialize + DeserializeOwned + Default {
    type Transitions: ?Sized;

    fn apply(&mut self, transitions: &Self::Transitions, now: f64);
}

impl DimensionState {
    pub(crate) fn apply(&mut self, evaluation: Evaluation, value: f64, now: f64) {
        self.exceeded = evaluation.exceeded;
        self.value = value;

        if evaluation.transitioned_to_alarm {
            self.trigger_count = self.trigger_count.saturating_add(1);
            self.last_trigger_time = Some(now);
        }
    }
}

impl AlertRecord for HardwareAlertState {
    type Transitions = [DimensionUpdate];

    fn apply(&mut self, transitions: &[DimensionUpdate], now: f64) {
        for update in transitions {
            if let Some(state) = self.dimension_mut(update.dimension) {
                state.apply(update.evaluation, update.value, now);
            }
        }
    }
}

impl AlertRecord for PingAlertState {
    type Transitions = Evaluation;

    fn apply(&mut self, evaluation: &Evaluation, now: f64) {
        self.alarm_triggered = evaluation.exceeded;

        if evaluation.transitioned_to_alarm {
            self.trigger_count = self.trigger_count.saturating_add(1);
            self.last_time_triggered = Some(now);
        }
    }
}
