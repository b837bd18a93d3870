use crate::config::{Alarm, Thresholds};

use super::dimension::Dimension;
use super::sample::{HardwareSample, PingSample};
use super::state::HardwareAlertState;

/// Result of comparing one cycle's alarm flag with the persisted one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub exceeded: bool,
    pub transitioned_to_alarm: bool,
    pub transitioned_to_clear: bool,
}

pub fn transition(previous_exceeded: bool, exceeded: bool) -> Evaluation {
    Evaluation {
        exceeded,
        transitioned_to_alarm: !previous_exceeded && exceeded,
        transitioned_to_clear: previous_exceeded && !exceeded,
    }
}

/// Single-sample evaluation. Values equal to the threshold are not in alarm.
pub fn evaluate(measured_value: f64, threshold: f64, previous_exceeded: bool) -> Evaluation {
    transition(previous_exceeded, measured_value > threshold)
}

/// Used share of a disk in percent. A zero total is replaced by 1 so empty readings give 0%.
pub fn disk_usage_percent(used: f64, free: f64) -> f64 {
    let total = used + free;
    let total = if total > 0.0 { total } else { 1.0 };
    (used / total) * 100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corroboration {
    pub exceeded_dimensions: usize,
    pub triggers: usize,
    pub required: usize,
    pub alarm: bool,
}

/// Counts, across the dimensions exceeded right now, how many window samples also
/// exceeded; the alarm stage needs `ceil(max_triggers / k)` of them for `k` dimensions.
pub fn corroborate(
    exceeded: &[(Dimension, f64)],
    window: &[HardwareSample],
    max_triggers: u32,
    window_size: usize,
) -> Corroboration {
    let exceeded_dimensions = exceeded.len();
    if exceeded_dimensions == 0 {
        return Corroboration::default();
    }

    let triggers = exceeded
        .iter()
        .map(|(dimension, threshold)| {
            window
                .iter()
                .filter_map(|sample| sample.value(*dimension))
                .filter(|value| value > threshold)
                .count()
        })
        .sum::<usize>();

    let required = (max_triggers as usize)
        .div_ceil(exceeded_dimensions)
        .min(exceeded_dimensions.saturating_mul(window_size.max(1)));

    Corroboration {
        exceeded_dimensions,
        triggers,
        required,
        alarm: triggers >= required,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionUpdate {
    pub dimension: Dimension,
    pub value: f64,
    pub threshold: Option<f64>,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HardwareEvaluation {
    pub updates: Vec<DimensionUpdate>,
    pub corroboration: Corroboration,
}

impl HardwareEvaluation {
    pub fn alarms(&self) -> impl Iterator<Item = &DimensionUpdate> {
        self.updates
            .iter()
            .filter(|update| update.evaluation.transitioned_to_alarm)
    }

    pub fn clears(&self) -> impl Iterator<Item = &DimensionUpdate> {
        self.updates
            .iter()
            .filter(|update| update.evaluation.transitioned_to_clear)
    }
}

/// Evaluates every hardware dimension of `sample` against the persisted state.
///
/// Onset requires the window to corroborate the breach. A dimension already in
/// alarm stays there while its value is above `threshold - hysteresis`, so a
/// window that stops corroborating cannot produce a clear followed by a duplicate alarm.
pub fn evaluate_hardware(
    sample: &HardwareSample,
    window: &[HardwareSample],
    previous: &HardwareAlertState,
    thresholds: &Thresholds,
    alarm: &Alarm,
) -> HardwareEvaluation {
    let readings = Dimension::HARDWARE
        .iter()
        .filter_map(|dimension| {
            sample
                .value(*dimension)
                .map(|value| (*dimension, value, dimension.threshold(thresholds)))
        })
        .collect::<Vec<_>>();

    let exceeded_now = readings
        .iter()
        .filter_map(|(dimension, value, threshold)| {
            threshold
                .filter(|threshold| evaluate(*value, *threshold, false).exceeded)
                .map(|threshold| (*dimension, threshold))
        })
        .collect::<Vec<_>>();

    let corroboration = corroborate(&exceeded_now, window, alarm.max_triggers, alarm.window_size);

    let updates = readings
        .into_iter()
        .map(|(dimension, value, threshold)| {
            let previous_exceeded = previous.dimension(dimension).exceeded;
            let exceeded = match threshold {
                None => false,
                Some(threshold) if previous_exceeded => value > threshold - alarm.hysteresis,
                Some(threshold) => value > threshold && corroboration.alarm,
            };

            DimensionUpdate {
                dimension,
                value,
                threshold,
                evaluation: transition(previous_exceeded, exceeded),
            }
        })
        .collect();

    HardwareEvaluation {
        updates,
        corroboration,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingEvaluation {
    pub failures_in_window: usize,
    pub required: usize,
    pub evaluation: Evaluation,
}

/// A failed probe alarms once the window holds enough failures; any success clears.
pub fn evaluate_ping(
    current: &PingSample,
    window: &[PingSample],
    previous_alarm: bool,
    alarm: &Alarm,
) -> PingEvaluation {
    let failures_in_window = window.iter().filter(|sample| sample.is_failure()).count();
    let required = (alarm.max_triggers as usize).min(alarm.window_size.max(1));

    let alarm_now = if !current.is_failure() {
        false
    } else {
        previous_alarm || failures_in_window >= required
    };

    PingEvaluation {
        failures_in_window,
        required,
        evaluation: transition(previous_alarm, alarm_now),
    }
}
