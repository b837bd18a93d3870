use chrono::{DateTime, Local};

use crate::monitor::MetricSample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphPoint {
    pub timestamp: DateTime<Local>,
    pub value: f64,
}

impl GraphPoint {
    fn from_sample(sample: &MetricSample) -> Option<Self> {
        let secs = sample.timestamp.floor();
        let nanos = ((sample.timestamp - secs) * 1e9) as u32;
        let timestamp = DateTime::from_timestamp(secs as i64, nanos)?.with_timezone(&Local);
        Some(Self {
            timestamp,
            value: sample.value,
        })
    }
}

struct BucketAggregate {
    min: GraphPoint,
    max: GraphPoint,
}

/// Reduces `samples` to at most two points per horizontal pixel, keeping each
/// bucket's extremes so spikes survive. Samples with unrepresentable timestamps are dropped.
pub fn downsample_points(samples: &[MetricSample], width_px: usize) -> Vec<GraphPoint> {
    let points = samples
        .iter()
        .filter_map(GraphPoint::from_sample)
        .collect::<Vec<_>>();

    if points.len() <= 2 || points.len() <= width_px {
        return points;
    }

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let start_ts = first.timestamp.timestamp_millis();
    let end_ts = last.timestamp.timestamp_millis();
    if end_ts <= start_ts {
        return points;
    }

    let bucket_count = width_px.max(1);
    let mut buckets: Vec<Option<BucketAggregate>> =
        std::iter::repeat_with(|| None).take(bucket_count).collect();

    for point in points {
        let position =
            (point.timestamp.timestamp_millis() - start_ts) as f64 / (end_ts - start_ts) as f64;
        let bucket_index = ((position * (bucket_count - 1) as f64).floor() as usize)
            .min(bucket_count - 1);

        match &mut buckets[bucket_index] {
            Some(existing) => {
                if point.value < existing.min.value {
                    existing.min = point;
                }
                if point.value > existing.max.value {
                    existing.max = point;
                }
            }
            empty => {
                *empty = Some(BucketAggregate {
                    min: point,
                    max: point,
                });
            }
        }
    }

    let mut reduced = Vec::with_capacity(bucket_count * 2);
    for bucket in buckets.into_iter().flatten() {
        let (earlier, later) = if bucket.min.timestamp <= bucket.max.timestamp {
            (bucket.min, bucket.max)
        } else {
            (bucket.max, bucket.min)
        };
        reduced.push(earlier);
        if later.timestamp != earlier.timestamp {
            reduced.push(later);
        }
    }

    reduced
}
