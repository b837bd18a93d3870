use std::{panic::AssertUnwindSafe, time::Duration};

use tokio::{task::JoinError, time::timeout};

use crate::monitor::Dimension;

use super::{downsample::GraphPoint, error::GraphRenderError, render::render_metric_png};

const RENDER_TIMEOUT_SECS: u64 = 30;

/// Renders on the blocking pool; a panicking or stuck backend surfaces as an error.
pub(super) async fn run_render_task(
    points: Vec<GraphPoint>,
    dimension: Dimension,
    threshold: Option<f64>,
    site: String,
) -> Result<Vec<u8>, GraphRenderError> {
    let render_handle = tokio::task::spawn_blocking(move || {
        std::panic::catch_unwind(AssertUnwindSafe(|| {
            render_metric_png(points, dimension, threshold, &site)
        }))
        .map_err(|panic_payload| GraphRenderError::Panic(describe_panic_payload(panic_payload)))?
    });

    match timeout(Duration::from_secs(RENDER_TIMEOUT_SECS), render_handle).await {
        Ok(join_result) => match join_result {
            Ok(inner_result) => inner_result,
            Err(join_error) => Err(join_error_to_error(join_error)),
        },
        Err(_) => Err(GraphRenderError::RenderTimeout(RENDER_TIMEOUT_SECS)),
    }
}

fn join_error_to_error(join_error: JoinError) -> GraphRenderError {
    GraphRenderError::Join(join_error.to_string())
}

fn describe_panic_payload(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }

    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }

    "unknown panic payload".to_string()
}
