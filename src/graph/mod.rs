use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::app_context::AppContext;
use crate::monitor::{Dimension, MetricSample};

mod downsample;
mod error;
mod executor;
mod maintenance;
mod render;

pub use downsample::{GraphPoint, downsample_points};
pub use error::GraphRenderError;
pub use maintenance::{PruneOutcome, prune_exports};

/// Renders `samples` as a PNG at `output`, creating parent folders.
pub async fn render_chart(
    samples: &[MetricSample],
    dimension: Dimension,
    threshold: Option<f64>,
    site: &str,
    output: &Path,
) -> Result<PathBuf, GraphRenderError> {
    let points = downsample_points(samples, render::GRAPH_WIDTH_PX as usize);
    let png = executor::run_render_task(points, dimension, threshold, site.to_string()).await?;

    let write_error = |source| GraphRenderError::Write {
        path: output.display().to_string(),
        source,
    };
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    tokio::fs::write(output, png).await.map_err(write_error)?;

    Ok(output.to_path_buf())
}

/// Prunes the export folder, then renders one chart per request.
/// Charts that fail to render are logged and left out.
pub async fn render_attachments(
    context: &AppContext,
    requests: Vec<(Dimension, Option<f64>, Vec<MetricSample>)>,
    now: DateTime<Local>,
) -> Vec<PathBuf> {
    match prune_exports(
        context.paths.exports_dir(),
        context.config.storage.max_export_folder_mb,
    ) {
        Ok(outcome) if outcome.removed_files > 0 => log::info!(
            "exports_pruned removed_files={} remaining_bytes={}",
            outcome.removed_files,
            outcome.remaining_bytes
        ),
        Ok(_) => {}
        Err(error) => log::warn!("exports_prune_failed error={}", error),
    }

    let mut attachments = Vec::with_capacity(requests.len());
    for (dimension, threshold, samples) in requests {
        let output = context.paths.chart_file(dimension, now);
        match render_chart(
            &samples,
            dimension,
            threshold,
            &context.config.site_name,
            &output,
        )
        .await
        {
            Ok(path) => attachments.push(path),
            Err(error) => log::warn!(
                "chart_render_failed dimension={} code={} error={}",
                dimension.key(),
                error.code(),
                error
            ),
        }
    }
    attachments
}
