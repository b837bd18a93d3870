use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;

use crate::monitor::Dimension;

use super::downsample::GraphPoint;
use super::error::GraphRenderError;

pub(super) const GRAPH_WIDTH_PX: u32 = 1200;
const GRAPH_HEIGHT_PX: u32 = 480;

struct GraphStyle;

impl GraphStyle {
    const MARGIN: i32 = 16;
    const CAPTION_FONT_FAMILY: &'static str = "sans-serif";
    const CAPTION_FONT_SIZE: i32 = 28;
    const X_LABEL_AREA_SIZE: u32 = 40;
    const Y_LABEL_AREA_SIZE: u32 = 56;
    const X_LABEL_COUNT: usize = 6;
    const Y_LABEL_COUNT: usize = 6;
    const BACKGROUND: RGBColor = WHITE;
    const THRESHOLD_LINE: RGBColor = BLACK;
    const THRESHOLD_ALPHA: f64 = 0.5;

    fn line(dimension: Dimension) -> RGBColor {
        match dimension {
            Dimension::CpuUsage => RED,
            Dimension::RamUsage => BLUE,
            Dimension::DiskUsage => GREEN,
            Dimension::LoadAvg10m => MAGENTA,
            Dimension::PingStatus => RGBColor(230, 120, 0),
        }
    }

    fn y_desc(dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::PingStatus => "Failure (1 = down)",
            Dimension::LoadAvg10m => "Load",
            _ => "Usage %",
        }
    }

    fn y_range(dimension: Dimension, points: &[GraphPoint], threshold: Option<f64>) -> (f64, f64) {
        match dimension {
            Dimension::PingStatus => (-0.05, 1.05),
            Dimension::LoadAvg10m => {
                let peak = points
                    .iter()
                    .map(|point| point.value)
                    .chain(threshold)
                    .fold(1.0_f64, f64::max);
                (0.0, peak * 1.2)
            }
            _ => (0.0, 100.0),
        }
    }
}

pub(super) fn render_metric_png(
    points: Vec<GraphPoint>,
    dimension: Dimension,
    threshold: Option<f64>,
    site: &str,
) -> Result<Vec<u8>, GraphRenderError> {
    if points.len() < 2 {
        return Err(GraphRenderError::NotEnoughPoints);
    }

    let width = GRAPH_WIDTH_PX;
    let height = GRAPH_HEIGHT_PX;
    let mut rgb_buffer = vec![255u8; width as usize * height as usize * 3];

    {
        let drawing_area =
            BitMapBackend::with_buffer(&mut rgb_buffer, (width, height)).into_drawing_area();
        drawing_area
            .fill(&GraphStyle::BACKGROUND)
            .map_err(|error| GraphRenderError::Backend(format!("background fill: {:?}", error)))?;

        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(GraphRenderError::NotEnoughPoints);
        };
        let mut x_start = first.timestamp;
        let mut x_end = last.timestamp;
        if x_start == x_end {
            x_start -= chrono::Duration::seconds(1);
            x_end += chrono::Duration::seconds(1);
        }
        let (y_min, y_max) = GraphStyle::y_range(dimension, &points, threshold);

        let mut chart = ChartBuilder::on(&drawing_area)
            .margin(GraphStyle::MARGIN)
            .caption(
                format!("{} ({})", dimension.title(), site),
                (GraphStyle::CAPTION_FONT_FAMILY, GraphStyle::CAPTION_FONT_SIZE),
            )
            .x_label_area_size(GraphStyle::X_LABEL_AREA_SIZE)
            .y_label_area_size(GraphStyle::Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(x_start..x_end, y_min..y_max)
            .map_err(|error| GraphRenderError::Backend(format!("chart build: {:?}", error)))?;

        chart
            .configure_mesh()
            .x_labels(GraphStyle::X_LABEL_COUNT)
            .y_labels(GraphStyle::Y_LABEL_COUNT)
            .y_desc(GraphStyle::y_desc(dimension))
            .x_desc("Time")
            .draw()
            .map_err(|error| GraphRenderError::Backend(format!("mesh draw: {:?}", error)))?;

        let color = GraphStyle::line(dimension);
        chart
            .draw_series(std::iter::once(PathElement::new(
                points
                    .iter()
                    .map(|point| (point.timestamp, point.value))
                    .collect::<Vec<_>>(),
                color,
            )))
            .map_err(|error| GraphRenderError::Backend(format!("series draw: {:?}", error)))?;

        if dimension == Dimension::PingStatus {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|point| Circle::new((point.timestamp, point.value), 3, color.filled())),
                )
                .map_err(|error| {
                    GraphRenderError::Backend(format!("marker draw: {:?}", error))
                })?;
        }

        if let Some(threshold) = threshold {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x_start, threshold), (x_end, threshold)],
                    GraphStyle::THRESHOLD_LINE.mix(GraphStyle::THRESHOLD_ALPHA),
                )))
                .map_err(|error| {
                    GraphRenderError::Backend(format!("threshold draw: {:?}", error))
                })?;
        }

        drawing_area
            .present()
            .map_err(|error| GraphRenderError::Backend(format!("present: {:?}", error)))?;
    }

    let rgb_image = RgbImage::from_raw(width, height, rgb_buffer).ok_or_else(|| {
        GraphRenderError::PngEncoding("image buffer conversion failed".to_string())
    })?;
    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb_image)
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|error| GraphRenderError::PngEncoding(error.to_string()))?;

    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::{GraphStyle, render_metric_png};
    use crate::graph::GraphPoint;
    use crate::graph::GraphRenderError;
    use crate::monitor::Dimension;

    #[test]
    fn rejects_not_enough_points() {
        let points = vec![GraphPoint {
            timestamp: Local::now(),
            value: 42.0,
        }];

        let result = render_metric_png(points, Dimension::CpuUsage, Some(80.0), "acme");
        assert!(matches!(result, Err(GraphRenderError::NotEnoughPoints)));
    }

    #[test]
    fn load_axis_fits_values_and_threshold() {
        let points = vec![
            GraphPoint {
                timestamp: Local::now(),
                value: 2.0,
            },
            GraphPoint {
                timestamp: Local::now(),
                value: 5.0,
            },
        ];
        let (low, high) = GraphStyle::y_range(Dimension::LoadAvg10m, &points, Some(8.0));
        assert_eq!(low, 0.0);
        assert!(high > 8.0);

        assert_eq!(
            GraphStyle::y_range(Dimension::CpuUsage, &points, None),
            (0.0, 100.0)
        );
    }
}
