use crate::error::{PipelineError, Result};
use crate::types::MeltedRow;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Renders one boxplot per status category from a long-format view.
/// Category order follows first appearance in the rows, which the melt
/// functions emit in plot order.
pub fn render_boxplot(path: &Path, caption: &str, rows: &[MeltedRow]) -> Result<()> {
    if rows.is_empty() {
        return Err(PipelineError::Plot("no rows to plot".to_string()));
    }

    let mut categories: Vec<String> = Vec::new();
    for row in rows {
        if !categories.contains(&row.category) {
            categories.push(row.category.clone());
        }
    }
    let groups: Vec<Vec<f64>> = categories
        .iter()
        .map(|c| {
            rows.iter()
                .filter(|r| &r.category == c)
                .map(|r| r.percent)
                .collect()
        })
        .collect();

    // Percentages live in 0..100, but a negative status-4 residual can push
    // a value below zero; widen the axis instead of clipping it away.
    let data_min = rows.iter().map(|r| r.percent).fold(f64::MAX, f64::min) as f32;
    let y_min = if data_min < 0.0 { data_min - 5.0 } else { 0.0 };

    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let category_refs: Vec<&str> = categories.iter().map(String::as_str).collect();
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(category_refs[..].into_segmented(), y_min..105f32)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("GAP protection status")
        .y_desc("Percent of habitat")
        .disable_x_mesh()
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(category_refs.iter().zip(groups.iter()).map(|(category, values)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(category), &Quartiles::new(values))
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    info!(path = %path.display(), categories = categories.len(), "rendered boxplot");
    Ok(())
}

fn plot_err<E: std::fmt::Display>(e: E) -> PipelineError {
    PipelineError::Plot(e.to_string())
}
