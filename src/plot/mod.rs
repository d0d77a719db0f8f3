use anyhow::{anyhow, bail, Result};
use arrow::array::{Array, Float64Array, Int32Array};
use arrow::compute;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::process::derive_millions;

const CAPTION: &str = "World Population Over the Years";
const X_LABEL: &str = "Year";
const Y_LABEL: &str = "Population (in millions)";

/// Render the year / population-in-millions series as a line chart with one
/// marker per point, written as a PNG to `out_path`.
///
/// The in-millions column is derived first when absent. Rendering failures
/// propagate; there is no recovery behavior here.
pub fn render_population_chart(batch: &RecordBatch, out_path: &Path) -> Result<()> {
    let batch = derive_millions(batch)?;
    let points = population_series(&batch)?;
    if points.is_empty() {
        bail!("no complete year/population rows to plot");
    }

    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).fold(0.0f64, f64::max);

    let root = BitMapBackend::new(out_path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CAPTION, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(56)
        .y_label_area_size(72)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.05)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_label_style(("sans-serif", 14).into_font().transform(FontTransform::Rotate90))
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;
    root.present()?;

    info!("wrote population chart to {}", out_path.display());
    Ok(())
}

/// Pull the (year, millions) pairs out of `batch`, dropping rows where
/// either side is null.
fn population_series(batch: &RecordBatch) -> Result<Vec<(i32, f64)>> {
    let schema = batch.schema();

    let year_idx = schema
        .fields()
        .iter()
        .position(|f| f.name().eq_ignore_ascii_case(X_LABEL))
        .ok_or_else(|| anyhow!("no year column in the dataset"))?;
    let millions_idx = schema
        .fields()
        .iter()
        .position(|f| f.name().contains("(in millions)"))
        .ok_or_else(|| anyhow!("no population-in-millions column in the dataset"))?;

    let years = compute::cast(batch.column(year_idx).as_ref(), &DataType::Int32)?;
    let years = years
        .as_any()
        .downcast_ref::<Int32Array>()
        .ok_or_else(|| anyhow!("expected an Int32 array after cast"))?;
    let millions = compute::cast(batch.column(millions_idx).as_ref(), &DataType::Float64)?;
    let millions = millions
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| anyhow!("expected a Float64 array after cast"))?;

    Ok(years
        .iter()
        .zip(millions.iter())
        .filter_map(|(y, m)| Some((y?, m?)))
        .collect())
}
