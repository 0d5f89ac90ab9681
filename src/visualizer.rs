// SVG charts for the quarterly summary and the index/amount scatter
use crate::analyzer::QuarterlySummary;
use crate::model::PipelineError;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const QUARTERLY_CHART: &str = "quarterly_transactions.svg";
pub const SCATTER_CHART: &str = "index_vs_amount.svg";

type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Renders both charts into `dir` and returns the files written.
/// A chart with no data to show is skipped.
pub fn render_charts(
    summary: &[QuarterlySummary],
    points: &[(f64, f64)],
    dir: &Path,
) -> Result<Vec<PathBuf>, PipelineError> {
    fs::create_dir_all(dir).map_err(|e| PipelineError::Chart(e.to_string()))?;
    let mut written = Vec::new();

    if summary.is_empty() {
        warn!("No dated transactions; skipping quarterly chart");
    } else {
        let path = dir.join(QUARTERLY_CHART);
        draw_quarterly(summary, &path).map_err(|e| PipelineError::Chart(e.to_string()))?;
        info!("Quarterly chart written to {}", path.display());
        written.push(path);
    }

    if points.is_empty() {
        warn!("No rows with both index value and amount; skipping scatter chart");
    } else {
        let path = dir.join(SCATTER_CHART);
        draw_scatter(points, &path).map_err(|e| PipelineError::Chart(e.to_string()))?;
        info!("Scatter chart written to {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Bars for the transaction count (left axis), line for the mean amount
/// (right axis), one slot per quarter.
fn draw_quarterly(summary: &[QuarterlySummary], path: &Path) -> DrawResult {
    let root = SVGBackend::new(path, (1500, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = summary.iter().map(|q| q.quarter.to_string()).collect();
    let slots = -0.5..summary.len() as f64 - 0.5;
    let max_count = summary
        .iter()
        .map(|q| q.transaction_count)
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let means: Vec<f64> = summary.iter().filter_map(|q| q.mean_amount).collect();
    let (mean_lo, mean_hi) = padded_range(&means);

    let mut chart = ChartBuilder::on(&root)
        .caption("Transactions and mean amount per quarter", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .right_y_label_area_size(90)
        .build_cartesian_2d(slots.clone(), 0.0..max_count * 1.1)?
        .set_secondary_coord(slots, mean_lo..mean_hi);

    chart
        .configure_mesh()
        .x_labels(labels.len() + 1)
        .x_label_formatter(&|x: &f64| slot_label(&labels, *x))
        .x_desc("Quarter")
        .y_desc("Transactions")
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Mean amount")
        .draw()?;

    chart
        .draw_series(summary.iter().enumerate().map(|(i, q)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.35, 0.0), (x + 0.35, q.transaction_count as f64)],
                BLUE.mix(0.5).filled(),
            )
        }))?
        .label("Transactions")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.mix(0.5).filled()));

    let line: Vec<(f64, f64)> = summary
        .iter()
        .enumerate()
        .filter_map(|(i, q)| q.mean_amount.map(|m| (i as f64, m)))
        .collect();

    chart
        .draw_secondary_series(LineSeries::new(line.iter().copied(), RED.stroke_width(2)))?
        .label("Mean amount")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED.stroke_width(2)));
    chart.draw_secondary_series(
        line.iter()
            .map(|&(x, y)| Circle::new((x, y), 4, RED.filled())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// One point per integrated row, unaggregated.
fn draw_scatter(points: &[(f64, f64)], path: &Path) -> DrawResult {
    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (x_lo, x_hi) = padded_range(&xs);
    let (y_lo, y_hi) = padded_range(&ys);

    let mut chart = ChartBuilder::on(&root)
        .caption("Price index vs transaction amount", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("IPCA index value")
        .y_desc("Transaction amount")
        .draw()?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.5).filled())),
        )?
        .label("Transactions")
        .legend(|(x, y)| Circle::new((x + 5, y), 3, BLUE.mix(0.5).filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn slot_label(labels: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

/// Axis range covering `values` with a 10% margin; never empty.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span < 1e-9 {
        let pad = if lo.abs() > 1e-9 { lo.abs() * 0.1 } else { 1.0 };
        return (lo - pad, hi + pad);
    }
    (lo - span * 0.1, hi + span * 0.1)
}
