// src/plot_functions/plot_bars.rs

use crate::data_analysis::bar_layout::{grouped_positions, grouped_tick_positions};
use crate::data_input::data_table::DataTable;
use crate::plot_framework::{Glyph, LegendEntry, PreparedPlot, SeriesDraw, TickSet};
use crate::plot_spec::{ErrorBarMode, PlotSpec};
use crate::types::PlotResult;

/// Grouped bars: one bar per (row, series), rows keyed by the index
/// column's text, series side by side within each row block.
pub fn prepare_bar_plot(spec: &PlotSpec, table: &DataTable, slot: usize) -> PlotResult<PreparedPlot> {
    let resolved = spec.resolve(table)?;
    let mut plot = PreparedPlot::new(spec, &resolved, slot);

    let row_labels = table.label_column(spec.index[0])?;
    let n_rows = table.n_rows();
    let n_series = resolved.cols.len();
    let width = spec.width;

    for (series_idx, (&col, label)) in resolved.cols.iter().zip(&resolved.labels).enumerate() {
        let style = resolved.cycle.style_for(series_idx);
        let values = table.numeric_array(col)?;
        let positions = grouped_positions(n_rows, n_series, series_idx as f64, width);

        let deviations = error_deviations(spec, &resolved.ecols, series_idx, table)?;

        let mut bars = Vec::with_capacity(n_rows);
        let mut error_points = Vec::new();
        for row in 0..n_rows {
            let center = positions[row];
            plot.include_x(center - width / 2.0);
            plot.include_x(center + width / 2.0);
            let value = values[row];
            bars.push((center, value));
            if !value.is_finite() {
                continue;
            }
            plot.include_y(value);
            if let Some((lower, upper)) = &deviations {
                let low_dev = lower[row].unwrap_or(0.0);
                let high_dev = upper[row].unwrap_or(0.0);
                error_points.push((center, value - low_dev, value, value + high_dev));
                plot.include_y(value - low_dev);
                plot.include_y(value + high_dev);
            }
        }

        plot.series.push(SeriesDraw::Bars {
            bars,
            width,
            color: style.color,
            hatch: style.hatch,
        });
        if !error_points.is_empty() {
            plot.series.push(SeriesDraw::ErrorBars {
                points: error_points,
                color: style.color,
                width: spec.elinewidth,
            });
        }
        plot.legend.push(LegendEntry {
            label: label.clone(),
            color: style.color,
            glyph: Glyph::Patch,
        });
    }

    plot.include_y(0.0);
    plot.x_ticks = Some(TickSet {
        positions: grouped_tick_positions(n_rows, n_series, width),
        labels: row_labels,
    });

    Ok(plot)
}

type DeviationPair = (Vec<Option<f64>>, Vec<Option<f64>>);

/// Per-row (lower, upper) error deviations for one value column. In `both`
/// mode columns come in (lower, upper) pairs; `min` and `max` modes are
/// one-sided.
fn error_deviations(
    spec: &PlotSpec,
    ecols: &[usize],
    series_idx: usize,
    table: &DataTable,
) -> PlotResult<Option<DeviationPair>> {
    if ecols.is_empty() {
        return Ok(None);
    }
    let zeros = vec![Some(0.0); table.n_rows()];
    let pair = match spec.errorbars {
        ErrorBarMode::Both => {
            let lower = table.numeric_column(ecols[2 * series_idx])?;
            let upper = table.numeric_column(ecols[2 * series_idx + 1])?;
            (lower, upper)
        }
        ErrorBarMode::Min => {
            let lower = table.numeric_column(ecols[series_idx])?;
            (lower, zeros)
        }
        ErrorBarMode::Max => {
            let upper = table.numeric_column(ecols[series_idx])?;
            (zeros, upper)
        }
    };
    Ok(Some(pair))
}
