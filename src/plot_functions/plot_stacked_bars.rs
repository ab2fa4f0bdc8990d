// src/plot_functions/plot_stacked_bars.rs

use crate::data_analysis::bar_layout::{cumulative_columns, stacked_positions};
use crate::data_input::data_table::DataTable;
use crate::plot_framework::{Glyph, LegendEntry, PreparedPlot, SeriesDraw, TickSet};
use crate::plot_spec::PlotSpec;
use crate::types::PlotResult;
use ndarray::Array2;
use ndarray_stats::QuantileExt;

/// Stacked bars: one bar per row holding the cumulative sum of the
/// selected columns, drawn in reverse column order so column 0 is painted
/// last, on top of the taller cumulative bars behind it.
pub fn prepare_stacked_bar_plot(
    spec: &PlotSpec,
    table: &DataTable,
    slot: usize,
) -> PlotResult<PreparedPlot> {
    let resolved = spec.resolve(table)?;
    let mut plot = PreparedPlot::new(spec, &resolved, slot);

    let row_labels = table.label_column(spec.index[0])?;
    let n_rows = table.n_rows();
    let n_series = resolved.cols.len();
    let width = spec.width;

    let mut values = Array2::<f64>::zeros((n_rows, n_series));
    for (c, &col) in resolved.cols.iter().enumerate() {
        let column = table.numeric_column(col)?;
        for (r, &cell) in column.iter().enumerate() {
            values[(r, c)] = cell.unwrap_or(0.0);
        }
    }
    cumulative_columns(&mut values);

    let positions = stacked_positions(n_rows, width);
    for &position in &positions {
        plot.include_x(position - width / 2.0);
        plot.include_x(position + width / 2.0);
    }

    // The cumulative matrix has no NaNs left, so the extremes are direct.
    if let (Ok(&lo), Ok(&hi)) = (values.min(), values.max()) {
        plot.include_y(lo);
        plot.include_y(hi);
    }

    for series_idx in (0..n_series).rev() {
        let style = resolved.cycle.style_for(series_idx);
        let bars: Vec<(f64, f64)> = positions
            .iter()
            .enumerate()
            .map(|(row, &center)| (center, values[(row, series_idx)]))
            .collect();
        plot.series.push(SeriesDraw::Bars {
            bars,
            width,
            color: style.color,
            hatch: style.hatch,
        });
        // Legend entries follow the draw order, so the reversal shows in
        // the legend exactly as the paint order does.
        plot.legend.push(LegendEntry {
            label: resolved.labels[series_idx].clone(),
            color: style.color,
            glyph: Glyph::Patch,
        });
    }

    plot.include_y(0.0);
    plot.x_ticks = Some(TickSet {
        positions,
        labels: row_labels,
    });

    Ok(plot)
}
