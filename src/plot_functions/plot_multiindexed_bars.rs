// src/plot_functions/plot_multiindexed_bars.rs

use crate::data_analysis::bar_layout::{
    cumulative_columns, factorize, level_segment_starts, level_tick_positions,
    multi_index_positions,
};
use crate::data_input::data_table::DataTable;
use crate::plot_framework::{Glyph, LegendEntry, PreparedPlot, SeriesDraw, TickSet};
use crate::plot_spec::PlotSpec;
use crate::types::PlotResult;
use ndarray::Array2;
use ndarray_stats::QuantileExt;

/// Stacked bars grouped by two nested index levels. Extra space opens up
/// wherever a level's value changes; the inner level labels the regular
/// tick row and the outer level labels a second row further down.
pub fn prepare_multiindexed_bar_plot(
    spec: &PlotSpec,
    table: &DataTable,
    slot: usize,
) -> PlotResult<PreparedPlot> {
    let resolved = spec.resolve(table)?;
    let mut plot = PreparedPlot::new(spec, &resolved, slot);

    let outer_labels = table.label_column(spec.index[0])?;
    let inner_labels = table.label_column(spec.index[1])?;
    let outer_codes = factorize(&outer_labels);
    let inner_codes = factorize(&inner_labels);

    let n_rows = table.n_rows();
    let n_series = resolved.cols.len();
    let width = spec.width;

    let positions = multi_index_positions(&[outer_codes.clone(), inner_codes.clone()], width);
    for &position in &positions {
        plot.include_x(position - width / 2.0);
        plot.include_x(position + width / 2.0);
    }

    let mut values = Array2::<f64>::zeros((n_rows, n_series));
    for (c, &col) in resolved.cols.iter().enumerate() {
        let column = table.numeric_column(col)?;
        for (r, &cell) in column.iter().enumerate() {
            values[(r, c)] = cell.unwrap_or(0.0);
        }
    }
    cumulative_columns(&mut values);

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
        plot.legend.push(LegendEntry {
            label: resolved.labels[series_idx].clone(),
            color: style.color,
            glyph: Glyph::Patch,
        });
    }
    plot.include_y(0.0);

    plot.x_ticks = Some(TickSet {
        positions: level_tick_positions(&inner_codes, &positions),
        labels: level_segment_starts(&inner_codes)
            .into_iter()
            .map(|row| inner_labels[row].clone())
            .collect(),
    });
    plot.outer_ticks = Some(TickSet {
        positions: level_tick_positions(&outer_codes, &positions),
        labels: level_segment_starts(&outer_codes)
            .into_iter()
            .map(|row| outer_labels[row].clone())
            .collect(),
    });

    Ok(plot)
}
