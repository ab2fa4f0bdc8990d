// src/plot_functions/plot_area.rs

use crate::constants::AREA_FILL_ALPHA;
use crate::data_analysis::bar_layout::cumulative_columns;
use crate::data_input::data_table::DataTable;
use crate::plot_framework::{Glyph, LegendEntry, PreparedPlot, SeriesDraw};
use crate::plot_spec::{PlotKind, PlotSpec};
use crate::types::PlotResult;
use ndarray::Array2;

/// Area plots fill each series down to the zero baseline with a
/// translucent color. Stacked areas draw the cumulative curves back to
/// front with opaque fills, so each band reads as one column's share.
pub fn prepare_area_plot(spec: &PlotSpec, table: &DataTable, slot: usize) -> PlotResult<PreparedPlot> {
    let resolved = spec.resolve(table)?;
    let mut plot = PreparedPlot::new(spec, &resolved, slot);
    let x = table.numeric_column(spec.index[0])?;
    let border_width = spec.linewidth.unwrap_or(0);

    if spec.kind == PlotKind::StackedArea {
        // Rows without an index value drop out entirely; missing cells
        // stack as zero.
        let rows: Vec<(usize, f64)> = x
            .iter()
            .enumerate()
            .filter_map(|(r, &xv)| xv.map(|v| (r, v)))
            .collect();
        let mut values = Array2::<f64>::zeros((rows.len(), resolved.cols.len()));
        for (c, &col) in resolved.cols.iter().enumerate() {
            let column = table.numeric_column(col)?;
            for (r, &(row, _)) in rows.iter().enumerate() {
                values[(r, c)] = column[row].unwrap_or(0.0);
            }
        }
        cumulative_columns(&mut values);

        for series_idx in (0..resolved.cols.len()).rev() {
            let style = resolved.cycle.style_for(series_idx);
            let points: Vec<(f64, f64)> = rows
                .iter()
                .enumerate()
                .map(|(r, &(_, xv))| (xv, values[(r, series_idx)]))
                .collect();
            for &(xv, yv) in &points {
                plot.include_point(xv, yv);
            }
            plot.series.push(SeriesDraw::Area {
                points,
                color: style.color,
                alpha: 1.0,
                border_width,
            });
        }
        plot.include_y(0.0);

        // Legend reads in column order even though the fills draw reversed.
        for (series_idx, label) in resolved.labels.iter().enumerate() {
            plot.legend.push(LegendEntry {
                label: label.clone(),
                color: resolved.cycle.style_for(series_idx).color,
                glyph: Glyph::Patch,
            });
        }
        return Ok(plot);
    }

    for (series_idx, (&col, label)) in resolved.cols.iter().zip(&resolved.labels).enumerate() {
        let style = resolved.cycle.style_for(series_idx);
        let y = table.numeric_column(col)?;
        let mut points: Vec<(f64, f64)> = Vec::new();
        for row in 0..table.n_rows() {
            if let (Some(xv), Some(yv)) = (x[row], y[row]) {
                points.push((xv, yv));
                plot.include_point(xv, yv);
            }
        }
        plot.series.push(SeriesDraw::Area {
            points,
            color: style.color,
            alpha: AREA_FILL_ALPHA,
            border_width,
        });
        plot.legend.push(LegendEntry {
            label: label.clone(),
            color: style.color,
            glyph: Glyph::Patch,
        });
    }
    plot.include_y(0.0);

    Ok(plot)
}
