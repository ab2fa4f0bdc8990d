// src/plot_functions/plot_line.rs

use crate::data_input::data_table::DataTable;
use crate::plot_framework::{Glyph, LegendEntry, PreparedPlot, SeriesDraw};
use crate::plot_spec::PlotSpec;
use crate::types::PlotResult;

/// Line-family plots: plain, dashed, marked and dashed-marked lines, with
/// optional symmetric error columns. Rows with a missing index, value or
/// error cell are dropped per series.
pub fn prepare_line_plot(spec: &PlotSpec, table: &DataTable, slot: usize) -> PlotResult<PreparedPlot> {
    let resolved = spec.resolve(table)?;
    let mut plot = PreparedPlot::new(spec, &resolved, slot);
    let x = table.numeric_column(spec.index[0])?;

    for (series_idx, (&col, label)) in resolved.cols.iter().zip(&resolved.labels).enumerate() {
        let style = resolved.cycle.style_for(series_idx);
        let y = table.numeric_column(col)?;
        let errors = match resolved.ecols.get(series_idx) {
            Some(&ecol) => Some(table.numeric_column(ecol)?),
            None => None,
        };

        let mut points: Vec<(f64, f64)> = Vec::new();
        let mut error_points = Vec::new();
        for row in 0..table.n_rows() {
            let (Some(xv), Some(yv)) = (x[row], y[row]) else {
                continue;
            };
            match &errors {
                Some(error_column) => {
                    let Some(ev) = error_column[row] else {
                        continue;
                    };
                    points.push((xv, yv));
                    error_points.push((xv, yv - ev, yv, yv + ev));
                    plot.include_point(xv, yv - ev);
                    plot.include_point(xv, yv + ev);
                }
                None => {
                    points.push((xv, yv));
                    plot.include_point(xv, yv);
                }
            }
        }

        if let Some(shape) = style.marker {
            let marked: Vec<(f64, f64)> =
                points.iter().copied().step_by(style.mark_every).collect();
            plot.series.push(SeriesDraw::Markers {
                points: marked,
                color: style.color,
                shape,
                size: style.marker_size,
            });
        }
        plot.series.push(SeriesDraw::Line {
            points,
            color: style.color,
            width: style.line_width,
            dash: style.dash,
        });
        if !error_points.is_empty() {
            plot.series.push(SeriesDraw::ErrorBars {
                points: error_points,
                color: style.color,
                width: style.err_line_width,
            });
        }

        plot.legend.push(LegendEntry {
            label: label.clone(),
            color: style.color,
            glyph: Glyph::Line,
        });
    }

    Ok(plot)
}
