// src/plot_functions/plot_box.rs

use crate::data_analysis::quartiles::box_stats;
use crate::data_input::data_table::DataTable;
use crate::plot_framework::{PreparedPlot, SeriesDraw, TickSet};
use crate::plot_spec::PlotSpec;
use crate::types::PlotResult;

/// One box per selected column at positions 1, 2, ..., n. Column labels
/// (or the `labels` override) become the tick labels.
pub fn prepare_box_plot(spec: &PlotSpec, table: &DataTable, slot: usize) -> PlotResult<PreparedPlot> {
    let resolved = spec.resolve(table)?;
    let mut plot = PreparedPlot::new(spec, &resolved, slot);
    let width = spec.width;

    let mut positions = Vec::with_capacity(resolved.cols.len());
    for (series_idx, &col) in resolved.cols.iter().enumerate() {
        let x = (series_idx + 1) as f64;
        positions.push(x);
        plot.include_x(x - width);
        plot.include_x(x + width);

        let values: Vec<f64> = table
            .numeric_column(col)?
            .into_iter()
            .flatten()
            .collect();
        let Some(stats) = box_stats(&values) else {
            println!(
                "  INFO: Column '{}' has no numeric data, skipping its box.",
                resolved.columns[series_idx]
            );
            continue;
        };

        plot.include_y(stats.whisker_low);
        plot.include_y(stats.whisker_high);
        for &outlier in &stats.outliers {
            plot.include_y(outlier);
        }
        plot.series.push(SeriesDraw::BoxGlyph { x, width, stats });
    }

    plot.x_ticks = Some(TickSet {
        positions,
        labels: resolved.labels.clone(),
    });

    Ok(plot)
}
