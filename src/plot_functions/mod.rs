// src/plot_functions/mod.rs

pub mod plot_area;
pub mod plot_bars;
pub mod plot_box;
pub mod plot_line;
pub mod plot_multiindexed_bars;
pub mod plot_scatter;
pub mod plot_stacked_bars;

use crate::data_input::data_table::DataTable;
use crate::plot_framework::PreparedPlot;
use crate::plot_spec::{PlotKind, PlotSpec};
use crate::types::PlotResult;

/// Turn one validated description plus its data table into drawable series.
pub fn prepare_plot(spec: &PlotSpec, table: &DataTable, slot: usize) -> PlotResult<PreparedPlot> {
    match spec.kind {
        PlotKind::Scatter => plot_scatter::prepare_scatter_plot(spec, table, slot),
        PlotKind::Area | PlotKind::StackedArea => plot_area::prepare_area_plot(spec, table, slot),
        PlotKind::Bars => plot_bars::prepare_bar_plot(spec, table, slot),
        PlotKind::StackedBars => {
            plot_stacked_bars::prepare_stacked_bar_plot(spec, table, slot)
        }
        PlotKind::MultiIndexBars => {
            plot_multiindexed_bars::prepare_multiindexed_bar_plot(spec, table, slot)
        }
        PlotKind::Box => plot_box::prepare_box_plot(spec, table, slot),
        _ => plot_line::prepare_line_plot(spec, table, slot),
    }
}
