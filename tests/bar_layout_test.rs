// tests/bar_layout_test.rs
//
// Bar positioning contracts, exercised end to end through the prepare
// functions on real CSV input.

use csvplot::data_input::data_table::DataTable;
use csvplot::plot_framework::{compute_slot_ranges, equalize_axes, AxisSel, SeriesDraw};
use csvplot::plot_functions::prepare_plot;
use csvplot::plot_spec::PlotSpec;
use std::path::PathBuf;

fn write_csv(name: &str, content: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("csvplot_{}_{}.csv", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

fn spec(yaml: &str) -> PlotSpec {
    PlotSpec::from_value(&serde_yaml::from_str(yaml).unwrap()).unwrap()
}

fn bar_series(plot: &csvplot::plot_framework::PreparedPlot) -> Vec<(Vec<(f64, f64)>, f64)> {
    plot.series
        .iter()
        .filter_map(|s| match s {
            SeriesDraw::Bars { bars, width, .. } => Some((bars.clone(), *width)),
            _ => None,
        })
        .collect()
}

#[test]
fn grouped_bar_centers_follow_the_block_formula() {
    let path = write_csv("grouped", "name,v1,v2\nA,1,2\nB,3,4\n");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: bars, datafile: {}, index: 0}}",
        path.display()
    ));
    let plot = prepare_plot(&description, &table, 0).unwrap();

    // Two series of width 1: block stride = 1*2 + 0.5 = 2.5.
    let bars = bar_series(&plot);
    assert_eq!(bars.len(), 2);
    let centers0: Vec<f64> = bars[0].0.iter().map(|&(c, _)| c).collect();
    let centers1: Vec<f64> = bars[1].0.iter().map(|&(c, _)| c).collect();
    assert_eq!(centers0, vec![0.0, 2.5]);
    assert_eq!(centers1, vec![1.0, 3.5]);

    // Ticks sit mid-block, labelled with the index column.
    let ticks = plot.x_ticks.as_ref().unwrap();
    assert_eq!(ticks.positions, vec![0.5, 3.0]);
    assert_eq!(ticks.labels, vec!["A", "B"]);
}

#[test]
fn stacked_bars_hold_cumulative_sums_drawn_in_reverse() {
    let path = write_csv("stacked", "name,v1,v2\nA,1,2\nB,3,4\n");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: sb, datafile: {}, index: 0}}",
        path.display()
    ));
    let plot = prepare_plot(&description, &table, 0).unwrap();

    let bars = bar_series(&plot);
    assert_eq!(bars.len(), 2);
    // First drawn series is the last column's cumulative sum; column 0 is
    // painted last, on top.
    let topmost: Vec<f64> = bars[0].0.iter().map(|&(_, v)| v).collect();
    let painted_last: Vec<f64> = bars[1].0.iter().map(|&(_, v)| v).collect();
    assert_eq!(topmost, vec![3.0, 7.0]);
    assert_eq!(painted_last, vec![1.0, 3.0]);

    // One bar per row at stride 1.5 * width.
    let centers: Vec<f64> = bars[0].0.iter().map(|&(c, _)| c).collect();
    assert_eq!(centers, vec![0.5, 2.0]);
}

#[test]
fn multi_indexed_bars_open_gaps_at_level_changes() {
    let path = write_csv(
        "mibars",
        "outer,inner,v\nA,x,1\nA,y,2\nB,x,3\nB,y,4\n",
    );
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: mibars, datafile: {}, index: [0, 1]}}",
        path.display()
    ));
    let plot = prepare_plot(&description, &table, 0).unwrap();

    let bars = bar_series(&plot);
    let centers: Vec<f64> = bars[0].0.iter().map(|&(c, _)| c).collect();
    // Inner level adds 0.5 per change, outer level adds 2.25 at the A->B
    // boundary, plus one width per row.
    assert_eq!(centers, vec![0.0, 1.5, 5.25, 6.75]);

    // Inner labels at the regular ticks, outer labels on the second row.
    let inner = plot.x_ticks.as_ref().unwrap();
    assert_eq!(inner.labels, vec!["x", "y", "x", "y"]);
    let outer = plot.outer_ticks.as_ref().unwrap();
    assert_eq!(outer.labels, vec!["A", "B"]);
    assert_eq!(outer.positions, vec![0.75, 6.0]);
}

#[test]
fn bar_ranges_include_zero_and_equalize_idempotently() {
    let path = write_csv("ranges", "name,v1\nA,5\nB,7\n");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: bars, datafile: {}, index: 0}}",
        path.display()
    ));
    let plot = prepare_plot(&description, &table, 0).unwrap();
    let other = {
        let mut p = prepare_plot(&description, &table, 1).unwrap();
        p.spec.ymin = Some(-3.0);
        p
    };

    let mut ranges = compute_slot_ranges(2, &[plot, other]);
    assert_eq!(ranges[0].y.unwrap(), (0.0, 7.0));
    assert_eq!(ranges[1].y.unwrap(), (-3.0, 7.0));

    equalize_axes(&mut ranges, &[vec![0, 1]], AxisSel::Y).unwrap();
    assert_eq!(ranges[0].y.unwrap(), (-3.0, 7.0));
    let snapshot = ranges[0].y;
    equalize_axes(&mut ranges, &[vec![0, 1]], AxisSel::Y).unwrap();
    assert_eq!(ranges[0].y, snapshot);
}

#[test]
fn bar_error_columns_extend_the_y_range() {
    let path = write_csv("errors", "name,v,emin,emax\nA,5,1,2\nB,7,1,1\n");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: bars, datafile: {}, index: 0, cols: [1], ecols: [2, 3], errorbars: both}}",
        path.display()
    ));
    let plot = prepare_plot(&description, &table, 0).unwrap();

    let error_series: Vec<_> = plot
        .series
        .iter()
        .filter_map(|s| match s {
            SeriesDraw::ErrorBars { points, .. } => Some(points.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(error_series.len(), 1);
    assert_eq!(error_series[0][0], (0.0, 4.0, 5.0, 7.0));

    let ranges = compute_slot_ranges(1, &[plot]);
    assert_eq!(ranges[0].y.unwrap(), (0.0, 8.0));
}
