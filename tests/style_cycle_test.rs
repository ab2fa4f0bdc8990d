// tests/style_cycle_test.rs
//
// Palette precedence and style cycling, resolved against a real table.

use csvplot::constants::DEFAULT_PALETTE;
use csvplot::data_input::data_table::DataTable;
use csvplot::plot_spec::PlotSpec;
use plotters::style::RGBColor;
use std::path::PathBuf;

fn write_csv(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("csvplot_style_{}_{}.csv", name, std::process::id()));
    std::fs::write(&path, "x,a,b,c\n0,1,2,3\n1,2,3,4\n").unwrap();
    path
}

fn spec(yaml: &str) -> PlotSpec {
    PlotSpec::from_value(&serde_yaml::from_str(yaml).unwrap()).unwrap()
}

#[test]
fn default_palette_applies_without_colormap() {
    let path = write_csv("default");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: line, datafile: {}, index: 0}}",
        path.display()
    ));
    let resolved = description.resolve(&table).unwrap();

    assert_eq!(resolved.palette, DEFAULT_PALETTE.to_vec());
    assert_eq!(resolved.colors, DEFAULT_PALETTE.to_vec());
    // cols default to everything but the index.
    assert_eq!(resolved.cols, vec![1, 2, 3]);
    assert_eq!(resolved.labels, vec!["a", "b", "c"]);
}

#[test]
fn colormap_palette_sizes_to_numcolors() {
    let path = write_csv("colormap");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: line, datafile: {}, index: 0, colormap: viridis, numcolors: 5}}",
        path.display()
    ));
    let resolved = description.resolve(&table).unwrap();
    assert_eq!(resolved.palette.len(), 5);
    // Sampled ends of the gradient differ.
    assert_ne!(resolved.palette[0], resolved.palette[4]);
}

#[test]
fn positional_tokens_resolve_against_the_palette_in_effect() {
    let path = write_csv("tokens");
    let table = DataTable::read(&path).unwrap();

    let description = spec(&format!(
        "{{kind: line, datafile: {}, index: 0, color: [d2, ~, '#102030']}}",
        path.display()
    ));
    let resolved = description.resolve(&table).unwrap();
    assert_eq!(resolved.colors[0], DEFAULT_PALETTE[2]);
    assert_eq!(resolved.colors[1], DEFAULT_PALETTE[1]);
    assert_eq!(resolved.colors[2], RGBColor(0x10, 0x20, 0x30));

    // With a colormap, dN picks from the sampled palette instead.
    let description = spec(&format!(
        "{{kind: line, datafile: {}, index: 0, colormap: greys, color: [d2]}}",
        path.display()
    ));
    let resolved = description.resolve(&table).unwrap();
    assert_eq!(resolved.colors[0], resolved.palette[2]);

    // Out-of-range token fails at resolution time.
    let description = spec(&format!(
        "{{kind: line, datafile: {}, index: 0, color: [d99]}}",
        path.display()
    ));
    assert!(description.resolve(&table).is_err());
}

#[test]
fn reference_line_tokens_use_the_final_colors() {
    let path = write_csv("reflines");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: line, datafile: {}, index: 0, color: ['#010203'], hl: [1, {{color: d0}}]}}",
        path.display()
    ));
    let resolved = description.resolve(&table).unwrap();
    // d0 on a reference line follows the override, not the base palette.
    assert_eq!(resolved.hl[0].1, RGBColor(1, 2, 3));
}

#[test]
fn cycle_respects_starting_style() {
    let path = write_csv("cycle");
    let table = DataTable::read(&path).unwrap();
    let description = spec(&format!(
        "{{kind: ml, datafile: {}, index: 0, starting_style: 2}}",
        path.display()
    ));
    let resolved = description.resolve(&table).unwrap();

    let first = resolved.cycle.style_for(0);
    assert_eq!(first.color, DEFAULT_PALETTE[2]);
    // Marker list has three entries, so series 0 with offset 2 wraps to
    // the last one; series 1 wraps around to the first.
    assert_eq!(first.marker, resolved.cycle.style_for(3).marker);

    let label_mismatch = spec(&format!(
        "{{kind: line, datafile: {}, index: 0, cols: [1, 2], labels: [only-one]}}",
        path.display()
    ));
    let err = label_mismatch.resolve(&table).unwrap_err().to_string();
    assert!(err.contains("The number of labels(1) and columns(2) is different"));
}

#[test]
fn error_column_counts_are_checked_per_kind() {
    let path = write_csv("ecols");
    let table = DataTable::read(&path).unwrap();

    let line = spec(&format!(
        "{{kind: line, datafile: {}, index: 0, cols: [1, 2], ecols: [3]}}",
        path.display()
    ));
    assert!(line.resolve(&table).is_err());

    let bars_both = spec(&format!(
        "{{kind: bars, datafile: {}, index: 0, cols: [1], ecols: [2, 3]}}",
        path.display()
    ));
    assert!(bars_both.resolve(&table).is_ok());

    let bars_min = spec(&format!(
        "{{kind: bars, datafile: {}, index: 0, cols: [1], ecols: [2, 3], errorbars: min}}",
        path.display()
    ));
    assert!(bars_min.resolve(&table).is_err());
}
