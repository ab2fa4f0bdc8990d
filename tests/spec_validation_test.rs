// tests/spec_validation_test.rs
//
// Description parsing: recognized options per kind, base merging, and the
// fail-fast validation errors.

use csvplot::plot_spec::{merge_values, PlotKind, PlotSpec};
use serde_yaml::Value;

fn parse(yaml: &str) -> Result<PlotSpec, String> {
    let value: Value = serde_yaml::from_str(yaml).unwrap();
    PlotSpec::from_value(&value).map_err(|e| e.to_string())
}

#[test]
fn kind_aliases_resolve() {
    assert_eq!(
        parse("{kind: l, datafile: d.csv, index: 0}").unwrap().kind,
        PlotKind::Line
    );
    assert_eq!(
        parse("{kind: sb, datafile: d.csv, index: 0}").unwrap().kind,
        PlotKind::StackedBars
    );
    assert_eq!(
        parse("{kind: mdl, datafile: d.csv, index: 0}").unwrap().kind,
        PlotKind::DashedMarkedLine
    );
    assert_eq!(
        parse("{kind: sa, datafile: d.csv, index: 0}").unwrap().kind,
        PlotKind::StackedArea
    );
}

#[test]
fn unknown_kind_is_rejected() {
    let err = parse("{kind: pie, datafile: d.csv, index: 0}").unwrap_err();
    assert!(err.contains("Plot kind 'pie' is not valid"));
}

#[test]
fn unknown_keys_are_rejected_per_kind() {
    let err = parse("{kind: line, datafile: d.csv, index: 0, frobnicate: 1}").unwrap_err();
    assert!(err.contains("'frobnicate' is not a valid keyword"));

    // 'hatch' exists, but only for bar kinds.
    let err = parse("{kind: line, datafile: d.csv, index: 0, hatch: ['/']}").unwrap_err();
    assert!(err.contains("'hatch' is not a valid keyword for a line plot"));

    // 'linestyle' exists, but not for bars.
    let err = parse("{kind: bars, datafile: d.csv, index: 0, linestyle: ['-']}").unwrap_err();
    assert!(err.contains("'linestyle' is not a valid keyword for a bars plot"));
}

#[test]
fn index_is_required_and_must_not_be_plotted() {
    let err = parse("{kind: line, datafile: d.csv}").unwrap_err();
    assert!(err.contains("provide an index"));

    let err = parse("{kind: line, datafile: d.csv, index: 0, cols: [0, 1]}").unwrap_err();
    assert!(err.contains("trying to plot the index"));
}

#[test]
fn mibars_need_exactly_two_index_levels() {
    let err = parse("{kind: mibars, datafile: d.csv, index: 0}").unwrap_err();
    assert!(err.contains("two-level index"));

    let err = parse("{kind: line, datafile: d.csv, index: [0, 1]}").unwrap_err();
    assert!(err.contains("only valid for mibars"));

    assert!(parse("{kind: mibars, datafile: d.csv, index: [0, 1]}").is_ok());
}

#[test]
fn enumerated_options_are_validated() {
    let err =
        parse("{kind: bars, datafile: d.csv, index: 0, errorbars: sideways}").unwrap_err();
    assert!(err.contains("'errorbars' allowed values are 'max', 'min' or 'both'"));

    let err = parse("{kind: line, datafile: d.csv, index: 0, xrot: 33}").unwrap_err();
    assert!(err.contains("xrot"));

    let err = parse(
        "{kind: line, datafile: d.csv, index: 0, legend_options: {loc: somewhere}}",
    )
    .unwrap_err();
    assert!(err.contains("Legend location"));
}

#[test]
fn color_must_be_a_list() {
    let err = parse("{kind: line, datafile: d.csv, index: 0, color: red}").unwrap_err();
    assert!(err.contains("list of color tokens"));

    let ok = parse("{kind: line, datafile: d.csv, index: 0, color: [red, ~, d1]}").unwrap();
    let colors = ok.color.unwrap();
    assert_eq!(colors[0].as_deref(), Some("red"));
    assert_eq!(colors[1], None);
    assert_eq!(colors[2].as_deref(), Some("d1"));
}

#[test]
fn dashed_and_marked_kinds_fill_cycle_defaults() {
    let plain = parse("{kind: line, datafile: d.csv, index: 0}").unwrap();
    assert!(plain.linestyle.is_none());
    assert!(plain.marker.is_none());

    let dashed = parse("{kind: dl, datafile: d.csv, index: 0}").unwrap();
    assert_eq!(dashed.linestyle.as_ref().unwrap().len(), 4);

    let marked = parse("{kind: ml, datafile: d.csv, index: 0}").unwrap();
    assert_eq!(marked.marker.as_ref().unwrap().len(), 3);
}

#[test]
fn reference_lines_accept_all_three_shapes() {
    let one = parse("{kind: line, datafile: d.csv, index: 0, hl: 3.5}").unwrap();
    assert_eq!(one.hl.len(), 1);
    assert_eq!(one.hl[0].value, 3.5);

    let styled =
        parse("{kind: line, datafile: d.csv, index: 0, hl: [2, {color: d0, lw: 3}]}").unwrap();
    assert_eq!(styled.hl.len(), 1);
    assert_eq!(styled.hl[0].color.as_deref(), Some("d0"));
    assert_eq!(styled.hl[0].width, 3);

    let many =
        parse("{kind: line, datafile: d.csv, index: 0, vl: [1, [2, {color: k}], 3]}").unwrap();
    assert_eq!(many.vl.len(), 3);
    assert_eq!(many.vl[1].color.as_deref(), Some("k"));

    let err = parse("{kind: line, datafile: d.csv, index: 0, hl: [2, {angle: 1}]}").unwrap_err();
    assert!(err.contains("not a valid keyword for a reference line"));
}

#[test]
fn base_descriptions_merge_deeply() {
    let base: Value = serde_yaml::from_str(
        "{kind: line, datafile: d.csv, index: 0, ylabel: Y, legend_options: {loc: upper left}}",
    )
    .unwrap();
    let overlay: Value =
        serde_yaml::from_str("{ylabel: Override, legend_options: {reverse: true}}").unwrap();
    let merged = merge_values(&base, &overlay);
    let spec = PlotSpec::from_value(&merged).unwrap();

    assert_eq!(spec.ylabel, "Override");
    // Nested mapping merged, not replaced: loc survives next to reverse.
    assert!(spec.legend_options.reverse);
    assert_eq!(
        format!("{:?}", spec.legend_options.loc),
        "UpperLeft"
    );
}
