// src/main.rs

use clap::Parser;
use serde_yaml::Value;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::process;

use csvplot::cli::Cli;
use csvplot::data_input::data_table::DataTable;
use csvplot::font_config::dpi_scale;
use csvplot::pdf_writer::write_pdf;
use csvplot::plot_framework::{
    assign_slots, build_pages, compute_slot_ranges, equalize_axes, render_pages, AxisSel,
    PageGrid, RenderOptions,
};
use csvplot::plot_functions::prepare_plot;
use csvplot::plot_spec::{merge_values, PlotSpec};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    cli.validate()?;

    // --- Plot Descriptions ---
    let base: Value = serde_yaml::from_str(&cli.plot_base)
        .map_err(|e| format!("Parsing --plot-base: {}", e))?;
    if !base.is_mapping() && !base.is_null() {
        return Err("--plot-base must be a YAML mapping".into());
    }

    let mut specs: Vec<PlotSpec> = Vec::with_capacity(cli.plots.len());
    for (i, raw) in cli.plots.iter().enumerate() {
        let value: Value =
            serde_yaml::from_str(raw).map_err(|e| format!("Parsing --plot {}: {}", i + 1, e))?;
        if !value.is_mapping() {
            return Err(format!("--plot {} must be a YAML mapping", i + 1).into());
        }
        let merged = merge_values(&base, &value);
        specs.push(PlotSpec::from_value(&merged)?);
    }

    // --- Page Layout ---
    let pages = build_pages(&cli.grid, &cli.titles)?;
    let total_slots: usize = pages.iter().map(PageGrid::slots).sum();
    let slots = assign_slots(&specs, total_slots)?;

    // --- Data Loading ---
    // One table per distinct datafile, shared across the plots using it.
    let mut tables: HashMap<String, DataTable> = HashMap::new();
    for spec in &specs {
        if !tables.contains_key(&spec.datafile) {
            let table = DataTable::read(Path::new(&spec.datafile))?;
            println!(
                "Read '{}': {} rows, {} columns.",
                spec.datafile,
                table.n_rows(),
                table.n_cols()
            );
            tables.insert(spec.datafile.clone(), table);
        }
    }

    // --- Series Preparation ---
    let mut prepared = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let table = &tables[&spec.datafile];
        prepared.push(prepare_plot(spec, table, slots[i])?);
    }

    // --- Axis Limits and Equalization ---
    let mut ranges = compute_slot_ranges(total_slots, &prepared);
    equalize_axes(&mut ranges, &cli.equal_xaxes, AxisSel::X)?;
    equalize_axes(&mut ranges, &cli.equal_yaxes, AxisSel::Y)?;

    // --- Rendering ---
    let (size_x, size_y) = (cli.size[0], cli.size[1]);
    let width_px = (size_x * cli.dpi as f64).round() as u32;
    let height_px = (size_y * cli.dpi as f64).round() as u32;
    let opts = RenderOptions {
        width_px,
        height_px,
        rect: [cli.rect[0], cli.rect[1], cli.rect[2], cli.rect[3]],
        font_scale: dpi_scale(cli.dpi),
    };
    let buffers = render_pages(&pages, &prepared, &ranges, &opts)?;

    // --- Output ---
    write_pdf(&cli.output, &buffers, width_px, height_px, (size_x, size_y), cli.dpi)?;
    println!(
        "\nWrote '{}' ({} page{}).",
        cli.output.display(),
        buffers.len(),
        if buffers.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
