// src/plot_spec/mod.rs
//
// Plot descriptions: YAML mappings validated against the recognized option
// set of their kind, merged with --plot-base defaults, and resolved against
// the loaded data table.

pub mod style;

use crate::constants::{
    DEFAULT_BAR_WIDTH, DEFAULT_BOX_WIDTH, DEFAULT_MARKER_SIZE, LINE_WIDTH_PLOT,
    LINE_WIDTH_REFLINE,
};
use crate::data_input::data_table::DataTable;
use plotters::style::RGBColor;
use serde_yaml::Value;
use std::error::Error;
use style::{Hatch, LineDash, MarkerShape, StyleCycle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Line,
    DashedLine,
    MarkedLine,
    DashedMarkedLine,
    Scatter,
    Area,
    StackedArea,
    Bars,
    StackedBars,
    MultiIndexBars,
    Box,
}

impl PlotKind {
    pub fn parse(token: &str) -> Result<Self, Box<dyn Error>> {
        match token {
            "line" | "l" => Ok(PlotKind::Line),
            "dashedline" | "dl" => Ok(PlotKind::DashedLine),
            "markedline" | "ml" => Ok(PlotKind::MarkedLine),
            "dashedmarkedline" | "markeddashedline" | "mdl" | "dml" => {
                Ok(PlotKind::DashedMarkedLine)
            }
            "scatter" | "s" => Ok(PlotKind::Scatter),
            "area" | "a" => Ok(PlotKind::Area),
            "stackedarea" | "sa" => Ok(PlotKind::StackedArea),
            "bars" | "b" => Ok(PlotKind::Bars),
            "stackedbars" | "sbars" | "sb" => Ok(PlotKind::StackedBars),
            "mibars" => Ok(PlotKind::MultiIndexBars),
            "box" => Ok(PlotKind::Box),
            other => Err(format!("Plot kind '{}' is not valid", other).into()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlotKind::Line => "line",
            PlotKind::DashedLine => "dashedline",
            PlotKind::MarkedLine => "markedline",
            PlotKind::DashedMarkedLine => "dashedmarkedline",
            PlotKind::Scatter => "scatter",
            PlotKind::Area => "area",
            PlotKind::StackedArea => "stackedarea",
            PlotKind::Bars => "bars",
            PlotKind::StackedBars => "stackedbars",
            PlotKind::MultiIndexBars => "mibars",
            PlotKind::Box => "box",
        }
    }

    pub fn is_line_family(&self) -> bool {
        matches!(
            self,
            PlotKind::Line
                | PlotKind::DashedLine
                | PlotKind::MarkedLine
                | PlotKind::DashedMarkedLine
                | PlotKind::Scatter
        )
    }

    pub fn is_area(&self) -> bool {
        matches!(self, PlotKind::Area | PlotKind::StackedArea)
    }

    pub fn is_bars(&self) -> bool {
        matches!(
            self,
            PlotKind::Bars | PlotKind::StackedBars | PlotKind::MultiIndexBars
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBarMode {
    Min,
    Max,
    Both,
}

impl ErrorBarMode {
    fn parse(token: &str) -> Result<Self, Box<dyn Error>> {
        match token {
            "min" => Ok(ErrorBarMode::Min),
            "max" => Ok(ErrorBarMode::Max),
            "both" => Ok(ErrorBarMode::Both),
            _ => Err("'errorbars' allowed values are 'max', 'min' or 'both'".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Center,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLoc {
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    CenterLeft,
    CenterRight,
    UpperCenter,
    LowerCenter,
}

impl LegendLoc {
    fn parse(token: &str) -> Result<Self, Box<dyn Error>> {
        match token {
            "best" => Ok(LegendLoc::Best),
            "upper right" => Ok(LegendLoc::UpperRight),
            "upper left" => Ok(LegendLoc::UpperLeft),
            "lower left" => Ok(LegendLoc::LowerLeft),
            "lower right" => Ok(LegendLoc::LowerRight),
            "center left" => Ok(LegendLoc::CenterLeft),
            "center right" => Ok(LegendLoc::CenterRight),
            "upper center" => Ok(LegendLoc::UpperCenter),
            "lower center" => Ok(LegendLoc::LowerCenter),
            other => Err(format!("Legend location '{}' is not valid", other).into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LegendOptions {
    pub loc: LegendLoc,
    pub fontsize: Option<i32>,
    pub reverse: bool,
}

impl Default for LegendOptions {
    fn default() -> Self {
        LegendOptions {
            loc: LegendLoc::Best,
            fontsize: None,
            reverse: false,
        }
    }
}

/// One horizontal or vertical reference line, before color resolution.
#[derive(Debug, Clone)]
pub struct RefLine {
    pub value: f64,
    pub color: Option<String>,
    pub width: u32,
}

/// A validated plot description. Immutable after parsing; the
/// table-dependent parts (column names, palette, style cycle) resolve in
/// [`PlotSpec::resolve`].
#[derive(Debug, Clone)]
pub struct PlotSpec {
    pub kind: PlotKind,
    pub datafile: String,
    pub title: String,
    pub axnum: Option<usize>,
    pub yright: bool,
    pub index: Vec<usize>,
    pub cols: Option<Vec<usize>>,
    pub labels: Option<Vec<String>>,
    pub legend: bool,
    pub legend_options: LegendOptions,
    pub xrot: Option<u32>,
    pub xtick_ha: HAlign,
    pub ypercent: bool,
    pub xlabel: String,
    pub ylabel: String,
    pub xgrid: Option<bool>,
    pub ygrid: Option<bool>,
    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
    pub colormap: Option<String>,
    pub numcolors: Option<usize>,
    pub color: Option<Vec<Option<String>>>,
    pub starting_style: usize,
    pub font_size: Option<i32>,
    pub hl: Vec<RefLine>,
    pub vl: Vec<RefLine>,
    // line family
    pub linewidth: Option<u32>,
    pub elinewidth: u32,
    pub linestyle: Option<Vec<LineDash>>,
    pub marker: Option<Vec<MarkerShape>>,
    pub markersize: u32,
    pub markevery: usize,
    pub ecols: Vec<usize>,
    // bars
    pub errorbars: ErrorBarMode,
    pub hatch: Vec<Hatch>,
    pub width: f64,
}

const COMMON_KEYS: &[&str] = &[
    "kind", "datafile", "title", "axnum", "yright", "font", "index", "cols", "labels", "legend",
    "legend_options", "xrot", "xtick_ha", "ypercent", "ylabel", "xlabel", "xgrid", "ygrid",
    "ymin", "ymax", "colormap", "numcolors", "color", "starting_style", "hl", "vl",
];
const LINE_KEYS: &[&str] = &[
    "xmin", "xmax", "linewidth", "elinewidth", "linestyle", "marker", "markersize", "markevery",
    "ecols",
];
const SCATTER_KEYS: &[&str] = &["xmin", "xmax", "marker", "markersize", "markevery", "ecols"];
const AREA_KEYS: &[&str] = &["xmin", "xmax", "linewidth"];
const BAR_KEYS: &[&str] = &["ecols", "errorbars", "hatch", "width"];
const BOX_KEYS: &[&str] = &["width"];

fn allowed_keys(kind: PlotKind) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = COMMON_KEYS.to_vec();
    let extra: &[&str] = match kind {
        PlotKind::Scatter => SCATTER_KEYS,
        k if k.is_line_family() => LINE_KEYS,
        k if k.is_area() => AREA_KEYS,
        k if k.is_bars() => BAR_KEYS,
        PlotKind::Box => BOX_KEYS,
        _ => &[],
    };
    keys.extend_from_slice(extra);
    keys
}

/// Deep-merge `overlay` into `base`: nested mappings merge recursively,
/// everything else in the overlay wins.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let entry = match merged.get(key) {
                    Some(existing) => merge_values(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), entry);
            }
            Value::Mapping(merged)
        }
        _ => overlay.clone(),
    }
}

impl PlotSpec {
    pub fn from_value(value: &Value) -> Result<Self, Box<dyn Error>> {
        let mapping = value
            .as_mapping()
            .ok_or("A plot description must be a YAML mapping")?;

        let kind_value = mapping
            .iter()
            .find(|(key, _)| key.as_str() == Some("kind"))
            .map(|(_, value)| value)
            .ok_or("A plot description needs a 'kind' e.g. --plot '{kind: line, ...}'")?;
        let kind = PlotKind::parse(expect_str(kind_value, "kind")?.as_str())?;
        let allowed = allowed_keys(kind);

        let mut spec = PlotSpec::defaults(kind);
        for (key, value) in mapping {
            let key = key
                .as_str()
                .ok_or("Plot description keys must be strings")?;
            if !allowed.contains(&key) {
                return Err(format!(
                    "'{}' is not a valid keyword for a {} plot",
                    key,
                    kind.name()
                )
                .into());
            }
            spec.set_option(key, value)?;
        }

        spec.fill_kind_defaults();
        spec.validate()?;
        Ok(spec)
    }

    fn defaults(kind: PlotKind) -> Self {
        PlotSpec {
            kind,
            datafile: String::new(),
            title: String::new(),
            axnum: None,
            yright: false,
            index: Vec::new(),
            cols: None,
            labels: None,
            legend: true,
            legend_options: LegendOptions::default(),
            xrot: None,
            xtick_ha: HAlign::Center,
            ypercent: false,
            xlabel: String::new(),
            ylabel: String::new(),
            xgrid: None,
            ygrid: None,
            xmin: None,
            xmax: None,
            ymin: None,
            ymax: None,
            colormap: None,
            numcolors: None,
            color: None,
            starting_style: 0,
            font_size: None,
            hl: Vec::new(),
            vl: Vec::new(),
            linewidth: None,
            elinewidth: 1,
            linestyle: None,
            marker: None,
            markersize: DEFAULT_MARKER_SIZE,
            markevery: 1,
            ecols: Vec::new(),
            errorbars: ErrorBarMode::Both,
            hatch: Vec::new(),
            width: match kind {
                PlotKind::Box => DEFAULT_BOX_WIDTH,
                _ => DEFAULT_BAR_WIDTH,
            },
        }
    }

    fn set_option(&mut self, key: &str, value: &Value) -> Result<(), Box<dyn Error>> {
        match key {
            "kind" => {} // parsed up front
            "datafile" => self.datafile = expect_str(value, key)?,
            "title" => self.title = expect_str(value, key)?,
            "axnum" => self.axnum = Some(expect_usize(value, key)?),
            "yright" => self.yright = expect_bool(value, key)?,
            "font" => {
                let font = value
                    .as_mapping()
                    .ok_or_else(|| type_error(key, "a mapping"))?;
                for (font_key, font_value) in font {
                    match font_key.as_str() {
                        Some("size") => {
                            self.font_size = Some(expect_usize(font_value, "font.size")? as i32)
                        }
                        Some(other) => {
                            return Err(format!(
                                "'{}' is not a valid keyword for 'font'",
                                other
                            )
                            .into())
                        }
                        None => return Err(type_error("font", "string keys").into()),
                    }
                }
            }
            "index" => {
                self.index = expect_usize_list(value, key)?;
                if self.index.is_empty() || self.index.len() > 2 {
                    return Err("'index' takes one column, or two for mibars".into());
                }
            }
            "cols" => self.cols = Some(expect_usize_list(value, key)?),
            "labels" => self.labels = Some(expect_str_list(value, key)?),
            "legend" => self.legend = expect_bool(value, key)?,
            "legend_options" => {
                let options = value
                    .as_mapping()
                    .ok_or_else(|| type_error(key, "a mapping"))?;
                for (opt_key, opt_value) in options {
                    match opt_key.as_str() {
                        Some("loc") => {
                            self.legend_options.loc =
                                LegendLoc::parse(&expect_str(opt_value, "loc")?)?
                        }
                        Some("fontsize") => {
                            self.legend_options.fontsize =
                                Some(expect_usize(opt_value, "fontsize")? as i32)
                        }
                        Some("reverse") => {
                            self.legend_options.reverse = expect_bool(opt_value, "reverse")?
                        }
                        Some(other) => {
                            return Err(format!(
                                "'{}' is not a valid keyword for 'legend_options'",
                                other
                            )
                            .into())
                        }
                        None => return Err(type_error("legend_options", "string keys").into()),
                    }
                }
            }
            "xrot" => {
                let rot = expect_usize(value, key)? as u32;
                if ![0, 45, 90, 180, 270].contains(&rot) {
                    return Err("'xrot' must be one of 0, 45, 90, 180 or 270".into());
                }
                self.xrot = Some(rot);
            }
            "xtick_ha" => {
                self.xtick_ha = match expect_str(value, key)?.as_str() {
                    "center" => HAlign::Center,
                    "left" => HAlign::Left,
                    "right" => HAlign::Right,
                    other => {
                        return Err(format!(
                            "'xtick_ha' value '{}' is not valid: use center, left or right",
                            other
                        )
                        .into())
                    }
                }
            }
            "ypercent" => self.ypercent = expect_bool(value, key)?,
            "ylabel" => self.ylabel = expect_str(value, key)?,
            "xlabel" => self.xlabel = expect_str(value, key)?,
            "xgrid" => self.xgrid = Some(expect_bool(value, key)?),
            "ygrid" => self.ygrid = Some(expect_bool(value, key)?),
            "ymin" => self.ymin = Some(expect_f64(value, key)?),
            "ymax" => self.ymax = Some(expect_f64(value, key)?),
            "xmin" => self.xmin = Some(expect_f64(value, key)?),
            "xmax" => self.xmax = Some(expect_f64(value, key)?),
            "colormap" => self.colormap = Some(expect_str(value, key)?),
            "numcolors" => self.numcolors = Some(expect_usize(value, key)?),
            "color" => {
                if value.is_string() {
                    return Err(format!(
                        "Color has to be a list of color tokens, not '{}'",
                        value.as_str().unwrap_or_default()
                    )
                    .into());
                }
                let entries = value
                    .as_sequence()
                    .ok_or_else(|| type_error(key, "a list"))?;
                let mut colors = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        Value::Null => colors.push(None),
                        Value::String(s) => colors.push(Some(s.clone())),
                        _ => return Err(type_error("color entries", "strings or null").into()),
                    }
                }
                self.color = Some(colors);
            }
            "starting_style" => self.starting_style = expect_usize(value, key)?,
            "hl" => self.hl = parse_ref_lines(value)?,
            "vl" => self.vl = parse_ref_lines(value)?,
            "linewidth" => self.linewidth = Some(expect_usize(value, key)? as u32),
            "elinewidth" => self.elinewidth = expect_usize(value, key)? as u32,
            "linestyle" => {
                let tokens = expect_str_list(value, key)?;
                self.linestyle = Some(
                    tokens
                        .iter()
                        .map(|t| LineDash::parse(t))
                        .collect::<Result<_, _>>()?,
                );
            }
            "marker" => {
                let tokens = expect_str_list(value, key)?;
                self.marker = Some(
                    tokens
                        .iter()
                        .map(|t| MarkerShape::parse(t))
                        .collect::<Result<_, _>>()?,
                );
            }
            "markersize" => self.markersize = expect_usize(value, key)? as u32,
            "markevery" => self.markevery = expect_usize(value, key)?.max(1),
            "ecols" => self.ecols = expect_usize_list(value, key)?,
            "errorbars" => self.errorbars = ErrorBarMode::parse(&expect_str(value, key)?)?,
            "hatch" => {
                let tokens = expect_str_list(value, key)?;
                self.hatch = tokens
                    .iter()
                    .map(|t| Hatch::parse(t))
                    .collect::<Result<_, _>>()?;
            }
            "width" => {
                self.width = expect_f64(value, key)?;
                if !(self.width > 0.0) {
                    return Err("'width' must be positive".into());
                }
            }
            other => unreachable!("unvalidated key '{}'", other),
        }
        Ok(())
    }

    fn fill_kind_defaults(&mut self) {
        match self.kind {
            PlotKind::DashedLine | PlotKind::DashedMarkedLine if self.linestyle.is_none() => {
                self.linestyle = Some(vec![
                    LineDash::Solid,
                    LineDash::Dashed,
                    LineDash::DashDot,
                    LineDash::Dotted,
                ]);
            }
            _ => {}
        }
        match self.kind {
            PlotKind::MarkedLine | PlotKind::DashedMarkedLine | PlotKind::Scatter
                if self.marker.is_none() =>
            {
                self.marker = Some(vec![
                    MarkerShape::Circle,
                    MarkerShape::Triangle,
                    MarkerShape::Cross,
                ]);
            }
            _ => {}
        }
        if self.kind == PlotKind::Box && self.xrot.is_none() {
            self.xrot = Some(45);
        }
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.datafile.is_empty() {
            return Err(
                "You should provide a datafile e.g. --plot '{... datafile: input.csv, ...}'"
                    .into(),
            );
        }
        if self.index.is_empty() {
            return Err(
                "You should provide an index e.g. --plot '{... index: 0, ...}'".into(),
            );
        }
        if self.index.len() == 2 && self.kind != PlotKind::MultiIndexBars {
            return Err(format!(
                "A two-level index is only valid for mibars, not {}",
                self.kind.name()
            )
            .into());
        }
        if self.kind == PlotKind::MultiIndexBars && self.index.len() != 2 {
            return Err("mibars need a two-level index e.g. --plot '{... index: [0, 1], ...}'"
                .into());
        }
        if let Some(cols) = &self.cols {
            for index in &self.index {
                if cols.contains(index) {
                    return Err(format!(
                        "You are trying to plot the index... cols is {:?} and the index is {}",
                        cols, index
                    )
                    .into());
                }
            }
        }
        Ok(())
    }

    /// The table-dependent half of validation: default columns, label
    /// mapping, error-column counts, and the palette and style cycle in
    /// effect for this plot.
    pub fn resolve(&self, table: &DataTable) -> Result<ResolvedPlot, Box<dyn Error>> {
        for index in &self.index {
            table.header(*index)?;
        }

        let cols: Vec<usize> = match &self.cols {
            Some(cols) => cols.clone(),
            None => (0..table.n_cols())
                .filter(|c| !self.index.contains(c))
                .collect(),
        };
        let mut columns = Vec::with_capacity(cols.len());
        for &col in &cols {
            columns.push(table.header(col)?.to_string());
        }

        let labels: Vec<String> = match &self.labels {
            Some(labels) => {
                if labels.len() != cols.len() {
                    return Err(format!(
                        "The number of labels({}) and columns({}) is different",
                        labels.len(),
                        cols.len()
                    )
                    .into());
                }
                labels.clone()
            }
            None => columns.clone(),
        };

        self.check_ecols(&cols)?;
        let mut ecolumns = Vec::with_capacity(self.ecols.len());
        for &ecol in &self.ecols {
            ecolumns.push(table.header(ecol)?.to_string());
        }

        let numcolors = self.numcolors.unwrap_or(cols.len().max(1));
        let palette = style::base_palette(self.colormap.as_deref(), numcolors)?;
        let colors = match &self.color {
            Some(overrides) => style::apply_overrides(&palette, overrides)?,
            None => palette.clone(),
        };

        let cycle = StyleCycle {
            colors: colors.clone(),
            dashes: self.linestyle.clone().unwrap_or_default(),
            markers: self.marker.clone().unwrap_or_default(),
            hatches: self.hatch.clone(),
            start: self.starting_style,
            line_width: self.linewidth.unwrap_or(LINE_WIDTH_PLOT),
            err_line_width: self.elinewidth,
            marker_size: self.markersize,
            mark_every: self.markevery,
        };

        let hl = resolve_ref_lines(&self.hl, &colors)?;
        let vl = resolve_ref_lines(&self.vl, &colors)?;

        Ok(ResolvedPlot {
            cols,
            columns,
            labels,
            ecols: self.ecols.clone(),
            ecolumns,
            palette,
            colors,
            cycle,
            hl,
            vl,
        })
    }

    fn check_ecols(&self, cols: &[usize]) -> Result<(), Box<dyn Error>> {
        if self.ecols.is_empty() {
            return Ok(());
        }
        if self.kind.is_bars() {
            match self.errorbars {
                ErrorBarMode::Both => {
                    if 2 * cols.len() != self.ecols.len() {
                        return Err(format!(
                            "You have {} cols but {} error cols: two error columns are needed \
                             for each value column",
                            cols.len(),
                            self.ecols.len()
                        )
                        .into());
                    }
                }
                ErrorBarMode::Min | ErrorBarMode::Max => {
                    if cols.len() != self.ecols.len() {
                        return Err(format!(
                            "You have {} cols but {} error cols: an error column is needed \
                             for each value column",
                            cols.len(),
                            self.ecols.len()
                        )
                        .into());
                    }
                }
            }
        } else if cols.len() != self.ecols.len() {
            return Err(format!(
                "You have {} cols but {} error cols: error cols should be 0 or equal the \
                 number of cols",
                cols.len(),
                self.ecols.len()
            )
            .into());
        }
        Ok(())
    }
}

/// The table-dependent resolution of a plot description.
#[derive(Debug, Clone)]
pub struct ResolvedPlot {
    pub cols: Vec<usize>,
    pub columns: Vec<String>,
    pub labels: Vec<String>,
    pub ecols: Vec<usize>,
    pub ecolumns: Vec<String>,
    /// Base palette (colormap samples or the default cycle); `dN` tokens in
    /// series overrides resolve against this.
    pub palette: Vec<RGBColor>,
    /// Final per-position colors after overrides; `dN` tokens in reference
    /// lines resolve against this.
    pub colors: Vec<RGBColor>,
    pub cycle: StyleCycle,
    pub hl: Vec<(f64, RGBColor, u32)>,
    pub vl: Vec<(f64, RGBColor, u32)>,
}

fn resolve_ref_lines(
    lines: &[RefLine],
    colors: &[RGBColor],
) -> Result<Vec<(f64, RGBColor, u32)>, Box<dyn Error>> {
    lines
        .iter()
        .map(|line| {
            let color = match &line.color {
                Some(token) => style::resolve_color_token(token, colors)?,
                None => RGBColor(0, 0, 0),
            };
            Ok((line.value, color, line.width))
        })
        .collect()
}

// `hl`/`vl` accept a bare number, a [value, {options}] pair, or a list of
// either.
fn parse_ref_lines(value: &Value) -> Result<Vec<RefLine>, Box<dyn Error>> {
    match value {
        Value::Number(_) => Ok(vec![parse_ref_line(value)?]),
        Value::Sequence(seq) => {
            if seq.len() == 2 && seq[1].is_mapping() {
                return Ok(vec![parse_ref_line(value)?]);
            }
            seq.iter().map(parse_ref_line).collect()
        }
        _ => Err(type_error("hl/vl", "a number, [value, {options}] or a list of those").into()),
    }
}

fn parse_ref_line(value: &Value) -> Result<RefLine, Box<dyn Error>> {
    match value {
        Value::Number(_) => Ok(RefLine {
            value: expect_f64(value, "hl/vl")?,
            color: None,
            width: LINE_WIDTH_REFLINE,
        }),
        Value::Sequence(pair) if pair.len() == 2 && pair[1].is_mapping() => {
            let mut line = RefLine {
                value: expect_f64(&pair[0], "hl/vl value")?,
                color: None,
                width: LINE_WIDTH_REFLINE,
            };
            let options = pair[1].as_mapping().expect("checked above");
            for (key, option) in options {
                match key.as_str() {
                    Some("color") => line.color = Some(expect_str(option, "color")?),
                    Some("lw") => line.width = expect_usize(option, "lw")? as u32,
                    Some(other) => {
                        return Err(format!(
                            "'{}' is not a valid keyword for a reference line",
                            other
                        )
                        .into())
                    }
                    None => return Err(type_error("reference line", "string keys").into()),
                }
            }
            Ok(line)
        }
        _ => Err(type_error("hl/vl entries", "a number or [value, {options}]").into()),
    }
}

// --- YAML extraction helpers ---

fn type_error(key: &str, expected: &str) -> String {
    format!("'{}' must be {}", key, expected)
}

fn expect_str(value: &Value, key: &str) -> Result<String, Box<dyn Error>> {
    match value {
        Value::String(s) => Ok(s.clone()),
        // YAML happily reads bare words and numbers; titles like `2024`
        // should not trip the parser.
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(type_error(key, "a string").into()),
    }
}

fn expect_bool(value: &Value, key: &str) -> Result<bool, Box<dyn Error>> {
    value
        .as_bool()
        .ok_or_else(|| type_error(key, "a boolean").into())
}

fn expect_f64(value: &Value, key: &str) -> Result<f64, Box<dyn Error>> {
    value
        .as_f64()
        .ok_or_else(|| type_error(key, "a number").into())
}

fn expect_usize(value: &Value, key: &str) -> Result<usize, Box<dyn Error>> {
    value
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| type_error(key, "a non-negative integer").into())
}

fn expect_usize_list(value: &Value, key: &str) -> Result<Vec<usize>, Box<dyn Error>> {
    match value {
        Value::Number(_) => Ok(vec![expect_usize(value, key)?]),
        Value::Sequence(seq) => seq.iter().map(|v| expect_usize(v, key)).collect(),
        _ => Err(type_error(key, "an integer or a list of integers").into()),
    }
}

fn expect_str_list(value: &Value, key: &str) -> Result<Vec<String>, Box<dyn Error>> {
    match value {
        Value::Sequence(seq) => seq.iter().map(|v| expect_str(v, key)).collect(),
        _ => Err(type_error(key, "a list").into()),
    }
}
