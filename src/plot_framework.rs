// src/plot_framework.rs
//
// Figure assembly and rendering: page grids, slot assignment, axis range
// resolution, equalization, and the plotters draw pass. The prepare
// functions in plot_functions/ build `PreparedPlot`s; everything here is
// kind-agnostic.

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, DualCoordChartContext, SeriesLabelPosition};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::combinators::{BindKeyPoints, WithKeyPoints};
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, Cross, ErrorBar, PathElement, Rectangle, Text, TriangleMarker};
use plotters::series::{AreaSeries, DashedLineSeries, LineSeries};
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color, FontTransform, IntoFont, RGBColor};

use std::error::Error;
use std::iter::once;

use crate::constants::{
    COLOR_MEDIAN_LINE, DASHDOT_PATTERN, DASH_PATTERN, DOT_PATTERN, FONT_SIZE_AXIS_LABEL,
    FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_PAGE_TITLE, FONT_SIZE_TICK_LABEL,
    HATCH_LINES_PER_BAR, LINE_WIDTH_BAR_EDGE, LINE_WIDTH_BOX, LINE_WIDTH_LEGEND,
    OUTER_TICK_LABEL_PAD,
};
use crate::data_analysis::quartiles::BoxStats;
use crate::font_config::{scaled, FONT_FAMILY_SYSTEM};
use crate::plot_spec::style::{Hatch, LineDash, MarkerShape};
use crate::plot_spec::{HAlign, LegendLoc, LegendOptions, PlotSpec, ResolvedPlot};
use crate::types::{AxisRange, ErrorBarPoint, PageBuffer};

/// Tick positions with their display labels, for categorical axes.
#[derive(Debug, Clone)]
pub struct TickSet {
    pub positions: Vec<f64>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub enum Glyph {
    Line,
    Patch,
    Marker(MarkerShape),
}

#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
    pub glyph: Glyph,
}

/// One drawable series, already reduced to geometry and style.
#[derive(Debug, Clone)]
pub enum SeriesDraw {
    Line {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        width: u32,
        dash: LineDash,
    },
    Markers {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        shape: MarkerShape,
        size: u32,
    },
    ErrorBars {
        points: Vec<ErrorBarPoint>,
        color: RGBColor,
        width: u32,
    },
    Area {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        alpha: f64,
        border_width: u32,
    },
    /// Bars as (center, value) pairs; rectangles span value..0.
    Bars {
        bars: Vec<(f64, f64)>,
        width: f64,
        color: RGBColor,
        hatch: Hatch,
    },
    BoxGlyph {
        x: f64,
        width: f64,
        stats: BoxStats,
    },
}

/// A plot after data preparation: series geometry, tight data ranges, and
/// everything the draw pass needs besides the final (equalized) limits.
#[derive(Debug, Clone)]
pub struct PreparedPlot {
    pub slot: usize,
    pub yright: bool,
    pub series: Vec<SeriesDraw>,
    pub legend: Vec<LegendEntry>,
    pub x_ticks: Option<TickSet>,
    pub outer_ticks: Option<TickSet>,
    pub hl: Vec<(f64, RGBColor, u32)>,
    pub vl: Vec<(f64, RGBColor, u32)>,
    pub spec: PlotSpec,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl PreparedPlot {
    pub fn new(spec: &PlotSpec, resolved: &ResolvedPlot, slot: usize) -> Self {
        PreparedPlot {
            slot,
            yright: spec.yright,
            series: Vec::new(),
            legend: Vec::new(),
            x_ticks: None,
            outer_ticks: None,
            hl: resolved.hl.clone(),
            vl: resolved.vl.clone(),
            spec: spec.clone(),
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    pub fn include_x(&mut self, x: f64) {
        if x.is_finite() {
            self.x_min = self.x_min.min(x);
            self.x_max = self.x_max.max(x);
        }
    }

    pub fn include_y(&mut self, y: f64) {
        if y.is_finite() {
            self.y_min = self.y_min.min(y);
            self.y_max = self.y_max.max(y);
        }
    }

    pub fn include_point(&mut self, x: f64, y: f64) {
        self.include_x(x);
        self.include_y(y);
    }

    pub fn x_data(&self) -> Option<(f64, f64)> {
        (self.x_min <= self.x_max).then_some((self.x_min, self.x_max))
    }

    pub fn y_data(&self) -> Option<(f64, f64)> {
        (self.y_min <= self.y_max).then_some((self.y_min, self.y_max))
    }
}

// --- Page grids and slot assignment ---

#[derive(Debug, Clone)]
pub struct PageGrid {
    pub rows: usize,
    pub cols: usize,
    pub title: Option<String>,
}

impl PageGrid {
    pub fn slots(&self) -> usize {
        self.rows * self.cols
    }
}

/// One page per --grid occurrence; a single 1x1 page when none was given.
pub fn build_pages(
    grids: &[Vec<usize>],
    titles: &[String],
) -> Result<Vec<PageGrid>, Box<dyn Error>> {
    let shapes: Vec<(usize, usize)> = if grids.is_empty() {
        vec![(1, 1)]
    } else {
        grids.iter().map(|pair| (pair[0], pair[1])).collect()
    };
    if !titles.is_empty() && titles.len() != shapes.len() {
        return Err("If --title is used, a title for each page must be provided".into());
    }
    Ok(shapes
        .iter()
        .enumerate()
        .map(|(i, &(rows, cols))| PageGrid {
            rows,
            cols,
            title: titles.get(i).cloned(),
        })
        .collect())
}

/// Assign each plot a global slot ID. Sequential plots take the next
/// unassigned counter value; an explicit `axnum` targets its slot without
/// advancing the counter.
pub fn assign_slots(specs: &[PlotSpec], total_slots: usize) -> Result<Vec<usize>, Box<dyn Error>> {
    let mut next = 0usize;
    let mut slots = Vec::with_capacity(specs.len());
    for spec in specs {
        let slot = match spec.axnum {
            Some(axnum) => axnum,
            None => {
                let slot = next;
                next += 1;
                slot
            }
        };
        if slot >= total_slots {
            return Err(format!(
                "Not enough subplots: plot targets subplot {} but the grids only provide {}",
                slot, total_slots
            )
            .into());
        }
        slots.push(slot);
    }
    Ok(slots)
}

// --- Axis ranges and equalization ---

#[derive(Debug, Clone, Copy, Default)]
pub struct SlotRanges {
    pub x: Option<(f64, f64)>,
    pub y: Option<(f64, f64)>,
    pub y2: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSel {
    X,
    Y,
}

/// Union of the tight data ranges of every plot in each slot, with the
/// explicit per-side limits (`xmin`/`xmax`/`ymin`/`ymax`) applied on top,
/// later plots overriding earlier ones.
pub fn compute_slot_ranges(total_slots: usize, prepared: &[PreparedPlot]) -> Vec<SlotRanges> {
    let mut ranges = vec![SlotRanges::default(); total_slots];

    for plot in prepared {
        let slot = &mut ranges[plot.slot];
        if let Some(data) = plot.x_data() {
            slot.x = Some(union(slot.x, data));
        }
        let y_target = if plot.yright { &mut slot.y2 } else { &mut slot.y };
        if let Some(data) = plot.y_data() {
            *y_target = Some(union(*y_target, data));
        }
    }

    for plot in prepared {
        let slot = &mut ranges[plot.slot];
        if let Some(x) = slot.x.as_mut() {
            if let Some(xmin) = plot.spec.xmin {
                x.0 = xmin;
            }
            if let Some(xmax) = plot.spec.xmax {
                x.1 = xmax;
            }
        } else if plot.spec.xmin.is_some() || plot.spec.xmax.is_some() {
            slot.x = Some((
                plot.spec.xmin.unwrap_or(0.0),
                plot.spec.xmax.unwrap_or(1.0),
            ));
        }
        let y_target = if plot.yright { &mut slot.y2 } else { &mut slot.y };
        if let Some(y) = y_target.as_mut() {
            if let Some(ymin) = plot.spec.ymin {
                y.0 = ymin;
            }
            if let Some(ymax) = plot.spec.ymax {
                y.1 = ymax;
            }
        } else if plot.spec.ymin.is_some() || plot.spec.ymax.is_some() {
            *y_target = Some((
                plot.spec.ymin.unwrap_or(0.0),
                plot.spec.ymax.unwrap_or(1.0),
            ));
        }
    }

    ranges
}

fn union(current: Option<(f64, f64)>, data: (f64, f64)) -> (f64, f64) {
    match current {
        Some((lo, hi)) => (lo.min(data.0), hi.max(data.1)),
        None => data,
    }
}

/// Force every slot in a group onto the group's min/max envelope. Applying
/// this twice yields the same bounds as applying it once.
pub fn equalize_axes(
    ranges: &mut [SlotRanges],
    groups: &[Vec<usize>],
    axis: AxisSel,
) -> Result<(), Box<dyn Error>> {
    for group in groups {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &id in group {
            let slot = ranges.get(id).ok_or_else(|| {
                format!("Subplot ID {} in an equalize group does not exist", id)
            })?;
            let range = match axis {
                AxisSel::X => slot.x,
                AxisSel::Y => slot.y,
            };
            if let Some((a, b)) = range {
                lo = lo.min(a);
                hi = hi.max(b);
            }
        }
        if lo > hi {
            continue; // nothing in this group has data
        }
        for &id in group {
            let slot = &mut ranges[id];
            match axis {
                AxisSel::X => slot.x = Some((lo, hi)),
                AxisSel::Y => slot.y = Some((lo, hi)),
            }
        }
    }
    Ok(())
}

/// Expand a degenerate range so the chart coordinate stays invertible.
pub fn ensure_span(range: (f64, f64)) -> AxisRange {
    let (lo, hi) = range;
    if !(hi - lo).is_finite() || hi - lo < 1e-12 {
        lo - 0.5..hi + 0.5
    } else {
        lo..hi
    }
}

/// "Nice" tick positions at multiples of 1, 2 or 5 times a power of ten.
pub fn nice_ticks(lo: f64, hi: f64, desired: usize) -> Vec<f64> {
    let span = hi - lo;
    if !(span > 0.0) || desired == 0 {
        return vec![lo];
    }
    let step = nice_step(span / desired as f64);
    let mut ticks = Vec::new();
    let mut v = (lo / step).ceil() * step;
    while v <= hi + step * 1e-9 {
        // Snap near-zero accumulation noise onto zero.
        ticks.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
        v += step;
    }
    ticks
}

fn nice_step(raw: f64) -> f64 {
    let exp = raw.log10().floor();
    let base = 10f64.powf(exp);
    let mant = raw / base;
    let nice = if mant < 2.0 {
        2.0
    } else if mant < 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Compact tick label: integers without a decimal point, everything else
/// with the shortest round-trip representation.
pub fn fmt_tick(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{}", v)
    }
}

// --- Decoration folding ---

/// Final axis decoration of a slot. Each plot in the original sets these on
/// its target axis in turn, so the last plot wins for the text fields and a
/// later explicit value wins for the optional ones.
#[derive(Debug, Clone)]
pub struct SlotDecor {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub y2label: String,
    pub xgrid: bool,
    pub ygrid: bool,
    pub xrot: u32,
    pub xtick_ha: HAlign,
    pub ypercent: bool,
    pub font_size: Option<i32>,
    pub legend_enabled: bool,
    pub legend_options: LegendOptions,
}

pub fn fold_decor(primary: &[&PreparedPlot], secondary: &[&PreparedPlot]) -> SlotDecor {
    let mut decor = SlotDecor {
        title: String::new(),
        xlabel: String::new(),
        ylabel: String::new(),
        y2label: String::new(),
        xgrid: false,
        ygrid: false,
        xrot: 0,
        xtick_ha: HAlign::Center,
        ypercent: false,
        font_size: None,
        legend_enabled: false,
        legend_options: LegendOptions::default(),
    };

    for plot in primary.iter().chain(secondary.iter()) {
        let spec = &plot.spec;
        if !plot.yright {
            decor.title = spec.title.clone();
            decor.xlabel = spec.xlabel.clone();
            decor.ylabel = spec.ylabel.clone();
        } else {
            decor.y2label = spec.ylabel.clone();
            if decor.title.is_empty() {
                decor.title = spec.title.clone();
            }
        }
        if let Some(xgrid) = spec.xgrid {
            decor.xgrid = xgrid;
        }
        if let Some(ygrid) = spec.ygrid {
            decor.ygrid = ygrid;
        }
        if let Some(xrot) = spec.xrot {
            decor.xrot = xrot;
        }
        decor.xtick_ha = spec.xtick_ha;
        if spec.ypercent {
            decor.ypercent = true;
        }
        if let Some(size) = spec.font_size {
            decor.font_size = Some(size);
        }
        if spec.legend && !plot.legend.is_empty() {
            decor.legend_enabled = true;
            decor.legend_options = spec.legend_options.clone();
        }
    }
    decor
}

// --- Rendering ---

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width_px: u32,
    pub height_px: u32,
    /// Relative (left, bottom, right, top) region holding the subplot grid.
    pub rect: [f64; 4],
    /// Font scale: dpi / reference dpi.
    pub font_scale: f64,
}

/// Newtype over `WithKeyPoints<RangedCoordf64>` that supplies the
/// `ValueFormatter<f64>` impl plotters 0.3 omits for this combinator, so the
/// custom-keypoint f64 x-axis can drive `configure_mesh`. It forwards every
/// `Ranged` method unchanged, so tick positions are identical; axis labels
/// come from the `x_label_formatter` set below, and the formatter here
/// mirrors `RangedCoordf64`'s own so the fallback is identical too.
struct KeyPointsX(WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyPointsX {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

impl ValueFormatter<f64> for KeyPointsX {
    fn format(value: &f64) -> String {
        <RangedCoordf64 as ValueFormatter<f64>>::format(value)
    }
}

type XCoord = KeyPointsX;
type SlotChart<'buf, 'area> = DualCoordChartContext<
    'area,
    BitMapBackend<'buf>,
    Cartesian2d<XCoord, RangedCoordf64>,
    Cartesian2d<RangedCoordf64, RangedCoordf64>,
>;

/// Render every page into an RGB pixel buffer.
pub fn render_pages(
    pages: &[PageGrid],
    prepared: &[PreparedPlot],
    ranges: &[SlotRanges],
    opts: &RenderOptions,
) -> Result<Vec<PageBuffer>, Box<dyn Error>> {
    let mut buffers = Vec::with_capacity(pages.len());
    let mut slot_offset = 0usize;

    for (page_index, page) in pages.iter().enumerate() {
        println!("--- Rendering page {} ({}x{}) ---", page_index + 1, page.rows, page.cols);
        let mut buffer: PageBuffer =
            vec![0u8; (opts.width_px * opts.height_px * 3) as usize];
        render_single_page(page, slot_offset, prepared, ranges, opts, &mut buffer)?;
        buffers.push(buffer);
        slot_offset += page.slots();
    }
    Ok(buffers)
}

fn render_single_page(
    page: &PageGrid,
    slot_offset: usize,
    prepared: &[PreparedPlot],
    ranges: &[SlotRanges],
    opts: &RenderOptions,
    buffer: &mut [u8],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::with_buffer(buffer, (opts.width_px, opts.height_px))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let root = match &page.title {
        Some(title) => root.titled(
            title,
            (FONT_FAMILY_SYSTEM, scaled(FONT_SIZE_PAGE_TITLE, opts.font_scale)).into_font(),
        )?,
        None => root,
    };

    // --rect reserves a relative sub-region of the page for the grid.
    let [left, bottom, right, top] = opts.rect;
    let (w, h) = (opts.width_px as f64, opts.height_px as f64);
    let margined = root.margin(
        ((1.0 - top) * h) as i32,
        (bottom * h) as i32,
        (left * w) as i32,
        ((1.0 - right) * w) as i32,
    );

    let areas = margined.split_evenly((page.rows, page.cols));
    for (local, area) in areas.iter().enumerate() {
        let slot = slot_offset + local;
        let primary: Vec<&PreparedPlot> = prepared
            .iter()
            .filter(|p| p.slot == slot && !p.yright)
            .collect();
        let secondary: Vec<&PreparedPlot> = prepared
            .iter()
            .filter(|p| p.slot == slot && p.yright)
            .collect();
        draw_slot(area, &primary, &secondary, &ranges[slot], opts)?;
    }

    root.present()?;
    Ok(())
}

fn draw_slot(
    area: &DrawingArea<BitMapBackend, Shift>,
    primary: &[&PreparedPlot],
    secondary: &[&PreparedPlot],
    ranges: &SlotRanges,
    opts: &RenderOptions,
) -> Result<(), Box<dyn Error>> {
    let decor = fold_decor(primary, secondary);
    let has_secondary = !secondary.is_empty();
    let is_empty = primary.is_empty() && secondary.is_empty();

    let x_range = ensure_span(ranges.x.unwrap_or((0.0, 1.0)));
    let y_range = ensure_span(ranges.y.unwrap_or((0.0, 1.0)));
    let y2_range = ensure_span(ranges.y2.unwrap_or((0.0, 1.0)));

    // Categorical ticks (bars, box) win over numeric ones; the last plot
    // that defines them is authoritative, like the last set_xticks call.
    let tick_set: Option<&TickSet> = primary
        .iter()
        .chain(secondary.iter())
        .filter_map(|p| p.x_ticks.as_ref())
        .last();
    let outer_ticks: Option<&TickSet> = primary
        .iter()
        .chain(secondary.iter())
        .filter_map(|p| p.outer_ticks.as_ref())
        .last();

    let key_points: Vec<f64> = match tick_set {
        Some(ticks) => ticks.positions.clone(),
        None => nice_ticks(x_range.start, x_range.end, 6),
    };

    let scale = opts.font_scale;
    let tick_size = scaled(decor.font_size.unwrap_or(FONT_SIZE_TICK_LABEL), scale);
    let axis_size = scaled(decor.font_size.unwrap_or(FONT_SIZE_AXIS_LABEL), scale);
    let title_size = scaled(FONT_SIZE_CHART_TITLE, scale);

    let x_label_area = if outer_ticks.is_some() {
        scaled(60, scale)
    } else {
        scaled(40, scale)
    };

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(scaled(8, scale))
        .x_label_area_size(x_label_area)
        .y_label_area_size(scaled(55, scale))
        .right_y_label_area_size(if has_secondary {
            scaled(55, scale)
        } else {
            0
        });
    if !decor.title.is_empty() {
        builder.caption(&decor.title, (FONT_FAMILY_SYSTEM, title_size).into_font());
    }
    let mut chart: SlotChart = builder
        .build_cartesian_2d(KeyPointsX(x_range.clone().with_key_points(key_points)), y_range.clone())?
        .set_secondary_coord(x_range.clone(), y2_range.clone());

    let x_fmt = |x: &f64| -> String {
        if is_empty {
            return String::new();
        }
        match tick_set {
            Some(ticks) => categorical_label(ticks, *x),
            None => fmt_tick(*x),
        }
    };
    let ypercent = decor.ypercent;
    let y_fmt = move |y: &f64| -> String {
        if is_empty {
            String::new()
        } else if ypercent {
            format!("{}%", fmt_tick(100.0 * y))
        } else {
            fmt_tick(*y)
        }
    };

    let label_font = (FONT_FAMILY_SYSTEM, tick_size).into_font().color(&BLACK);
    let x_tick_font = (FONT_FAMILY_SYSTEM, tick_size)
        .into_font()
        .transform(match decor.xrot {
            90 => FontTransform::Rotate90,
            180 => FontTransform::Rotate180,
            270 => FontTransform::Rotate270,
            _ => FontTransform::None,
        })
        .color(&BLACK)
        .pos(Pos::new(
            match decor.xtick_ha {
                HAlign::Center => HPos::Center,
                HAlign::Left => HPos::Left,
                HAlign::Right => HPos::Right,
            },
            VPos::Top,
        ));

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(&decor.xlabel)
            .y_desc(&decor.ylabel)
            .axis_desc_style((FONT_FAMILY_SYSTEM, axis_size).into_font().color(&BLACK))
            .label_style(label_font)
            .x_label_style(x_tick_font)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .light_line_style(WHITE.mix(0.7));
        if !decor.xgrid {
            mesh.disable_x_mesh();
        }
        if !decor.ygrid {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;
    }

    if has_secondary {
        chart
            .configure_secondary_axes()
            .y_desc(&decor.y2label)
            .draw()?;
    }

    // Series, then reference lines, then the legend on top.
    for plot in primary {
        for series in &plot.series {
            draw_series_into(&mut chart, series, false)?;
        }
    }
    for plot in secondary {
        for series in &plot.series {
            draw_series_into(&mut chart, series, true)?;
        }
    }

    for plot in primary.iter().chain(secondary.iter()) {
        let y_span = if plot.yright { &y2_range } else { &y_range };
        for &(y, color, width) in &plot.hl {
            let line = [(x_range.start, y), (x_range.end, y)];
            if plot.yright {
                chart.draw_secondary_series(LineSeries::new(line, color.stroke_width(width)))?;
            } else {
                chart.draw_series(LineSeries::new(line, color.stroke_width(width)))?;
            }
        }
        for &(x, color, width) in &plot.vl {
            let line = [(x, y_span.start), (x, y_span.end)];
            if plot.yright {
                chart.draw_secondary_series(LineSeries::new(line, color.stroke_width(width)))?;
            } else {
                chart.draw_series(LineSeries::new(line, color.stroke_width(width)))?;
            }
        }
    }

    if decor.legend_enabled {
        let mut entries: Vec<&LegendEntry> = primary
            .iter()
            .chain(secondary.iter())
            .flat_map(|p| p.legend.iter())
            .collect();
        if decor.legend_options.reverse {
            entries.reverse();
        }
        if !entries.is_empty() {
            register_legend(&mut chart, &entries, &x_range, &y_range)?;
            let legend_size = scaled(
                decor.legend_options.fontsize.unwrap_or(FONT_SIZE_LEGEND),
                scale,
            );
            chart
                .configure_series_labels()
                .position(legend_position(decor.legend_options.loc))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font((FONT_FAMILY_SYSTEM, legend_size).into_font().color(&BLACK))
                .draw()?;
        }
    }

    // Outer index level of multi-indexed bars: a second row of tick labels
    // below the regular ones.
    if let Some(ticks) = outer_ticks {
        let base = area.get_base_pixel();
        let text_style = (FONT_FAMILY_SYSTEM, tick_size).into_font().color(&BLACK);
        for (position, label) in ticks.positions.iter().zip(&ticks.labels) {
            let (px, py) = chart.backend_coord(&(*position, y_range.start));
            let est_width = (label.len() as i32) * tick_size * 6 / 10;
            area.draw(&Text::new(
                label.clone(),
                (
                    px - base.0 - est_width / 2,
                    py - base.1 + scaled(OUTER_TICK_LABEL_PAD, scale),
                ),
                text_style.clone(),
            ))?;
        }
    }

    Ok(())
}

fn categorical_label(ticks: &TickSet, x: f64) -> String {
    for (position, label) in ticks.positions.iter().zip(&ticks.labels) {
        if (position - x).abs() < 1e-6 {
            return label.clone();
        }
    }
    String::new()
}

fn legend_position(loc: LegendLoc) -> SeriesLabelPosition {
    match loc {
        LegendLoc::Best | LegendLoc::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLoc::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLoc::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLoc::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLoc::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLoc::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLoc::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLoc::LowerCenter => SeriesLabelPosition::LowerMiddle,
    }
}

fn register_legend(
    chart: &mut SlotChart,
    entries: &[&LegendEntry],
    x_range: &AxisRange,
    y_range: &AxisRange,
) -> Result<(), Box<dyn Error>> {
    // Invisible anchor points carry the label; the glyph closure draws the
    // swatch in the legend box.
    let anchor = (x_range.start, y_range.start);
    for entry in entries {
        let color = entry.color;
        let anno = chart.draw_series(once(Circle::new(anchor, 0, color.filled())))?;
        anno.label(&entry.label);
        match entry.glyph {
            Glyph::Line => {
                anno.legend(move |(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + 20, y)],
                        color.stroke_width(LINE_WIDTH_LEGEND),
                    )
                });
            }
            Glyph::Patch => {
                anno.legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 18, y + 6)], color.filled())
                });
            }
            Glyph::Marker(shape) => match shape {
                MarkerShape::Circle => {
                    anno.legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
                }
                MarkerShape::Triangle => {
                    anno.legend(move |(x, y)| {
                        TriangleMarker::new((x + 10, y), 5, color.filled())
                    });
                }
                MarkerShape::Cross => {
                    anno.legend(move |(x, y)| {
                        Cross::new((x + 10, y), 5, color.stroke_width(LINE_WIDTH_LEGEND))
                    });
                }
            },
        }
    }
    Ok(())
}

fn draw_series_into(
    chart: &mut SlotChart,
    series: &SeriesDraw,
    secondary: bool,
) -> Result<(), Box<dyn Error>> {
    match series {
        SeriesDraw::Line {
            points,
            color,
            width,
            dash,
        } => {
            let style = color.stroke_width(*width);
            match dash {
                LineDash::Solid => {
                    if secondary {
                        chart.draw_secondary_series(LineSeries::new(points.clone(), style))?;
                    } else {
                        chart.draw_series(LineSeries::new(points.clone(), style))?;
                    }
                }
                LineDash::Dashed | LineDash::DashDot | LineDash::Dotted => {
                    let (size, spacing) = match dash {
                        LineDash::Dashed => DASH_PATTERN,
                        LineDash::DashDot => DASHDOT_PATTERN,
                        _ => DOT_PATTERN,
                    };
                    if secondary {
                        chart.draw_secondary_series(DashedLineSeries::new(
                            points.iter().cloned(),
                            size,
                            spacing,
                            style,
                        ))?;
                    } else {
                        chart.draw_series(DashedLineSeries::new(
                            points.iter().cloned(),
                            size,
                            spacing,
                            style,
                        ))?;
                    }
                }
            }
        }
        SeriesDraw::Markers {
            points,
            color,
            shape,
            size,
        } => match shape {
            MarkerShape::Circle => {
                let elements = points
                    .iter()
                    .map(|&p| Circle::new(p, *size, color.filled()));
                if secondary {
                    chart.draw_secondary_series(elements)?;
                } else {
                    chart.draw_series(elements)?;
                }
            }
            MarkerShape::Triangle => {
                let elements = points
                    .iter()
                    .map(|&p| TriangleMarker::new(p, *size + 1, color.filled()));
                if secondary {
                    chart.draw_secondary_series(elements)?;
                } else {
                    chart.draw_series(elements)?;
                }
            }
            MarkerShape::Cross => {
                let elements = points
                    .iter()
                    .map(|&p| Cross::new(p, *size + 1, color.stroke_width(1)));
                if secondary {
                    chart.draw_secondary_series(elements)?;
                } else {
                    chart.draw_series(elements)?;
                }
            }
        },
        SeriesDraw::ErrorBars {
            points,
            color,
            width,
        } => {
            let elements = points.iter().map(|&(x, lo, mid, hi)| {
                ErrorBar::new_vertical(x, lo, mid, hi, color.stroke_width(*width), 6)
            });
            if secondary {
                chart.draw_secondary_series(elements)?;
            } else {
                chart.draw_series(elements)?;
            }
        }
        SeriesDraw::Area {
            points,
            color,
            alpha,
            border_width,
        } => {
            let series = AreaSeries::new(points.iter().cloned(), 0.0, color.mix(*alpha))
                .border_style(color.stroke_width(*border_width));
            if secondary {
                chart.draw_secondary_series(series)?;
            } else {
                chart.draw_series(series)?;
            }
        }
        SeriesDraw::Bars {
            bars,
            width,
            color,
            hatch,
        } => {
            let half = width / 2.0;
            let rects: Vec<(f64, f64, f64, f64)> = bars
                .iter()
                .filter(|(_, v)| v.is_finite())
                .map(|&(center, value)| {
                    (center - half, value.min(0.0), center + half, value.max(0.0))
                })
                .collect();

            let fills = rects
                .iter()
                .map(|&(x0, y0, x1, y1)| Rectangle::new([(x0, y0), (x1, y1)], color.filled()));
            if secondary {
                chart.draw_secondary_series(fills)?;
            } else {
                chart.draw_series(fills)?;
            }

            let (unit_segments, unit_dots) = hatch.unit_segments(HATCH_LINES_PER_BAR);
            if !unit_segments.is_empty() || !unit_dots.is_empty() {
                let mut strokes = Vec::new();
                let mut dots = Vec::new();
                for &(x0, y0, x1, y1) in &rects {
                    let to_rect =
                        |(u, v): (f64, f64)| (x0 + u * (x1 - x0), y0 + v * (y1 - y0));
                    for [a, b] in &unit_segments {
                        strokes.push(PathElement::new(
                            vec![to_rect(*a), to_rect(*b)],
                            BLACK.stroke_width(1),
                        ));
                    }
                    for &dot in &unit_dots {
                        dots.push(Circle::new(to_rect(dot), 1, BLACK.filled()));
                    }
                }
                if secondary {
                    chart.draw_secondary_series(strokes)?;
                    chart.draw_secondary_series(dots)?;
                } else {
                    chart.draw_series(strokes)?;
                    chart.draw_series(dots)?;
                }
            }

            let edges = rects.iter().map(|&(x0, y0, x1, y1)| {
                Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(LINE_WIDTH_BAR_EDGE))
            });
            if secondary {
                chart.draw_secondary_series(edges)?;
            } else {
                chart.draw_series(edges)?;
            }
        }
        SeriesDraw::BoxGlyph { x, width, stats } => {
            let half = width / 2.0;
            let cap = width / 4.0;
            let mut elements: Vec<PathElement<(f64, f64)>> = vec![
                // Box outline and median.
                PathElement::new(
                    vec![
                        (x - half, stats.q1),
                        (x + half, stats.q1),
                        (x + half, stats.q3),
                        (x - half, stats.q3),
                        (x - half, stats.q1),
                    ],
                    BLACK.stroke_width(LINE_WIDTH_BOX),
                ),
                PathElement::new(
                    vec![(x - half, stats.median), (x + half, stats.median)],
                    COLOR_MEDIAN_LINE.stroke_width(LINE_WIDTH_BOX + 1),
                ),
                // Whisker stems and caps.
                PathElement::new(
                    vec![(*x, stats.q1), (*x, stats.whisker_low)],
                    BLACK.stroke_width(LINE_WIDTH_BOX),
                ),
                PathElement::new(
                    vec![(*x, stats.q3), (*x, stats.whisker_high)],
                    BLACK.stroke_width(LINE_WIDTH_BOX),
                ),
                PathElement::new(
                    vec![(x - cap, stats.whisker_low), (x + cap, stats.whisker_low)],
                    BLACK.stroke_width(LINE_WIDTH_BOX),
                ),
                PathElement::new(
                    vec![(x - cap, stats.whisker_high), (x + cap, stats.whisker_high)],
                    BLACK.stroke_width(LINE_WIDTH_BOX),
                ),
            ];
            if secondary {
                chart.draw_secondary_series(elements)?;
            } else {
                chart.draw_series(elements)?;
            }

            let outliers = stats
                .outliers
                .iter()
                .map(|&v| Circle::new((*x, v), 3, BLACK.stroke_width(1)));
            if secondary {
                chart.draw_secondary_series(outliers)?;
            } else {
                chart.draw_series(outliers)?;
            }
        }
    }
    Ok(())
}
