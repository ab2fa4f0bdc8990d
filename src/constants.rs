// src/constants.rs

use plotters::style::RGBColor;

// Font sizes in pixels at the reference DPI (100). Scaled by --dpi at render time.
pub const FONT_SIZE_PAGE_TITLE: i32 = 26;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 15;
pub const FONT_SIZE_TICK_LABEL: i32 = 12;
pub const FONT_SIZE_LEGEND: i32 = 12;

pub const REFERENCE_DPI: u32 = 100;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;
pub const LINE_WIDTH_REFLINE: u32 = 1;
pub const LINE_WIDTH_BAR_EDGE: u32 = 1;
pub const LINE_WIDTH_BOX: u32 = 1;

pub const DEFAULT_MARKER_SIZE: u32 = 4;

// Dash pattern geometry in pixels: (dash length, gap).
pub const DASH_PATTERN: (u32, u32) = (8, 5);
pub const DASHDOT_PATTERN: (u32, u32) = (5, 5);
pub const DOT_PATTERN: (u32, u32) = (1, 5);

// --- Bar layout ---

// Space between two row blocks, as a fraction of the bar width.
pub const GROUP_SEPARATION_FACTOR: f64 = 0.5;
// Extra separation injected per index level at a level-code change, as a
// fraction of the bar width:
// width * (LEVEL_SEPARATION_FACTOR * level + GROUP_SEPARATION_FACTOR).
pub const LEVEL_SEPARATION_FACTOR: f64 = 1.75;
// Vertical drop of the outer-level tick labels below the regular ones, px.
pub const OUTER_TICK_LABEL_PAD: i32 = 22;

pub const DEFAULT_BAR_WIDTH: f64 = 1.0;
pub const DEFAULT_BOX_WIDTH: f64 = 0.5;
pub const HATCH_LINES_PER_BAR: usize = 5;

// Whiskers extend to the farthest datum within this many IQRs of the box.
pub const BOX_WHISKER_SPAN: f64 = 1.5;

// Alpha for overlapping (non-stacked) area fills.
pub const AREA_FILL_ALPHA: f64 = 0.5;

// The ten-color default cycle; `d0`..`d9` tokens resolve against the
// palette in effect, which is this one unless a colormap is requested.
pub const DEFAULT_PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

pub const COLOR_MEDIAN_LINE: RGBColor = RGBColor(0xd6, 0x27, 0x28);

// src/constants.rs
