// src/plot_spec/style.rs
//
// Color and style resolution: colormap-derived palettes, positional `dN`
// color tokens, and the per-series style cycle.

use crate::constants::{DEFAULT_MARKER_SIZE, DEFAULT_PALETTE, LINE_WIDTH_PLOT};
use plotters::style::RGBColor;
use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDash {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineDash {
    pub fn parse(token: &str) -> Result<Self, Box<dyn Error>> {
        match token {
            "-" | "solid" => Ok(LineDash::Solid),
            "--" | "dashed" => Ok(LineDash::Dashed),
            "-." | "dashdot" => Ok(LineDash::DashDot),
            ":" | "dotted" => Ok(LineDash::Dotted),
            other => Err(format!(
                "Line style '{}' is not valid: use '-', '--', '-.' or ':'",
                other
            )
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Triangle,
    Cross,
}

impl MarkerShape {
    pub fn parse(token: &str) -> Result<Self, Box<dyn Error>> {
        match token {
            "o" | "circle" => Ok(MarkerShape::Circle),
            "^" | "triangle" => Ok(MarkerShape::Triangle),
            "x" | "+" | "cross" => Ok(MarkerShape::Cross),
            other => Err(format!(
                "Marker '{}' is not valid: use 'o', '^', 'x' or '+'",
                other
            )
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hatch {
    None,
    Diagonal,
    AntiDiagonal,
    Cross,
    Horizontal,
    Vertical,
    Dots,
}

impl Hatch {
    pub fn parse(token: &str) -> Result<Self, Box<dyn Error>> {
        match token.trim() {
            "" => Ok(Hatch::None),
            "/" => Ok(Hatch::Diagonal),
            "\\" => Ok(Hatch::AntiDiagonal),
            "x" => Ok(Hatch::Cross),
            "-" => Ok(Hatch::Horizontal),
            "|" => Ok(Hatch::Vertical),
            "." => Ok(Hatch::Dots),
            other => Err(format!(
                "Hatch '{}' is not valid: use '', '/', '\\', 'x', '-', '|' or '.'",
                other
            )
            .into()),
        }
    }

    /// Hatch strokes for the unit square, as segment endpoints in [0, 1]²,
    /// plus dot positions for the `.` pattern. Callers map these onto the
    /// bar rectangle in data coordinates.
    pub fn unit_segments(&self, n: usize) -> (Vec<[(f64, f64); 2]>, Vec<(f64, f64)>) {
        let mut segments = Vec::new();
        let mut dots = Vec::new();
        let n = n.max(1);
        match self {
            Hatch::None => {}
            Hatch::Diagonal => diagonal_segments(n, &mut segments),
            Hatch::AntiDiagonal => anti_diagonal_segments(n, &mut segments),
            Hatch::Cross => {
                diagonal_segments(n, &mut segments);
                anti_diagonal_segments(n, &mut segments);
            }
            Hatch::Horizontal => {
                for k in 1..=n {
                    let v = k as f64 / (n + 1) as f64;
                    segments.push([(0.0, v), (1.0, v)]);
                }
            }
            Hatch::Vertical => {
                for k in 1..=n {
                    let u = k as f64 / (n + 1) as f64;
                    segments.push([(u, 0.0), (u, 1.0)]);
                }
            }
            Hatch::Dots => {
                for i in 1..=n {
                    for j in 1..=n {
                        dots.push((
                            i as f64 / (n + 1) as f64,
                            j as f64 / (n + 1) as f64,
                        ));
                    }
                }
            }
        }
        (segments, dots)
    }
}

// Lines v = u + c clipped to the unit square.
fn diagonal_segments(n: usize, out: &mut Vec<[(f64, f64); 2]>) {
    for k in 0..(2 * n + 1) {
        let c = -1.0 + (k as f64 + 0.5) / (n as f64 + 0.5);
        if c >= 0.0 {
            out.push([(0.0, c), (1.0 - c, 1.0)]);
        } else {
            out.push([(-c, 0.0), (1.0, 1.0 + c)]);
        }
    }
}

// Lines v = -u + c clipped to the unit square.
fn anti_diagonal_segments(n: usize, out: &mut Vec<[(f64, f64); 2]>) {
    for k in 0..(2 * n + 1) {
        let c = (k as f64 + 0.5) / (n as f64 + 0.5);
        if c <= 1.0 {
            out.push([(0.0, c), (c, 0.0)]);
        } else {
            out.push([(c - 1.0, 1.0), (1.0, c - 1.0)]);
        }
    }
}

/// Parse a `#rrggbb` hex color or one of the recognized color names.
pub fn parse_color(token: &str) -> Result<RGBColor, Box<dyn Error>> {
    if let Some(hex) = token.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16);
            let g = u8::from_str_radix(&hex[2..4], 16);
            let b = u8::from_str_radix(&hex[4..6], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (r, g, b) {
                return Ok(RGBColor(r, g, b));
            }
        }
        return Err(format!("Color '{}' is not a valid #rrggbb value", token).into());
    }

    let named = match token.to_ascii_lowercase().as_str() {
        "k" | "black" => RGBColor(0, 0, 0),
        "w" | "white" => RGBColor(255, 255, 255),
        "r" | "red" => RGBColor(214, 39, 40),
        "g" | "green" => RGBColor(44, 160, 44),
        "b" | "blue" => RGBColor(31, 119, 180),
        "c" | "cyan" => RGBColor(23, 190, 207),
        "m" | "magenta" => RGBColor(227, 119, 194),
        "y" | "yellow" => RGBColor(255, 221, 0),
        "orange" => RGBColor(255, 127, 14),
        "purple" => RGBColor(148, 103, 189),
        "brown" => RGBColor(140, 86, 75),
        "pink" => RGBColor(247, 182, 210),
        "gray" | "grey" => RGBColor(127, 127, 127),
        "olive" => RGBColor(188, 189, 34),
        "navy" => RGBColor(0, 0, 128),
        "gold" => RGBColor(255, 215, 0),
        _ => return Err(format!("Color '{}' is not recognized", token).into()),
    };
    Ok(named)
}

/// Resolve a color token against the palette in effect: `dN`/`DN` picks the
/// N-th palette entry, anything else parses as a plain color.
pub fn resolve_color_token(token: &str, palette: &[RGBColor]) -> Result<RGBColor, Box<dyn Error>> {
    if let Some(position) = positional_token(token) {
        return palette.get(position).copied().ok_or_else(|| {
            format!(
                "Color token '{}' is out of range: the palette has {} colors",
                token,
                palette.len()
            )
            .into()
        });
    }
    parse_color(token)
}

fn positional_token(token: &str) -> Option<usize> {
    let rest = token.strip_prefix(['d', 'D'])?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Look up a colormap by name.
pub fn colormap_by_name(name: &str) -> Result<colorous::Gradient, Box<dyn Error>> {
    let gradient = match name.to_ascii_lowercase().as_str() {
        "viridis" => colorous::VIRIDIS,
        "inferno" => colorous::INFERNO,
        "magma" => colorous::MAGMA,
        "plasma" => colorous::PLASMA,
        "cividis" => colorous::CIVIDIS,
        "turbo" => colorous::TURBO,
        "cool" => colorous::COOL,
        "warm" => colorous::WARM,
        "rainbow" => colorous::RAINBOW,
        "sinebow" => colorous::SINEBOW,
        "cubehelix" => colorous::CUBEHELIX,
        "spectral" => colorous::SPECTRAL,
        "coolwarm" => colorous::RED_BLUE,
        "blues" => colorous::BLUES,
        "greens" => colorous::GREENS,
        "greys" | "grays" => colorous::GREYS,
        "oranges" => colorous::ORANGES,
        "purples" => colorous::PURPLES,
        "reds" => colorous::REDS,
        other => return Err(format!("Colormap '{}' is not recognized", other).into()),
    };
    Ok(gradient)
}

/// Evenly sample `n` colors from a colormap.
pub fn sample_colormap(gradient: colorous::Gradient, n: usize) -> Vec<RGBColor> {
    (0..n)
        .map(|i| {
            let t = if n <= 1 {
                0.0
            } else {
                i as f64 / (n - 1) as f64
            };
            let c = gradient.eval_continuous(t);
            RGBColor(c.r, c.g, c.b)
        })
        .collect()
}

/// The base palette for a plot: colormap samples when a colormap is named,
/// the default cycle otherwise.
pub fn base_palette(
    colormap: Option<&str>,
    numcolors: usize,
) -> Result<Vec<RGBColor>, Box<dyn Error>> {
    match colormap {
        Some(name) => Ok(sample_colormap(colormap_by_name(name)?, numcolors)),
        None => Ok(DEFAULT_PALETTE.to_vec()),
    }
}

/// Apply positional `color` overrides on top of the base palette. A null
/// (None) entry keeps the palette color; `dN` re-picks from the base
/// palette; anything else parses as a color.
pub fn apply_overrides(
    palette: &[RGBColor],
    overrides: &[Option<String>],
) -> Result<Vec<RGBColor>, Box<dyn Error>> {
    let mut colors = palette.to_vec();
    for (i, token) in overrides.iter().enumerate().take(colors.len()) {
        if let Some(token) = token {
            if token.is_empty() {
                continue;
            }
            colors[i] = resolve_color_token(token, palette)?;
        }
    }
    Ok(colors)
}

/// The fully combined per-series style of one plot.
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub dash: LineDash,
    pub marker: Option<MarkerShape>,
    pub hatch: Hatch,
    pub line_width: u32,
    pub err_line_width: u32,
    pub marker_size: u32,
    pub mark_every: usize,
}

/// An ordered, repeating sequence of style combinations. Series `j` takes
/// entry `(j + start) % len` of every property list independently.
#[derive(Debug, Clone)]
pub struct StyleCycle {
    pub colors: Vec<RGBColor>,
    pub dashes: Vec<LineDash>,
    pub markers: Vec<MarkerShape>,
    pub hatches: Vec<Hatch>,
    pub start: usize,
    pub line_width: u32,
    pub err_line_width: u32,
    pub marker_size: u32,
    pub mark_every: usize,
}

impl Default for StyleCycle {
    fn default() -> Self {
        StyleCycle {
            colors: DEFAULT_PALETTE.to_vec(),
            dashes: Vec::new(),
            markers: Vec::new(),
            hatches: Vec::new(),
            start: 0,
            line_width: LINE_WIDTH_PLOT,
            err_line_width: 1,
            marker_size: DEFAULT_MARKER_SIZE,
            mark_every: 1,
        }
    }
}

impl StyleCycle {
    pub fn style_for(&self, series: usize) -> SeriesStyle {
        let i = series + self.start;
        SeriesStyle {
            color: cycle_pick(&self.colors, i).copied().unwrap_or(RGBColor(0, 0, 0)),
            dash: cycle_pick(&self.dashes, i).copied().unwrap_or(LineDash::Solid),
            marker: cycle_pick(&self.markers, i).copied(),
            hatch: cycle_pick(&self.hatches, i).copied().unwrap_or(Hatch::None),
            line_width: self.line_width,
            err_line_width: self.err_line_width,
            marker_size: self.marker_size,
            mark_every: self.mark_every.max(1),
        }
    }
}

fn cycle_pick<T>(list: &[T], i: usize) -> Option<&T> {
    if list.is_empty() {
        None
    } else {
        Some(&list[i % list.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_tokens_resolve_against_palette() {
        let palette = vec![RGBColor(1, 1, 1), RGBColor(2, 2, 2), RGBColor(3, 3, 3)];
        assert_eq!(resolve_color_token("d0", &palette).unwrap(), palette[0]);
        assert_eq!(resolve_color_token("D2", &palette).unwrap(), palette[2]);
        assert!(resolve_color_token("d3", &palette).is_err());
        // Not a positional token: parses as a color name and fails.
        assert!(resolve_color_token("dx", &palette).is_err());
    }

    #[test]
    fn overrides_keep_null_entries() {
        let palette = vec![RGBColor(1, 1, 1), RGBColor(2, 2, 2)];
        let overrides = vec![None, Some("#000000".to_string())];
        let colors = apply_overrides(&palette, &overrides).unwrap();
        assert_eq!(colors[0], palette[0]);
        assert_eq!(colors[1], RGBColor(0, 0, 0));
    }

    #[test]
    fn colormap_sampling_spans_the_gradient() {
        let colors = sample_colormap(colorous::GREYS, 3);
        assert_eq!(colors.len(), 3);
        // GREYS runs light to dark; the ends must differ.
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn cycle_wraps_with_starting_offset() {
        let cycle = StyleCycle {
            colors: vec![RGBColor(1, 1, 1), RGBColor(2, 2, 2)],
            dashes: vec![LineDash::Solid, LineDash::Dashed, LineDash::Dotted],
            start: 1,
            ..StyleCycle::default()
        };
        let style = cycle.style_for(0);
        assert_eq!(style.color, RGBColor(2, 2, 2));
        assert_eq!(style.dash, LineDash::Dashed);
        let style = cycle.style_for(2);
        assert_eq!(style.color, RGBColor(2, 2, 2));
        assert_eq!(style.dash, LineDash::Solid);
    }

    #[test]
    fn hatch_segments_stay_in_unit_square() {
        for hatch in [
            Hatch::Diagonal,
            Hatch::AntiDiagonal,
            Hatch::Cross,
            Hatch::Horizontal,
            Hatch::Vertical,
        ] {
            let (segments, _) = hatch.unit_segments(4);
            assert!(!segments.is_empty());
            for [a, b] in segments {
                for (u, v) in [a, b] {
                    assert!((-1e-9..=1.0 + 1e-9).contains(&u));
                    assert!((-1e-9..=1.0 + 1e-9).contains(&v));
                }
            }
        }
    }
}
