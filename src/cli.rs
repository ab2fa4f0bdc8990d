// src/cli.rs

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

/// Line, area, bar, box and scatter plots for CSV files, rendered into a
/// multi-page PDF.
#[derive(Parser, Debug)]
#[command(
    author,
    version = crate::crate_version(),
    about = "Line, area, bar, box and scatter plots for CSV files",
    long_about = None
)]
pub struct Cli {
    /// Plot description as a YAML mapping, e.g.
    /// --plot '{kind: line, datafile: input.csv, index: 0, cols: [1, 2]}'.
    /// Repeat to define more plots.
    #[arg(short = 'p', long = "plot", value_name = "PLOT", required = true)]
    pub plots: Vec<String>,

    /// Plot description merged as defaults under every --plot.
    #[arg(long = "plot-base", value_name = "PLOT", default_value = "{}")]
    pub plot_base: String,

    /// Number of rows and columns of plots. Repeat to describe the pages
    /// of a multi-page PDF; plots fill the grid left-right, top-bottom.
    #[arg(short = 'g', long = "grid", num_args = 2, value_names = ["ROWS", "COLS"], value_parser = clap::value_parser!(usize))]
    pub grid: Vec<Vec<usize>>,

    /// Title for each page; when used, one per --grid.
    #[arg(long = "title", value_name = "TITLE")]
    pub titles: Vec<String>,

    /// Equalize the X limits of the given subplot IDs. Repeat for
    /// independent groups.
    #[arg(long = "equal-xaxes", num_args = 1.., value_name = "PLOT_ID", value_parser = clap::value_parser!(usize))]
    pub equal_xaxes: Vec<Vec<usize>>,

    /// Equalize the Y limits of the given subplot IDs. Repeat for
    /// independent groups.
    #[arg(long = "equal-yaxes", num_args = 1.., value_name = "PLOT_ID", value_parser = clap::value_parser!(usize))]
    pub equal_yaxes: Vec<Vec<usize>>,

    /// Size of each page in inches.
    #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values_t = [11.6, 8.2])]
    pub size: Vec<f64>,

    /// Dots per inch.
    #[arg(long, default_value_t = 100)]
    pub dpi: u32,

    /// Relative region of the page holding the plots.
    #[arg(
        long,
        num_args = 4,
        value_names = ["LEFT", "BOTTOM", "RIGHT", "TOP"],
        default_values_t = [0.0, 0.0, 1.0, 1.0],
        allow_negative_numbers = true
    )]
    pub rect: Vec<f64>,

    /// PDF output path.
    #[arg(short = 'o', long, default_value = "./plot.pdf")]
    pub output: PathBuf,
}

impl Cli {
    /// Checks clap cannot express: value ranges and cross-flag coupling.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.size.iter().any(|&v| !(v > 0.0)) {
            return Err("--size values must be positive".into());
        }
        if self.dpi == 0 {
            return Err("--dpi must be positive".into());
        }
        let [left, bottom, right, top] = [self.rect[0], self.rect[1], self.rect[2], self.rect[3]];
        if !(0.0..=1.0).contains(&left)
            || !(0.0..=1.0).contains(&bottom)
            || !(0.0..=1.0).contains(&right)
            || !(0.0..=1.0).contains(&top)
            || left >= right
            || bottom >= top
        {
            return Err(
                "--rect must satisfy 0 <= LEFT < RIGHT <= 1 and 0 <= BOTTOM < TOP <= 1".into(),
            );
        }
        for pair in &self.grid {
            if pair.iter().any(|&v| v == 0) {
                return Err("--grid rows and columns must be positive".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn grids_group_per_occurrence() {
        let cli = parse(&[
            "csvplot", "-p", "{}", "-g", "2", "3", "-g", "1", "2",
        ]);
        assert_eq!(cli.grid, vec![vec![2, 3], vec![1, 2]]);
        cli.validate().unwrap();
    }

    #[test]
    fn equalize_groups_stay_separate() {
        let cli = parse(&[
            "csvplot",
            "-p",
            "{}",
            "--equal-yaxes",
            "0",
            "1",
            "--equal-yaxes",
            "2",
            "3",
        ]);
        assert_eq!(cli.equal_yaxes, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn defaults_match_the_documented_ones() {
        let cli = parse(&["csvplot", "-p", "{}"]);
        assert_eq!(cli.size, vec![11.6, 8.2]);
        assert_eq!(cli.dpi, 100);
        assert_eq!(cli.rect, vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(cli.output, PathBuf::from("./plot.pdf"));
        cli.validate().unwrap();
    }

    #[test]
    fn rect_must_be_ordered() {
        let cli = parse(&[
            "csvplot", "-p", "{}", "--rect", "0.5", "0", "0.4", "1",
        ]);
        assert!(cli.validate().is_err());
    }
}
