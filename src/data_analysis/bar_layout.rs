// src/data_analysis/bar_layout.rs
//
// Closed-form bar positioning for grouped, stacked and multi-indexed bar
// charts. Positions are bar centers in data units.

use crate::constants::{GROUP_SEPARATION_FACTOR, LEVEL_SEPARATION_FACTOR};
use ndarray::{Array2, Axis};

/// Distance between the starts of two consecutive row blocks of a grouped
/// bar chart: one bar per series plus half a bar width of separation.
pub fn block_stride(n_series: usize, width: f64) -> f64 {
    width * n_series as f64 + GROUP_SEPARATION_FACTOR * width
}

/// Bar centers for one series of a grouped bar chart. `series` is the
/// zero-based series number; fractional values are allowed so the x-tick
/// positions can be computed as the "series" sitting mid-block.
pub fn grouped_positions(n_rows: usize, n_series: usize, series: f64, width: f64) -> Vec<f64> {
    let stride = block_stride(n_series, width);
    (0..n_rows)
        .map(|row| row as f64 * stride + width * series)
        .collect()
}

/// X-tick positions of a grouped bar chart: the center of each row block.
pub fn grouped_tick_positions(n_rows: usize, n_series: usize, width: f64) -> Vec<f64> {
    grouped_positions(n_rows, n_series, n_series as f64 / 2.0 - 0.5, width)
}

/// Bar centers of a stacked bar chart: one bar per row, half a bar width
/// of separation between rows. Also the x-tick positions.
pub fn stacked_positions(n_rows: usize, width: f64) -> Vec<f64> {
    let stride = width + GROUP_SEPARATION_FACTOR * width;
    (0..n_rows)
        .map(|row| row as f64 * stride + width / 2.0)
        .collect()
}

/// Map every value of a categorical column to a code, numbered by first
/// appearance, so consecutive-row comparisons work on integers.
pub fn factorize(values: &[String]) -> Vec<usize> {
    let mut codes = Vec::with_capacity(values.len());
    let mut seen: Vec<&String> = Vec::new();
    for value in values {
        match seen.iter().position(|v| *v == value) {
            Some(code) => codes.push(code),
            None => {
                codes.push(seen.len());
                seen.push(value);
            }
        }
    }
    codes
}

/// Bar centers of a multi-indexed bar chart. `level_codes` holds the
/// factorized codes of each index level, outermost first. Walking the rows
/// in order, level `l` (counted from the innermost) injects
/// `width * (1.75 * l + 0.5)` of extra separation wherever its code changes
/// from the previous row; the running sums accumulate per level and the
/// position of row `i` is their total plus `width * i`.
pub fn multi_index_positions(level_codes: &[Vec<usize>], width: f64) -> Vec<f64> {
    let n_rows = level_codes.first().map_or(0, Vec::len);
    let mut positions = vec![0.0; n_rows];

    for (level, codes) in level_codes.iter().rev().enumerate() {
        let sep = width * (LEVEL_SEPARATION_FACTOR * level as f64 + GROUP_SEPARATION_FACTOR);
        let mut running = 0.0;
        for row in 0..n_rows {
            if row > 0 && codes[row] != codes[row - 1] {
                running += sep;
            }
            positions[row] += running;
        }
    }

    for (row, position) in positions.iter_mut().enumerate() {
        *position += width * row as f64;
    }
    positions
}

/// Midpoint of each run of equal codes, measured on the bar positions.
/// These are the tick positions for one index level.
pub fn level_tick_positions(codes: &[usize], positions: &[f64]) -> Vec<f64> {
    let mut ticks = Vec::new();
    for (start, end) in level_segments(codes) {
        ticks.push((positions[start] + positions[end]) / 2.0);
    }
    ticks
}

/// Row index at which each run of equal codes starts; used to pick the
/// label text for each tick of an index level.
pub fn level_segment_starts(codes: &[usize]) -> Vec<usize> {
    level_segments(codes).into_iter().map(|(s, _)| s).collect()
}

fn level_segments(codes: &[usize]) -> Vec<(usize, usize)> {
    let mut segments = Vec::new();
    if codes.is_empty() {
        return segments;
    }
    let mut start = 0;
    for row in 1..codes.len() {
        if codes[row] != codes[row - 1] {
            segments.push((start, row - 1));
            start = row;
        }
    }
    segments.push((start, codes.len() - 1));
    segments
}

/// In-place cumulative sum across the selected columns, so that column `k`
/// holds the stacked height of columns `0..=k`.
pub fn cumulative_columns(values: &mut Array2<f64>) {
    values.accumulate_axis_inplace(Axis(1), |&prev, cur| *cur += prev);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn grouped_offsets_and_stride() {
        // Three series of width 2: stride = 2*3 + 0.5*2 = 7.
        assert_eq!(block_stride(3, 2.0), 7.0);
        let s0 = grouped_positions(3, 3, 0.0, 2.0);
        let s1 = grouped_positions(3, 3, 1.0, 2.0);
        assert_eq!(s0, vec![0.0, 7.0, 14.0]);
        assert_eq!(s1, vec![2.0, 9.0, 16.0]);
        // The i-th series sits i*width after the block start.
        for (a, b) in s0.iter().zip(&s1) {
            assert_eq!(b - a, 2.0);
        }
    }

    #[test]
    fn grouped_ticks_sit_mid_block() {
        // Two series of width 1: block spans centers 0..1, tick at 0.5.
        assert_eq!(grouped_tick_positions(2, 2, 1.0), vec![0.5, 3.0]);
    }

    #[test]
    fn stacked_positions_stride() {
        assert_eq!(stacked_positions(3, 1.0), vec![0.5, 2.0, 3.5]);
    }

    #[test]
    fn factorize_by_first_appearance() {
        let values: Vec<String> = ["b", "b", "a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(factorize(&values), vec![0, 0, 1, 2]);
    }

    #[test]
    fn multi_index_spacing_only_at_changes() {
        // Outer: A A B B, inner: x y x y, width 1.
        // Inner level (l=0) injects 0.5 at rows 1, 2, 3; outer level (l=1)
        // injects 2.25 at row 2. Plus width*i.
        let outer = vec![0, 0, 1, 1];
        let inner = vec![0, 1, 0, 1];
        let positions = multi_index_positions(&[outer, inner], 1.0);
        assert_eq!(positions, vec![0.0, 1.5, 5.25, 6.75]);
    }

    #[test]
    fn multi_index_without_inner_change_at_boundary() {
        // Inner code does not change across the outer boundary: only the
        // outer separation applies there.
        let outer = vec![0, 1];
        let inner = vec![0, 0];
        let positions = multi_index_positions(&[outer, inner], 1.0);
        assert_eq!(positions, vec![0.0, 3.25]);
    }

    #[test]
    fn level_ticks_are_segment_midpoints() {
        let codes = vec![0, 0, 1, 1];
        let positions = vec![0.0, 1.5, 5.25, 6.75];
        assert_eq!(level_tick_positions(&codes, &positions), vec![0.75, 6.0]);
        assert_eq!(level_segment_starts(&codes), vec![0, 2]);
    }

    #[test]
    fn cumulative_columns_stack() {
        let mut values = array![[1.0, 2.0, 3.0], [10.0, 20.0, 30.0]];
        cumulative_columns(&mut values);
        assert_eq!(values, array![[1.0, 3.0, 6.0], [10.0, 30.0, 60.0]]);
    }
}
