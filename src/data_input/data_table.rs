// src/data_input/data_table.rs

use csv::ReaderBuilder;
use ndarray::Array1;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A CSV file loaded into memory: the header row plus raw string cells,
/// with numeric access on demand. Lines starting with `#` are comments.
///
/// Each distinct datafile is read once and shared by every plot that
/// references it (see the cache in `main`).
#[derive(Debug)]
pub struct DataTable {
    source: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn read(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)
            .map_err(|e| format!("Error reading '{}': {}", path.display(), e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| format!("Error reading '{}': {}", path.display(), e))?
            .iter()
            .map(String::from)
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record =
                result.map_err(|e| format!("Error reading '{}': {}", path.display(), e))?;
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            // Short rows pad out so column addressing stays uniform.
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(format!("The datafile '{}' is empty", path.display()).into());
        }

        Ok(DataTable {
            source: path.display().to_string(),
            headers,
            rows,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// Header name of a column, with a bounds check against the file.
    pub fn header(&self, col: usize) -> Result<&str, Box<dyn Error>> {
        self.headers.get(col).map(String::as_str).ok_or_else(|| {
            format!(
                "Column {} is out of range for '{}' ({} columns)",
                col,
                self.source,
                self.headers.len()
            )
            .into()
        })
    }

    fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// A column parsed cell-by-cell; empty and non-numeric cells are `None`.
    pub fn numeric_column(&self, col: usize) -> Result<Vec<Option<f64>>, Box<dyn Error>> {
        self.header(col)?;
        Ok((0..self.n_rows())
            .map(|row| parse_numeric(self.cell(row, col)))
            .collect())
    }

    /// A column as a dense array, with NaN standing in for missing cells.
    pub fn numeric_array(&self, col: usize) -> Result<Array1<f64>, Box<dyn Error>> {
        let values = self.numeric_column(col)?;
        Ok(Array1::from_iter(
            values.into_iter().map(|v| v.unwrap_or(f64::NAN)),
        ))
    }

    /// Raw cell text of a column, for categorical axis labels.
    pub fn label_column(&self, col: usize) -> Result<Vec<String>, Box<dyn Error>> {
        self.header(col)?;
        Ok((0..self.n_rows())
            .map(|row| self.cell(row, col).to_string())
            .collect())
    }
}

fn parse_numeric(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table_from(content: &str) -> DataTable {
        let mut file = tempfile_path();
        write!(file.1, "{}", content).unwrap();
        DataTable::read(&file.0).unwrap()
    }

    fn tempfile_path() -> (std::path::PathBuf, File) {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "csvplot_table_test_{}_{:?}.csv",
            std::process::id(),
            std::thread::current().id()
        ));
        let file = File::create(&path).unwrap();
        (path, file)
    }

    #[test]
    fn parses_headers_and_rows() {
        let t = table_from("name,a,b\nfoo,1,2\nbar,3,4\n");
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.n_cols(), 3);
        assert_eq!(t.header(1).unwrap(), "a");
        assert_eq!(t.numeric_column(1).unwrap(), vec![Some(1.0), Some(3.0)]);
        assert_eq!(t.label_column(0).unwrap(), vec!["foo", "bar"]);
    }

    #[test]
    fn skips_comment_lines() {
        let t = table_from("x,y\n# a comment\n0,1\n# another\n1,2\n");
        assert_eq!(t.n_rows(), 2);
    }

    #[test]
    fn missing_cells_are_none() {
        let t = table_from("x,y\n0,\n1,oops\n2,3\n");
        assert_eq!(
            t.numeric_column(1).unwrap(),
            vec![None, None, Some(3.0)]
        );
    }

    #[test]
    fn empty_file_is_an_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("csvplot_empty_{}.csv", std::process::id()));
        std::fs::write(&path, "x,y\n").unwrap();
        let err = DataTable::read(&path).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn out_of_range_column_is_an_error() {
        let t = table_from("x,y\n0,1\n");
        assert!(t.numeric_column(5).is_err());
    }
}
