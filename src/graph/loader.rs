//! `.dag` text format loader.
//!
//! The format is a sequence of numbered sections. A section starts at a line
//! containing its marker (`ID==1`, `ID==3`, `ID==5`, `ID==7`), usually
//! inside a block comment. Everything up to and including the line that
//! closes the comment (`*/`) is skipped; the section's numbers follow,
//! whitespace-separated and free to span lines.
//!
//! | Marker  | Contents                                   |
//! |---------|--------------------------------------------|
//! | `ID==1` | `processors tasks edges`                   |
//! | `ID==3` | processors x processors communication rates |
//! | `ID==5` | tasks x processors computation costs        |
//! | `ID==7` | edges x 3 rows of `from to volume`          |
//!
//! Lines outside any section are ignored.

use std::path::Path;

use tracing::debug;

use super::types::{Edge, TaskGraph};
use crate::error::{Error, Result};

const COUNTS: &str = "ID==1";
const COMM_RATE: &str = "ID==3";
const COMP_COST: &str = "ID==5";
const EDGES: &str = "ID==7";
const COMMENT_END: &str = "*/";

/// Reads and parses a `.dag` file.
pub fn load_dag(path: impl AsRef<Path>) -> Result<TaskGraph> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading task graph");
    let text = std::fs::read_to_string(path)?;
    parse_dag(&text)
}

/// Parses `.dag` text into a [`TaskGraph`].
///
/// # Errors
///
/// [`Error::Parse`] on missing sections, non-numeric tokens, or tables
/// that end early; [`Error::InvalidGraph`] if the parsed tables are
/// inconsistent.
///
/// # Examples
///
/// ```
/// use u_dagsched::graph::parse_dag;
///
/// let text = "\
/// /* ID==1 counts
/// */
/// 2 2 1
/// /* ID==3 comm rate
/// */
/// 0 1
/// 1 0
/// /* ID==5 comp cost
/// */
/// 3 5
/// 2 1
/// /* ID==7 edges
/// */
/// 0 1 10
/// ";
/// let graph = parse_dag(text).unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.comp_cost(1, 1), 1.0);
/// ```
pub fn parse_dag(text: &str) -> Result<TaskGraph> {
    let mut cursor = Cursor::new(text);

    let mut counts: Option<(usize, usize, usize)> = None;
    let mut comm_rate = None;
    let mut comp_cost = None;
    let mut edges = None;

    while let Some((line_no, line)) = cursor.next_line() {
        if line.contains(COUNTS) {
            cursor.skip_header(line);
            let p = cursor.read_count(COUNTS)?;
            let t = cursor.read_count(COUNTS)?;
            let e = cursor.read_count(COUNTS)?;
            counts = Some((p, t, e));
        } else if line.contains(COMM_RATE) {
            let (p, _, _) = require_counts(counts, line_no, COMM_RATE)?;
            cursor.skip_header(line);
            comm_rate = Some(cursor.read_table(p, p, COMM_RATE)?);
        } else if line.contains(COMP_COST) {
            let (p, t, _) = require_counts(counts, line_no, COMP_COST)?;
            cursor.skip_header(line);
            comp_cost = Some(cursor.read_table(t, p, COMP_COST)?);
        } else if line.contains(EDGES) {
            let (_, _, e) = require_counts(counts, line_no, EDGES)?;
            cursor.skip_header(line);
            edges = Some(
                (0..e)
                    .map(|_| -> Result<Edge> {
                        let from = cursor.read_integer(EDGES, "edge endpoint")?;
                        let to = cursor.read_integer(EDGES, "edge endpoint")?;
                        let volume = cursor.next_number(EDGES)?;
                        Ok(Edge::new(from, to, volume))
                    })
                    .collect::<Result<Vec<_>>>()?,
            );
        }
    }

    let missing = |marker: &str| Error::Parse {
        line: 0,
        message: format!("section {marker} not found"),
    };
    let (_, _, e) = counts.ok_or_else(|| missing(COUNTS))?;
    let comm_rate = comm_rate.ok_or_else(|| missing(COMM_RATE))?;
    let comp_cost = comp_cost.ok_or_else(|| missing(COMP_COST))?;
    let edges = match edges {
        Some(edges) => edges,
        None if e == 0 => Vec::new(),
        None => return Err(missing(EDGES)),
    };

    TaskGraph::new(comp_cost, comm_rate, edges)
}

fn require_counts(
    counts: Option<(usize, usize, usize)>,
    line: usize,
    marker: &str,
) -> Result<(usize, usize, usize)> {
    counts.ok_or_else(|| Error::Parse {
        line,
        message: format!("section {marker} appears before {COUNTS}"),
    })
}

/// Line-oriented reader that also hands out whitespace-separated numbers.
struct Cursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    pending: std::str::SplitWhitespace<'a>,
    line_no: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            pending: "".split_whitespace(),
            line_no: 0,
        }
    }

    /// Next whole line, discarding unread tokens of the current one.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.pending = "".split_whitespace();
        let (i, line) = self.lines.next()?;
        self.line_no = i + 1;
        Some((self.line_no, line))
    }

    /// Skips to just past the comment closing the section header.
    fn skip_header(&mut self, header: &str) {
        if header.contains(COMMENT_END) {
            return;
        }
        while let Some((_, line)) = self.next_line() {
            if line.contains(COMMENT_END) {
                break;
            }
        }
    }

    fn next_number(&mut self, marker: &str) -> Result<f64> {
        loop {
            if let Some(token) = self.pending.next() {
                return token.parse::<f64>().map_err(|_| Error::Parse {
                    line: self.line_no,
                    message: format!("expected a number in {marker}, found {token:?}"),
                });
            }
            match self.lines.next() {
                Some((i, line)) => {
                    self.line_no = i + 1;
                    self.pending = line.split_whitespace();
                }
                None => {
                    return Err(Error::Parse {
                        line: 0,
                        message: format!("input ended inside {marker}"),
                    })
                }
            }
        }
    }

    fn read_count(&mut self, marker: &str) -> Result<usize> {
        self.read_integer(marker, "count")
    }

    fn read_integer(&mut self, marker: &str, what: &str) -> Result<usize> {
        let v = self.next_number(marker)?;
        if v >= 0.0 && v.fract() == 0.0 && v.is_finite() {
            Ok(v as usize)
        } else {
            Err(Error::Parse {
                line: self.line_no,
                message: format!("{what} {v} in {marker} is not a non-negative integer"),
            })
        }
    }

    fn read_table(&mut self, rows: usize, cols: usize, marker: &str) -> Result<Vec<Vec<f64>>> {
        (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| self.next_number(marker))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect()
    }
}
