//! Run-length encoded patterns (`.rle`), the common exchange format for
//! Life patterns.

use crate::{Coord, Error, Result, RuleTable};
use regex::Regex;
use std::sync::LazyLock;

/// Largest width or height accepted from a pattern without an `x = .., y = ..` header
const MAX_EXTENT: i32 = 1 << 16;

/// Moves `at` by `run` cells, staying within `limit` cells of `origin`
fn advance(at: i32, run: i32, origin: i32, limit: i32) -> Result<i32> {
    at.checked_add(run)
        .filter(|&next| i64::from(next) - i64::from(origin) <= i64::from(limit))
        .ok_or_else(|| Error::PatternParse(format!("run of {run} exceeds the {limit} cell extent")))
}

/// A decoded pattern: alive coordinates plus the rule from the header, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub name: Option<String>,
    pub rule: Option<RuleTable>,
    pub cells: Vec<Coord>,
}

/// Converts between alive coordinates and a text pattern format.
///
/// Patterns carry alive cells only. When decoding multi-state RLE, every
/// non-dead letter (`o`, `A`, `B`, ...) reads as an alive cell.
pub trait PositionEncoder {
    fn encode(self, positions: &[Coord]) -> String;
    fn decode(self, value: &str) -> Result<Pattern>;
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: i32, c: char) {
        let append = match run {
            0 => String::new(),
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    pub fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

pub struct RunLengthEncoded {
    name: Option<String>,
    rule: RuleTable,
    header: bool,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }
    pub fn set_rule(mut self, rule: &RuleTable) -> Self {
        self.rule = rule.clone();
        self
    }

    fn encode_header(&self, tl: Coord, br: Coord) -> String {
        let mut header = String::new();
        if !self.header {
            return header;
        }
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {}\n", name));
        }
        if tl != Coord::zero() {
            // position of the top-left corner, as written by other Life tools
            header.push_str(&format!("#R {} {}\n", tl.col, tl.row));
        }
        let size = br - tl;
        header.push_str(&format!(
            "x = {}, y = {}, rule = {}",
            size.col, size.row, self.rule
        ));
        header
    }

    /// Bounding box `[tl, br)` of sorted cells
    fn bounds(alive_cells: &[Coord]) -> (Coord, Coord) {
        if alive_cells.is_empty() {
            return (Coord::zero(), Coord::zero());
        }
        let tl = Coord {
            col: alive_cells.iter().map(|p| p.col).min().unwrap_or_default(),
            // because the cells are sorted, the first cells will always have the lowest row
            row: alive_cells.first().map(|p| p.row).unwrap_or_default(),
        };
        let br = Coord {
            col: alive_cells.iter().map(|p| p.col).max().unwrap_or_default() + 1,
            row: alive_cells.last().map(|p| p.row).unwrap_or_default() + 1,
        };
        (tl, br)
    }

    fn encode_cells(&self, alive_cells: &[Coord], tl: Coord) -> String {
        let mut last = tl - Coord { col: 1, row: 0 };
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(70);
        for pos in alive_cells {
            // if we're one ahead of the last, then only increment the run
            if last.row == pos.row && (last.col + 1) == pos.col {
                alive_run += 1;
                last = *pos;
                continue;
            }

            let lines_run = pos.row - last.row;
            let dead_run = match lines_run {
                0 => pos.col - last.col - 1,
                _ => pos.col - tl.col,
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = *pos;
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }
}
impl Default for RunLengthEncoded {
    fn default() -> Self {
        Self {
            name: None,
            rule: RuleTable::conway(),
            header: true,
        }
    }
}

impl PositionEncoder for RunLengthEncoded {
    fn encode(self, cells: &[Coord]) -> String {
        let mut cells = cells.to_vec();
        cells.sort_unstable();
        cells.dedup();

        let (tl, br) = Self::bounds(&cells);
        format!(
            "{}\n{}\n",
            self.encode_header(tl, br),
            self.encode_cells(&cells, tl)
        )
    }

    fn decode(self, value: &str) -> Result<Pattern> {
        static TOKEN: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"(\d*)([a-zA-Z$!.])").expect("valid regex"));
        static RULE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?i)rule\s*=\s*([A-Za-z0-9/,]+)").expect("valid regex")
        });
        static OFFSET: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^#[RP]\s+(-?\d+)\s+(-?\d+)").expect("valid regex"));
        static SIZE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)").expect("valid regex")
        });

        let mut pattern = Pattern {
            name: self.name,
            ..Pattern::default()
        };
        let mut extent = Coord::new(MAX_EXTENT, MAX_EXTENT);
        let mut origin = Coord::zero();
        let mut cursor = origin;
        'lines_loop: for line in value.lines() {
            let line = line.trim();
            if let Some(name) = line.strip_prefix("#N") {
                pattern.name = Some(name.trim().to_owned());
                continue;
            }
            if let Some(caps) = OFFSET.captures(line) {
                let parse = |i: usize| {
                    caps[i]
                        .parse::<i32>()
                        .map_err(|_| Error::PatternParse(line.to_owned()))
                };
                origin = Coord::new(parse(1)?, parse(2)?);
                cursor = origin;
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            if line.starts_with('x') {
                if let Some(caps) = SIZE.captures(line) {
                    let parse = |i: usize| {
                        caps[i]
                            .parse::<i32>()
                            .map_err(|_| Error::PatternParse(line.to_owned()))
                    };
                    extent = Coord::new(parse(1)?, parse(2)?);
                }
                if let Some(caps) = RULE.captures(line) {
                    pattern.rule = Some(RuleTable::parse(&caps[1])?);
                }
                continue;
            }

            for (_, [run_str, state]) in TOKEN.captures_iter(line).map(|x| x.extract()) {
                let run = match run_str {
                    "" => 1,
                    s => s
                        .parse::<i32>()
                        .map_err(|_| Error::PatternParse(format!("bad run length {s:?}")))?,
                };
                match state {
                    "!" => break 'lines_loop,
                    "b" | "." => cursor.col = advance(cursor.col, run, origin.col, extent.col)?,
                    "$" => {
                        cursor.col = origin.col;
                        cursor.row = advance(cursor.row, run, origin.row, extent.row)?;
                    }
                    // every other letter is a live state in multi-state RLE
                    _ => {
                        let end = advance(cursor.col, run, origin.col, extent.col)?;
                        pattern
                            .cells
                            .extend((cursor.col..end).map(|col| Coord::new(col, cursor.row)));
                        cursor.col = end;
                    }
                }
            }
        }

        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER: &str = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";

    fn glider() -> Vec<Coord> {
        vec![
            Coord::new(1, 0),
            Coord::new(2, 1),
            Coord::new(0, 2),
            Coord::new(1, 2),
            Coord::new(2, 2),
        ]
    }

    #[test]
    fn decodes_glider() {
        let pattern = RunLengthEncoded::default().decode(GLIDER).unwrap();

        assert_eq!(pattern.cells, glider());
        assert_eq!(pattern.name.as_deref(), Some("Glider"));
        assert_eq!(pattern.rule, Some(RuleTable::conway()));
    }

    #[test]
    fn encodes_glider() {
        let encoded = RunLengthEncoded::default().set_name("Glider").encode(&glider());

        assert_eq!(encoded, GLIDER);
    }

    #[test]
    fn encodes_offset_and_rule() {
        let cells = [Coord::new(-2, 5), Coord::new(-1, 5)];
        let encoded = RunLengthEncoded::default()
            .set_rule(&RuleTable::high_life())
            .encode(&cells);

        assert_eq!(encoded, "#R -2 5\nx = 2, y = 1, rule = B36/S23\n2o!\n");

        let decoded = RunLengthEncoded::default().decode(&encoded).unwrap();
        assert_eq!(decoded.cells, cells);
        assert_eq!(decoded.rule, Some(RuleTable::high_life()));
    }

    #[test]
    fn reads_legacy_rule_and_comments() {
        let pattern = RunLengthEncoded::default()
            .decode("#C a blinker\nx = 3, y = 1, rule = 23/3\n3o!")
            .unwrap();

        assert_eq!(pattern.cells.len(), 3);
        assert_eq!(pattern.rule, Some(RuleTable::conway()));
    }

    #[test]
    fn rejects_runs_beyond_extent() {
        let decode = |s: &str| RunLengthEncoded::default().decode(s);

        assert!(decode("x = 3, y = 1, rule = B3/S23\n2000000000o!").is_err());
        assert!(decode("x = 2, y = 1\n3o!").is_err());
        assert!(decode("x = 2, y = 2\no$5$o!").is_err());
        assert!(decode("2000000000o!").is_err());
        assert!(decode("#R 2147483000 0\n2000b!").is_err());

        assert_eq!(decode("x = 3, y = 1\n3o!").unwrap().cells.len(), 3);
        assert_eq!(decode("3b2o!").unwrap().cells, vec![Coord::new(3, 0), Coord::new(4, 0)]);
    }

    #[test]
    fn multi_state_letters_read_as_alive() {
        let pattern = RunLengthEncoded::default()
            .decode("x = 3, y = 1, rule = B2/S/C3\nA.B!")
            .unwrap();

        assert_eq!(pattern.cells, vec![Coord::new(0, 0), Coord::new(2, 0)]);
        assert_eq!(pattern.rule, Some(RuleTable::brians_brain()));
    }

    #[test]
    fn rejects_bad_rule() {
        assert!(RunLengthEncoded::default().decode("x = 1, y = 1, rule = what\no!").is_err());
    }
}
