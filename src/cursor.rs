use regex::Regex;

/// One cell coordinate, e.g. column "A", row 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub column: String,
    pub row: u32,
}

/// The destination window for the next append. Both ends sit on the same
/// row; only the row number ever moves, the columns are fixed for the life
/// of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Range shifted down by the number of rows the destination reported as
    /// written. The reported count is the sole source of truth here; the
    /// destination is never read back, so a misreported count desyncs the
    /// cursor permanently.
    pub fn advance(&self, written_rows: u32) -> CellRange {
        if written_rows == 0 {
            return self.clone();
        }
        CellRange {
            start: CellRef {
                column: self.start.column.clone(),
                row: self.start.row + written_rows,
            },
            end: CellRef {
                column: self.end.column.clone(),
                row: self.end.row + written_rows,
            },
        }
    }

    /// A1 notation, e.g. "A4:S4".
    pub fn a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            self.start.column, self.start.row, self.end.column, self.end.row
        )
    }

    /// Worksheet-qualified A1 notation, e.g. "Sheet1!A4:S4".
    pub fn qualified(&self, worksheet: &str) -> String {
        format!("{}!{}", worksheet, self.a1())
    }
}

impl std::fmt::Display for CellRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.a1())
    }
}

pub struct CellRangeParser {
    // Splits "A4" into column letters and a 1-based row number.
    cell_regex: Regex,
}

impl CellRangeParser {
    pub fn new() -> anyhow::Result<Self> {
        let cell_regex = Regex::new(r"^([A-Z]+)([1-9][0-9]*)$")?;
        Ok(Self { cell_regex })
    }

    pub fn parse_cell(&self, cell: &str) -> anyhow::Result<CellRef> {
        let Some(caps) = self.cell_regex.captures(cell) else {
            return Err(anyhow::anyhow!("not a valid cell reference: {}", cell));
        };
        let column = caps[1].to_string();
        let row = caps[2].parse::<u32>()?;
        Ok(CellRef { column, row })
    }

    /// Parse a start/end pair into a single-row range.
    pub fn parse_range(&self, start: &str, end: &str) -> anyhow::Result<CellRange> {
        let start = self.parse_cell(start)?;
        let end = self.parse_cell(end)?;
        if start.row != end.row {
            return Err(anyhow::anyhow!(
                "append window must span one row, got {}{} to {}{}",
                start.column,
                start.row,
                end.column,
                end.row
            ));
        }
        Ok(CellRange { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start_row: u32) -> CellRange {
        CellRangeParser::new()
            .unwrap()
            .parse_range(&format!("A{}", start_row), &format!("S{}", start_row))
            .unwrap()
    }

    #[test]
    fn parses_column_and_row() {
        let parser = CellRangeParser::new().unwrap();
        let cell = parser.parse_cell("AB12").unwrap();
        assert_eq!(cell.column, "AB");
        assert_eq!(cell.row, 12);
    }

    #[test]
    fn rejects_malformed_cells() {
        let parser = CellRangeParser::new().unwrap();
        assert!(parser.parse_cell("4A").is_err());
        assert!(parser.parse_cell("A0").is_err());
        assert!(parser.parse_cell("").is_err());
    }

    #[test]
    fn rejects_multi_row_window() {
        let parser = CellRangeParser::new().unwrap();
        assert!(parser.parse_range("A4", "S5").is_err());
    }

    #[test]
    fn advance_adds_written_rows() {
        let r = range(4);
        for n in 0..20 {
            let next = r.advance(n);
            assert_eq!(next.start.row, r.start.row + n);
            assert_eq!(next.end.row, r.end.row + n);
            assert_eq!(next.start.column, "A");
            assert_eq!(next.end.column, "S");
        }
    }

    #[test]
    fn advance_zero_is_identity() {
        let r = range(4);
        assert_eq!(r.advance(0), r);
    }

    #[test]
    fn serialized_advances_are_contiguous() {
        let counts = [1u32, 3, 2, 1, 5];
        let mut cursor = range(4);
        let mut windows = Vec::new();
        for n in counts {
            windows.push((cursor.start.row, cursor.start.row + n - 1));
            cursor = cursor.advance(n);
        }
        for pair in windows.windows(2) {
            let (_, prev_last) = pair[0];
            let (next_first, _) = pair[1];
            // No gap and no overlap between consecutive windows.
            assert_eq!(next_first, prev_last + 1);
        }
    }

    #[test]
    fn a1_rendering() {
        let r = range(4);
        assert_eq!(r.a1(), "A4:S4");
        assert_eq!(r.qualified("Sheet1"), "Sheet1!A4:S4");
        assert_eq!(r.advance(1).a1(), "A5:S5");
    }
}
