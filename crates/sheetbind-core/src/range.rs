//! Row/column range addressing
//!
//! Ranges address a rectangular region of one tab using 1-based row and
//! column indices, and translate to and from the vendor's A1 notation
//! (e.g. `'My Tab'!B2:D10`). The end row may be left open to address every
//! data row below the start (`'My Tab'!B2:D`).

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum number of columns in a tab (vendor grid limit, column ZZZ)
pub const MAX_COLS: u32 = 18_278;

/// A rectangular region of cells within one tab.
///
/// All indices are 1-based and inclusive. `end_row == None` means the range
/// extends to the last data row of the tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRange {
    /// Tab (sheet) name
    pub tab: String,
    /// First column (1-based)
    pub start_column: u32,
    /// First row (1-based)
    pub start_row: u32,
    /// Last column (1-based, inclusive)
    pub end_column: u32,
    /// Last row (1-based, inclusive), or `None` for an open-ended range
    pub end_row: Option<u32>,
}

impl SheetRange {
    /// Create a bounded range.
    pub fn new(
        tab: impl Into<String>,
        start_column: u32,
        start_row: u32,
        end_column: u32,
        end_row: u32,
    ) -> Result<Self> {
        let range = Self {
            tab: tab.into(),
            start_column,
            start_row,
            end_column,
            end_row: Some(end_row),
        };
        range.validate()?;
        Ok(range)
    }

    /// Create a range with no end row, covering every data row from
    /// `start_row` down.
    pub fn open_ended(
        tab: impl Into<String>,
        start_column: u32,
        start_row: u32,
        end_column: u32,
    ) -> Result<Self> {
        let range = Self {
            tab: tab.into(),
            start_column,
            start_row,
            end_column,
            end_row: None,
        };
        range.validate()?;
        Ok(range)
    }

    /// Create a single-cell range.
    pub fn cell(tab: impl Into<String>, column: u32, row: u32) -> Result<Self> {
        Self::new(tab, column, row, column, row)
    }

    fn validate(&self) -> Result<()> {
        if self.start_column == 0 || self.start_column > MAX_COLS {
            return Err(Error::InvalidColumn(self.start_column));
        }
        if self.end_column == 0 || self.end_column > MAX_COLS {
            return Err(Error::InvalidColumn(self.end_column));
        }
        if self.start_row == 0 {
            return Err(Error::InvalidRow(self.start_row));
        }
        if self.end_column < self.start_column {
            return Err(Error::InvalidRange(format!(
                "end column {} before start column {}",
                self.end_column, self.start_column
            )));
        }
        if let Some(end_row) = self.end_row {
            if end_row == 0 {
                return Err(Error::InvalidRow(end_row));
            }
            if end_row < self.start_row {
                return Err(Error::InvalidRange(format!(
                    "end row {} before start row {}",
                    end_row, self.start_row
                )));
            }
        }
        Ok(())
    }

    /// Number of columns in the range
    pub fn column_count(&self) -> u32 {
        self.end_column - self.start_column + 1
    }

    /// Number of rows in the range, if bounded
    pub fn row_count(&self) -> Option<u32> {
        self.end_row.map(|end| end - self.start_row + 1)
    }

    /// Format as vendor A1 notation, quoting the tab name when needed.
    ///
    /// Open-ended ranges omit the end row (`'Tab'!A2:D`); single cells
    /// collapse to one reference (`'Tab'!C5`).
    pub fn to_a1(&self) -> String {
        let tab = quote_tab(&self.tab);
        let start = format!("{}{}", column_to_letters(self.start_column), self.start_row);
        match self.end_row {
            Some(end_row) => {
                if end_row == self.start_row && self.end_column == self.start_column {
                    format!("{}!{}", tab, start)
                } else {
                    format!(
                        "{}!{}:{}{}",
                        tab,
                        start,
                        column_to_letters(self.end_column),
                        end_row
                    )
                }
            }
            None => format!("{}!{}:{}", tab, start, column_to_letters(self.end_column)),
        }
    }

    /// Parse vendor A1 notation (`Tab!A1:C10`, `'My Tab'!B2:D`, `Sheet1!C5`).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (tab, rest) = split_tab(s)?;

        let (start, end) = match rest.find(':') {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
            None => (rest, None),
        };

        let (start_column, start_row) = parse_cell_ref(start)?;
        let start_row = start_row.unwrap_or(1);

        match end {
            None => Self::new(tab, start_column, start_row, start_column, start_row),
            Some(end) => {
                let (end_column, end_row) = parse_cell_ref(end)?;
                match end_row {
                    Some(end_row) => Self::new(tab, start_column, start_row, end_column, end_row),
                    None => Self::open_ended(tab, start_column, start_row, end_column),
                }
            }
        }
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl FromStr for SheetRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA, ...)
pub fn column_to_letters(column: u32) -> String {
    let mut result = String::new();
    let mut n = column;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert column letters to a 1-based index (A = 1, Z = 26, AA = 27, ...)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidRange("empty column letters".into()));
    }

    let mut column: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidRange(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        column = column * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if column > MAX_COLS {
            return Err(Error::InvalidColumn(column));
        }
    }

    Ok(column)
}

/// Quote a tab name for A1 notation when it contains anything beyond
/// letters, digits and underscores. Embedded quotes double per the vendor
/// grammar.
pub fn quote_tab(tab: &str) -> String {
    let plain = !tab.is_empty()
        && tab.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !tab.chars().next().is_some_and(|c| c.is_ascii_digit());

    if plain {
        tab.to_string()
    } else {
        format!("'{}'", tab.replace('\'', "''"))
    }
}

/// Split `Tab!A1:C10` into the tab name and the cell part.
fn split_tab(s: &str) -> Result<(String, &str)> {
    if let Some(rest) = s.strip_prefix('\'') {
        // Quoted tab name: scan for the closing quote, honoring '' escapes
        let mut tab = String::new();
        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if chars.peek().map(|&(_, c)| c) == Some('\'') {
                    tab.push('\'');
                    chars.next();
                } else {
                    let after = &rest[i + 1..];
                    let cells = after.strip_prefix('!').ok_or_else(|| {
                        Error::InvalidRange(format!("missing '!' after tab name in '{}'", s))
                    })?;
                    return Ok((tab, cells));
                }
            } else {
                tab.push(c);
            }
        }
        Err(Error::InvalidRange(format!("unterminated tab quote in '{}'", s)))
    } else {
        match s.find('!') {
            Some(pos) => Ok((s[..pos].to_string(), &s[pos + 1..])),
            None => Err(Error::InvalidRange(format!("missing tab name in '{}'", s))),
        }
    }
}

/// Parse a cell reference like `C5`, or a bare column like `C` (no row).
fn parse_cell_ref(s: &str) -> Result<(u32, Option<u32>)> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidRange("empty cell reference".into()));
    }

    let letters_end = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let column = letters_to_column(&s[..letters_end])?;

    let row_str = &s[letters_end..];
    if row_str.is_empty() {
        return Ok((column, None));
    }

    let row: u32 = row_str
        .parse()
        .map_err(|_| Error::InvalidRange(format!("invalid row number in '{}'", s)))?;
    if row == 0 {
        return Err(Error::InvalidRow(0));
    }

    Ok((column, Some(row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(2), "B");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(28), "AB");
        assert_eq!(column_to_letters(702), "ZZ");
        assert_eq!(column_to_letters(703), "AAA");
        assert_eq!(column_to_letters(MAX_COLS), "ZZZ");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A").unwrap(), 1);
        assert_eq!(letters_to_column("Z").unwrap(), 26);
        assert_eq!(letters_to_column("AA").unwrap(), 27);
        assert_eq!(letters_to_column("ZZ").unwrap(), 702);
        assert_eq!(letters_to_column("ZZZ").unwrap(), MAX_COLS);

        // Case insensitive
        assert_eq!(letters_to_column("a").unwrap(), 1);
        assert_eq!(letters_to_column("aa").unwrap(), 27);

        assert!(letters_to_column("").is_err());
        assert!(letters_to_column("A1").is_err());
        assert!(letters_to_column("AAAA").is_err());
    }

    #[test]
    fn test_to_a1_bounded() {
        let range = SheetRange::new("Sheet1", 1, 2, 4, 10).unwrap();
        assert_eq!(range.to_a1(), "Sheet1!A2:D10");
    }

    #[test]
    fn test_to_a1_open_ended() {
        let range = SheetRange::open_ended("Sheet1", 2, 2, 4).unwrap();
        assert_eq!(range.to_a1(), "Sheet1!B2:D");
    }

    #[test]
    fn test_to_a1_single_cell() {
        let range = SheetRange::cell("Sheet1", 3, 5).unwrap();
        assert_eq!(range.to_a1(), "Sheet1!C5");
    }

    #[test]
    fn test_to_a1_quotes_tab_names() {
        let range = SheetRange::cell("My Tab", 1, 1).unwrap();
        assert_eq!(range.to_a1(), "'My Tab'!A1");

        let range = SheetRange::cell("It's", 1, 1).unwrap();
        assert_eq!(range.to_a1(), "'It''s'!A1");

        // Leading digit forces quoting
        let range = SheetRange::cell("2024", 1, 1).unwrap();
        assert_eq!(range.to_a1(), "'2024'!A1");
    }

    #[test]
    fn test_parse_bounded() {
        let range = SheetRange::parse("Sheet1!A2:D10").unwrap();
        assert_eq!(range.tab, "Sheet1");
        assert_eq!(range.start_column, 1);
        assert_eq!(range.start_row, 2);
        assert_eq!(range.end_column, 4);
        assert_eq!(range.end_row, Some(10));
    }

    #[test]
    fn test_parse_open_ended() {
        let range = SheetRange::parse("Sheet1!B2:D").unwrap();
        assert_eq!(range.end_row, None);
        assert_eq!(range.end_column, 4);
    }

    #[test]
    fn test_parse_quoted_tab() {
        let range = SheetRange::parse("'My Tab'!A1:B2").unwrap();
        assert_eq!(range.tab, "My Tab");

        let range = SheetRange::parse("'It''s'!C5").unwrap();
        assert_eq!(range.tab, "It's");
        assert_eq!(range.start_column, 3);
        assert_eq!(range.start_row, 5);
    }

    #[test]
    fn test_parse_roundtrip() {
        for s in ["Sheet1!A2:D10", "'My Tab'!B2:D", "Sheet1!C5"] {
            let range = SheetRange::parse(s).unwrap();
            assert_eq!(range.to_a1(), s);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(SheetRange::parse("A1:B2").is_err()); // no tab
        assert!(SheetRange::parse("Sheet1!").is_err());
        assert!(SheetRange::parse("Sheet1!A0").is_err());
        assert!(SheetRange::parse("'Tab!A1").is_err()); // unterminated quote
        assert!(SheetRange::parse("Sheet1!D2:A10").is_err()); // inverted
    }

    #[test]
    fn test_validation() {
        assert!(SheetRange::new("T", 0, 1, 1, 1).is_err());
        assert!(SheetRange::new("T", 1, 0, 1, 1).is_err());
        assert!(SheetRange::new("T", 2, 1, 1, 1).is_err());
        assert!(SheetRange::new("T", 1, 5, 1, 4).is_err());
        assert!(SheetRange::open_ended("T", 1, 1, MAX_COLS + 1).is_err());
    }

    #[test]
    fn test_counts() {
        let range = SheetRange::new("T", 2, 3, 4, 7).unwrap();
        assert_eq!(range.column_count(), 3);
        assert_eq!(range.row_count(), Some(5));

        let open = SheetRange::open_ended("T", 1, 1, 2).unwrap();
        assert_eq!(open.row_count(), None);
    }
}
