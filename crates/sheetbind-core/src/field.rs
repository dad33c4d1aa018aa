//! Field metadata and typed value conversion
//!
//! A record field is declared by a [`FieldSpec`]: a 1-based column index, a
//! display name (the header cell text), and a [`FieldKind`]. The spec
//! converts between the untyped [`CellValue`] a tab stores and the typed
//! [`FieldValue`] a record carries.

use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::value::CellValue;

/// The primitive type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-form text
    Text,
    /// Floating-point number
    Number,
    /// Monetary amount with decimal precision
    Currency,
    /// Phone number, normalized to a digit string
    PhoneNumber,
    /// Date and time, stored by the service as a serial number
    DateTime,
    /// TRUE/FALSE
    Boolean,
}

impl FieldKind {
    /// Human-readable kind name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Currency => "currency",
            FieldKind::PhoneNumber => "phone number",
            FieldKind::DateTime => "date/time",
            FieldKind::Boolean => "boolean",
        }
    }
}

/// Declares how one record field maps onto a tab column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column the field lives in (1-based)
    pub column: u32,
    /// Display name, expected in the tab's header row
    pub name: &'static str,
    /// Primitive type of the field
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declare a field at a 1-based column
    pub const fn new(column: u32, name: &'static str, kind: FieldKind) -> Self {
        Self { column, name, kind }
    }

    /// Convert a cell into this field's typed value.
    ///
    /// Empty cells become [`FieldValue::Empty`]; anything else must be
    /// convertible under the declared kind.
    pub fn parse(&self, cell: &CellValue) -> Result<FieldValue> {
        if cell.is_empty() {
            return Ok(FieldValue::Empty);
        }

        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(match cell {
                CellValue::String(s) => s.clone(),
                other => other.to_string(),
            })),

            FieldKind::Number => match cell {
                CellValue::Number(n) => Ok(FieldValue::Number(*n)),
                CellValue::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(FieldValue::Number)
                    .map_err(|_| self.parse_error(s)),
                other => Err(self.type_error(other)),
            },

            FieldKind::Currency => match cell {
                CellValue::Number(n) => Decimal::try_from(*n)
                    .map(FieldValue::Currency)
                    .map_err(|_| self.parse_error(&n.to_string())),
                CellValue::String(s) => parse_currency(s)
                    .map(FieldValue::Currency)
                    .ok_or_else(|| self.parse_error(s)),
                other => Err(self.type_error(other)),
            },

            FieldKind::PhoneNumber => match cell {
                CellValue::String(s) => {
                    let digits = normalize_phone(s);
                    if digits.is_empty() {
                        Err(self.parse_error(s))
                    } else {
                        Ok(FieldValue::PhoneNumber(digits))
                    }
                }
                CellValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => {
                    Ok(FieldValue::PhoneNumber(format!("{:.0}", n)))
                }
                other => Err(self.type_error(other)),
            },

            FieldKind::DateTime => match cell {
                CellValue::Number(serial) => {
                    serial_to_datetime(*serial).map(FieldValue::DateTime)
                }
                CellValue::String(s) => parse_datetime_text(s)
                    .map(FieldValue::DateTime)
                    .ok_or_else(|| self.parse_error(s)),
                other => Err(self.type_error(other)),
            },

            FieldKind::Boolean => match cell {
                CellValue::Boolean(b) => Ok(FieldValue::Boolean(*b)),
                CellValue::Number(n) => Ok(FieldValue::Boolean(*n != 0.0)),
                CellValue::String(s) => match s.trim().to_lowercase().as_str() {
                    "true" | "yes" => Ok(FieldValue::Boolean(true)),
                    "false" | "no" => Ok(FieldValue::Boolean(false)),
                    _ => Err(self.parse_error(s)),
                },
                other => Err(self.type_error(other)),
            },
        }
    }

    fn type_error(&self, cell: &CellValue) -> Error {
        Error::FieldType {
            field: self.name,
            kind: self.kind.name(),
            found: cell.type_name(),
        }
    }

    fn parse_error(&self, value: &str) -> Error {
        Error::FieldParse {
            field: self.name,
            kind: self.kind.name(),
            value: value.to_string(),
        }
    }
}

/// The typed value of one record field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value (empty cell)
    Empty,
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Monetary amount
    Currency(Decimal),
    /// Normalized phone number (digits, optional leading `+`)
    PhoneNumber(String),
    /// Date and time
    DateTime(NaiveDateTime),
    /// Boolean value
    Boolean(bool),
}

impl FieldValue {
    /// Convert back into the cell representation written to the service.
    ///
    /// Currency and date/time become numbers (the service renders them via
    /// the column's format); phone numbers stay strings so leading zeros
    /// and `+` prefixes survive.
    pub fn to_cell(&self) -> CellValue {
        match self {
            FieldValue::Empty => CellValue::Empty,
            FieldValue::Text(s) => CellValue::String(s.clone()),
            FieldValue::Number(n) => CellValue::Number(*n),
            FieldValue::Currency(d) => match d.to_f64() {
                Some(n) => CellValue::Number(n),
                None => CellValue::String(d.to_string()),
            },
            FieldValue::PhoneNumber(p) => CellValue::String(p.clone()),
            FieldValue::DateTime(dt) => CellValue::Number(datetime_to_serial(*dt)),
            FieldValue::Boolean(b) => CellValue::Boolean(*b),
        }
    }

    /// Human-readable kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Empty => "empty",
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Currency(_) => "currency",
            FieldValue::PhoneNumber(_) => "phone number",
            FieldValue::DateTime(_) => "date/time",
            FieldValue::Boolean(_) => "boolean",
        }
    }
}

/// Serial date epoch used by the service: day 0 is 1899-12-30.
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .expect("fixed epoch date")
        .and_hms_opt(0, 0, 0)
        .expect("fixed epoch time")
}

// Roughly year 10000; serials beyond this are garbage, not dates.
const MAX_SERIAL_DAYS: f64 = 3_000_000.0;

/// Convert a serial day number to a date/time.
///
/// The integer part counts days since 1899-12-30, the fraction is the time
/// of day.
pub fn serial_to_datetime(serial: f64) -> Result<NaiveDateTime> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return Err(Error::SerialOutOfRange(serial));
    }

    let days = serial.floor();
    let secs = ((serial - days) * 86_400.0).round() as i64;

    serial_epoch()
        .checked_add_signed(Duration::days(days as i64))
        .and_then(|dt| dt.checked_add_signed(Duration::seconds(secs)))
        .ok_or(Error::SerialOutOfRange(serial))
}

/// Convert a date/time to the service's serial day number.
///
/// Sub-second precision is truncated; the service does not store it.
pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    let delta = dt.signed_duration_since(serial_epoch());
    delta.num_seconds() as f64 / 86_400.0
}

/// Parse formatted currency text: strips currency symbols and thousands
/// separators, accepts a parenthesized negative.
fn parse_currency(s: &str) -> Option<Decimal> {
    let mut t = s.trim();
    let mut negative = false;

    if t.starts_with('(') && t.ends_with(')') && t.len() >= 2 {
        negative = true;
        t = &t[1..t.len() - 1];
    }

    let cleaned: String = t
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',' | ' '))
        .collect();

    let d = Decimal::from_str(cleaned.trim()).ok()?;
    Some(if negative { -d } else { d })
}

/// Normalize formatted phone text to digits, keeping a leading `+`.
fn normalize_phone(s: &str) -> String {
    let mut out = String::new();
    for c in s.trim().chars() {
        if c == '+' && out.is_empty() {
            out.push(c);
        } else if c.is_ascii_digit() {
            out.push(c);
        }
    }
    out
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse formatted date/time text in the layouts the service renders.
fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
