//! File-name pattern compiler
//!
//! Compiles the textual pattern language used to describe incoming file
//! names, e.g. `{table}{yyyyMMdd}.DAT`, into a reusable matcher that both
//! tests a filename and extracts the timestamp fields it contains.
//!
//! Grammar:
//!
//! - any character other than `{`, `}`, `*`, `?`, `\` is literal
//! - `\{`, `\}`, `\*`, `\?`, `\\` escape to the literal character
//! - `{table}` is replaced by the table name supplied at match time
//! - any other `{...}` group is a timestamp format over the symbols
//!   `y M d H m s`; a run's length is its field width (a run of length one
//!   matches one or two digits)
//! - `*` matches zero or more characters, `?` exactly one
//!
//! Patterns are parsed once into a segment list and compiled into a single
//! anchored regex per (pattern, table) pair, never re-parsed per file.

use landfall_common::{LandfallError, Result};
use regex::Regex;
use std::fmt;

/// Timestamp units a pattern may capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'y' => Some(TimeUnit::Year),
            'M' => Some(TimeUnit::Month),
            'd' => Some(TimeUnit::Day),
            'H' => Some(TimeUnit::Hour),
            'm' => Some(TimeUnit::Minute),
            's' => Some(TimeUnit::Second),
            _ => None,
        }
    }

    /// Zero-pad width used when rendering partition path components.
    fn render_width(&self) -> usize {
        match self {
            TimeUnit::Year => 4,
            _ => 2,
        }
    }
}

/// One captured timestamp field: a unit and its width in the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeField {
    pub unit: TimeUnit,
    pub width: usize,
}

/// One compiled pattern segment
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `?`
    AnyChar,
    /// `*`
    AnyRun,
    /// `{table}`
    Table,
    /// `{yyyyMMdd}`-style group, one entry per symbol run
    Timestamp(Vec<TimeField>),
}

/// Compiled representation of a file-name pattern. Immutable once built.
#[derive(Debug, Clone)]
pub struct FilePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl FilePattern {
    /// Compile a pattern string.
    ///
    /// Fails (never silently coerces) on unsupported timestamp symbols,
    /// a trailing unterminated escape, or an unclosed `{` group.
    pub fn compile(pattern: &str) -> Result<Self> {
        let mut segments: Vec<Segment> = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars();

        fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(literal)));
            }
        }

        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some(escaped) => literal.push(escaped),
                    None => {
                        return Err(LandfallError::UnterminatedEscape {
                            pattern: pattern.to_string(),
                        })
                    },
                },
                '?' => {
                    flush(&mut literal, &mut segments);
                    segments.push(Segment::AnyChar);
                },
                '*' => {
                    flush(&mut literal, &mut segments);
                    segments.push(Segment::AnyRun);
                },
                '{' => {
                    flush(&mut literal, &mut segments);

                    let mut group = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(inner) => group.push(inner),
                            None => {
                                return Err(LandfallError::UnclosedGroup {
                                    pattern: pattern.to_string(),
                                })
                            },
                        }
                    }

                    if group == "table" {
                        segments.push(Segment::Table);
                    } else {
                        segments.push(Segment::Timestamp(parse_timestamp_group(
                            pattern, &group,
                        )?));
                    }
                },
                other => literal.push(other),
            }
        }

        flush(&mut literal, &mut segments);

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The original pattern string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern captures any timestamp fields.
    pub fn has_timestamp(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Timestamp(_)))
    }

    /// Bake a table name into the pattern, producing the matcher used for
    /// one discovery pass.
    pub fn matcher(&self, table: &str) -> Result<FileMatcher> {
        let mut body = String::new();
        let mut fields = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => body.push_str(&regex::escape(text)),
                Segment::AnyChar => body.push('.'),
                Segment::AnyRun => body.push_str(".*"),
                Segment::Table => body.push_str(&regex::escape(table)),
                Segment::Timestamp(group) => {
                    for field in group {
                        if field.width >= 2 {
                            body.push_str(&format!(r"(\d{{{}}})", field.width));
                        } else {
                            body.push_str(r"(\d{1,2})");
                        }
                        fields.push(*field);
                    }
                },
            }
        }

        let regex = Regex::new(&format!("^{}$", body)).map_err(|e| {
            LandfallError::Config(format!(
                "pattern {:?} compiled to invalid regex: {}",
                self.raw, e
            ))
        })?;

        Ok(FileMatcher { regex, fields })
    }
}

fn parse_timestamp_group(pattern: &str, group: &str) -> Result<Vec<TimeField>> {
    let mut fields: Vec<TimeField> = Vec::new();

    for symbol in group.chars() {
        let unit = TimeUnit::from_symbol(symbol).ok_or_else(|| {
            LandfallError::UnsupportedTimestampField {
                pattern: pattern.to_string(),
                symbol,
            }
        })?;

        match fields.last_mut() {
            Some(last) if last.unit == unit => last.width += 1,
            _ => fields.push(TimeField { unit, width: 1 }),
        }
    }

    Ok(fields)
}

/// A [`FilePattern`] with a concrete table name baked in
#[derive(Debug, Clone)]
pub struct FileMatcher {
    regex: Regex,
    fields: Vec<TimeField>,
}

impl FileMatcher {
    /// Test a filename; on match, return the extracted timestamp fields
    /// (`None` when the pattern captures none).
    pub fn match_file(&self, filename: &str) -> Option<Option<DatePartition>> {
        let captures = self.regex.captures(filename)?;

        if self.fields.is_empty() {
            return Some(None);
        }

        let values = self
            .fields
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(field, capture)| {
                capture.map(|c| (field.unit, c.as_str().to_string()))
            })
            .collect();

        Some(Some(DatePartition { values }))
    }
}

/// Timestamp fields extracted from one matched filename, in the order they
/// appeared in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePartition {
    values: Vec<(TimeUnit, String)>,
}

impl DatePartition {
    /// First captured value for a unit, zero-padded to its render width.
    pub fn get(&self, unit: TimeUnit) -> Option<String> {
        self.values
            .iter()
            .find(|(u, _)| *u == unit)
            .map(|(_, v)| format!("{:0>width$}", v, width = unit.render_width()))
    }

    pub fn year(&self) -> Option<String> {
        self.get(TimeUnit::Year)
    }

    pub fn month(&self) -> Option<String> {
        self.get(TimeUnit::Month)
    }

    pub fn day(&self) -> Option<String> {
        self.get(TimeUnit::Day)
    }
}

impl fmt::Display for DatePartition {
    /// Path-friendly rendering of the captured fields in appearance order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .values
            .iter()
            .map(|(unit, value)| format!("{:0>width$}", value, width = unit.render_width()))
            .collect();
        write!(f, "{}", rendered.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_match_table_date_pattern() {
        let pattern = FilePattern::compile("{table}{yyyyMMdd}.DAT").unwrap();
        let matcher = pattern.matcher("customer").unwrap();

        let date = matcher
            .match_file("customer20141010.DAT")
            .expect("should match")
            .expect("should capture a date");

        assert_eq!(date.year().as_deref(), Some("2014"));
        assert_eq!(date.month().as_deref(), Some("10"));
        assert_eq!(date.day().as_deref(), Some("10"));
    }

    #[test]
    fn test_match_is_anchored() {
        let pattern = FilePattern::compile("{table}{yyyyMMdd}.DAT").unwrap();
        let matcher = pattern.matcher("customer").unwrap();

        assert!(matcher.match_file("xcustomer20141010.DAT").is_none());
        assert!(matcher.match_file("customer20141010.DAT.bak").is_none());
        assert!(matcher.match_file("customer2014101.DAT").is_none());
    }

    #[test]
    fn test_wrong_table_does_not_match() {
        let pattern = FilePattern::compile("{table}{yyyyMMdd}.DAT").unwrap();
        let matcher = pattern.matcher("orders").unwrap();

        assert!(matcher.match_file("customer20141010.DAT").is_none());
    }

    #[test]
    fn test_wildcards() {
        let pattern = FilePattern::compile("{table}-*.part?").unwrap();
        let matcher = pattern.matcher("events").unwrap();

        assert_eq!(matcher.match_file("events-anything.part1"), Some(None));
        assert_eq!(matcher.match_file("events-.part9"), Some(None));
        assert!(matcher.match_file("events-x.part10").is_none());
    }

    #[test]
    fn test_escapes_produce_literals() {
        let pattern = FilePattern::compile(r"report\*\{v2\}.csv").unwrap();
        let matcher = pattern.matcher("unused").unwrap();

        assert_eq!(matcher.match_file("report*{v2}.csv"), Some(None));
        assert!(matcher.match_file("reportX{v2}.csv").is_none());
    }

    #[test]
    fn test_hour_minute_second_fields() {
        let pattern = FilePattern::compile("{table}_{yyyyMMddHHmmss}.log").unwrap();
        let matcher = pattern.matcher("audit").unwrap();

        let date = matcher
            .match_file("audit_20141010235959.log")
            .unwrap()
            .unwrap();

        assert_eq!(date.get(TimeUnit::Hour).as_deref(), Some("23"));
        assert_eq!(date.get(TimeUnit::Second).as_deref(), Some("59"));
        assert_eq!(date.to_string(), "2014-10-10-23-59-59");
    }

    #[test]
    fn test_single_symbol_run_is_variable_width() {
        let pattern = FilePattern::compile("{table}_{yyyy}_{M}_{d}.DAT").unwrap();
        let matcher = pattern.matcher("customer").unwrap();

        let date = matcher
            .match_file("customer_2014_3_7.DAT")
            .unwrap()
            .unwrap();

        // Single-digit captures are zero-padded for path rendering.
        assert_eq!(date.month().as_deref(), Some("03"));
        assert_eq!(date.day().as_deref(), Some("07"));

        let date = matcher
            .match_file("customer_2014_11_25.DAT")
            .unwrap()
            .unwrap();
        assert_eq!(date.month().as_deref(), Some("11"));
    }

    #[test]
    fn test_pattern_without_timestamp_yields_no_date() {
        let pattern = FilePattern::compile("{table}.DAT").unwrap();
        assert!(!pattern.has_timestamp());

        let matcher = pattern.matcher("customer").unwrap();
        assert_eq!(matcher.match_file("customer.DAT"), Some(None));
    }

    #[test]
    fn test_unsupported_timestamp_symbol_fails() {
        let err = FilePattern::compile("{table}{yyyyQQ}.DAT").unwrap_err();
        assert!(matches!(
            err,
            LandfallError::UnsupportedTimestampField { symbol: 'Q', .. }
        ));
    }

    #[test]
    fn test_unterminated_escape_fails() {
        let err = FilePattern::compile(r"{table}.DAT\").unwrap_err();
        assert!(matches!(err, LandfallError::UnterminatedEscape { .. }));
    }

    #[test]
    fn test_unclosed_group_fails() {
        let err = FilePattern::compile("{table}{yyyyMMdd.DAT").unwrap_err();
        assert!(matches!(err, LandfallError::UnclosedGroup { .. }));
    }

    #[test]
    fn test_literal_regex_metacharacters_are_escaped() {
        let pattern = FilePattern::compile("{table}(v1)+.DAT").unwrap();
        let matcher = pattern.matcher("customer").unwrap();

        assert_eq!(matcher.match_file("customer(v1)+.DAT"), Some(None));
        assert!(matcher.match_file("customerv1.DAT").is_none());
    }
}
