//! Control-file classifier
//!
//! Upstream producers drop control files (completion flags, manifests) next
//! to the data files they describe. Those are never ingested; they are
//! logged and skipped. Classification is case-sensitive and independent of
//! the file pattern.

use landfall_common::wildcard::compile_wildcard;
use landfall_common::Result;
use regex::Regex;

/// Classification of one discovered filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// Not ingested; logged and skipped
    Control,
    /// Candidate for ingestion
    Data,
}

/// Compiled control-file filter
#[derive(Debug, Clone)]
pub struct ControlPattern {
    raw: String,
    regex: Regex,
}

impl ControlPattern {
    /// The conventional control names: `*.ctl` flags and the `_SUCCESS`
    /// sentinel.
    pub fn conventional() -> Self {
        // Hand-built; cannot fail.
        let regex = Regex::new(r"^(?:.*\.ctl|_SUCCESS)$").expect("default control pattern");
        Self {
            raw: "*.ctl|_SUCCESS".to_string(),
            regex,
        }
    }

    /// Compile a caller-supplied wildcard expression (`*`/`?` grammar)
    /// overriding the default.
    pub fn from_wildcard(expr: &str) -> Result<Self> {
        Ok(Self {
            raw: expr.to_string(),
            regex: compile_wildcard(expr)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn classify(&self, filename: &str) -> FileClass {
        if self.regex.is_match(filename) {
            FileClass::Control
        } else {
            FileClass::Data
        }
    }

    pub fn is_control(&self, filename: &str) -> bool {
        self.classify(filename) == FileClass::Control
    }
}

impl Default for ControlPattern {
    fn default() -> Self {
        Self::conventional()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_recognizes_ctl_and_success() {
        let pattern = ControlPattern::conventional();

        assert_eq!(pattern.classify("customer.ctl"), FileClass::Control);
        assert_eq!(pattern.classify("_SUCCESS"), FileClass::Control);
        assert_eq!(pattern.classify("customer20141010.DAT"), FileClass::Data);
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        let pattern = ControlPattern::conventional();

        assert_eq!(pattern.classify("CUSTOMER.CTL"), FileClass::Data);
        assert_eq!(pattern.classify("_success"), FileClass::Data);
    }

    #[test]
    fn test_override_replaces_default() {
        let pattern = ControlPattern::from_wildcard("*.done").unwrap();

        assert_eq!(pattern.classify("batch.done"), FileClass::Control);
        assert_eq!(pattern.classify("customer.ctl"), FileClass::Data);
    }
}
