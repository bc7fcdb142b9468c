use std::fmt;

use crate::error::MixError;

/// Opaque grouping key cut out of an identifier (e.g. the branch code of a roll number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryCode(String);

impl CategoryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Half-open character range `[start, end)` of an identifier that holds its category code.
///
/// Positions count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRule {
    start: usize,
    end: usize,
}

impl CodeRule {
    pub fn new(start: usize, end: usize) -> Result<Self, MixError> {
        if start >= end {
            return Err(MixError::InvalidCodeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Cut the category code out of `identifier`.
    ///
    /// # Arguments
    /// * `identifier` - The identifier field value
    /// * `row` - Source row position, reported on failure
    ///
    /// # Returns
    /// * `Ok(CategoryCode)` with the characters in `[start, end)`
    /// * `Err(MixError::MalformedIdentifier)` if the identifier is too short
    pub fn extract(&self, identifier: &str, row: usize) -> Result<CategoryCode, MixError> {
        if identifier.chars().count() < self.end {
            return Err(MixError::MalformedIdentifier {
                row,
                value: identifier.to_string(),
                required: self.end,
            });
        }

        let code: String = identifier
            .chars()
            .skip(self.start)
            .take(self.end - self.start)
            .collect();
        Ok(CategoryCode(code))
    }
}

impl Default for CodeRule {
    fn default() -> Self {
        Self { start: 4, end: 6 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_extracts_branch() {
        let rule = CodeRule::default();
        assert_eq!(rule.extract("2101CS01", 0).unwrap().as_str(), "CS");
        assert_eq!(rule.extract("2101EE", 0).unwrap().as_str(), "EE");
    }

    #[test]
    fn test_short_identifier_is_rejected() {
        let rule = CodeRule::default();
        assert_eq!(
            rule.extract("2101C", 7),
            Err(MixError::MalformedIdentifier {
                row: 7,
                value: "2101C".to_string(),
                required: 6,
            })
        );
    }

    #[test]
    fn test_positions_count_characters() {
        let rule = CodeRule::new(1, 3).unwrap();
        assert_eq!(rule.extract("éàü", 0).unwrap().as_str(), "àü");
    }

    #[test]
    fn test_empty_range_is_invalid() {
        assert_eq!(
            CodeRule::new(6, 6),
            Err(MixError::InvalidCodeRange { start: 6, end: 6 })
        );
    }
}
