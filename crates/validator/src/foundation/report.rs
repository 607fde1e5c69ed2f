//! Hierarchical validation report
//!
//! A [`Report`] describes one validated subtree: a scalar field, a record, a
//! single collection element, or a whole `validate` call. Reports compose
//! bottom-up through two merge policies, and the nesting survives in the
//! flattened message text:
//!
//! - `description(message)`: a failure inside a nested record or field
//! - `[...]`: the aggregated failures of one collection
//! - `{...}`: the failure of one element inside that collection
//!
//! Merges take the child by value, so a merged child cannot be read again.

use std::fmt;

use smallvec::SmallVec;

/// Outcome of validating one subtree.
///
/// A report is invalid exactly when it holds at least one message: there is
/// no way to build an invalid report without saying why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    description: Option<String>,
    messages: SmallVec<[String; 2]>,
}

impl Report {
    /// Creates an empty, valid report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty, valid report carrying a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            messages: SmallVec::new(),
        }
    }

    /// Creates a report holding a single failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new().with_message(message)
    }

    /// Sets the description.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Appends a failure message. Empty messages are ignored.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.is_empty() {
            self.messages.push(message);
        }
        self
    }

    /// Returns true when nothing failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the individual failure messages in the order they were added.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Returns all failure messages joined with commas.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.messages.join(",")
    }

    /// Scalar merge: folds an invalid child into this report as
    /// `description(message)`, or the raw message when the child has no
    /// description. Valid children leave the report untouched.
    #[must_use = "merge returns the combined report"]
    pub fn merge(self, child: Report) -> Report {
        if child.is_valid() {
            return self;
        }
        let message = child.error_message();
        let wrapped = match child.description.as_deref() {
            Some(desc) if !desc.is_empty() => format!("{desc}({message})"),
            _ => message,
        };
        self.with_message(wrapped)
    }

    /// List merge: folds the reports of one collection's elements into this
    /// report. Each failing element becomes `{message}`, and all of them
    /// together are added as a single `[...]` message.
    #[must_use = "merge returns the combined report"]
    pub fn merge_list<I>(self, children: I) -> Report
    where
        I: IntoIterator<Item = Report>,
    {
        let elements = children
            .into_iter()
            .filter(|child| !child.is_valid())
            .fold(Report::new(), |acc, child| {
                acc.with_message(format!("{{{}}}", child.error_message()))
            });
        if elements.is_valid() {
            return self;
        }
        self.merge(Report::failure(format!("[{}]", elements.error_message())))
    }

    /// Converts into a `Result`, returning the report itself as the error
    /// when it is invalid.
    pub fn into_result(self) -> Result<(), Report> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            f.write_str("valid")
        } else {
            f.write_str(&self.error_message())
        }
    }
}

impl std::error::Error for Report {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_valid() {
        let report = Report::new();
        assert!(report.is_valid());
        assert_eq!(report.error_message(), "");
        assert_eq!(report.description(), None);
    }

    #[test]
    fn test_empty_message_keeps_valid() {
        let report = Report::new().with_message("");
        assert!(report.is_valid());
    }

    #[test]
    fn test_message_forces_invalid() {
        let report = Report::new().with_message("x");
        assert!(!report.is_valid());
        assert_eq!(report.messages(), ["x".to_string()]);
    }

    #[test]
    fn test_merge_valid_child_is_noop() {
        let parent = Report::described("root").with_message("a");
        let merged = parent.clone().merge(Report::described("child"));
        assert_eq!(merged, parent);
    }

    #[test]
    fn test_merge_wraps_with_description() {
        let child = Report::described("address").with_message("city must not be empty");
        let merged = Report::new().merge(child);
        assert_eq!(merged.error_message(), "address(city must not be empty)");
    }

    #[test]
    fn test_merge_without_description_uses_raw_message() {
        let child = Report::failure("code must not be empty");
        let merged = Report::new().merge(child);
        assert_eq!(merged.error_message(), "code must not be empty");
    }

    #[test]
    fn test_merge_joins_child_messages() {
        let child = Report::described("item").with_message("a").with_message("b");
        let merged = Report::new().with_message("x").merge(child);
        assert_eq!(merged.error_message(), "x,item(a,b)");
    }

    #[test]
    fn test_merge_list() {
        let elements = vec![
            Report::described("items"),
            Report::described("items").with_message("X"),
            Report::described("items"),
        ];
        let merged = Report::described("items").merge_list(elements);
        assert_eq!(merged.error_message(), "[{X}]");
        assert_eq!(merged.description(), Some("items"));
    }

    #[test]
    fn test_merge_list_multiple_failures() {
        let elements = vec![Report::failure("a"), Report::failure("b").with_message("c")];
        let merged = Report::new().merge_list(elements);
        assert_eq!(merged.error_message(), "[{a},{b,c}]");
    }

    #[test]
    fn test_merge_list_all_valid() {
        let merged = Report::new().merge_list(vec![Report::new(), Report::new()]);
        assert!(merged.is_valid());
        let merged = Report::new().merge_list(Vec::new());
        assert!(merged.is_valid());
    }

    #[test]
    fn test_into_result() {
        assert!(Report::new().into_result().is_ok());
        let err = Report::failure("bad").into_result().unwrap_err();
        assert_eq!(err.to_string(), "bad");
    }
}
