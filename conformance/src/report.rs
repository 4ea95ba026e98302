//! Conformance report types: check outcomes and their aggregation.

use serde::Serialize;

/// Severity of a check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// Something looks off but does not block conformance.
    Warning,
    /// The check failed.
    Failure,
}

impl Severity {
    /// Short tag used in console output.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// Outcome of one check across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Identifier of the check, e.g. `decorated/theorems`.
    pub check: String,
    /// One-line summary.
    pub message: String,
    /// Outcome severity.
    pub severity: Severity,
    /// Per-page findings, as `path: finding` lines.
    pub details: Vec<String>,
}

impl CheckResult {
    fn new(check: &str, message: impl Into<String>, severity: Severity, details: Vec<String>) -> Self {
        Self {
            check: check.to_string(),
            message: message.into(),
            severity,
            details,
        }
    }

    /// A passing outcome.
    pub fn pass(check: &str, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Pass, Vec::new())
    }

    /// A non-blocking warning.
    pub fn warn(check: &str, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Warning, Vec::new())
    }

    /// A failure listing what was found.
    pub fn fail(check: &str, message: impl Into<String>, details: Vec<String>) -> Self {
        Self::new(check, message, Severity::Failure, details)
    }

    /// Passes when `issues` is empty, fails with them otherwise.
    pub fn from_issues(check: &str, pages: usize, issues: Vec<String>) -> Self {
        if issues.is_empty() {
            Self::pass(check, format!("{} page(s) conform", pages))
        } else {
            Self::fail(
                check,
                format!("{} issue(s) across {} page(s)", issues.len(), pages),
                issues,
            )
        }
    }
}

/// All outcomes of a conformance run.
#[derive(Debug, Default, Serialize)]
pub struct ConformanceReport {
    /// Outcomes in the order the checks ran.
    pub results: Vec<CheckResult>,
}

impl ConformanceReport {
    /// Records an outcome.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Number of outcomes with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// True if no check failed.
    pub fn all_passed(&self) -> bool {
        self.count(Severity::Failure) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_decide_severity() {
        assert_eq!(
            CheckResult::from_issues("x", 3, Vec::new()).severity,
            Severity::Pass
        );
        let failed = CheckResult::from_issues("x", 3, vec!["a.html: bad".to_string()]);
        assert_eq!(failed.severity, Severity::Failure);
        assert_eq!(failed.details.len(), 1);
    }

    #[test]
    fn warnings_do_not_fail_the_run() {
        let mut report = ConformanceReport::default();
        report.push(CheckResult::warn("x", "nothing to check"));
        assert!(report.all_passed());
        report.push(CheckResult::fail("y", "broken", Vec::new()));
        assert!(!report.all_passed());
        assert_eq!(report.count(Severity::Failure), 1);
    }
}
