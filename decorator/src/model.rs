//! Fixed vocabulary of the decorated page and the decoration report.

use markup5ever_rcdom::Handle;
use serde::Serialize;

use crate::dom;

/// Classes appended to every decorated theorem block.
pub const THEOREM_CLASSES: [&str; 5] = [
    "mdc-card",
    "mdc-card--outlined",
    "mdc-card__content",
    "block",
    "theorem",
];

/// Classes appended to every decorated proof block.
pub const PROOF_CLASSES: [&str; 2] = ["block", "proof"];

/// Class of the generated theorem header.
pub const THEOREM_TITLE_CLASS: &str = "theorem-title";
/// Class of the container holding the original theorem content.
pub const STATEMENT_CLASS: &str = "statement";
/// Class of the clickable proof label.
pub const PROOF_PREFIX_CLASS: &str = "proof-prefix";
/// Class of the collapsible proof body.
pub const PROOF_CONTENT_CLASS: &str = "proof-content";
/// Class of the end-of-proof glyph.
pub const PROOF_ENDMARK_CLASS: &str = "proof-endmark";
/// Class of the generated case list item.
pub const CASE_ITEM_CLASS: &str = "case";
/// Class wrapping a case's rule label.
pub const RULE_CLASS: &str = "rule";

/// Label of an expanded proof.
pub const PROOF_LABEL: &str = "(証明)";
/// Label of a collapsed proof.
pub const PROOF_COLLAPSED_LABEL: &str = "(証明) ...";
/// End-of-proof glyph.
pub const PROOF_END_MARK: &str = "□";
/// Condition phrase of a catch-all case.
pub const OTHERWISE_CONDITION: &str = "それ以外の場合";
/// Text following a case's rule label.
pub const CASE_CONDITION_SUFFIX: &str = " の場合";
/// Inline style of the paragraph holding a case's content.
pub const CASE_BODY_STYLE: &str = "padding-left:1em";

/// Attribute stamped on blocks that have already been decorated.
pub const DECORATED_ATTR: &str = "data-decorated";

/// Header text of the `number`-th theorem.
pub fn theorem_header(number: usize, title: &str) -> String {
    format!("(定理 {}) {}", number, title)
}

/// Visibility of a proof's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofState {
    /// Content shown; label reads `(証明)`.
    Expanded,
    /// Content hidden; label reads `(証明) ...`.
    Collapsed,
}

impl ProofState {
    /// Reads the state from a proof content container.
    pub fn of(content: &Handle) -> Self {
        match dom::inline_display(content).as_deref() {
            Some("none") => ProofState::Collapsed,
            _ => ProofState::Expanded,
        }
    }

    /// Label text shown in this state.
    pub fn label(self) -> &'static str {
        match self {
            ProofState::Expanded => PROOF_LABEL,
            ProofState::Collapsed => PROOF_COLLAPSED_LABEL,
        }
    }
}

/// Condition phrase of a case block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseCondition {
    /// Catch-all branch.
    Otherwise,
    /// Branch selected by a named rule.
    Rule(String),
}

/// Outcome of one sweep over a block kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Blocks transformed by this sweep.
    pub decorated: usize,
    /// Blocks left alone because they already carried the decorated stamp.
    pub skipped: usize,
}

/// Counts gathered while decorating one or more pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecorationReport {
    /// Pages decorated.
    pub pages: usize,
    /// Theorem blocks numbered.
    pub theorems: usize,
    /// Proof blocks wrapped.
    pub proofs: usize,
    /// Case blocks formatted.
    pub cases: usize,
    /// Blocks skipped because they were already decorated.
    pub skipped: usize,
    /// Math expressions handed to the renderer.
    pub math_expressions: usize,
    /// Proof labels wired for toggling.
    pub toggles: usize,
}

impl DecorationReport {
    /// Adds the counts of `other` into `self`.
    pub fn merge(&mut self, other: &DecorationReport) {
        self.pages += other.pages;
        self.theorems += other.theorems;
        self.proofs += other.proofs;
        self.cases += other.cases;
        self.skipped += other.skipped;
        self.math_expressions += other.math_expressions;
        self.toggles += other.toggles;
    }
}

pub(crate) fn is_decorated(node: &Handle) -> bool {
    dom::attr(node, DECORATED_ATTR).is_some()
}

pub(crate) fn mark_decorated(node: &Handle) {
    dom::set_attr(node, DECORATED_ATTR, "true");
}
