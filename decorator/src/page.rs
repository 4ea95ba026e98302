//! A parsed page and the one-shot decoration pass over it.

use markup5ever_rcdom::{Handle, RcDom};
use tracing::info;

use crate::case::format_cases;
use crate::config::DecoratorConfig;
use crate::dom;
use crate::error::DecorateError;
use crate::model::DecorationReport;
use crate::proof::{wire_proof_toggles, wrap_proofs, ProofLabel};
use crate::script::inject_toggle_script;
use crate::theorem::number_theorems;
use crate::typeset::{render_math_in_element, MathRenderer};

/// An HTML page held as a mutable DOM.
pub struct Page {
    dom: RcDom,
    labels: Vec<ProofLabel>,
}

impl Page {
    /// Parses `html` into a page.
    pub fn parse(html: &str) -> Self {
        Self {
            dom: dom::parse_html(html),
            labels: Vec::new(),
        }
    }

    /// The document node.
    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<Handle> {
        dom::find_element(&self.dom.document, "body")
    }

    /// Proof labels wired by the last [`Page::decorate`] call.
    pub fn proof_labels(&self) -> &[ProofLabel] {
        &self.labels
    }

    /// Runs the decoration pass: typesetting, theorems, proofs, cases, then
    /// proof toggles.
    ///
    /// # Errors
    ///
    /// Returns [`DecorateError::MissingBody`] if the page has no body, or the
    /// renderer's error if typesetting fails. Nothing after the typesetting
    /// step runs in that case. Case formatting can fail with
    /// [`DecorateError::Serialize`].
    pub fn decorate(
        &mut self,
        config: &DecoratorConfig,
        renderer: &dyn MathRenderer,
    ) -> Result<DecorationReport, DecorateError> {
        let body = self.body().ok_or(DecorateError::MissingBody)?;
        let root = self.dom.document.clone();

        let math_expressions = render_math_in_element(&body, &config.typeset, renderer)?;

        let theorems = number_theorems(&root, &config.markers);
        let proofs = wrap_proofs(&root, &config.markers);
        let cases = format_cases(&root, &config.markers)?;

        self.labels = wire_proof_toggles(&root);
        if config.inject_toggle_script {
            inject_toggle_script(&body);
        }

        let report = DecorationReport {
            pages: 1,
            theorems: theorems.decorated,
            proofs: proofs.decorated,
            cases: cases.decorated,
            skipped: theorems.skipped + proofs.skipped + cases.skipped,
            math_expressions,
            toggles: self.labels.len(),
        };
        info!(
            theorems = report.theorems,
            proofs = report.proofs,
            cases = report.cases,
            skipped = report.skipped,
            math = report.math_expressions,
            "decorated page"
        );
        Ok(report)
    }

    /// Serializes the page back to HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_html(&self) -> Result<String, DecorateError> {
        dom::serialize_document(&self.dom).map_err(DecorateError::Serialize)
    }
}
