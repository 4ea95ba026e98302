//! Proof sweep and the collapsible proof toggle.

use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::config::Markers;
use crate::dom;
use crate::model::{
    is_decorated, mark_decorated, ProofState, SweepOutcome, PROOF_CLASSES, PROOF_CONTENT_CLASS,
    PROOF_ENDMARK_CLASS, PROOF_END_MARK, PROOF_LABEL, PROOF_PREFIX_CLASS,
};

/// Wraps every proof block under `root`.
///
/// The block ends up holding an `a.proof-prefix` label followed by a
/// `div.proof-content` with the original content and a trailing `□`.
pub fn wrap_proofs(root: &Handle, markers: &Markers) -> SweepOutcome {
    let proofs = dom::elements_by_class(root, &markers.proof);
    let mut outcome = SweepOutcome::default();

    for proof in &proofs {
        if is_decorated(proof) {
            outcome.skipped += 1;
            continue;
        }

        let content = dom::take_children(proof);
        for class in PROOF_CLASSES {
            dom::add_class(proof, class);
        }

        let label = dom::new_element("a", &[("class", PROOF_PREFIX_CLASS)]);
        dom::append_child(&label, dom::new_text(PROOF_LABEL));
        let body = dom::new_element("div", &[("class", PROOF_CONTENT_CLASS)]);
        for node in content {
            dom::append_child(&body, node);
        }
        let endmark = dom::new_element("span", &[("class", PROOF_ENDMARK_CLASS)]);
        dom::append_child(&endmark, dom::new_text(PROOF_END_MARK));
        dom::append_child(&body, endmark);

        dom::replace_children(proof, vec![label, body]);
        mark_decorated(proof);
        outcome.decorated += 1;
    }
    debug!(wrapped = outcome.decorated, skipped = outcome.skipped, "wrapped proofs");
    outcome
}

/// A clickable proof label wired to its sibling content container.
#[derive(Debug, Clone)]
pub struct ProofLabel {
    label: Handle,
}

impl ProofLabel {
    /// Wraps an existing `proof-prefix` element.
    pub fn new(label: Handle) -> Self {
        Self { label }
    }

    /// The label element.
    pub fn element(&self) -> &Handle {
        &self.label
    }

    /// The first `proof-content` element under the label's parent.
    pub fn content(&self) -> Option<Handle> {
        let parent = dom::parent(&self.label)?;
        dom::first_by_class(&parent, PROOF_CONTENT_CLASS)
    }

    /// Current visibility of the proof content, if the label has any.
    pub fn state(&self) -> Option<ProofState> {
        self.content().map(|content| ProofState::of(&content))
    }

    /// Handles a click on the label.
    ///
    /// Hidden content is shown and the label reset to `(証明)`; shown content
    /// is hidden and the label set to `(証明) ...`. Returns the new state, or
    /// `None` without touching the DOM when no content container exists.
    pub fn click(&self) -> Option<ProofState> {
        let content = self.content()?;
        let next = match ProofState::of(&content) {
            ProofState::Collapsed => {
                dom::set_inline_display(&content, "block");
                ProofState::Expanded
            }
            ProofState::Expanded => {
                dom::set_inline_display(&content, "none");
                ProofState::Collapsed
            }
        };
        dom::set_text_content(&self.label, next.label());
        Some(next)
    }
}

/// Collects every `proof-prefix` element under `root` as a clickable label.
pub fn wire_proof_toggles(root: &Handle) -> Vec<ProofLabel> {
    dom::elements_by_class(root, PROOF_PREFIX_CLASS)
        .into_iter()
        .map(ProofLabel::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped(html: &str) -> (markup5ever_rcdom::RcDom, Vec<ProofLabel>) {
        let page = dom::parse_html(html);
        wrap_proofs(&page.document, &Markers::default());
        let labels = wire_proof_toggles(&page.document);
        (page, labels)
    }

    #[test]
    fn wrap_adds_label_content_and_endmark() {
        let (page, labels) = wrapped(r#"<div class="math-proof">trivial.</div>"#);
        assert_eq!(labels.len(), 1);
        assert_eq!(dom::text_content(labels[0].element()), "(証明)");
        let content = dom::first_by_class(&page.document, PROOF_CONTENT_CLASS).expect("content");
        assert_eq!(dom::text_content(&content), "trivial.□");
        assert_eq!(labels[0].state(), Some(ProofState::Expanded));
    }

    #[test]
    fn clicks_alternate_between_states() {
        let (_page, labels) = wrapped(r#"<div class="math-proof">p</div>"#);
        let label = &labels[0];
        for clicks in 1..=6 {
            let state = label.click().expect("content present");
            let content = label.content().expect("content");
            if clicks % 2 == 1 {
                assert_eq!(state, ProofState::Collapsed);
                assert_eq!(dom::text_content(label.element()), "(証明) ...");
                assert_eq!(dom::inline_display(&content).as_deref(), Some("none"));
            } else {
                assert_eq!(state, ProofState::Expanded);
                assert_eq!(dom::text_content(label.element()), "(証明)");
                assert_eq!(dom::inline_display(&content).as_deref(), Some("block"));
            }
        }
    }

    #[test]
    fn click_without_content_is_a_no_op() {
        let page = dom::parse_html(r#"<div><a class="proof-prefix">(証明)</a></div>"#);
        let before = dom::serialize_document(&page).expect("serialize");
        let labels = wire_proof_toggles(&page.document);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].click(), None);
        assert_eq!(labels[0].state(), None);
        assert_eq!(dom::serialize_document(&page).expect("serialize"), before);
    }

    #[test]
    fn each_label_toggles_its_own_proof() {
        let (_page, labels) = wrapped(
            r#"<div class="math-proof">one</div><div class="math-proof">two</div>"#,
        );
        labels[1].click();
        assert_eq!(labels[0].state(), Some(ProofState::Expanded));
        assert_eq!(labels[1].state(), Some(ProofState::Collapsed));
    }
}
