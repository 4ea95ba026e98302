//! Theorem sweep: numbers theorem blocks and frames their statement.

use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::config::Markers;
use crate::dom;
use crate::model::{
    is_decorated, mark_decorated, theorem_header, SweepOutcome, STATEMENT_CLASS, THEOREM_CLASSES,
    THEOREM_TITLE_CLASS,
};

/// Numbers every theorem block under `root` in document order, starting at 1.
///
/// Each block's content moves into a `div.statement` preceded by a
/// `div.theorem-title` reading `(定理 N) TITLE`. Blocks that are already
/// decorated keep their content but still consume their number, so a second
/// run never renumbers anything.
pub fn number_theorems(root: &Handle, markers: &Markers) -> SweepOutcome {
    let theorems = dom::elements_by_class(root, &markers.theorem);
    let mut outcome = SweepOutcome::default();

    for (index, theorem) in theorems.iter().enumerate() {
        let number = index + 1;
        if is_decorated(theorem) {
            outcome.skipped += 1;
            continue;
        }

        let title = dom::attr(theorem, &markers.title_attr).unwrap_or_default();
        let content = dom::take_children(theorem);
        for class in THEOREM_CLASSES {
            dom::add_class(theorem, class);
        }

        let header = dom::new_element("div", &[("class", THEOREM_TITLE_CLASS)]);
        dom::append_child(&header, dom::new_text(&theorem_header(number, &title)));
        let statement = dom::new_element("div", &[("class", STATEMENT_CLASS)]);
        for node in content {
            dom::append_child(&statement, node);
        }
        dom::replace_children(theorem, vec![header, statement]);
        mark_decorated(theorem);

        debug!(number, title = %title, "numbered theorem");
        outcome.decorated += 1;
    }
    outcome
}
