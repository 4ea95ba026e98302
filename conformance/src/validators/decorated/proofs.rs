//! Proof shape: one label, then content ending in the end mark.

use bokuteki_decorator::dom;
use bokuteki_decorator::model::{
    PROOF_COLLAPSED_LABEL, PROOF_CONTENT_CLASS, PROOF_ENDMARK_CLASS, PROOF_LABEL,
    PROOF_PREFIX_CLASS,
};
use bokuteki_decorator::Markers;

use crate::pages::{element_children, DecoratedPage};
use crate::report::CheckResult;

const CHECK: &str = "decorated/proofs";

/// Validates every decorated proof block.
pub fn validate(pages: &[DecoratedPage], markers: &Markers) -> CheckResult {
    let mut issues = Vec::new();

    for page in pages {
        for (index, proof) in dom::elements_by_class(page.root(), &markers.proof)
            .iter()
            .enumerate()
        {
            let at = format!("{}: proof #{}", page.path, index + 1);
            let children = element_children(proof);

            let labels: Vec<_> = children
                .iter()
                .filter(|c| dom::has_class(c, PROOF_PREFIX_CLASS))
                .collect();
            match labels.as_slice() {
                [label] => {
                    let text = dom::text_content(label);
                    if text != PROOF_LABEL && text != PROOF_COLLAPSED_LABEL {
                        issues.push(format!("{} has label `{}`", at, text));
                    }
                }
                _ => issues.push(format!("{} has {} labels", at, labels.len())),
            }

            let Some(content) = children
                .iter()
                .find(|c| dom::has_class(c, PROOF_CONTENT_CLASS))
            else {
                issues.push(format!("{} has no content container", at));
                continue;
            };
            let ends_with_mark = element_children(content)
                .last()
                .map(|last| dom::has_class(last, PROOF_ENDMARK_CLASS))
                .unwrap_or(false);
            if !ends_with_mark {
                issues.push(format!("{} does not end with the end mark", at));
            }
        }
    }

    CheckResult::from_issues(CHECK, pages.len(), issues)
}
