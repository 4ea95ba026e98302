//! Leftovers: every marked block carries the decorated stamp.

use bokuteki_decorator::dom;
use bokuteki_decorator::model::DECORATED_ATTR;
use bokuteki_decorator::Markers;

use crate::pages::DecoratedPage;
use crate::report::CheckResult;

const CHECK: &str = "decorated/leftovers";

/// Reports marker-classed blocks that were never decorated.
pub fn validate(pages: &[DecoratedPage], markers: &Markers) -> CheckResult {
    let mut issues = Vec::new();

    for page in pages {
        for marker in [&markers.theorem, &markers.proof, &markers.case] {
            let undecorated = dom::elements_by_class(page.root(), marker)
                .iter()
                .filter(|node| dom::attr(node, DECORATED_ATTR).is_none())
                .count();
            if undecorated > 0 {
                issues.push(format!(
                    "{}: {} undecorated `{}` block(s)",
                    page.path, undecorated, marker
                ));
            }
        }
    }

    CheckResult::from_issues(CHECK, pages.len(), issues)
}
