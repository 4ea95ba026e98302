//! Case shape: each case block holds exactly one `li.case` with its condition.

use bokuteki_decorator::dom;
use bokuteki_decorator::model::{CASE_CONDITION_SUFFIX, CASE_ITEM_CLASS, OTHERWISE_CONDITION};
use bokuteki_decorator::Markers;

use crate::pages::{element_children, DecoratedPage};
use crate::report::CheckResult;

const CHECK: &str = "decorated/cases";

/// Validates every decorated case block.
pub fn validate(pages: &[DecoratedPage], markers: &Markers) -> CheckResult {
    let mut issues = Vec::new();
    let suffix = CASE_CONDITION_SUFFIX.trim_start();

    for page in pages {
        for (index, case) in dom::elements_by_class(page.root(), &markers.case)
            .iter()
            .enumerate()
        {
            let at = format!("{}: case #{}", page.path, index + 1);
            let items: Vec<_> = element_children(case)
                .into_iter()
                .filter(|c| dom::tag_name(c) == Some("li") && dom::has_class(c, CASE_ITEM_CLASS))
                .collect();
            let [item] = items.as_slice() else {
                issues.push(format!("{} has {} case items", at, items.len()));
                continue;
            };
            let text = dom::text_content(item);
            if !text.starts_with(OTHERWISE_CONDITION) && !text.contains(suffix) {
                issues.push(format!("{} has no condition phrase", at));
            }
        }
    }

    CheckResult::from_issues(CHECK, pages.len(), issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    #[test]
    fn formatted_cases_pass() {
        let pages = [DecoratedPage::parse(
            "c.html",
            r#"<div class="math-case"><li class="case"><span class="rule">base</span> の場合<p>x</p></li></div>
<div class="math-case otherwise"><li class="case">それ以外の場合<p>y</p></li></div>"#,
        )];
        assert_eq!(validate(&pages, &Markers::default()).severity, Severity::Pass);
    }

    #[test]
    fn raw_case_fails() {
        let pages = [DecoratedPage::parse("c.html", r#"<div class="math-case">x</div>"#)];
        let result = validate(&pages, &Markers::default());
        assert_eq!(result.details, vec!["c.html: case #1 has 0 case items"]);
    }
}
