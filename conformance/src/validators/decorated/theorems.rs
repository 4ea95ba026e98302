//! Theorem numbering: headers read `(定理 k)` with k = 1..N on every page.

use anyhow::Result;
use bokuteki_decorator::dom;
use bokuteki_decorator::model::THEOREM_TITLE_CLASS;
use regex::Regex;

use crate::pages::DecoratedPage;
use crate::report::CheckResult;

const CHECK: &str = "decorated/theorems";

/// Validates theorem header numbering.
///
/// # Errors
///
/// Returns an error if the header pattern fails to compile.
pub fn validate(pages: &[DecoratedPage]) -> Result<CheckResult> {
    let header = Regex::new(r"^\(定理 (\d+)\) ")?;
    let mut issues = Vec::new();

    for page in pages {
        let headers = dom::elements_by_class(page.root(), THEOREM_TITLE_CLASS);
        for (index, node) in headers.iter().enumerate() {
            let expected = index + 1;
            let text = dom::text_content(node);
            let number = header
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<usize>().ok());
            match number {
                Some(n) if n == expected => {}
                Some(n) => issues.push(format!(
                    "{}: theorem #{} is numbered {}",
                    page.path, expected, n
                )),
                None => issues.push(format!(
                    "{}: malformed theorem header `{}`",
                    page.path,
                    text.trim()
                )),
            }
        }
    }

    Ok(CheckResult::from_issues(CHECK, pages.len(), issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    fn page(body: &str) -> DecoratedPage {
        DecoratedPage::parse("p.html", body)
    }

    #[test]
    fn sequential_headers_pass() {
        let pages = [page(
            r#"<div class="theorem-title">(定理 1) A</div><div class="theorem-title">(定理 2) </div>"#,
        )];
        assert_eq!(validate(&pages).expect("validate").severity, Severity::Pass);
    }

    #[test]
    fn gap_is_reported() {
        let pages = [page(
            r#"<div class="theorem-title">(定理 1) A</div><div class="theorem-title">(定理 3) B</div>"#,
        )];
        let result = validate(&pages).expect("validate");
        assert_eq!(result.severity, Severity::Failure);
        assert_eq!(result.details, vec!["p.html: theorem #2 is numbered 3"]);
    }

    #[test]
    fn numbering_restarts_per_page() {
        let one = r#"<div class="theorem-title">(定理 1) A</div>"#;
        let pages = [page(one), page(one)];
        assert_eq!(validate(&pages).expect("validate").severity, Severity::Pass);
    }
}
