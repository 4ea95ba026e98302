//! Case sweep: renders case-analysis branches as list items.

use markup5ever::{local_name, LocalName};
use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::config::Markers;
use crate::dom;
use crate::error::DecorateError;
use crate::model::{
    is_decorated, mark_decorated, CaseCondition, SweepOutcome, CASE_BODY_STYLE,
    CASE_CONDITION_SUFFIX, CASE_ITEM_CLASS, OTHERWISE_CONDITION, RULE_CLASS,
};

/// Reads the condition of a case block. The otherwise flag wins over any rule.
pub fn case_condition(case: &Handle, markers: &Markers) -> CaseCondition {
    if dom::has_class(case, &markers.otherwise) {
        CaseCondition::Otherwise
    } else {
        CaseCondition::Rule(dom::attr(case, &markers.rule_attr).unwrap_or_default())
    }
}

fn condition_nodes(condition: &CaseCondition) -> Vec<Handle> {
    match condition {
        CaseCondition::Otherwise => vec![dom::new_text(OTHERWISE_CONDITION)],
        CaseCondition::Rule(rule) => {
            let span = dom::new_element("span", &[("class", RULE_CLASS)]);
            dom::append_child(&span, dom::new_text(rule));
            vec![span, dom::new_text(CASE_CONDITION_SUFFIX)]
        }
    }
}

fn next_undecorated(root: &Handle, markers: &Markers) -> Option<Handle> {
    dom::elements_by_class(root, &markers.case)
        .into_iter()
        .find(|case| !is_decorated(case))
}

/// Formats every case block under `root` as
/// `li.case > CONDITION + p[style=padding-left:1em] > CONTENT`.
///
/// The new item is written out and parsed back in the case block's context,
/// so block-level content that cannot live inside `<p>` lands where an HTML
/// parser puts it and the result reads back unchanged. Re-parsing replaces
/// the nodes below a case, so the next undecorated block is looked up afresh
/// after each one.
///
/// # Errors
///
/// Returns [`DecorateError::Serialize`] if the item cannot be serialized.
pub fn format_cases(root: &Handle, markers: &Markers) -> Result<SweepOutcome, DecorateError> {
    let mut outcome = SweepOutcome {
        skipped: dom::elements_by_class(root, &markers.case)
            .iter()
            .filter(|case| is_decorated(case))
            .count(),
        ..SweepOutcome::default()
    };

    while let Some(case) = next_undecorated(root, markers) {
        let content = dom::take_children(&case);
        let condition = case_condition(&case, markers);

        let item = dom::new_element("li", &[("class", CASE_ITEM_CLASS)]);
        for node in condition_nodes(&condition) {
            dom::append_child(&item, node);
        }
        let paragraph = dom::new_element("p", &[("style", CASE_BODY_STYLE)]);
        for node in content {
            dom::append_child(&paragraph, node);
        }
        dom::append_child(&item, paragraph);

        let markup = dom::outer_html(&item).map_err(DecorateError::Serialize)?;
        let context = dom::tag_name(&case).map_or(local_name!("div"), LocalName::from);
        dom::replace_children(&case, dom::parse_fragment_in(&markup, context));
        mark_decorated(&case);
        debug!(?condition, "formatted case");
        outcome.decorated += 1;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_text(html: &str) -> String {
        let page = dom::parse_html(html);
        format_cases(&page.document, &Markers::default()).expect("format cases");
        let item = dom::first_by_class(&page.document, CASE_ITEM_CLASS).expect("case item");
        dom::text_content(&item)
    }

    #[test]
    fn rule_case_reads_rule_then_suffix() {
        assert_eq!(
            item_text(r#"<div class="math-case" data-rule="base">n = 0</div>"#),
            "base の場合n = 0"
        );
    }

    #[test]
    fn otherwise_ignores_rule() {
        assert_eq!(
            item_text(r#"<div class="math-case otherwise" data-rule="base">rest</div>"#),
            "それ以外の場合rest"
        );
    }

    #[test]
    fn missing_rule_falls_back_to_empty() {
        let page = dom::parse_html(r#"<div class="math-case">x</div>"#);
        let case = dom::first_by_class(&page.document, "math-case").expect("case");
        assert_eq!(
            case_condition(&case, &Markers::default()),
            CaseCondition::Rule(String::new())
        );
    }

    #[test]
    fn rule_is_wrapped_and_content_indented() {
        let page = dom::parse_html(r#"<div class="math-case" data-rule="step">body</div>"#);
        format_cases(&page.document, &Markers::default()).expect("format cases");
        let rule = dom::first_by_class(&page.document, RULE_CLASS).expect("rule span");
        assert_eq!(dom::text_content(&rule), "step");
        let paragraph = dom::find_element(&page.document, "p").expect("paragraph");
        assert_eq!(dom::attr(&paragraph, "style").as_deref(), Some(CASE_BODY_STYLE));
        assert_eq!(dom::text_content(&paragraph), "body");
    }

    #[test]
    fn block_content_reads_back_unchanged() {
        let page = dom::parse_html(
            r#"<div class="math-case" data-rule="ind"><ul><li>a</li></ul><div>b</div></div>"#,
        );
        let outcome = format_cases(&page.document, &Markers::default()).expect("format cases");
        assert_eq!(outcome.decorated, 1);

        let once = dom::serialize_document(&page).expect("serialize");
        let reparsed = dom::serialize_document(&dom::parse_html(&once)).expect("serialize");
        assert_eq!(once, reparsed);

        let item = dom::first_by_class(&page.document, CASE_ITEM_CLASS).expect("case item");
        assert_eq!(dom::text_content(&item), "ind の場合ab");
    }

    #[test]
    fn nested_cases_are_both_formatted() {
        let page = dom::parse_html(
            r#"<div class="math-case" data-rule="outer"><div class="math-case otherwise">inner</div></div>"#,
        );
        let outcome = format_cases(&page.document, &Markers::default()).expect("format cases");
        assert_eq!(outcome.decorated, 2);
        let items: Vec<String> = dom::elements_by_class(&page.document, CASE_ITEM_CLASS)
            .iter()
            .map(dom::text_content)
            .collect();
        assert_eq!(items, vec!["outer の場合それ以外の場合inner", "それ以外の場合inner"]);
        assert_eq!(dom::elements_by_class(&page.document, "math-case").len(), 2);
        assert!(dom::elements_by_class(&page.document, "math-case")
            .iter()
            .all(is_decorated));
    }
}
