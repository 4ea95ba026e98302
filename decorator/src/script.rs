//! Browser-side proof toggle, appended to decorated pages.

use markup5ever_rcdom::Handle;

use crate::dom;

/// Attribute identifying the injected script element.
pub const SCRIPT_MARKER_ATTR: &str = "data-bokuteki";
/// Value of [`SCRIPT_MARKER_ATTR`] on the toggle script.
pub const SCRIPT_MARKER_VALUE: &str = "toggle";

/// Returns the client-side proof toggle JavaScript.
pub fn toggle_js() -> &'static str {
    r#"// bokuteki: collapsible proofs
(function () {
  'use strict';

  function wire() {
    var labels = document.getElementsByClassName('proof-prefix');
    Array.prototype.forEach.call(labels, function (label) {
      label.addEventListener('click', function () {
        var content = label.parentElement.getElementsByClassName('proof-content')[0];
        if (!content) return;
        if (content.style.display === 'none') {
          content.style.display = 'block';
          label.textContent = '(証明)';
        } else {
          content.style.display = 'none';
          label.textContent = '(証明) ...';
        }
      });
    });
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', wire);
  } else {
    wire();
  }
}());
"#
}

/// Appends the toggle script to `body` unless a previous run already did.
///
/// Returns true if a script element was added.
pub fn inject_toggle_script(body: &Handle) -> bool {
    let present = dom::descendants(body).iter().any(|node| {
        dom::tag_name(node) == Some("script")
            && dom::attr(node, SCRIPT_MARKER_ATTR).as_deref() == Some(SCRIPT_MARKER_VALUE)
    });
    if present {
        return false;
    }
    let script = dom::new_element("script", &[(SCRIPT_MARKER_ATTR, SCRIPT_MARKER_VALUE)]);
    dom::append_child(&script, dom::new_text(toggle_js()));
    dom::append_child(body, script);
    true
}
