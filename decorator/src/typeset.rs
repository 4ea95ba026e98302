//! Math typesetting: delimiter scanning over text nodes and the renderer seam.
//!
//! The decorator does not typeset math itself. It finds expressions between
//! the configured delimiter pairs and hands each one to a [`MathRenderer`],
//! splicing the returned markup into the DOM in place of the source text.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use markup5ever_rcdom::{Handle, NodeData};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom;
use crate::error::TypesetError;

/// A left/right delimiter pair recognized in page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiter {
    /// Opening delimiter.
    pub left: String,
    /// Closing delimiter.
    pub right: String,
    /// Render in display mode (block) rather than inline.
    pub display: bool,
}

impl Delimiter {
    /// Creates a delimiter pair.
    pub fn new(left: &str, right: &str, display: bool) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
            display,
        }
    }
}

/// Configuration handed to [`render_math_in_element`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesetConfig {
    /// Recognized delimiters. At a given position the first listed match wins,
    /// so `$$` must precede `$`.
    pub delimiters: Vec<Delimiter>,
    /// Elements whose text is never scanned.
    pub ignored_tags: Vec<String>,
    /// Elements carrying one of these classes are never scanned.
    pub ignored_classes: Vec<String>,
}

impl Default for TypesetConfig {
    fn default() -> Self {
        Self {
            delimiters: vec![
                Delimiter::new("$$", "$$", true),
                Delimiter::new("$", "$", false),
                Delimiter::new("\\(", "\\)", false),
                Delimiter::new("\\[", "\\]", true),
            ],
            ignored_tags: ["script", "noscript", "style", "textarea", "pre", "code", "option"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            ignored_classes: vec!["katex".to_string()],
        }
    }
}

/// A piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text, kept as is.
    Text(String),
    /// A math expression and the delimiter pair that enclosed it.
    Math {
        /// Source between the delimiters.
        tex: String,
        /// The enclosing delimiter pair.
        delimiter: Delimiter,
    },
}

/// Renders one math expression to HTML markup.
pub trait MathRenderer {
    /// Returns the markup replacing `tex` (found between `delimiter`).
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be rendered.
    fn render(&self, tex: &str, delimiter: &Delimiter) -> Result<String, TypesetError>;
}

/// Renders math by running the KaTeX command line tool once per expression.
#[derive(Debug, Clone)]
pub struct KatexCli {
    program: String,
    args: Vec<String>,
}

impl Default for KatexCli {
    fn default() -> Self {
        Self::new("npx", vec!["katex".to_string()])
    }
}

impl KatexCli {
    /// Uses `program args..` as the KaTeX command.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl MathRenderer for KatexCli {
    fn render(&self, tex: &str, delimiter: &Delimiter) -> Result<String, TypesetError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if delimiter.display {
            command.arg("--display-mode");
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let spawn_error = |source| TypesetError::Spawn {
            command: self.describe(),
            source,
        };
        let mut child = command.spawn().map_err(spawn_error)?;
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(tex.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(spawn_error(e)),
                _ => {}
            }
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        if !output.status.success() {
            return Err(TypesetError::Rejected {
                command: self.describe(),
                tex: tex.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let markup = String::from_utf8(output.stdout).map_err(|_| TypesetError::InvalidOutput {
            command: self.describe(),
        })?;
        Ok(markup.trim_end().to_string())
    }
}

/// Leaves math untouched: each expression is written back with its delimiters,
/// for pages typeset client-side.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipMath;

impl MathRenderer for SkipMath {
    fn render(&self, tex: &str, delimiter: &Delimiter) -> Result<String, TypesetError> {
        Ok(escape_html(&format!("{}{}{}", delimiter.left, tex, delimiter.right)))
    }
}

/// Typesets every math expression in the text under `root`.
///
/// Returns the number of expressions rendered. The first renderer failure
/// aborts the walk and is returned to the caller.
///
/// # Errors
///
/// Returns the renderer's error unchanged.
pub fn render_math_in_element(
    root: &Handle,
    config: &TypesetConfig,
    renderer: &dyn MathRenderer,
) -> Result<usize, TypesetError> {
    let mut rendered = 0;
    for text_node in text_nodes(root, config) {
        let text = match &text_node.data {
            NodeData::Text { contents } => contents.borrow().to_string(),
            _ => continue,
        };
        let segments = split_at_delimiters(&text, &config.delimiters);
        if !segments.iter().any(|s| matches!(s, Segment::Math { .. })) {
            continue;
        }

        let mut replacement = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => replacement.push(dom::new_text(&text)),
                Segment::Math { tex, delimiter } => {
                    let markup = renderer.render(&tex, &delimiter)?;
                    debug!(tex = %tex, display = delimiter.display, "typeset math");
                    replacement.extend(dom::parse_fragment_nodes(&markup));
                    rendered += 1;
                }
            }
        }
        dom::replace_with(&text_node, replacement);
    }
    Ok(rendered)
}

/// Text nodes under `root` in document order, skipping ignored subtrees.
fn text_nodes(root: &Handle, config: &TypesetConfig) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { .. } => {
                out.push(node.clone());
                continue;
            }
            NodeData::Element { name, .. } => {
                let ignored_tag = config
                    .ignored_tags
                    .iter()
                    .any(|tag| tag.eq_ignore_ascii_case(&name.local));
                let ignored_class = config
                    .ignored_classes
                    .iter()
                    .any(|class| dom::has_class(&node, class));
                if ignored_tag || ignored_class {
                    continue;
                }
            }
            _ => {}
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    out
}

/// Splits `text` into plain and math segments.
///
/// The earliest opening delimiter wins; at equal positions the first listed
/// delimiter wins. Inside math, a backslash escapes the next character and
/// the closing delimiter is only recognized outside `{..}` groups. An
/// opening delimiter without a closing one leaves the rest as text.
pub fn split_at_delimiters(text: &str, delimiters: &[Delimiter]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some((start, delimiter)) = find_opening(rest, delimiters) {
        let body_start = start + delimiter.left.len();
        let Some(end) = find_closing(rest, &delimiter.right, body_start) else {
            break;
        };
        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
        }
        segments.push(Segment::Math {
            tex: rest[body_start..end].to_string(),
            delimiter: delimiter.clone(),
        });
        rest = &rest[end + delimiter.right.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    segments
}

fn find_opening<'d>(text: &str, delimiters: &'d [Delimiter]) -> Option<(usize, &'d Delimiter)> {
    text.char_indices().find_map(|(i, _)| {
        delimiters
            .iter()
            .find(|d| !d.left.is_empty() && text[i..].starts_with(d.left.as_str()))
            .map(|d| (i, d))
    })
}

fn find_closing(text: &str, right: &str, from: usize) -> Option<usize> {
    if right.is_empty() {
        return None;
    }
    let mut depth = 0i32;
    let mut chars = text[from..].char_indices();
    while let Some((offset, c)) = chars.next() {
        let i = from + offset;
        if depth <= 0 && text[i..].starts_with(right) {
            return Some(i);
        }
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Escapes HTML special characters in text.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math(tex: &str, left: &str, right: &str, display: bool) -> Segment {
        Segment::Math {
            tex: tex.to_string(),
            delimiter: Delimiter::new(left, right, display),
        }
    }

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    #[test]
    fn display_dollars_win_over_inline() {
        let delims = TypesetConfig::default().delimiters;
        assert_eq!(
            split_at_delimiters("a $$x$$ b $y$", &delims),
            vec![
                text("a "),
                math("x", "$$", "$$", true),
                text(" b "),
                math("y", "$", "$", false),
            ]
        );
    }

    #[test]
    fn bracket_delimiters() {
        let delims = TypesetConfig::default().delimiters;
        assert_eq!(
            split_at_delimiters(r"\(a\) and \[b\]", &delims),
            vec![
                math("a", r"\(", r"\)", false),
                text(" and "),
                math("b", r"\[", r"\]", true),
            ]
        );
    }

    #[test]
    fn escaped_and_braced_closers_are_skipped() {
        let delims = TypesetConfig::default().delimiters;
        assert_eq!(
            split_at_delimiters(r"$a\$b$", &delims),
            vec![math(r"a\$b", "$", "$", false)]
        );
        assert_eq!(
            split_at_delimiters(r"$\text{{$}}x$", &delims),
            vec![math(r"\text{{$}}x", "$", "$", false)]
        );
    }

    #[test]
    fn unterminated_opening_stays_text() {
        let delims = TypesetConfig::default().delimiters;
        assert_eq!(
            split_at_delimiters("cost: $5", &delims),
            vec![text("cost: $5")]
        );
        assert_eq!(
            split_at_delimiters(r"$a$ then $5 and \(x\)", &delims),
            vec![math("a", "$", "$", false), text(r" then $5 and \(x\)")]
        );
    }

    #[test]
    fn non_ascii_text_is_preserved() {
        let delims = TypesetConfig::default().delimiters;
        assert_eq!(
            split_at_delimiters("定理 $x$ の場合", &delims),
            vec![text("定理 "), math("x", "$", "$", false), text(" の場合")]
        );
    }

    #[test]
    fn skip_math_writes_source_back() {
        let out = SkipMath
            .render("a<b", &Delimiter::new("$", "$", false))
            .expect("render");
        assert_eq!(out, "$a&lt;b$");
    }

    #[cfg(unix)]
    #[test]
    fn katex_cli_pipes_expression_through_stdin() {
        let cat = KatexCli::new("cat", Vec::new());
        let out = cat
            .render("x^2", &Delimiter::new("$", "$", false))
            .expect("render");
        assert_eq!(out, "x^2");
    }

    #[cfg(unix)]
    #[test]
    fn katex_cli_failure_is_rejected() {
        let failing = KatexCli::new("false", Vec::new());
        let err = failing
            .render("x", &Delimiter::new("$", "$", false))
            .expect_err("false exits non-zero");
        assert!(matches!(err, TypesetError::Rejected { .. }));
    }

    #[test]
    fn katex_cli_missing_program_is_spawn_error() {
        let missing = KatexCli::new("bokuteki-no-such-katex", Vec::new());
        let err = missing
            .render("x", &Delimiter::new("$", "$", false))
            .expect_err("missing program");
        assert!(matches!(err, TypesetError::Spawn { .. }));
    }

    #[test]
    fn renders_text_nodes_outside_ignored_tags() {
        let page = dom::parse_html("<p>$x$</p><code>$y$</code>");
        let body = dom::find_element(&page.document, "body").expect("body");
        let count = render_math_in_element(&body, &TypesetConfig::default(), &SkipMath)
            .expect("typeset");
        assert_eq!(count, 1);
        assert_eq!(dom::text_content(&body), "$x$$y$");
    }
}
