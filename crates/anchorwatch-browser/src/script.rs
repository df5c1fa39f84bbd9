//! JavaScript snippets evaluated in the top-level document.
//!
//! Every snippet locates the target frame by source substring, reads through
//! its `contentDocument`, and returns a JSON string shaped like [`FrameReply`].
//! Arguments are embedded as JSON literals so no selector or text can break
//! out of the script.

use serde::Deserialize;

/// Decoded result of a frame script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrameReply {
    /// The frame exists and its document is readable
    pub found: bool,
    /// Script-specific payload; `None` when no element matched
    pub value: Option<String>,
}

impl FrameReply {
    /// Parse the JSON string returned by a frame script.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::debug!("unreadable frame script reply {raw:?}: {e}");
                None
            }
        }
    }
}

fn literal(value: &str) -> String {
    // Serializing a &str cannot fail
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn in_frame(pattern: &str, body: &str) -> String {
    format!(
        r"(() => {{
  const frame = Array.from(document.querySelectorAll('iframe'))
    .find((f) => (f.getAttribute('src') || '').includes({pattern}));
  let doc = null;
  try {{ doc = frame ? frame.contentDocument : null; }} catch (e) {{ doc = null; }}
  if (!doc) return JSON.stringify({{ found: false, value: null }});
  {body}
}})()",
        pattern = literal(pattern),
    )
}

/// Report whether the frame is present and readable.
pub fn frame_present(pattern: &str) -> String {
    in_frame(pattern, "return JSON.stringify({ found: true, value: null });")
}

/// Concatenated `textContent` of all elements matching `selector`.
pub fn text_of(pattern: &str, selector: &str) -> String {
    in_frame(
        pattern,
        &format!(
            "const nodes = Array.from(doc.querySelectorAll({selector}));
  return JSON.stringify({{ found: true, value: nodes.length ? nodes.map((n) => n.textContent || '').join('') : null }});",
            selector = literal(selector),
        ),
    )
}

/// Attribute value on the first element matching `selector`.
pub fn attribute_of(pattern: &str, selector: &str, attribute: &str) -> String {
    in_frame(
        pattern,
        &format!(
            "const node = doc.querySelector({selector});
  return JSON.stringify({{ found: true, value: node ? node.getAttribute({attribute}) : null }});",
            selector = literal(selector),
            attribute = literal(attribute),
        ),
    )
}

/// Overwrite `textContent` of all elements matching `selector`.
///
/// The reply value is the number of rewritten elements, or `null` for none.
pub fn set_text(pattern: &str, selector: &str, text: &str) -> String {
    in_frame(
        pattern,
        &format!(
            "const nodes = Array.from(doc.querySelectorAll({selector}));
  nodes.forEach((n) => {{ n.textContent = {text}; }});
  return JSON.stringify({{ found: true, value: nodes.length ? String(nodes.length) : null }});",
            selector = literal(selector),
            text = literal(text),
        ),
    )
}
