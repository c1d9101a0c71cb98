use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::PlanError;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```[A-Za-z0-9_-]*").expect("code fence pattern is valid")
});

/// Decodes a JSON object out of untrusted model text.
///
/// Repairs are bounded: markdown fences and `//` comments are removed, and
/// anything before the first `{` or after the last `}` is ignored. The result
/// is parsed exactly once.
pub fn decode_model_text(raw: &str) -> Result<Value, PlanError> {
    let without_fences = CODE_FENCE.replace_all(raw, "");
    let cleaned = strip_line_comments(&without_fences);
    let candidate = extract_json_object(&cleaned)
        .ok_or_else(|| PlanError::malformed("no JSON object found in model reply"))?;

    let value: Value = serde_json::from_str(candidate)
        .map_err(|err| PlanError::malformed(format!("model reply is not valid JSON: {}", err)))?;

    if value.is_object() {
        Ok(value)
    } else {
        Err(PlanError::malformed("model reply is not a JSON object"))
    }
}

pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Drops `//` comments that sit outside string literals. JSON strings cannot
/// span lines, so string state resets at every newline.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let mut in_string = false;
        let mut escaped = false;
        let mut cut = None;
        let mut chars = line.char_indices().peekable();

        while let Some((index, ch)) = chars.next() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '/' if matches!(chars.peek(), Some((_, '/'))) => {
                    cut = Some(index);
                    break;
                }
                _ => {}
            }
        }

        match cut {
            Some(index) => {
                out.push_str(&line[..index]);
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }
    out
}
