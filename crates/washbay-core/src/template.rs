//! Message templating.
//!
//! Templates are plain strings with `{{key}}` placeholders. Rendering is
//! pure substitution; placeholders without a matching variable are left
//! verbatim so a misconfigured template is visible in the delivered
//! message rather than silently blank.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// Regex for matching {{...}} placeholders
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}").unwrap());

/// Substitute `{{key}}` placeholders from the variable map.
pub fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            vars.get(key)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
