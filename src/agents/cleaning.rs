//! Removal of persona labels that models sometimes echo back.

use crate::types::AgentKind;

fn label_prefixes() -> Vec<String> {
    let mut prefixes = Vec::new();
    for kind in AgentKind::all() {
        let name = kind.display_name();
        prefixes.push(format!("{} Agent says:", name));
        prefixes.push(format!("[{} Agent says]:", name));
        prefixes.push(format!("{} Agent:", name));
        prefixes.push(format!("[{} Agent]:", name));
    }
    prefixes.push("Agent says:".to_string());
    prefixes.push("[Agent says]:".to_string());
    prefixes
}

fn strip_label(text: &str, label: &str) -> Option<String> {
    let trimmed = text.trim();
    let head = trimmed.get(..label.len())?;
    head.eq_ignore_ascii_case(label)
        .then(|| trimmed[label.len()..].trim().to_string())
}

/// Strip leading "Teaching Agent:"-style labels, case-insensitively and repeatedly.
///
/// Text without a label is returned unchanged.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.to_string();

    for prefix in label_prefixes() {
        while let Some(rest) = strip_label(&cleaned, &prefix) {
            cleaned = rest;
        }
    }

    cleaned
}
