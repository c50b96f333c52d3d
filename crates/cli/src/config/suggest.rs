// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Check name suggestions for config validation.

use std::path::Path;

use super::parse::KNOWN_CHECKS;

/// Suggest a configurable check name for a typo.
pub fn suggest_check_name(unknown: &str) -> Option<&'static str> {
    // Empty strings can't be typos
    if unknown.is_empty() {
        return None;
    }

    // Common variations
    let suggestion = match unknown {
        "enqueued_scripts" | "scripts_size" | "script_size" => Some("enqueued_scripts_size"),
        "enqueued_styles" | "styles_size" | "style_size" => Some("enqueued_styles_size"),
        "file_types" | "filetype" | "files" => Some("file_type"),
        "obfuscation" | "obfuscated_code" => Some("code_obfuscation"),
        "trademark" | "brands" => Some("trademarks"),
        _ => None,
    };

    if suggestion.is_some() {
        return suggestion;
    }

    // Try prefix matching (require at least 2 chars to avoid false positives)
    if unknown.len() >= 2 {
        for &name in KNOWN_CHECKS {
            if name.starts_with(unknown) || unknown.starts_with(name) {
                return Some(name);
            }
        }
    }

    None
}

/// Warn about unknown check key with suggestion.
pub fn warn_unknown_check(path: &Path, key: &str) {
    match suggest_check_name(key) {
        Some(suggested) => eprintln!(
            "plugin-check: warning: {}: unknown check `{}`. Did you mean `{}`?",
            path.display(),
            key,
            suggested
        ),
        None => eprintln!(
            "plugin-check: warning: {}: unknown check `{}`\n  Configurable checks: {}",
            path.display(),
            key,
            KNOWN_CHECKS.join(", ")
        ),
    }
}

#[cfg(test)]
#[path = "suggest_tests.rs"]
mod tests;
