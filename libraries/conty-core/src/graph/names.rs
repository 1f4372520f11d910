//! Stage display names
//!
//! Pack editors leave generated text in stage names: a media-file suffix
//! ("intro.mp3 item") or a timestamp id prefix ("1652345678901 - Intro").

use regex::Regex;
use std::sync::LazyLock;

static MEDIA_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.mp3.*(item|node)$").expect("valid media suffix pattern"));

static ID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,}\s*[-_]\s*").expect("valid id prefix pattern"));

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(story|stage)[\s\-_]*node\b").expect("valid placeholder pattern")
});

/// Strip editor boilerplate from a raw stage name
///
/// Applied until nothing changes, so the result is a fixed point:
/// `clean_display_name(&clean_display_name(s)) == clean_display_name(s)`.
pub fn clean_display_name(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let without_suffix = MEDIA_SUFFIX.replace(&current, "");
        let next = ID_PREFIX.replace(&without_suffix, "").trim().to_string();
        // every change strictly shortens the string
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Whether a name is an editor placeholder rather than a real title
pub fn is_boilerplate_name(name: &str) -> bool {
    name.trim().is_empty() || PLACEHOLDER.is_match(name)
}
