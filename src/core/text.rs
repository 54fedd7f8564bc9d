//! Text predicates applied to reply bodies.
//!
//! "Word characters" are ASCII letters, digits, and `_`. Everything else,
//! including non-ASCII letters, separates words. This is the same set a
//! `\w` class matches in an ASCII-only regex engine, so word counts are
//! reproducible regardless of which engine a downstream consumer uses.

/// Host that marks a link as pointing to product documentation.
pub const DOC_HOST: &str = "docs.bitnami.com";

/// Scheme prefix a link must start with to be counted.
const LINK_SCHEME: &str = "https://";

/// Returns `true` for ASCII letters, digits, and underscore.
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Counts maximal runs of word characters in `text`.
///
/// # Example
///
/// ```rust
/// use supportpack::core::text::word_count;
///
/// assert_eq!(word_count("hello, world!!"), 2);
/// assert_eq!(word_count("   "), 0);
/// assert_eq!(word_count("snake_case v2"), 2);
/// ```
pub fn word_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for &b in text.as_bytes() {
        if is_word_byte(b) {
            if !in_word {
                count += 1;
                in_word = true;
            }
        } else {
            in_word = false;
        }
    }

    count
}

/// Returns `true` if `text` contains `https://` immediately followed by a
/// word character.
///
/// Plain `http://` links do not count.
///
/// ```rust
/// use supportpack::core::text::has_link;
///
/// assert!(has_link("see https://x.example/y"));
/// assert!(!has_link("see http//bad"));
/// assert!(!has_link("see http://example.com"));
/// ```
pub fn has_link(text: &str) -> bool {
    let bytes = text.as_bytes();
    text.match_indices(LINK_SCHEME).any(|(idx, _)| {
        bytes
            .get(idx + LINK_SCHEME.len())
            .is_some_and(|&b| is_word_byte(b))
    })
}

/// Returns `true` if `text` mentions the documentation host anywhere.
pub fn has_doc_link(text: &str) -> bool {
    text.contains(DOC_HOST)
}
