use std::sync::LazyLock;

use regex::Regex;

/// Watch, embed and `/v/` paths on the main host, or the short-link host,
/// followed by an identifier token. Anything after the token is tolerated.
static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?(?:youtube\.com/(?:watch\?v=|embed/|v/)|youtu\.be/)[A-Za-z0-9_-]+",
    )
    .expect("video url pattern is valid")
});

/// Returns true when `candidate` has the shape of a supported video URL.
///
/// Pure and deterministic; no network access. Callers are expected to trim.
pub fn is_admissible(candidate: &str) -> bool {
    VIDEO_URL.is_match(candidate)
}

/// Inline validation state for the URL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlValidity {
    /// Nothing (or only whitespace) typed yet; no opinion.
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl UrlValidity {
    pub fn of(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            UrlValidity::Unknown
        } else if is_admissible(trimmed) {
            UrlValidity::Valid
        } else {
            UrlValidity::Invalid
        }
    }

    pub fn is_valid(self) -> bool {
        self == UrlValidity::Valid
    }
}
