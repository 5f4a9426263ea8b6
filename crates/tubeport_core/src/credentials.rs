/// Inline cookies are pasted already encoded for transport; only trimming applies.
/// Blank input means "no credentials" and is sent as absent.
pub fn normalize_inline_cookies(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
