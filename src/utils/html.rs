use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Teachers author question prompts and option text that students later see
/// rendered, so everything they write passes through a whitelist-based
/// sanitizer: safe tags (like <b>, <p>) survive, dangerous tags (like
/// <script>, <iframe>) and attributes (like onclick) are stripped. This is
/// the fail-safe against stored XSS reaching the student-facing pages.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
