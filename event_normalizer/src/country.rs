/// Reduces a free-text place to the country key used for grouping.
///
/// For `"City, Country"` only the last part is kept. Parenthetical
/// qualifiers are removed (`"Poland (EU)"` → `"poland"`), punctuation is
/// dropped, whitespace is collapsed and the result is lowercase. Letters
/// outside ASCII are kept (`"México"` → `"méxico"`).
pub fn normalize_country(raw: &str) -> String {
    let last = raw.rsplit(',').next().unwrap_or("");

    let mut depth = 0usize;
    let mut cleaned = String::with_capacity(last.len());
    for c in last.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            c if c.is_alphanumeric() => cleaned.extend(c.to_lowercase()),
            // Other punctuation separates words ("Bosnia-Herzegovina").
            c if c.is_whitespace() || c == '-' || c == '/' => cleaned.push(' '),
            _ => {}
        }
    }
    cleaned.split_whitespace().collect::<Vec<&str>>().join(" ")
}
