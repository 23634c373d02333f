/// Turns a free-text tag into the slug used to look up content by tag:
/// lowercase, leading `#` dropped, every run of characters outside
/// `[a-z0-9-]` replaced by one `-`, no `-` at either end.
///
/// `sanitize_tag(sanitize_tag(x)) == sanitize_tag(x)` for every `x`.
pub fn sanitize_tag(input: &str) -> String {
    slugify(input, '#')
}

/// Same as `sanitize_tag` for community names, where the leading sigil is
/// `@` (`"@hive-108943"` → `"hive-108943"`).
pub fn sanitize_community_name(input: &str) -> String {
    slugify(input, '@')
}

fn slugify(input: &str, sigil: char) -> String {
    let lower = input.to_lowercase();
    let body = lower.trim_start_matches(sigil);

    let mut out = String::with_capacity(body.len());
    let mut in_run = false;
    for c in body.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags() {
        assert_eq!(sanitize_tag("#Hive Onboarding!"), "hive-onboarding");
        assert_eq!(sanitize_tag("##hiveio"), "hiveio");
        assert_eq!(sanitize_tag("  Hive   Venezuela  "), "hive-venezuela");
        assert_eq!(sanitize_tag("hive-108943"), "hive-108943");
        assert_eq!(sanitize_tag("Café"), "caf");
        assert_eq!(sanitize_tag(""), "");
        assert_eq!(sanitize_tag("!!!"), "");
    }

    #[test]
    fn hash_is_only_dropped_in_front() {
        assert_eq!(sanitize_tag("a#b"), "a-b");
        assert_eq!(sanitize_tag(" #a"), "a");
    }

    #[test]
    fn community_names() {
        assert_eq!(sanitize_community_name("@hive-108943"), "hive-108943");
        assert_eq!(sanitize_community_name("@@Hive Spanish"), "hive-spanish");
        // The other namespace's sigil is not special.
        assert_eq!(sanitize_tag("@hive-108943"), "hive-108943");
        assert_eq!(sanitize_community_name("#hiveio"), "hiveio");
        assert_eq!(sanitize_community_name(""), "");
    }

    #[test]
    fn sigils_after_hyphens_and_wide_lowercase() {
        assert_eq!(sanitize_tag("-#a"), "a");
        assert_eq!(sanitize_tag("#-@b"), "b");
        assert_eq!(sanitize_community_name("#-@b"), "b");
        assert_eq!(sanitize_tag("İstanbul"), "i-stanbul");
        assert_eq!(sanitize_tag("ẞ"), "");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "#Hive Onboarding!",
            "--a--b--",
            "##",
            "@@x",
            "Ñandú 2024",
            "a - b",
            "  #  spaced",
            "#-#-",
            "UPPER_lower-123",
            "",
            "İstanbul",
            "ẞ",
            "-#a",
            "#-@b",
            "@-#c",
            "#İ",
        ];
        for s in samples.iter() {
            let once = sanitize_tag(s);
            assert_eq!(sanitize_tag(&once), once, "sanitize_tag({:?})", s);
            let once = sanitize_community_name(s);
            assert_eq!(sanitize_community_name(&once), once, "community({:?})", s);
        }
    }
}
