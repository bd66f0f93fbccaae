//! Artifact sanitizer: turns raw model output into a standalone document.
//!
//! The transform is a fixed sequence of text rewrites:
//!
//! 1. drop every opening code fence at the start of a line, with its info
//!    string (`html`, `html:game.html`, `html title="x"`); when markup
//!    follows the marker on the same line only the marker goes,
//! 2. drop closing fence markers at the end of any line,
//! 3. trim surrounding whitespace,
//! 4. make the text start with the canonical `<!DOCTYPE html>` marker.
//!
//! Steps 1-3 repeat until none applies, so the result never contains a
//! fence that an earlier pass exposed. Any Unicode whitespace counts as
//! padding around a fence, and `\r\n`, `\n` and a lone `\r` all end a line.
//! The sanitizer is total and idempotent: `sanitize(&sanitize(x)) ==
//! sanitize(x)` for every input.
//!
//! Only the outer shape is touched. Scripts, styles, and resource
//! references inside the document are never inspected.

use std::sync::LazyLock;

use regex::Regex;

/// The document-start marker every sanitized artifact begins with.
pub const DOCTYPE_MARKER: &str = "<!DOCTYPE html>";

/// An opening fence at a line start plus everything up to the first `<` or
/// the line end, and the line break when nothing else is left on the line.
static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^[^\S\r\n]*```[^<\r\n]*(?:\r\n|\r|\n)?")
        .expect("opening fence pattern is valid")
});

/// One or more fence markers ending a line, e.g. "</html>```".
static CLOSING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)(?:```[^\S\r\n]*)+$").expect("closing fence pattern is valid")
});

/// Any doctype declaration at the very start, in any casing or spacing.
static LEADING_DOCTYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A<!doctype(?:\s[^>]*)?>").expect("doctype pattern is valid")
});

/// Sanitize raw model output into a structurally well-formed HTML document.
pub fn sanitize(raw: &str) -> String {
    ensure_doctype(&strip_fences(raw))
}

/// Remove fences and surrounding whitespace until the text stops changing.
fn strip_fences(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = {
            let without_opening = OPENING_FENCE.replace_all(&current, "");
            let without_closing = CLOSING_FENCE.replace_all(&without_opening, "");
            without_closing.trim().to_string()
        };
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Normalize or prepend the document-start marker.
///
/// An existing doctype (any casing, legacy or HTML5) is replaced by the
/// canonical marker; otherwise the marker is prepended on its own line.
fn ensure_doctype(body: &str) -> String {
    if let Some(found) = LEADING_DOCTYPE.find(body) {
        let rest = &body[found.end()..];
        return format!("{DOCTYPE_MARKER}{rest}");
    }
    if body.is_empty() {
        return DOCTYPE_MARKER.to_string();
    }
    format!("{DOCTYPE_MARKER}\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(raw: &str) {
        let once = sanitize(raw);
        let twice = sanitize(&once);
        assert_eq!(once, twice, "sanitize is not idempotent for {raw:?}");
    }

    #[test]
    fn test_fenced_html_scenario() {
        let raw = "```html\n<!DOCTYPE html>\n<html><body><canvas></canvas></body></html>\n```";
        let clean = sanitize(raw);
        assert!(clean.starts_with("<!DOCTYPE html>"));
        assert!(!clean.lines().any(|l| l.trim_start().starts_with("```")));
        assert_eq!(
            clean,
            "<!DOCTYPE html>\n<html><body><canvas></canvas></body></html>"
        );
    }

    #[test]
    fn test_bare_fence_lines_removed() {
        let raw = "```\n<html></html>\n```\n";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn test_fence_marker_casing_and_spacing() {
        for raw in [
            "```HTML\n<!DOCTYPE html>\n<p>x</p>\n```",
            "  ``` html \n<!DOCTYPE html>\n<p>x</p>\n   ```   ",
            "```html\r\n<!DOCTYPE html>\r\n<p>x</p>\r\n```\r\n",
        ] {
            let clean = sanitize(raw);
            assert!(clean.starts_with(DOCTYPE_MARKER), "{clean:?}");
            assert!(clean.ends_with("<p>x</p>"), "{clean:?}");
            assert!(!clean.contains("```"), "{clean:?}");
            assert_idempotent(raw);
        }
    }

    #[test]
    fn test_closing_fence_glued_to_last_line() {
        let raw = "<!DOCTYPE html>\n<html></html>```";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn test_fence_exposed_by_first_pass_is_removed() {
        let raw = "```js ``` ```\n<html></html>";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\n<html></html>");
        assert_idempotent(raw);
    }

    #[test]
    fn test_missing_doctype_is_prepended() {
        let raw = "<html><body>hi</body></html>";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\n<html><body>hi</body></html>");
    }

    #[test]
    fn test_lowercase_doctype_is_normalized() {
        let raw = "<!doctype html>\n<html></html>";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn test_spaced_doctype_is_normalized() {
        let raw = "<!DOCTYPE   HTML  >\n<html></html>";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\n<html></html>");
    }

    #[test]
    fn test_legacy_doctype_is_replaced_not_duplicated() {
        let raw = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\">\n<html></html>";
        let clean = sanitize(raw);
        assert_eq!(clean, "<!DOCTYPE html>\n<html></html>");
        assert_eq!(clean.matches("DOCTYPE").count(), 1);
    }

    #[test]
    fn test_prose_without_document_still_gets_marker() {
        let raw = "Here is your game! Enjoy.";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\nHere is your game! Enjoy.");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(sanitize(""), "<!DOCTYPE html>");
        assert_eq!(sanitize("   \n\t  "), "<!DOCTYPE html>");
        assert_eq!(sanitize("```\n```"), "<!DOCTYPE html>");
        assert_idempotent("");
        assert_idempotent("```\n```");
    }

    #[test]
    fn test_inner_content_untouched() {
        let raw = "<!DOCTYPE html>\n<script>\nconst s = `template ${x}`;\n</script>";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn test_idempotence_over_assorted_inputs() {
        for raw in [
            "```html\n<!DOCTYPE html>\n<html></html>\n```",
            "<html></html>",
            "<!doctype html><html></html>",
            "\n\n  text  \n\n",
            "```\n```\n```",
            "a``````",
            "<!DOCTYPE html>",
            "<!DOCTYPE html>\n",
            "```svg\n<svg></svg>\n```\nSome trailing prose",
            "\u{a0}```html\n<!DOCTYPE html>\n<p>x</p>\n```",
            "<p>x</p>\n```\u{a0}",
            "\r```html",
            "\u{b}```html\u{c}\n<p>x</p>\n```\u{c}",
        ] {
            assert_idempotent(raw);
            assert!(sanitize(raw).starts_with(DOCTYPE_MARKER));
        }
    }

    #[test]
    fn test_unicode_whitespace_around_fences() {
        assert_eq!(
            sanitize("\u{a0}```html\n<!DOCTYPE html>\n<p>x</p>\n```"),
            "<!DOCTYPE html>\n<p>x</p>"
        );
        assert_eq!(
            sanitize("<!DOCTYPE html>\n<p>x</p>\n```\u{a0}"),
            "<!DOCTYPE html>\n<p>x</p>"
        );
        assert_eq!(sanitize("\r```html"), DOCTYPE_MARKER);
    }

    #[test]
    fn test_carriage_return_line_breaks() {
        let raw = "```html\r<!DOCTYPE html>\r<p>x</p>\r```";
        assert_eq!(sanitize(raw), "<!DOCTYPE html>\r<p>x</p>");
    }

    #[test]
    fn test_fence_info_strings_are_dropped() {
        for raw in [
            "```html:game.html\n<!DOCTYPE html>\n<p>x</p>\n```",
            "```html title=\"Snake\"\n<!DOCTYPE html>\n<p>x</p>\n```",
            "```html<!DOCTYPE html>\n<p>x</p>\n```",
        ] {
            assert_eq!(sanitize(raw), "<!DOCTYPE html>\n<p>x</p>", "{raw:?}");
        }
    }

    #[test]
    fn test_generated_fence_variants_hold_output_shape() {
        let paddings = ["", " ", "\t", "\u{a0}", "\u{b}", "\u{c}", "\r", "\n", "\r\n"];
        let fences = [
            "```",
            "```html",
            "```HTML",
            "``` html ",
            "```html:game.html",
            "```html title=\"Snake\"",
        ];
        let doctypes = ["<!DOCTYPE html>", "<!doctype html>", "<!DOCTYPE  HTML >", ""];
        let breaks = ["\n", "\r\n", "\r"];
        let trailers = ["", " ", "\u{a0}", "\r", "\n\n"];

        let mut checked = 0;
        for pad in paddings {
            for fence in fences {
                for doctype in doctypes {
                    for lb in breaks {
                        for trailer in trailers {
                            for glue in [lb, ""] {
                                let raw = format!(
                                    "{pad}{fence}{glue}{doctype}{lb}<p>x</p>{lb}```{trailer}"
                                );
                                let once = sanitize(&raw);

                                assert!(once.starts_with(DOCTYPE_MARKER), "{raw:?} -> {once:?}");
                                assert!(
                                    !once
                                        .split(['\r', '\n'])
                                        .any(|line| line.trim_start().starts_with("```")),
                                    "{raw:?} -> {once:?}"
                                );
                                assert_eq!(
                                    once.to_ascii_lowercase().matches("<!doctype").count(),
                                    1,
                                    "{raw:?} -> {once:?}"
                                );
                                assert_eq!(sanitize(&once), once, "{raw:?}");
                                checked += 1;
                            }
                        }
                    }
                }
            }
        }
        assert_eq!(checked, 9 * 6 * 4 * 3 * 5 * 2);
    }
}
