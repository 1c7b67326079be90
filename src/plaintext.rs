//! Markdown → plain text for excerpts.
//!
//! This is a lossy, pattern-based stripper, not a markdown parser. It is good
//! enough to turn a typical post body into a readable one-paragraph preview:
//!
//! ```text
//! # Getting Started                      Getting Started React is a
//!                                   →    powerful library. See the docs.
//! **React** is a powerful library.
//! See [the docs](https://react.dev).
//! ```
//!
//! Steps run in a fixed order; the order matters for overlapping constructs:
//!
//! 1. leading frontmatter block
//! 2. heading markers (`#` … `######` followed by whitespace)
//! 3. bold `**x**` → `x`
//! 4. italic `*x*` → `x`
//! 5. fenced code blocks, dropped entirely
//! 6. inline code `` `x` `` → `x`
//! 7. images `![alt](src)`, dropped entirely
//! 8. links `[text](url)` → `text`
//! 9. newline runs → single space, then trim
//!
//! Fences go before inline code and images before links: the other way round,
//! fence backticks leak into the text and images degrade to `!alt`.

use regex::Regex;
use std::sync::LazyLock;

static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| rx(r"(?s)\A---.*?---"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| rx(r"#{1,6}\s+"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| rx(r"\*\*(.*?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| rx(r"\*(.*?)\*"));
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| rx(r"(?s)```.*?```"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| rx(r"`(.*?)`"));
static IMAGE: LazyLock<Regex> = LazyLock::new(|| rx(r"!\[[^\]]*\]\([^)]*\)"));
static LINK: LazyLock<Regex> = LazyLock::new(|| rx(r"\[([^\]]*)\]\([^)]*\)"));
static NEWLINES: LazyLock<Regex> = LazyLock::new(|| rx(r"\n(?:[ \t\r]*\n)*"));

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern must compile")
}

/// Strip markdown syntax from `markdown`, returning a single line of plain text.
pub fn to_plain_text(markdown: &str) -> String {
    let text = FRONTMATTER.replace(markdown, "");
    let text = HEADING.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "${1}");
    let text = ITALIC.replace_all(&text, "${1}");
    let text = CODE_BLOCK.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "${1}");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "${1}");
    let text = NEWLINES.replace_all(&text, " ");
    text.trim().to_string()
}
