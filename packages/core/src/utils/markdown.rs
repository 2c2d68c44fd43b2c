//! Markdown and HTML text utilities
//!
//! - [`strip_markdown`] reduces authored markdown to plain text, for outline
//!   summaries and the table of contents.
//! - [`markdown_to_html`] / [`html_to_markdown`] back the default text mode
//!   converter. HTML → markdown is a best-effort regex pass over the small tag
//!   set the rich-text editor produces, not a general HTML parser.

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex patterns for markdown stripping
///
/// The order of these patterns matters:
/// 1. Code fences, then images (to not conflict with links or italic)
/// 2. Links (before italic since links use brackets)
/// 3. Bold (before italic since ** conflicts with *)
/// 4. Other inline styles
/// 5. Line-start patterns (headers, lists, etc.)
static MARKDOWN_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        // code fences first, before the inline code rule eats their backticks
        (Regex::new(r"^```.*$").unwrap(), ""),
        // ![alt](url) -> alt
        (Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap(), "$1"),
        // [text](url) -> text
        (Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(), "$1"),
        (Regex::new(r"`([^`]+)`").unwrap(), "$1"),
        (Regex::new(r"\*\*([^*]+)\*\*").unwrap(), "$1"),
        (Regex::new(r"__([^_]+)__").unwrap(), "$1"),
        (Regex::new(r"~~([^~]+)~~").unwrap(), "$1"),
        (Regex::new(r"\*([^*]+)\*").unwrap(), "$1"),
        (Regex::new(r"_([^_]+)_").unwrap(), "$1"),
        (Regex::new(r"^#{1,6}\s+").unwrap(), ""),
        (Regex::new(r"^>\s*").unwrap(), ""),
        (Regex::new(r"^\d+\.\s+").unwrap(), ""),
        // task list boxes before plain bullets
        (Regex::new(r"^[-*+]\s+\[[ xX]\]\s+").unwrap(), ""),
        (Regex::new(r"^[-*+]\s+").unwrap(), ""),
        (Regex::new(r"^[-*_]{3,}$").unwrap(), ""),
        (Regex::new(r"<[^>]+>").unwrap(), ""),
    ]
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip markdown formatting from content to produce plain text
///
/// # Examples
///
/// ```
/// use resource_builder_core::utils::strip_markdown;
///
/// assert_eq!(strip_markdown("# Hello World"), "Hello World");
/// assert_eq!(strip_markdown("**bold** text"), "bold text");
/// assert_eq!(strip_markdown("[link](http://example.com)"), "link");
/// ```
pub fn strip_markdown(content: &str) -> String {
    let mut result = content.to_string();

    for (pattern, replacement) in MARKDOWN_PATTERNS.iter() {
        // Line-start patterns are applied per line
        if pattern.as_str().starts_with('^') {
            result = result
                .lines()
                .map(|line| pattern.replace_all(line, *replacement).to_string())
                .collect::<Vec<_>>()
                .join("\n");
        } else {
            result = pattern.replace_all(&result, *replacement).to_string();
        }
    }

    result = WHITESPACE_RE.replace_all(&result, " ").to_string();
    result.trim().to_string()
}

/// Plain-text summary of markdown, cut at a word boundary
///
/// Appends `…` when the text was shortened.
pub fn summarize(content: &str, max_chars: usize) -> String {
    let plain = strip_markdown(content);
    if plain.chars().count() <= max_chars {
        return plain;
    }
    let cut: String = plain.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(space) if space > 0 => &cut[..space],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end())
}

/// Render markdown (CommonMark plus tables, strikethrough, task lists) to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}

/// Tag rewrites for HTML → markdown, applied in order
///
/// Headings are listed per level because the regex engine has no
/// backreferences. Ordered lists come out as bullet lists.
static HTML_PATTERNS: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    let mut patterns: Vec<(Regex, String)> = (1..=6)
        .map(|level| {
            (
                Regex::new(&format!(r"(?is)<h{0}[^>]*>(.*?)</h{0}>", level)).unwrap(),
                format!("{} ${{1}}\n\n", "#".repeat(level)),
            )
        })
        .collect();

    let inline = [
        (r#"(?is)<pre[^>]*>\s*<code[^>]*>(.*?)</code>\s*</pre>"#, "```\n${1}\n```\n\n"),
        (r#"(?is)<img[^>]*src="([^"]*)"[^>]*alt="([^"]*)"[^>]*/?>"#, "![${2}](${1})"),
        (r#"(?is)<img[^>]*src="([^"]*)"[^>]*/?>"#, "![](${1})"),
        (r#"(?is)<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#, "[${2}](${1})"),
        (r"(?is)<(?:strong|b)>(.*?)</(?:strong|b)>", "**${1}**"),
        (r"(?is)<(?:em|i)>(.*?)</(?:em|i)>", "*${1}*"),
        (r"(?is)<(?:del|s)>(.*?)</(?:del|s)>", "~~${1}~~"),
        (r"(?is)<code>(.*?)</code>", "`${1}`"),
        (r"(?is)<blockquote[^>]*>\s*(.*?)\s*</blockquote>", "> ${1}\n\n"),
        (r"(?is)<li[^>]*>\s*(.*?)\s*</li>", "- ${1}\n"),
        (r"(?is)</(?:ul|ol)>", "\n"),
        (r"(?i)<br\s*/?>", "\n"),
        (r"(?i)<hr\s*/?>", "---\n\n"),
        (r"(?is)<p[^>]*>(.*?)</p>", "${1}\n\n"),
        (r"<[^>]+>", ""),
        (r"&nbsp;", " "),
        (r"&lt;", "<"),
        (r"&gt;", ">"),
        (r"&quot;", "\""),
        (r"&#39;", "'"),
        // last so escaped entities like &amp;lt; stay literal
        (r"&amp;", "&"),
        (r"\n{3,}", "\n\n"),
    ];
    patterns.extend(
        inline
            .into_iter()
            .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement.to_string())),
    );
    patterns
});

/// Convert rich-text editor HTML back to markdown
pub fn html_to_markdown(html: &str) -> String {
    let mut result = html.to_string();
    for (pattern, replacement) in HTML_PATTERNS.iter() {
        result = pattern
            .replace_all(&result, replacement.as_str())
            .to_string();
    }
    result.trim().to_string()
}
