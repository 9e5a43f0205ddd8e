// src/markdown.rs

use pulldown_cmark::{Options, Parser, html};

use crate::sanitizer::sanitize;

/// Renders CommonMark with the GitHub-flavoured table, strikethrough and
/// task-list extensions. Raw HTML in the source is passed through, so the
/// result must go through [`sanitize`] before it is shown.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Markdown to display-ready HTML.
pub fn render_log(markdown: &str) -> String {
    sanitize(&render_markdown(markdown))
}
