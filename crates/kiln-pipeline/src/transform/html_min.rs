use minify_html::{Cfg, minify};

/// Collapse whitespace and strip comments.
///
/// Closing tags and the `<html>`/`<head>` openers are kept so the output stays
/// readable by naive tooling and the reload script injector.
pub fn minify_html(source: &str) -> String {
    let mut cfg = Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;

    let bytes = minify(source.as_bytes(), &cfg);
    String::from_utf8_lossy(&bytes).into_owned()
}
