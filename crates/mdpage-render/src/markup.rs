//! Small Markdown/HTML emitters shared by the render stages.

/// `[name](url)`
pub fn link(name: &str, url: &str) -> String {
    let mut out = String::with_capacity(name.len() + url.len() + 4);
    push_link(&mut out, name, url);
    out
}

pub fn push_link(out: &mut String, name: &str, url: &str) {
    out.push('[');
    out.push_str(name);
    out.push_str("](");
    out.push_str(url);
    out.push(')');
}

/// Centered image embed, terminated by a newline.
pub fn push_image(out: &mut String, url: &str) {
    out.push_str(r#"<div align="center">"#);
    out.push_str(r#"<img src=""#);
    out.push_str(url);
    out.push_str(r#"" style="margin: 8px; max-height: 640px;">"#);
    out.push_str("</div>");
    out.push('\n');
}

/// Fenced block around `body`; the body is newline-terminated if needed.
pub fn push_fenced(out: &mut String, lang: &str, body: &str) {
    out.push_str("```");
    out.push_str(lang);
    out.push('\n');
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n");
}

/// Fenced block with one line per item, no language tag.
pub fn push_fenced_lines<S: AsRef<str>>(out: &mut String, lines: &[S]) {
    out.push_str("```\n");
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out.push_str("```\n");
}
