//! Plaintext article bodies to HTML.
//!
//! The dialect is line oriented: `## ` and `### ` headings, `> ` quotes,
//! `-`/`•` bullet runs, triple-backtick fences and blank-line separated
//! paragraphs. Everything taken from the input is escaped; the only markup
//! in the output is what the renderer emits itself.

use regex::Regex;

pub const NO_CONTENT: &str = "<p class=\"muted\">No content.</p>";

/// Escapes `& < > " '` for use in element text and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct Markup {
    bullet: Regex,
    h2: Regex,
    h3: Regex,
    quote: Regex,
}

impl Markup {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            bullet: Regex::new(r"^\s*[-•]\s+")?,
            h2: Regex::new(r"^##\s+")?,
            h3: Regex::new(r"^###\s+")?,
            quote: Regex::new(r"^>\s+")?,
        })
    }

    pub fn render(&self, raw: &str) -> String {
        let text = raw.replace("\r\n", "\n");
        let text = text.trim();
        if text.is_empty() {
            return NO_CONTENT.to_string();
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let mut html = String::new();
        let mut para: Vec<&str> = Vec::new();
        let mut code: Option<Vec<&str>> = None;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            i += 1;

            if line.trim().starts_with("```") {
                match code.take() {
                    Some(buf) => push_code(&mut html, &buf),
                    None => {
                        flush_paragraph(&mut html, &mut para);
                        code = Some(Vec::new());
                    }
                }
                continue;
            }

            if let Some(buf) = code.as_mut() {
                buf.push(line);
                continue;
            }

            if line.starts_with("## ") {
                flush_paragraph(&mut html, &mut para);
                push_element(&mut html, "h2", &self.h2.replace(line, ""));
                continue;
            }
            if line.starts_with("### ") {
                flush_paragraph(&mut html, &mut para);
                push_element(&mut html, "h3", &self.h3.replace(line, ""));
                continue;
            }
            if line.starts_with("> ") {
                flush_paragraph(&mut html, &mut para);
                push_element(&mut html, "blockquote", &self.quote.replace(line, ""));
                continue;
            }

            if self.bullet.is_match(line) {
                flush_paragraph(&mut html, &mut para);
                let mut end = i - 1;
                html.push_str("<ul>");
                while end < lines.len() && self.bullet.is_match(lines[end]) {
                    let item = self.bullet.replace(lines[end], "");
                    push_element(&mut html, "li", item.trim());
                    end += 1;
                }
                html.push_str("</ul>");
                i = end;
                continue;
            }

            if line.trim().is_empty() {
                flush_paragraph(&mut html, &mut para);
                continue;
            }
            para.push(line.trim());
        }

        flush_paragraph(&mut html, &mut para);
        // An unterminated fence keeps what it collected.
        if let Some(buf) = code {
            push_code(&mut html, &buf);
        }
        html
    }
}

fn push_element(html: &mut String, tag: &str, text: &str) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&escape_html(text));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

fn push_code(html: &mut String, lines: &[&str]) {
    if lines.is_empty() {
        return;
    }
    html.push_str("<pre><code>");
    html.push_str(&escape_html(&lines.join("\n")));
    html.push_str("</code></pre>");
}

fn flush_paragraph(html: &mut String, para: &mut Vec<&str>) {
    let text = para.join(" ");
    para.clear();
    let text = text.trim();
    if !text.is_empty() {
        push_element(html, "p", text);
    }
}
