//! Markup document → self-contained HTML page handed to the PDF renderer.
//!
//! Only the Markdown subset the recorder writes is understood: `#`/`##`/`###`
//! headings, paragraphs, `**bold**`, backslash escapes and image lines.
//! Anything else is rendered as plain paragraph text.

use std::path::Path;

use super::helpers::{html_escape, load_image_data_uri};

const DEFAULT_TITLE: &str = "Software Installation Steps";

enum Block<'a> {
    Heading(usize, &'a str),
    Image { alt: &'a str, src: &'a str },
    Paragraph(Vec<&'a str>),
}

/// Generate the HTML page for `markup`. Relative image paths resolve against
/// `base_dir`; images are embedded as JPEG at `image_quality`.
pub fn generate(markup: &str, base_dir: &Path, image_quality: u8) -> String {
    let blocks = parse_blocks(markup);

    let title = blocks
        .iter()
        .find_map(|block| match block {
            Block::Heading(1, text) => Some(plain_text(text)),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let mut body = String::new();
    let mut in_step = false;
    for block in &blocks {
        if let Block::Heading(level, _) = block {
            if *level <= 2 && in_step {
                body.push_str("</section>\n");
                in_step = false;
            }
            if *level == 2 {
                body.push_str("<section class=\"step\">\n");
                in_step = true;
            }
        }
        body.push_str(&render_block(block, base_dir, image_quality));
        body.push('\n');
    }
    if in_step {
        body.push_str("</section>\n");
    }

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{css}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = html_escape(&title),
        css = CSS,
        body = body,
    )
}

fn parse_blocks(markup: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in markup.lines() {
        let line = line.trim_end();
        let block = if line.trim().is_empty() {
            None
        } else if let Some((level, text)) = parse_heading(line) {
            Some(Block::Heading(level, text))
        } else if let Some((alt, src)) = parse_image(line.trim()) {
            Some(Block::Image { alt, src })
        } else {
            paragraph.push(line.trim());
            continue;
        };

        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(std::mem::take(&mut paragraph)));
        }
        if let Some(block) = block {
            blocks.push(block);
        }
    }
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(paragraph));
    }
    blocks
}

fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix(' ').map(|text| (level, text.trim()))
}

/// `![alt](src)` on a line of its own.
fn parse_image(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix("![")?.strip_suffix(')')?;
    let (alt, src) = inner.split_once("](")?;
    Some((alt, src.trim()))
}

fn render_block(block: &Block<'_>, base_dir: &Path, image_quality: u8) -> String {
    match block {
        Block::Heading(level, text) => format!("<h{level}>{}</h{level}>", render_inline(text)),
        Block::Paragraph(lines) => format!("<p>{}</p>", render_inline(&lines.join(" "))),
        Block::Image { alt, src } => render_image(alt, src, base_dir, image_quality),
    }
}

fn render_image(alt: &str, src: &str, base_dir: &Path, image_quality: u8) -> String {
    let alt_text = html_escape(&plain_text(alt));
    let embedded = if src.starts_with("data:") {
        Some(src.to_string())
    } else {
        load_image_data_uri(&base_dir.join(src), image_quality)
    };
    match embedded {
        Some(uri) => format!(
            r#"<figure><img src="{}" alt="{alt_text}"></figure>"#,
            html_escape(&uri)
        ),
        None => {
            log::warn!("Image {src} not found; using alt text");
            format!(r#"<p class="missing-image">[{alt_text}]</p>"#)
        }
    }
}

/// Inline Markdown → HTML: `**bold**` and backslash escapes.
fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut bold = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                out.push_str(&html_escape(&literal.to_string()));
            }
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(if bold { "</strong>" } else { "<strong>" });
                bold = !bold;
            }
            _ => out.push_str(&html_escape(&c.to_string())),
        }
    }
    if bold {
        out.push_str("</strong>");
    }
    out
}

/// Inline Markdown with formatting removed, for titles and alt text.
fn plain_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

const CSS: &str = r#"* { box-sizing: border-box; }
body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; color: #1d1d1f; background: #fff; line-height: 1.5; font-size: 12pt; }
h1 { font-size: 20pt; margin: 0 0 16px; }
h2 { font-size: 14pt; margin: 0 0 8px; }
h3 { font-size: 12pt; margin: 0 0 6px; }
p { margin: 0 0 8px; }
.step { margin-bottom: 24px; padding-bottom: 12px; border-bottom: 1px solid #e8e8ed; }
figure { margin: 8px 0; }
figure img { display: block; max-width: 100%; height: auto; border: 1px solid #e8e8ed; }
.missing-image { color: #86868b; font-style: italic; }
@media print {
  .step { break-inside: avoid; page-break-inside: avoid; }
  h2 { break-after: avoid; page-break-after: avoid; }
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    const MARKUP: &str = "# Software Installation Steps\n\n\
        ## Step 1: Setup \\*beta\\*\n\n\
        Clicked on: **Next**\n\n\
        **Typed:** a<b\n\n\
        ![Step 1](screenshots/step_1.png)\n\n\
        **Pressed:** Enter\n";

    #[test]
    fn renders_headings_and_inline_formatting() {
        let dir = tempdir().unwrap();
        let html = generate(MARKUP, dir.path(), 85);

        assert!(html.contains("<title>Software Installation Steps</title>"));
        assert!(html.contains("<h1>Software Installation Steps</h1>"));
        assert!(html.contains("<h2>Step 1: Setup *beta*</h2>"));
        assert!(html.contains("<p>Clicked on: <strong>Next</strong></p>"));
        assert!(html.contains("<p><strong>Typed:</strong> a&lt;b</p>"));
        assert!(html.contains("<p><strong>Pressed:</strong> Enter</p>"));
    }

    #[test]
    fn steps_are_wrapped_in_sections() {
        let dir = tempdir().unwrap();
        let markup = "# T\n\n## Step 1: A\n\ntext\n\n## Step 2: B\n";
        let html = generate(markup, dir.path(), 85);
        assert_eq!(html.matches("<section class=\"step\">").count(), 2);
        assert_eq!(html.matches("</section>").count(), 2);
    }

    #[test]
    fn missing_image_degrades_to_alt_text() {
        let dir = tempdir().unwrap();
        let html = generate(MARKUP, dir.path(), 85);
        assert!(html.contains(r#"<p class="missing-image">[Step 1]</p>"#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn existing_image_is_embedded_relative_to_base_dir() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("screenshots")).unwrap();
        RgbaImage::from_pixel(8, 8, Rgba([200, 0, 0, 255]))
            .save(dir.path().join("screenshots/step_1.png"))
            .unwrap();

        let html = generate(MARKUP, dir.path(), 85);
        assert!(html.contains(r#"<img src="data:image/jpeg;base64,"#));
        assert!(html.contains(r#"alt="Step 1""#));
    }

    #[test]
    fn output_is_deterministic() {
        let dir = tempdir().unwrap();
        assert_eq!(
            generate(MARKUP, dir.path(), 85),
            generate(MARKUP, dir.path(), 85)
        );
    }

    #[test]
    fn untitled_document_uses_default_title() {
        let dir = tempdir().unwrap();
        let html = generate("just text\nmore text\n", dir.path(), 85);
        assert!(html.contains("<title>Software Installation Steps</title>"));
        assert!(html.contains("<p>just text more text</p>"));
    }

    #[test]
    fn heading_requires_space() {
        assert!(parse_heading("#hashtag").is_none());
        assert_eq!(parse_heading("## Step 1:"), Some((2, "Step 1:")));
        assert!(parse_heading("#### deep").is_none());
    }
}
