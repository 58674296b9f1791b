//! `.docx` generation from the markup subset.

use std::io::{Cursor, Write};
use std::sync::LazyLock;

use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use chatfill_core::ChatfillError;

use crate::xml::{
    xml_escape, CONTENT_TYPES_XML, DOCUMENT_RELS_XML, PACKAGE_RELS_XML, STYLES_XML,
    XML_DECLARATION,
};

static BLOCK_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(p|h[1-3])(?:\s[^>]*)?>(.*?)</(?:p|h[1-3])\s*>").unwrap());
static INLINE_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)</?[a-z][a-z0-9]*(?:\s[^>]*)?/?>").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

#[derive(Debug, Default)]
struct GenRun {
    text: String,
    bold: bool,
    italic: bool,
}

#[derive(Debug, Default)]
struct GenBlock {
    style: Option<&'static str>,
    runs: Vec<GenRun>,
}

/// Converts markup into a `.docx` package.
///
/// Recognizes the same subset `extract_markup` emits (`<p>`, `<h1>`–`<h3>`,
/// `<strong>`/`<b>`, `<em>`/`<i>`, `<br />`); other tags contribute no
/// content. Markup with no recognizable block structure falls back to one
/// paragraph per non-empty text line.
pub fn generate_docx(markup: &str) -> Result<Vec<u8>, ChatfillError> {
    let blocks = parse_blocks(markup);
    let document_xml = build_document_xml(&blocks);
    package_docx(&document_xml)
}

fn parse_blocks(markup: &str) -> Vec<GenBlock> {
    let mut blocks = Vec::new();

    for caps in BLOCK_TAGS.captures_iter(markup) {
        let style = match caps[1].to_lowercase().as_str() {
            "h1" => Some("Heading1"),
            "h2" => Some("Heading2"),
            "h3" => Some("Heading3"),
            _ => None,
        };
        blocks.push(GenBlock {
            style,
            runs: parse_inline(&caps[2]),
        });
    }

    if blocks.is_empty() {
        let stripped = ANY_TAG.replace_all(markup, "");
        for line in stripped.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            blocks.push(GenBlock {
                style: None,
                runs: vec![GenRun {
                    text: unescape_entities(line),
                    ..GenRun::default()
                }],
            });
        }
    }

    blocks
}

/// Splits block content into formatting-uniform runs, tracking nested
/// `<strong>`/`<em>` depth.
fn parse_inline(inner: &str) -> Vec<GenRun> {
    let mut runs = Vec::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut text = String::new();
    let mut last = 0usize;

    for found in INLINE_TAGS.find_iter(inner) {
        let segment = &inner[last..found.start()];
        if !segment.is_empty() {
            text.push_str(&unescape_entities(segment));
        }
        last = found.end();

        let tag = found.as_str();
        let closing = tag.starts_with("</");
        match tag_name(tag).as_str() {
            "strong" | "b" => {
                flush_run(&mut runs, &mut text, bold, italic);
                bold = if closing { bold.saturating_sub(1) } else { bold + 1 };
            }
            "em" | "i" => {
                flush_run(&mut runs, &mut text, bold, italic);
                italic = if closing {
                    italic.saturating_sub(1)
                } else {
                    italic + 1
                };
            }
            "br" => text.push('\n'),
            _ => {}
        }
    }

    let tail = &inner[last..];
    if !tail.is_empty() {
        text.push_str(&unescape_entities(tail));
    }
    flush_run(&mut runs, &mut text, bold, italic);

    runs
}

fn flush_run(runs: &mut Vec<GenRun>, text: &mut String, bold: usize, italic: usize) {
    if !text.is_empty() {
        runs.push(GenRun {
            text: std::mem::take(text),
            bold: bold > 0,
            italic: italic > 0,
        });
    }
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

fn unescape_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn build_document_xml(blocks: &[GenBlock]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );
    xml.push_str("<w:body>");

    if blocks.is_empty() {
        xml.push_str("<w:p/>");
    }

    for block in blocks {
        xml.push_str("<w:p>");
        if let Some(style) = block.style {
            xml.push_str("<w:pPr><w:pStyle w:val=\"");
            xml.push_str(style);
            xml.push_str("\"/></w:pPr>");
        }
        for run in &block.runs {
            xml.push_str("<w:r>");
            if run.bold || run.italic {
                xml.push_str("<w:rPr>");
                if run.bold {
                    xml.push_str("<w:b/>");
                }
                if run.italic {
                    xml.push_str("<w:i/>");
                }
                xml.push_str("</w:rPr>");
            }
            for (i, line) in run.text.split('\n').enumerate() {
                if i > 0 {
                    xml.push_str("<w:br/>");
                }
                if !line.is_empty() {
                    xml.push_str("<w:t xml:space=\"preserve\">");
                    xml.push_str(&xml_escape(line));
                    xml.push_str("</w:t>");
                }
            }
            xml.push_str("</w:r>");
        }
        xml.push_str("</w:p>");
    }

    xml.push_str("<w:sectPr/></w:body></w:document>");
    xml
}

fn package_docx(document_xml: &str) -> Result<Vec<u8>, ChatfillError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("word/document.xml", document_xml),
        ("word/styles.xml", STYLES_XML),
    ];

    for (name, content) in parts {
        writer
            .start_file(name, options)
            .map_err(|e| ChatfillError::GenerationFailed(format!("zip entry {name}: {e}")))?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| ChatfillError::GenerationFailed(format!("zip write {name}: {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ChatfillError::GenerationFailed(format!("zip finish: {e}")))?;
    Ok(cursor.into_inner())
}
