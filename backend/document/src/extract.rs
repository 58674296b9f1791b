//! `.docx` reading.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use chatfill_core::ChatfillError;
use chatfill_render::escape_html;

/// One paragraph of the source document, in reading order.
#[derive(Debug, Default, Clone)]
pub(crate) struct DocParagraph {
    pub style: Option<String>,
    pub runs: Vec<DocRun>,
}

/// A formatting-uniform stretch of paragraph text. Explicit breaks and
/// tabs appear as `\n` and `\t` inside `text`.
#[derive(Debug, Default, Clone)]
pub(crate) struct DocRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

/// Extracts the plain text of a `.docx` file, one line per paragraph.
pub fn extract_text(bytes: &[u8]) -> Result<String, ChatfillError> {
    let paragraphs = parse_document(bytes)?;
    Ok(paragraphs
        .iter()
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Extracts the HTML markup of a `.docx` file. Heading1–3 paragraph styles
/// become `<h1>`–`<h3>`, everything else `<p>`; bold and italic runs become
/// `<strong>`/`<em>` and explicit breaks `<br />`. Text content is
/// HTML-escaped.
pub fn extract_markup(bytes: &[u8]) -> Result<String, ChatfillError> {
    let paragraphs = parse_document(bytes)?;

    let mut blocks = Vec::new();
    for paragraph in &paragraphs {
        if paragraph.runs.iter().all(|r| r.text.trim().is_empty()) {
            continue;
        }

        let tag = heading_tag(paragraph.style.as_deref());
        let mut inner = String::new();
        for run in &paragraph.runs {
            let mut piece = escape_html(&run.text).replace('\n', "<br />");
            if run.italic {
                piece = format!("<em>{piece}</em>");
            }
            if run.bold {
                piece = format!("<strong>{piece}</strong>");
            }
            inner.push_str(&piece);
        }
        blocks.push(format!("<{tag}>{inner}</{tag}>"));
    }

    Ok(blocks.join("\n"))
}

fn paragraph_text(paragraph: &DocParagraph) -> String {
    paragraph.runs.iter().map(|r| r.text.as_str()).collect()
}

fn heading_tag(style: Option<&str>) -> &'static str {
    match style {
        Some("Title") | Some("Heading1") => "h1",
        Some("Heading2") => "h2",
        Some("Heading3") => "h3",
        _ => "p",
    }
}

fn parse_document(bytes: &[u8]) -> Result<Vec<DocParagraph>, ChatfillError> {
    let xml = read_document_xml(bytes)?;
    parse_paragraphs(&xml)
}

fn read_document_xml(bytes: &[u8]) -> Result<String, ChatfillError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ChatfillError::DocumentError(format!("not a valid .docx archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ChatfillError::DocumentError(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ChatfillError::DocumentError(format!("unreadable word/document.xml: {e}")))?;

    Ok(xml)
}

/// Walks the WordprocessingML event stream, collecting paragraphs, their
/// style ids, and formatting-tagged runs.
fn parse_paragraphs(xml: &str) -> Result<Vec<DocParagraph>, ChatfillError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<DocParagraph> = None;
    let mut in_run_props = false;
    let mut in_text = false;
    let mut run_bold = false;
    let mut run_italic = false;
    let mut run_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => current = Some(DocParagraph::default()),
                b"pStyle" => apply_style(&mut current, e),
                b"r" => {
                    run_bold = false;
                    run_italic = false;
                    run_text.clear();
                }
                b"rPr" => in_run_props = true,
                b"b" if in_run_props => run_bold = flag_enabled(e),
                b"i" if in_run_props => run_italic = flag_enabled(e),
                b"t" => in_text = true,
                b"br" => run_text.push('\n'),
                b"tab" => run_text.push('\t'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"pStyle" => apply_style(&mut current, e),
                b"b" if in_run_props => run_bold = flag_enabled(e),
                b"i" if in_run_props => run_italic = flag_enabled(e),
                b"br" => run_text.push('\n'),
                b"tab" => run_text.push('\t'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    if let Ok(text) = e.unescape() {
                        run_text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"rPr" => in_run_props = false,
                b"r" => {
                    if !run_text.is_empty() {
                        if let Some(paragraph) = current.as_mut() {
                            paragraph.runs.push(DocRun {
                                text: std::mem::take(&mut run_text),
                                bold: run_bold,
                                italic: run_italic,
                            });
                        } else {
                            run_text.clear();
                        }
                    }
                }
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ChatfillError::DocumentError(format!(
                    "malformed word/document.xml: {e}"
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn apply_style(current: &mut Option<DocParagraph>, element: &BytesStart) {
    if let Some(paragraph) = current.as_mut() {
        if let Some(value) = val_attr(element) {
            paragraph.style = Some(value);
        }
    }
}

fn val_attr(element: &BytesStart) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"val")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// An on/off toggle like `<w:b/>` is enabled unless its `w:val` says
/// otherwise.
fn flag_enabled(element: &BytesStart) -> bool {
    !matches!(
        val_attr(element).as_deref(),
        Some("false") | Some("0") | Some("none")
    )
}
