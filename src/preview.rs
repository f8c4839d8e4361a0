//! Markdown preview using pulldown-cmark
//!
//! Renders a note to HTML with an empty anchor element at every marker
//! position, and extracts titles and outlines for listings.

use std::path::Path;

use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::constants as C;
use crate::model::Marker;
use crate::util;

/// Represents a markdown heading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownHeading {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text content
    pub text: String,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render `content` to HTML, emitting an anchor for each marker.
///
/// Marker positions are character offsets; positions past the end clamp to
/// the end of the note. Anchors go into the event stream, never into the
/// source, so block structure is untouched. A marker inside plain text splits
/// the text; one inside a code block or inline code lands right after it.
pub fn render_html(content: &str, markers: &[&Marker], marker_class: &str) -> String {
    let mut anchors = PendingAnchors::new(content, markers, marker_class);
    let mut events: Vec<Event> = Vec::new();
    let mut in_code_block = false;

    for (event, range) in Parser::new_ext(content, parser_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                anchors.emit_before(range.start + 1, &mut events);
                in_code_block = true;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(event);
                anchors.emit_before(range.end, &mut events);
            }
            _ if in_code_block => events.push(event),
            Event::Text(ref text) if content.get(range.clone()) == Some(&**text) => {
                anchors.emit_before(range.start + 1, &mut events);
                let mut cursor = range.start;
                while let Some(byte) = anchors.peek().filter(|&b| b < range.end) {
                    events.push(Event::Text(CowStr::Borrowed(&content[cursor..byte])));
                    anchors.emit_before(byte + 1, &mut events);
                    cursor = byte;
                }
                events.push(Event::Text(CowStr::Borrowed(&content[cursor..range.end])));
            }
            Event::End(_) => {
                anchors.emit_before(range.end, &mut events);
                events.push(event);
            }
            _ => {
                anchors.emit_before(range.start + 1, &mut events);
                events.push(event);
            }
        }
    }
    anchors.emit_before(usize::MAX, &mut events);

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Anchor element for one marker
pub fn marker_anchor(marker: &Marker, marker_class: &str) -> String {
    format!(
        "<span class=\"{}\" id=\"{}{}\" title=\"{}\"></span>",
        escape_attr(marker_class),
        C::MARKER_ANCHOR_PREFIX,
        escape_attr(&marker.id),
        escape_attr(&marker.name)
    )
}

/// Anchors sorted by byte offset, handed out as the event stream passes them
struct PendingAnchors {
    placed: Vec<(usize, String)>,
    next: usize,
}

impl PendingAnchors {
    fn new(content: &str, markers: &[&Marker], marker_class: &str) -> Self {
        let mut placed: Vec<(usize, String)> = markers
            .iter()
            .map(|m| (util::char_to_byte_offset(content, m.position), marker_anchor(m, marker_class)))
            .collect();
        // Stable sort keeps insertion order for markers sharing a position
        placed.sort_by_key(|(byte, _)| *byte);
        Self { placed, next: 0 }
    }

    fn peek(&self) -> Option<usize> {
        self.placed.get(self.next).map(|(byte, _)| *byte)
    }

    /// Push every pending anchor whose offset is below `limit`
    fn emit_before<'a>(&mut self, limit: usize, events: &mut Vec<Event<'a>>) {
        while let Some(byte) = self.peek() {
            if byte >= limit {
                break;
            }
            let anchor = std::mem::take(&mut self.placed[self.next].1);
            events.push(Event::InlineHtml(CowStr::from(anchor)));
            self.next += 1;
        }
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Extract all headings from markdown content
pub fn outline(content: &str) -> Vec<MarkdownHeading> {
    let mut headings = Vec::new();
    let mut in_heading = false;
    let mut current_level = 1;
    let mut current_text = String::new();

    for event in Parser::new_ext(content, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = true;
                current_level = match level {
                    HeadingLevel::H1 => 1,
                    HeadingLevel::H2 => 2,
                    HeadingLevel::H3 => 3,
                    HeadingLevel::H4 => 4,
                    HeadingLevel::H5 => 5,
                    HeadingLevel::H6 => 6,
                };
                current_text.clear();
            }
            Event::Text(text) | Event::Code(text) => {
                if in_heading {
                    current_text.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if in_heading {
                    headings.push(MarkdownHeading {
                        level: current_level,
                        text: current_text.trim().to_string(),
                    });
                }
                in_heading = false;
            }
            _ => {}
        }
    }

    headings
}

/// First H1 of the note, or its file stem
pub fn note_title(note_path: &str, content: &str) -> String {
    if let Some(h1) = outline(content).into_iter().find(|h| h.level == 1) {
        if !h1.text.is_empty() {
            return h1.text;
        }
    }

    Path::new(note_path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| C::UNTITLED_NOTE_TITLE.to_string())
}
