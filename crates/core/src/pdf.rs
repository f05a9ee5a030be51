//! PDF export of both payloads.
//!
//! Text is laid out first into pages of positioned lines, then written with
//! the built-in Helvetica faces. Built-in fonts only cover ASCII reliably, so
//! text is cleaned before layout.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use crate::{
    error::{ReportViewError, Result},
    types::{ConsultationReport, SectionContent, VideoSummaryPayload},
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 15.0;
const TOP_Y: f32 = 277.0;
const BOTTOM_Y: f32 = 20.0;
const LAYER_NAME: &str = "Layer 1";

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;

const TITLE_ADVANCE: f32 = 15.0;
const HEADING_ADVANCE: f32 = 10.0;
const BODY_ADVANCE: f32 = 5.0;
const PARAGRAPH_GAP: f32 = 2.0;

/// Characters per body line at 10pt on A4 with the margins above.
const WRAP_COLUMNS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    size: f32,
    face: Face,
    /// Baseline, in millimetres from the bottom edge.
    y: f32,
}

#[derive(Debug)]
struct Layout {
    pages: Vec<Vec<Line>>,
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: TOP_Y,
        }
    }

    fn place(&mut self, text: String, size: f32, face: Face, advance: f32) {
        if self.cursor < BOTTOM_Y {
            self.pages.push(Vec::new());
            self.cursor = TOP_Y;
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(Line {
                text,
                size,
                face,
                y: self.cursor,
            });
        }
        self.cursor -= advance;
    }

    fn title(&mut self, title: &str) {
        self.place(clean_text(title), TITLE_SIZE, Face::Bold, TITLE_ADVANCE);
    }

    fn section(&mut self, heading: &str, content: &str) {
        self.place(clean_text(heading), HEADING_SIZE, Face::Bold, HEADING_ADVANCE);
        for paragraph in clean_text(content).split('\n') {
            for line in wrap(paragraph, WRAP_COLUMNS) {
                self.place(line, BODY_SIZE, Face::Regular, BODY_ADVANCE);
            }
            self.cursor -= PARAGRAPH_GAP;
        }
    }
}

/// Keep printable ASCII, mapping common bullets and dashes to `-`.
fn clean_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2022}' | '\u{2013}' | '\u{2014}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            other => other,
        })
        .filter(|c| c.is_ascii() && (!c.is_ascii_control() || *c == '\n'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Greedy word wrap. Words longer than `columns` are split.
fn wrap(paragraph: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        let mut word = word;
        while word.len() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(columns);
            lines.push(head.to_string());
            word = tail;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn report_layout(report: &ConsultationReport) -> Layout {
    let mut layout = Layout::new();
    layout.title(&report.title);
    for section in &report.sections {
        match &section.content {
            SectionContent::Text(text) if !text.trim().is_empty() => {
                layout.section(&section.subtitle, text);
            }
            SectionContent::Text(_) => {}
            SectionContent::Groups(groups) => {
                for sub in groups.iter().flat_map(|g| &g.sections) {
                    if !sub.content.trim().is_empty() {
                        layout.section(&sub.subtitle, &sub.content);
                    }
                }
            }
        }
    }
    layout
}

fn summary_layout(data: &VideoSummaryPayload) -> Layout {
    let summary = &data.summary;
    let mut layout = Layout::new();
    layout.title(&format!("Video Summary: {}", summary.title));

    layout.section(
        "Video Statistics",
        &format!(
            "Views: {}\nLikes: {}\nComments: {}",
            summary.video_views, data.raw_data.like_count, data.raw_data.comment_count
        ),
    );
    layout.section("Overview", &summary.overview);

    let key_points: String = summary
        .key_points
        .iter()
        .map(|p| format!("- {}\n{}\n\n", p.point_title, p.point_description))
        .collect();
    layout.section("Key Points", &key_points);

    layout.section("Engagement Analysis", &summary.engagement_analysis);
    layout.section("Target Audience", &summary.target_audience);

    let suggestions: String = summary
        .improvement_suggestions
        .iter()
        .map(|s| format!("- {}\n{}\n\n", s.improvement_title, s.improvement_description))
        .collect();
    layout.section("Improvement Suggestions", &suggestions);

    layout
}

fn pdf_error(e: printpdf::Error) -> ReportViewError {
    ReportViewError::PdfFailed {
        reason: e.to_string(),
    }
}

fn write_pdf(title: &str, layout: &Layout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, lines) in layout.pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME)
        };
        let layer = doc.get_page(page).get_layer(layer);
        for line in lines {
            let font: &IndirectFontRef = match line.face {
                Face::Regular => &regular,
                Face::Bold => &bold,
            };
            layer.use_text(line.text.as_str(), line.size, Mm(MARGIN_X), Mm(line.y), font);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

/// Export a consultation report as an A4 PDF.
///
/// Sections and sub-sections with blank content are left out.
pub fn format_report_pdf(report: &ConsultationReport) -> Result<Vec<u8>> {
    write_pdf(&report.title, &report_layout(report))
}

/// Export a video summary as an A4 PDF.
pub fn format_summary_pdf(data: &VideoSummaryPayload) -> Result<Vec<u8>> {
    write_pdf(&data.summary.title, &summary_layout(data))
}
