use tracing::debug;

use crate::{
    dom::{Document, ElementBuilder, NodeId, ScrollBehavior, el},
    page::HIDDEN_CLASS,
    types::{ConsultationReport, Section, SectionContent},
};

const TITLE_BLOCK_CLASS: &str = "text-center mb-6";
const TITLE_CLASS: &str = "text-2xl font-bold";
const GRID_CLASS: &str = "grid grid-cols-1 md:grid-cols-2 gap-6";
const CARD_CLASS: &str = "bg-zinc-200 rounded-lg p-6 shadow-md";
const CARD_TITLE_CLASS: &str = "text-xl font-semibold mb-4 text-zinc-700";
const CARD_TEXT_CLASS: &str = "text-zinc-700";
const SUB_TITLE_CLASS: &str = "text-lg font-light mt-4 mb-2 text-zinc-600";
const SUB_TEXT_CLASS: &str = "text-gray-700";

/// Render a consultation report into `container`, replacing whatever it held.
///
/// The container handle is trusted: looking it up is the host's job.
pub fn render_report(doc: &mut Document, container: NodeId, report: &ConsultationReport) {
    doc.clear_children(container);
    doc.remove_class(container, HIDDEN_CLASS);

    el("div")
        .class(TITLE_BLOCK_CLASS)
        .child(el("h2").class(TITLE_CLASS).text(&report.title))
        .append_to(doc, container);

    el("div")
        .class(GRID_CLASS)
        .children(report.sections.iter().map(section_card))
        .append_to(doc, container);

    doc.scroll_into_view(container, ScrollBehavior::Smooth);
    debug!(sections = report.sections.len(), "rendered consultation report");
}

fn section_card(section: &Section) -> ElementBuilder {
    let card = el("div")
        .class(CARD_CLASS)
        .child(el("h3").class(CARD_TITLE_CLASS).text(&section.subtitle));

    match &section.content {
        SectionContent::Text(text) => card.child(el("p").class(CARD_TEXT_CLASS).text(text)),
        // Every group's sub-sections land in the same card, in order.
        SectionContent::Groups(groups) => card.children(
            groups
                .iter()
                .flat_map(|group| &group.sections)
                .flat_map(|sub| {
                    [
                        el("h4").class(SUB_TITLE_CLASS).text(&sub.subtitle),
                        el("p").class(SUB_TEXT_CLASS).text(&sub.content),
                    ]
                }),
        ),
    }
}
