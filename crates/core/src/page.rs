use std::fmt;

use maud::{DOCTYPE, PreEscaped, html};
use serde::{Deserialize, Serialize};

use crate::{
    dom::{Document, NodeId, el},
    error::{ReportViewError, Result},
};

pub const HIDDEN_CLASS: &str = "hidden";

/// Element ids of the insertion points a host page provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotIds {
    pub report_container: String,
    pub summary_root: String,
    pub title: String,
    pub embed: String,
    pub metadata: String,
    pub body: String,
}

impl Default for SlotIds {
    fn default() -> Self {
        Self {
            report_container: "report-container".to_string(),
            summary_root: "summary-container".to_string(),
            title: "video-title".to_string(),
            embed: "video-embed".to_string(),
            metadata: "video-metadata".to_string(),
            body: "video-summary".to_string(),
        }
    }
}

impl SlotIds {
    pub fn id_for(&self, role: SlotRole) -> &str {
        match role {
            SlotRole::SummaryRoot => &self.summary_root,
            SlotRole::Title => &self.title,
            SlotRole::Embed => &self.embed,
            SlotRole::Metadata => &self.metadata,
            SlotRole::Body => &self.body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    SummaryRoot,
    Title,
    Embed,
    Metadata,
    Body,
}

impl SlotRole {
    /// Slots the summary renderer fills when present, in fill order.
    pub const OPTIONAL: [SlotRole; 4] = [
        SlotRole::Title,
        SlotRole::Embed,
        SlotRole::Metadata,
        SlotRole::Body,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SlotRole::SummaryRoot => "summary-root",
            SlotRole::Title => "title",
            SlotRole::Embed => "embed",
            SlotRole::Metadata => "metadata",
            SlotRole::Body => "body",
        }
    }
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handles to the summary insertion points. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummarySlots {
    pub root: Option<NodeId>,
    pub title: Option<NodeId>,
    pub embed: Option<NodeId>,
    pub metadata: Option<NodeId>,
    pub body: Option<NodeId>,
}

impl SummarySlots {
    pub fn locate(doc: &Document, ids: &SlotIds) -> Self {
        let find = |role| doc.get_element_by_id(ids.id_for(role));
        Self {
            root: find(SlotRole::SummaryRoot),
            title: find(SlotRole::Title),
            embed: find(SlotRole::Embed),
            metadata: find(SlotRole::Metadata),
            body: find(SlotRole::Body),
        }
    }

    pub fn get(&self, role: SlotRole) -> Option<NodeId> {
        match role {
            SlotRole::SummaryRoot => self.root,
            SlotRole::Title => self.title,
            SlotRole::Embed => self.embed,
            SlotRole::Metadata => self.metadata,
            SlotRole::Body => self.body,
        }
    }
}

/// Find the report container the host page must provide.
pub fn locate_report_container(doc: &Document, ids: &SlotIds) -> Result<NodeId> {
    doc.get_element_by_id(&ids.report_container)
        .ok_or_else(|| ReportViewError::MissingContainer {
            id: ids.report_container.clone(),
        })
}

/// Build the page skeleton with every insertion point present and hidden.
pub fn build_host_page(ids: &SlotIds) -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    el("main")
        .class("container mx-auto px-4 py-8")
        .child(
            el("section")
                .attr("id", ids.report_container.as_str())
                .class(HIDDEN_CLASS),
        )
        .child(
            el("section")
                .attr("id", ids.summary_root.as_str())
                .class("space-y-6")
                .class(HIDDEN_CLASS)
                .child(
                    el("h2")
                        .attr("id", ids.title.as_str())
                        .class("text-2xl font-bold"),
                )
                .child(el("div").attr("id", ids.embed.as_str()).class("aspect-video"))
                .child(el("div").attr("id", ids.metadata.as_str()).class("text-zinc-600"))
                .child(el("div").attr("id", ids.body.as_str()).class("space-y-4")),
        )
        .append_to(&mut doc, root);

    doc
}

/// Serialize a host document as a standalone HTML page.
pub fn render_page(doc: &Document, title: &str) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(".hidden{display:none}")) }
            }
            (doc.node(doc.root()))
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_page_exposes_every_slot() {
        let ids = SlotIds::default();
        let doc = build_host_page(&ids);

        let report = locate_report_container(&doc, &ids).unwrap();
        assert!(doc.has_class(report, HIDDEN_CLASS));

        let slots = SummarySlots::locate(&doc, &ids);
        let root = slots.root.expect("summary root");
        assert!(doc.has_class(root, HIDDEN_CLASS));
        for role in SlotRole::OPTIONAL {
            let slot = slots.get(role).unwrap_or_else(|| panic!("missing {role}"));
            assert_eq!(doc.parent(slot), Some(root));
        }
    }

    #[test]
    fn custom_ids_are_honoured() {
        let ids = SlotIds {
            report_container: "r".to_string(),
            ..SlotIds::default()
        };
        let doc = build_host_page(&ids);
        assert!(locate_report_container(&doc, &ids).is_ok());
        assert!(doc.get_element_by_id("report-container").is_none());
    }

    #[test]
    fn missing_report_container_is_reported() {
        let doc = Document::new();
        let err = locate_report_container(&doc, &SlotIds::default()).unwrap_err();
        assert!(matches!(err, ReportViewError::MissingContainer { ref id } if id == "report-container"));
    }

    #[test]
    fn page_title_is_escaped() {
        let doc = build_host_page(&SlotIds::default());
        let html = render_page(&doc, "A <b> & C");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>A &lt;b&gt; &amp; C</title>"));
        assert!(html.contains("id=\"summary-container\""));
    }

    #[test]
    fn page_body_text_is_escaped() {
        let ids = SlotIds::default();
        let mut doc = build_host_page(&ids);
        let title = SummarySlots::locate(&doc, &ids).title.expect("title slot");
        doc.set_text_content(title, "</h2><script>x()</script>");

        let html = render_page(&doc, "t");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;/h2&gt;&lt;script&gt;x()&lt;/script&gt;</h2>"));
        assert!(html.ends_with("</body></html>"));
    }
}
