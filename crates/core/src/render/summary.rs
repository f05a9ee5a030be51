use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, error, warn};

use crate::{
    config::RenderConfig,
    date::{DateStyle, format_published},
    dom::{Document, ElementBuilder, NodeId, ScrollBehavior, el},
    error::{ReportViewError, Result},
    page::{HIDDEN_CLASS, SlotRole, SummarySlots},
    types::VideoSummaryPayload,
};

pub const DEFAULT_EMBED_HOST: &str = "www.youtube.com";

const EMBED_WIDTH: &str = "560";
const EMBED_HEIGHT: &str = "315";
const EMBED_ALLOW: &str = "autoplay; encrypted-media";

const HEADING_CLASS: &str = "text-xl font-bold";
const LIST_CLASS: &str = "list-disc pl-5";

/// Unreserved characters pass through, so ordinary video ids are unchanged.
const VIDEO_ID: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub embed_host: String,
    pub date_style: DateStyle,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            embed_host: DEFAULT_EMBED_HOST.to_string(),
            date_style: DateStyle::default(),
        }
    }
}

impl From<&RenderConfig> for SummaryOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            embed_host: config.embed_host.clone(),
            date_style: config.date_style,
        }
    }
}

/// What a summary render did not touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub skipped: Vec<SlotRole>,
}

/// Percent-encode a video id for use in any URL component.
pub fn encode_video_id(video_id: &str) -> String {
    utf8_percent_encode(video_id, VIDEO_ID).to_string()
}

pub fn embed_url(host: &str, video_id: &str) -> String {
    format!("https://{}/embed/{}", host, encode_video_id(video_id))
}

/// Render a video summary into the provided slots.
///
/// Without a summary root nothing is touched and
/// [`ReportViewError::MissingRootContainer`] is returned. The publication date
/// is validated before any mutation. Every other slot is optional and skipped
/// with a warning when absent.
pub fn render_summary(
    doc: &mut Document,
    slots: &SummarySlots,
    data: &VideoSummaryPayload,
    opts: &SummaryOptions,
) -> Result<SummaryOutcome> {
    let Some(root) = slots.root else {
        error!("Summary container not found");
        return Err(ReportViewError::MissingRootContainer);
    };

    let published = format_published(&data.raw_data.date_published, opts.date_style)?;

    doc.remove_class(root, HIDDEN_CLASS);

    let mut outcome = SummaryOutcome::default();
    for role in SlotRole::OPTIONAL {
        let Some(slot) = slots.get(role) else {
            warn!(slot = %role, "summary slot not found, skipping");
            outcome.skipped.push(role);
            continue;
        };

        match role {
            SlotRole::Title => doc.set_text_content(slot, &data.summary.title),
            SlotRole::Embed => replace_children(doc, slot, [embed_frame(data, opts)]),
            SlotRole::Metadata => replace_children(doc, slot, metadata_fields(data, &published)),
            SlotRole::Body => replace_children(doc, slot, body_blocks(data)),
            SlotRole::SummaryRoot => {}
        }
    }

    doc.scroll_into_view(root, ScrollBehavior::Smooth);
    debug!(
        video_id = %data.video_id,
        skipped = outcome.skipped.len(),
        "rendered video summary"
    );
    Ok(outcome)
}

fn replace_children(
    doc: &mut Document,
    slot: NodeId,
    children: impl IntoIterator<Item = ElementBuilder>,
) {
    doc.clear_children(slot);
    for child in children {
        child.append_to(doc, slot);
    }
}

fn embed_frame(data: &VideoSummaryPayload, opts: &SummaryOptions) -> ElementBuilder {
    el("iframe")
        .attr("width", EMBED_WIDTH)
        .attr("height", EMBED_HEIGHT)
        .attr("src", embed_url(&opts.embed_host, &data.video_id))
        .attr("frameborder", "0")
        .attr("allow", EMBED_ALLOW)
        .flag("allowfullscreen")
}

fn metadata_fields(data: &VideoSummaryPayload, published: &str) -> Vec<ElementBuilder> {
    [
        ("Views", data.summary.video_views.to_string()),
        ("Likes", data.raw_data.like_count.to_string()),
        ("Comments", data.raw_data.comment_count.to_string()),
        ("Published", published.to_string()),
    ]
    .into_iter()
    .map(|(label, value)| {
        el("p")
            .child(el("strong").text(format!("{label}:")))
            .text(format!(" {value}"))
    })
    .collect()
}

fn body_blocks(data: &VideoSummaryPayload) -> Vec<ElementBuilder> {
    let summary = &data.summary;
    vec![
        text_block("Overview", &summary.overview),
        list_block(
            "Key Points",
            summary
                .key_points
                .iter()
                .map(|p| (p.point_title.as_str(), p.point_description.as_str())),
        ),
        text_block("Engagement Analysis", &summary.engagement_analysis),
        text_block("Target Audience", &summary.target_audience),
        list_block(
            "Improvement Suggestions",
            summary
                .improvement_suggestions
                .iter()
                .map(|s| (s.improvement_title.as_str(), s.improvement_description.as_str())),
        ),
    ]
}

fn block_heading(heading: &str) -> ElementBuilder {
    el("h3").class(HEADING_CLASS).text(heading)
}

fn text_block(heading: &str, text: &str) -> ElementBuilder {
    el("div")
        .child(block_heading(heading))
        .child(el("p").text(text))
}

fn list_block<'a>(
    heading: &str,
    items: impl Iterator<Item = (&'a str, &'a str)>,
) -> ElementBuilder {
    el("div").child(block_heading(heading)).child(
        el("ul").class(LIST_CLASS).children(items.map(|(title, description)| {
            el("li")
                .child(el("strong").text(title))
                .text(format!(": {description}"))
        })),
    )
}
