//! The two renderers. They share no state and never call each other.

pub mod report;
pub mod summary;

pub use report::render_report;
pub use summary::{
    DEFAULT_EMBED_HOST, SummaryOptions, SummaryOutcome, embed_url, encode_video_id,
    render_summary,
};
