//! Reportview Core Library
//!
//! Renders consultation reports and video summaries into an HTML element tree,
//! plus the markdown and PDF exports and configuration the CLI builds on.

pub mod config;
pub mod date;
pub mod dom;
pub mod error;
pub mod format;
pub mod page;
pub mod paths;
pub mod pdf;
pub mod render;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{RenderConfig, apply_env, load_config, validate};
pub use date::{DateStyle, format_published, parse_published};
pub use dom::{Document, ElementBuilder, NodeId, NodeRef, ScrollBehavior, ScrollRequest, el};
pub use error::{ReportViewError, Result};
pub use format::{format_report_markdown, format_summary_markdown};
pub use page::{SlotIds, SlotRole, SummarySlots, build_host_page, locate_report_container, render_page};
pub use paths::{get_config_dir, get_config_path, get_output_path};
pub use pdf::{format_report_pdf, format_summary_pdf};
pub use render::{SummaryOptions, SummaryOutcome, render_report, render_summary};
pub use types::{
    ConsultationReport, Section, SectionContent, VideoSummaryPayload, parse_report, parse_summary,
};
