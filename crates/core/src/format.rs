use crate::{
    date::{DateStyle, format_published},
    error::Result,
    render::encode_video_id,
    types::{ConsultationReport, SectionContent, VideoSummaryPayload},
};

/// Headings the report generator assigns to numbered top-level sections
const PANEL_HEADERS: &[(u32, &str)] = &[
    (1, "Executive Summary"),
    (2, "Key Metrics"),
    (3, "Trends"),
    (4, "Oratory Style"),
    (5, "Recommendations"),
    (6, "Limitations"),
];

/// Public watch page for a video
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", encode_video_id(video_id))
}

/// Full-size thumbnail for a video
pub fn thumbnail_url(video_id: &str) -> String {
    format!(
        "https://img.youtube.com/vi/{}/maxresdefault.jpg",
        encode_video_id(video_id)
    )
}

/// Format a consultation report as markdown
pub fn format_report_markdown(report: &ConsultationReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.title));

    if let Some(categorisation) = report.categorisation.first() {
        if !categorisation.content_categories.is_empty() {
            output.push_str("### Content Categories\n\n");
            for category in &categorisation.content_categories {
                output.push_str(&format!("- {}\n", category));
            }
            output.push('\n');
        }
        if !categorisation.video_formats.is_empty() {
            output.push_str("### Video Formats\n\n");
            for format in &categorisation.video_formats {
                output.push_str(&format!("- {}\n", format));
            }
            output.push('\n');
        }
        if !categorisation.content_category_justification.is_empty() {
            output.push_str("### Category Justification\n\n");
            output.push_str(&categorisation.content_category_justification);
            output.push_str("\n\n");
        }
    }

    for section in &report.sections {
        let panel = section
            .number
            .and_then(|n| PANEL_HEADERS.iter().find(|(num, _)| *num == n))
            .map(|(_, header)| *header);
        if let Some(header) = panel {
            output.push_str(&format!("# {}\n\n---\n\n", header));
        }

        output.push_str(&format!("## {}\n\n", section.subtitle));
        match &section.content {
            SectionContent::Text(text) => {
                if !text.is_empty() {
                    output.push_str(&format!("{}\n\n", text));
                }
            }
            SectionContent::Groups(groups) => {
                for sub in groups.iter().flat_map(|g| &g.sections) {
                    if sub.content.is_empty() {
                        continue;
                    }
                    output.push_str(&format!("### {}\n\n", sub.subtitle));
                    output.push_str(&format!("{}\n\n", sub.content));
                }
            }
        }
    }

    output
}

/// Format a video summary as markdown
pub fn format_summary_markdown(data: &VideoSummaryPayload, date_style: DateStyle) -> Result<String> {
    let summary = &data.summary;
    let published = format_published(&data.raw_data.date_published, date_style)?;
    let video_url = watch_url(&data.video_id);

    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", summary.title));
    output.push_str(&format!(
        "[![{}]({})]({})\n\n",
        summary.title,
        thumbnail_url(&data.video_id),
        video_url
    ));
    output.push_str(&format!("[Watch on YouTube]({})\n\n", video_url));

    output.push_str(&format!("- Views: {}\n", summary.video_views));
    output.push_str(&format!("- Likes: {}\n", data.raw_data.like_count));
    output.push_str(&format!("- Comments: {}\n", data.raw_data.comment_count));
    output.push_str(&format!("- Published: {}\n\n", published));

    output.push_str("## Overview\n\n");
    output.push_str(&summary.overview);
    output.push_str("\n\n");

    output.push_str("## Key Points\n\n");
    for point in &summary.key_points {
        output.push_str(&format!("### {}\n\n", point.point_title));
        output.push_str(&format!("{}\n\n", point.point_description));
    }

    output.push_str("## Engagement Analysis\n\n");
    output.push_str(&summary.engagement_analysis);
    output.push_str("\n\n");

    output.push_str("## Target Audience\n\n");
    output.push_str(&summary.target_audience);
    output.push_str("\n\n");

    output.push_str("## Improvement Suggestions\n\n");
    for suggestion in &summary.improvement_suggestions {
        output.push_str(&format!("### {}\n\n", suggestion.improvement_title));
        output.push_str(&format!("{}\n\n", suggestion.improvement_description));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_report, parse_summary};
    use serde_json::json;

    #[test]
    fn report_markdown_includes_panels_and_nested_sections() {
        let report = parse_report(
            &json!({"consultation_report": {
                "title": "Channel Analysis",
                "categorisation": [{"content_categories": ["Education"], "video_formats": []}],
                "sections": [
                    {"number": 1, "subtitle": "Summary", "content": "Solid channel."},
                    {"number": 9, "subtitle": "Details", "content": [
                        {"sections": [{"subtitle": "Upload cadence", "content": "Weekly"}, {"subtitle": "Empty", "content": ""}]}
                    ]}
                ]
            }})
            .to_string(),
        )
        .unwrap();

        let md = format_report_markdown(&report);
        assert!(md.starts_with("# Channel Analysis\n\n"));
        assert!(md.contains("### Content Categories\n\n- Education\n"));
        assert!(!md.contains("### Video Formats"));
        assert!(md.contains("# Executive Summary\n\n---\n\n## Summary\n\nSolid channel.\n\n"));
        assert!(md.contains("## Details\n\n### Upload cadence\n\nWeekly\n\n"));
        assert!(!md.contains("### Empty"));
    }

    #[test]
    fn summary_markdown_follows_render_order() {
        let payload = parse_summary(
            &json!({
                "video_id": "abc123",
                "summary": {
                    "title": "Video",
                    "video_views": 10,
                    "overview": "O",
                    "key_points": [{"point_title": "P", "point_description": "D"}],
                    "engagement_analysis": "E",
                    "target_audience": "A",
                    "improvement_suggestions": [{"improvement_title": "I", "improvement_description": "J"}]
                },
                "raw_data": {"like_count": 1, "comment_count": 2, "date_published": "2024-01-15T00:00:00Z"}
            })
            .to_string(),
        )
        .unwrap();

        let md = format_summary_markdown(&payload, DateStyle::Us).unwrap();
        assert!(md.contains("https://www.youtube.com/watch?v=abc123"));
        assert!(md.contains("- Published: 1/15/2024\n"));

        let order = [
            "## Overview",
            "## Key Points",
            "### P",
            "## Engagement Analysis",
            "## Target Audience",
            "## Improvement Suggestions",
            "### I",
        ];
        let positions: Vec<usize> = order.iter().map(|h| md.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{md}");
    }

    #[test]
    fn video_urls_encode_the_id() {
        let id = "a b)](javascript:x)&t=1";
        assert_eq!(
            watch_url(id),
            "https://www.youtube.com/watch?v=a%20b%29%5D%28javascript%3Ax%29%26t%3D1"
        );
        assert_eq!(
            thumbnail_url("../x y"),
            "https://img.youtube.com/vi/..%2Fx%20y/maxresdefault.jpg"
        );
        assert_eq!(watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
