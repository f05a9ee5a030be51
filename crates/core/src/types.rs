use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, SeqAccess, Visitor, value::SeqAccessDeserializer},
};

use crate::error::Result;

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wire wrapper the report endpoint returns around the report itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub consultation_report: ConsultationReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub sections: Vec<Section>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub categorisation: Vec<Categorisation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default)]
    pub content: SectionContent,
}

/// Body of a top-level section: flat text, or groups of titled sub-sections.
///
/// `null` reads as no groups. Errors inside a group keep serde's message and
/// position instead of collapsing into a single "no variant matched".
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    Groups(Vec<SubSectionGroup>),
}

impl Default for SectionContent {
    fn default() -> Self {
        SectionContent::Groups(Vec::new())
    }
}

impl<'de> Deserialize<'de> for SectionContent {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContentVisitor;

        impl<'de> Visitor<'de> for ContentVisitor {
            type Value = SectionContent;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or a list of sub-section groups")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                Ok(SectionContent::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
                Ok(SectionContent::Text(v))
            }

            fn visit_seq<A>(self, seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                Vec::deserialize(SeqAccessDeserializer::new(seq)).map(SectionContent::Groups)
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(SectionContent::default())
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(SectionContent::default())
            }
        }

        deserializer.deserialize_any(ContentVisitor)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubSectionGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<SubSubSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubSubSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Categorisation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_formats: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_category_justification: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummaryPayload {
    pub video_id: String,
    pub summary: VideoSummary,
    pub raw_data: RawVideoData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_views: DisplayValue,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    pub key_points: Vec<KeyPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub engagement_analysis: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_audience: String,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub point_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub point_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub improvement_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub improvement_description: String,
}

/// Platform statistics captured alongside the summary. Extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVideoData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub like_count: DisplayValue,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment_count: DisplayValue,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_published: String,
}

/// A value shown verbatim: counts arrive as numbers or preformatted strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(serde_json::Number),
    Text(String),
}

impl Default for DisplayValue {
    fn default() -> Self {
        DisplayValue::Text(String::new())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(n) => write!(f, "{}", n),
            DisplayValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a consultation report, accepting either the bare report or the
/// `{"consultation_report": ...}` envelope.
pub fn parse_report(json: &str) -> Result<ConsultationReport> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    if let Some(inner) = value.get_mut("consultation_report") {
        value = inner.take();
    }
    let report: ConsultationReport = serde_json::from_value(value)?;
    Ok(report)
}

pub fn parse_summary(json: &str) -> Result<VideoSummaryPayload> {
    let payload: VideoSummaryPayload = serde_json::from_str(json)?;
    Ok(payload)
}
