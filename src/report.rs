//! JSON rendering of pair results

use crate::error::FinderResult;
use crate::template_matching::MatchResult;
use serde::{Serialize, Serializer};

/// Outcome of matching one haystack/needle pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairReport {
    pub full_image: String,
    pub square_image: String,
    pub result: Option<MatchResult>,
}

impl PairReport {
    pub fn found(&self) -> bool {
        self.result.is_some()
    }
}

/// Shape of the JSON printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Array of accepted matches; misses are omitted
    #[default]
    Matches,
    /// Object listing every processed pair, misses marked `"found": false`
    Detailed,
}

impl ReportStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "matches" => Some(ReportStyle::Matches),
            "detailed" => Some(ReportStyle::Detailed),
            _ => None,
        }
    }
}

fn four_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10_000.0).round() / 10_000.0)
}

fn four_decimals_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => four_decimals(v, serializer),
        None => serializer.serialize_none(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchEntry<'a> {
    full_image: &'a str,
    square_image: &'a str,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    #[serde(serialize_with = "four_decimals")]
    match_percentage: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailedEntry<'a> {
    full_image: &'a str,
    square_image: &'a str,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    x: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "four_decimals_opt"
    )]
    match_percentage: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailedReport<'a> {
    tolerance: f64,
    pair_count: usize,
    match_count: usize,
    matches: Vec<DetailedEntry<'a>>,
}

/// Render the reports in the requested style as pretty-printed JSON
pub fn render(reports: &[PairReport], style: ReportStyle, tolerance: f64) -> FinderResult<String> {
    let json = match style {
        ReportStyle::Matches => {
            let entries: Vec<MatchEntry> = reports
                .iter()
                .filter_map(|report| {
                    report.result.as_ref().map(|m| MatchEntry {
                        full_image: &report.full_image,
                        square_image: &report.square_image,
                        x: m.x,
                        y: m.y,
                        width: m.width,
                        height: m.height,
                        match_percentage: m.match_percentage,
                    })
                })
                .collect();
            serde_json::to_string_pretty(&entries)?
        }
        ReportStyle::Detailed => {
            let matches: Vec<DetailedEntry> = reports
                .iter()
                .map(|report| DetailedEntry {
                    full_image: &report.full_image,
                    square_image: &report.square_image,
                    found: report.found(),
                    x: report.result.map(|m| m.x),
                    y: report.result.map(|m| m.y),
                    width: report.result.map(|m| m.width),
                    height: report.result.map(|m| m.height),
                    match_percentage: report.result.map(|m| m.match_percentage),
                })
                .collect();
            let document = DetailedReport {
                tolerance,
                pair_count: reports.len(),
                match_count: reports.iter().filter(|r| r.found()).count(),
                matches,
            };
            serde_json::to_string_pretty(&document)?
        }
    };
    Ok(json)
}
