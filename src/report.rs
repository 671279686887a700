//! Display of an analysis result.
//!
//! Scores are rounded to two decimals here and nowhere else.

use serde::Serialize;
use std::fmt::Write as _;

use crate::state::AnalysisResult;

/// One ranked keyword as displayed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankingLine {
    pub keyword: String,
    pub score: f64,
}

/// One associated term as displayed; `score` is `None` when the term was
/// never reached by a ranked keyword
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssociationLine {
    pub term: String,
    pub score: Option<f64>,
}

/// A seed keyword and its associated terms, in service order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssociationGroup {
    pub seed: String,
    pub terms: Vec<AssociationLine>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeywordReport {
    pub video: String,
    pub message: Option<String>,
    pub rankings: Vec<RankingLine>,
    pub associations: Vec<AssociationGroup>,
}

/// Round to two decimals for display. NaN and infinities pass through.
pub fn round_score(score: f64) -> f64 {
    if score.is_finite() {
        (score * 100.0).round() / 100.0
    } else {
        score
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.2}", score),
        None => "N/A".to_string(),
    }
}

impl KeywordReport {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let rankings = result
            .keyword_ranking
            .iter()
            .map(|ranked| RankingLine {
                keyword: ranked.keyword.clone(),
                score: round_score(ranked.normalized_score),
            })
            .collect();

        let associations = result
            .associations
            .iter()
            .map(|(seed, terms)| AssociationGroup {
                seed: seed.to_string(),
                terms: terms
                    .iter()
                    .map(|term| AssociationLine {
                        term: term.clone(),
                        score: result.associated_scores.get(term).map(round_score),
                    })
                    .collect(),
            })
            .collect();

        Self {
            video: result.request.video_name.clone(),
            message: result.message.clone(),
            rankings,
            associations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty() && self.associations.is_empty()
    }

    /// Plain-text rendering for the terminal. Empty sections are left out.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if self.is_empty() {
            let _ = writeln!(out, "No keywords returned for {}.", self.video);
            return out;
        }

        if !self.rankings.is_empty() {
            let _ = writeln!(out, "Keyword Rankings:");
            for line in &self.rankings {
                let _ = writeln!(out, "  - {} - {}", line.keyword, format_score(Some(line.score)));
            }
        }

        if !self.associations.is_empty() {
            if !self.rankings.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "Associated keywords with Scores:");
            for group in &self.associations {
                let _ = writeln!(out, "  {}", group.seed);
                for line in &group.terms {
                    let _ = writeln!(out, "    - {} - {}", line.term, format_score(line.score));
                }
            }
        }

        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
