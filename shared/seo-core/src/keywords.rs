//! Keyword ranking and association structures

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A seed keyword with the importance weight assigned by the ranking service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedKeyword {
    /// The keyword text
    pub keyword: String,

    /// Producer-assigned weight. Not clamped to any range.
    pub normalized_score: f64,

    /// Unnormalized engagement score, when the producer sends it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<f64>,
}

impl RankedKeyword {
    pub fn new(keyword: impl Into<String>, normalized_score: f64) -> Self {
        Self {
            keyword: keyword.into(),
            normalized_score,
            raw_score: None,
        }
    }

    pub fn with_raw_score(mut self, raw_score: f64) -> Self {
        self.raw_score = Some(raw_score);
        self
    }
}

/// Seed keyword -> associated terms.
///
/// Entries keep the order in which they were inserted (or appeared in the JSON
/// object), which is the order used for display. Lookups are hashed, so scoring
/// never depends on that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationMap(IndexMap<String, Vec<String>>);

impl AssociationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the association list for a seed keyword.
    ///
    /// Re-inserting an existing seed replaces its list but keeps its position.
    pub fn insert(&mut self, seed: impl Into<String>, terms: Vec<String>) {
        self.0.insert(seed.into(), terms);
    }

    /// Builder-style insert
    pub fn with(mut self, seed: impl Into<String>, terms: &[&str]) -> Self {
        self.insert(seed, terms.iter().map(|t| (*t).to_string()).collect());
        self
    }

    /// Associated terms for a seed keyword, if the seed is present
    pub fn get(&self, seed: &str) -> Option<&[String]> {
        self.0.get(seed).map(Vec::as_slice)
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(seed, terms)| (seed.as_str(), terms.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S, T> FromIterator<(S, Vec<T>)> for AssociationMap
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, Vec<T>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (seed, terms) in iter {
            map.insert(seed, terms.into_iter().map(Into::into).collect());
        }
        map
    }
}

/// Associated term -> accumulated score, as produced by [`crate::aggregate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssociatedScores(HashMap<String, f64>);

impl AssociatedScores {
    pub(crate) fn accumulate(&mut self, term: &str, share: f64) {
        match self.0.get_mut(term) {
            Some(total) => *total += share,
            None => {
                // Totals start at zero, so a -0.0 share lands as 0.0.
                self.0.insert(term.to_string(), 0.0 + share);
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.0.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(term, score)| (term.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_association_map_preserves_insertion_order() {
        let map = AssociationMap::new()
            .with("zeta", &["a"])
            .with("alpha", &["b"])
            .with("mu", &["c"]);

        let seeds: Vec<&str> = map.iter().map(|(seed, _)| seed).collect();
        assert_eq!(seeds, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_association_map_reinsert_keeps_position() {
        let map = AssociationMap::new()
            .with("seo", &["ranking"])
            .with("traffic", &["visitors"])
            .with("seo", &["search", "engine"]);

        assert_eq!(map.len(), 2);
        let seeds: Vec<&str> = map.iter().map(|(seed, _)| seed).collect();
        assert_eq!(seeds, vec!["seo", "traffic"]);
        assert_eq!(map.get("seo").unwrap(), &["search".to_string(), "engine".to_string()]);
    }

    #[test]
    fn test_association_map_deserialize_keeps_json_order() {
        let json = r#"{"traffic": ["visitors"], "seo": ["ranking", "search"], "content": []}"#;
        let map: AssociationMap = serde_json::from_str(json).unwrap();

        let seeds: Vec<&str> = map.iter().map(|(seed, _)| seed).collect();
        assert_eq!(seeds, vec!["traffic", "seo", "content"]);
        assert_eq!(map.get("content").unwrap().len(), 0);
        assert!(map.get("missing").is_none());
    }

    #[test]
    fn test_association_map_duplicate_json_key_keeps_first_position() {
        let json = r#"{"seo": ["ranking"], "traffic": ["visitors"], "seo": ["search"]}"#;
        let map: AssociationMap = serde_json::from_str(json).unwrap();

        let seeds: Vec<&str> = map.iter().map(|(seed, _)| seed).collect();
        assert_eq!(seeds, vec!["seo", "traffic"]);
        assert_eq!(map.get("seo").unwrap(), &["search".to_string()]);
    }

    #[test]
    fn test_association_map_serializes_in_order() {
        let map = AssociationMap::new()
            .with("b", &["x"])
            .with("a", &["y", "z"]);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"b":["x"],"a":["y","z"]}"#);
    }

    #[test]
    fn test_association_map_rejects_non_list_values() {
        let json = r#"{"seo": "ranking"}"#;
        assert!(serde_json::from_str::<AssociationMap>(json).is_err());
    }

    #[test]
    fn test_ranked_keyword_wire_format() {
        let json = r#"{"keyword": "seo", "raw_score": 1520, "normalized_score": 100.0}"#;
        let ranked: RankedKeyword = serde_json::from_str(json).unwrap();

        assert_eq!(ranked.keyword, "seo");
        assert_eq!(ranked.normalized_score, 100.0);
        assert_eq!(ranked.raw_score, Some(1520.0));
        assert_eq!(ranked, RankedKeyword::new("seo", 100.0).with_raw_score(1520.0));

        let without_raw: RankedKeyword =
            serde_json::from_str(r#"{"keyword": "a", "normalized_score": 0.5}"#).unwrap();
        assert_eq!(without_raw, RankedKeyword::new("a", 0.5));
    }

    #[test]
    fn test_accumulate_inserts_then_adds() {
        let mut scores = AssociatedScores::default();
        scores.accumulate("x", 0.25);
        scores.accumulate("x", 0.5);

        assert_eq!(scores.get("x"), Some(0.75));
        assert_eq!(scores.len(), 1);
    }
}
