//! SEO Core - Keyword ranking data model and associated-score aggregation

pub mod aggregate;
pub mod keywords;

pub use aggregate::aggregate;
pub use keywords::{AssociatedScores, AssociationMap, RankedKeyword};
