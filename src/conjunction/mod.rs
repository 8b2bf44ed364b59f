mod export;
mod feed;
mod parser;
mod pipeline;
mod query;
mod risk;
mod synthetic;
mod types;

pub use export::{format_probability, to_csv};
pub use feed::{ConjunctionFeedSource, FeedError, SocratesClient, DEFAULT_FEED_URL};
pub use pipeline::{ConjunctionService, DEFAULT_TRACKED};
pub use query::{
    analyze, run_query, Analysis, AnalysisRequest, ConjunctionFilter, ConjunctionStats, GroupBy,
    RiskCounts, SortKey,
};
pub use types::{ConjunctionEvent, RiskLevel};
