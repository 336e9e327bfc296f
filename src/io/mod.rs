/// CSV export for allocation profiles and plan summaries.
pub mod export;
