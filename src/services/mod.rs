pub mod client;
pub mod enrichment;
pub mod item_cf;
pub mod ranking;
pub mod recommendations;

pub use client::RecommendClient;
pub use recommendations::RecommendationService;
