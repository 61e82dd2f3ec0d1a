// Compatibility analysis: AI assessment with heuristic fallback, score
// aggregation and the improvement roadmap.
// All generative-text calls go through llm_client.

pub mod aggregate;
pub mod client;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod roadmap;
