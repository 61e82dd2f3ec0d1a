// Keyword/Industry Matcher and the deterministic heuristics around it.
// Nothing in this module performs I/O; every function is pure.

pub mod industry;
pub mod job_fields;
pub mod matcher;
pub mod signals;
pub mod suggestions;
pub mod tokenize;

pub use industry::{IndustryCatalog, IndustryProfile};
pub use job_fields::{derive_job_description, display_name};
pub use matcher::{match_documents, MatchStats};
pub use signals::{analyze_content, ContentSignals};
pub use suggestions::{suggest_keyword_improvements, KeywordSuggestion};
