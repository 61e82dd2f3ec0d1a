pub mod document;

pub use document::{ExperienceLevel, JobDescription, ResumeDocument, ResumeSections, Seniority};
