//! Per-session context: the only mutable state shared across requests.
//!
//! Each session holds its uploaded résumé, the last analysis (keyed by the
//! exact inputs that produced it) and a short score history. Sessions are
//! independent; idle ones are evicted lazily when a new session is created.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::client::AnalysisMode;
use crate::analysis::pipeline::AnalysisReport;
use crate::models::{ExperienceLevel, ResumeDocument};

/// Number of analyses kept in a session's history.
pub const HISTORY_LIMIT: usize = 10;

/// The exact inputs of an analysis. Identical keys are served from cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisKey {
    pub resume_text: String,
    pub job_text: String,
    pub industry: String,
    pub level: ExperienceLevel,
}

#[derive(Debug, Clone)]
pub struct CachedAnalysis {
    pub key: AnalysisKey,
    pub report: AnalysisReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub analysis_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub match_score: f64,
    pub ats_score: f64,
    pub mode: AnalysisMode,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub resume: Option<ResumeDocument>,
    pub last_analysis: Option<CachedAnalysis>,
    pub history: Vec<HistoryRecord>,
    pub rescore_count: u32,
    touched: Instant,
}

impl SessionContext {
    fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            last_seen: now,
            resume: None,
            last_analysis: None,
            history: Vec::new(),
            rescore_count: 0,
            touched: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_seen = Utc::now();
        self.touched = Instant::now();
    }

    fn stats(&self) -> SessionStats {
        SessionStats {
            id: self.id,
            created_at: self.created_at,
            last_seen: self.last_seen,
            has_resume: self.resume.is_some(),
            resume_word_count: self.resume.as_ref().map(|r| r.word_count),
            analyses_run: self.history.len(),
            rescore_count: self.rescore_count,
            last_analysis_at: self
                .last_analysis
                .as_ref()
                .map(|c| c.report.result.created_at),
        }
    }
}

/// Session summary returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub has_resume: bool,
    pub resume_word_count: Option<usize>,
    pub analyses_run: usize,
    pub rescore_count: u32,
    pub last_analysis_at: Option<DateTime<Utc>>,
}

/// In-memory session store. Cloning shares the same map.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Creates a session, evicting idle ones first.
    pub async fn create(&self) -> SessionStats {
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, s| s.touched.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle sessions");
        }

        let context = SessionContext::new(Uuid::new_v4());
        let stats = context.stats();
        sessions.insert(context.id, context);
        debug!("Created session {}", stats.id);
        stats
    }

    /// Snapshot of a session. Marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<SessionContext> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.touch();
        Some(session.clone())
    }

    pub async fn stats(&self, id: Uuid) -> Option<SessionStats> {
        self.update(id, |s| s.stats()).await
    }

    /// Removes a session. Returns false when it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn attach_resume(&self, id: Uuid, resume: ResumeDocument) -> Option<SessionStats> {
        self.update(id, |s| {
            s.resume = Some(resume);
            s.stats()
        })
        .await
    }

    /// Stores an analysis as the session's latest and appends it to history.
    /// Returns false when the session no longer exists.
    pub async fn record_analysis(&self, id: Uuid, analysis: CachedAnalysis, forced: bool) -> bool {
        self.update(id, |s| {
            let result = &analysis.report.result;
            s.history.push(HistoryRecord {
                analysis_id: result.id,
                timestamp: result.created_at,
                match_score: analysis.report.scores.match_score,
                ats_score: analysis.report.scores.ats_score,
                mode: result.mode,
            });
            if s.history.len() > HISTORY_LIMIT {
                let excess = s.history.len() - HISTORY_LIMIT;
                s.history.drain(..excess);
            }
            if forced {
                s.rescore_count += 1;
            }
            s.last_analysis = Some(analysis);
        })
        .await
        .is_some()
    }

    pub async fn last_analysis(&self, id: Uuid) -> Option<Option<AnalysisReport>> {
        self.update(id, |s| s.last_analysis.as_ref().map(|c| c.report.clone()))
            .await
    }

    pub async fn history(&self, id: Uuid) -> Option<Vec<HistoryRecord>> {
        self.update(id, |s| s.history.clone()).await
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionContext) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.touch();
        Some(f(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::{aggregate, ScoreWeights};
    use crate::analysis::client::{AiAssessment, AnalysisResult};
    use crate::analysis::roadmap::build_roadmap;
    use crate::extraction::build_resume_document;
    use crate::matching::{analyze_content, derive_job_description, match_documents, IndustryCatalog};

    fn cached(job_text: &str) -> CachedAnalysis {
        let catalog = IndustryCatalog::builtin();
        let profile = catalog.resolve(None);
        let resume = build_resume_document("Skills\nRust, Go");
        let stats = match_documents(&resume.raw_text, job_text, profile);
        let signals = analyze_content(&resume);
        let result = AnalysisResult {
            id: Uuid::new_v4(),
            mode: AnalysisMode::HeuristicOnly,
            degraded_reason: None,
            ai: AiAssessment::heuristic_placeholder(&stats, &signals),
            job: derive_job_description(job_text, profile),
            match_stats: stats,
            signals,
            keyword_suggestions: vec![],
            created_at: Utc::now(),
        };
        let scores = aggregate(&result.match_stats, &result, &ScoreWeights::default());
        let roadmap = build_roadmap(&scores, &result);
        CachedAnalysis {
            key: AnalysisKey {
                resume_text: resume.raw_text.clone(),
                job_text: job_text.to_string(),
                industry: profile.name.clone(),
                level: ExperienceLevel::Mid,
            },
            report: AnalysisReport {
                result,
                scores,
                roadmap,
            },
        }
    }

    #[tokio::test]
    async fn test_create_and_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let stats = store.create().await;
        assert!(!stats.has_resume);
        assert_eq!(store.count().await, 1);

        assert!(store.remove(stats.id).await);
        assert!(!store.remove(stats.id).await);
        assert!(store.get(stats.id).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create().await;
        let b = store.create().await;

        store
            .attach_resume(a.id, build_resume_document("Skills\nRust"))
            .await;
        assert!(store.stats(a.id).await.unwrap().has_resume);
        assert!(!store.stats(b.id).await.unwrap().has_resume);
    }

    #[tokio::test]
    async fn test_history_capped() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create().await.id;

        let mut last_id = Uuid::nil();
        for i in 0..(HISTORY_LIMIT + 3) {
            let analysis = cached(&format!("Rust engineer {i}"));
            last_id = analysis.report.result.id;
            assert!(store.record_analysis(id, analysis, false).await);
        }

        let history = store.history(id).await.unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.last().unwrap().analysis_id, last_id);

        let last = store.last_analysis(id).await.unwrap().unwrap();
        assert_eq!(last.result.id, last_id);
    }

    #[tokio::test]
    async fn test_forced_record_bumps_rescore_count() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create().await.id;
        store.record_analysis(id, cached("Go"), false).await;
        store.record_analysis(id, cached("Go"), true).await;
        assert_eq!(store.stats(id).await.unwrap().rescore_count, 1);
    }

    #[tokio::test]
    async fn test_record_on_missing_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(!store.record_analysis(Uuid::new_v4(), cached("Go"), false).await);
        assert!(store.last_analysis(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_evicted_on_create() {
        let store = SessionStore::new(Duration::from_secs(60));
        let idle = store.create().await.id;
        let active = store.create().await.id;

        tokio::time::advance(Duration::from_secs(45)).await;
        store.get(active).await;
        tokio::time::advance(Duration::from_secs(30)).await;

        store.create().await;
        assert!(store.get(idle).await.is_none());
        assert!(store.get(active).await.is_some());
        assert_eq!(store.count().await, 2);
    }
}
