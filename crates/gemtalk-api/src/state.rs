//! Application state for the web server.
//!
//! Holds the vision service and the per-browser-session history buffers.
//! Each session's buffer sits behind its own async mutex so that one
//! session handles one submission at a time while others proceed.
//!
//! Sessions are bounded two ways: idle ones are swept on an interval, and
//! creating a session past the cap evicts the least recently used one.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use gemtalk_core::vision::history::QaHistory;
use gemtalk_core::vision::service::{VisionOptions, VisionService};
use gemtalk_infra::llm::create_provider;
use gemtalk_infra::raster::RasterDecoder;
use gemtalk_infra::secret::EnvCredentialSource;
use gemtalk_types::config::{GlobalConfig, ServerConfig};

/// One browser session's history slot.
pub type SessionSlot = Arc<Mutex<QaHistory>>;

/// Longest wait between two idle sweeps.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Bounds on the live session table.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// `None` keeps idle sessions until deleted.
    pub idle_ttl: Option<Duration>,
    /// `None` means no cap.
    pub max_sessions: Option<usize>,
}

impl SessionLimits {
    pub fn from_config(server: &ServerConfig) -> Self {
        Self {
            idle_ttl: (server.session_idle_secs > 0)
                .then(|| Duration::from_secs(server.session_idle_secs)),
            max_sessions: (server.max_sessions > 0).then_some(server.max_sessions),
        }
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

pub struct SessionEntry {
    slot: SessionSlot,
    last_seen: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(QaHistory::default())),
            last_seen: Instant::now(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub vision: Arc<VisionService>,
    pub sessions: Arc<DashMap<Uuid, SessionEntry>>,
    pub max_upload_bytes: usize,
    pub limits: SessionLimits,
}

impl AppState {
    pub fn new(vision: VisionService, max_upload_bytes: usize) -> Self {
        Self {
            vision: Arc::new(vision),
            sessions: Arc::new(DashMap::new()),
            max_upload_bytes,
            limits: SessionLimits::default(),
        }
    }

    pub fn with_session_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Wire the Gemini provider and raster decoder from configuration.
    ///
    /// Fails when `GOOGLE_API_KEY` is missing or blank.
    pub fn init(config: &GlobalConfig, model: Option<String>) -> anyhow::Result<Self> {
        let api_key = EnvCredentialSource::default().api_key()?;
        let model = model.unwrap_or_else(|| config.vision_model.clone());
        let provider = create_provider(config, &model, api_key)?;

        if !provider.capabilities().vision {
            tracing::warn!(%model, "Configured vision model does not accept images");
        }

        let vision = VisionService::new(
            provider,
            Box::new(RasterDecoder::new()),
            VisionOptions {
                model,
                temperature: config.temperature,
                max_tokens: config.max_output_tokens,
            },
        );
        Ok(Self::new(vision, config.server.max_upload_bytes)
            .with_session_limits(SessionLimits::from_config(&config.server)))
    }

    /// Start a session with an empty history, evicting the least recently
    /// used session when the table is full.
    pub fn create_session(&self) -> Uuid {
        if let Some(max) = self.limits.max_sessions {
            while self.sessions.len() >= max {
                let oldest = self
                    .sessions
                    .iter()
                    .min_by_key(|entry| entry.value().last_seen)
                    .map(|entry| *entry.key());
                let Some(oldest) = oldest else { break };
                self.sessions.remove(&oldest);
                tracing::debug!(session_id = %oldest, "Session evicted (cap reached)");
            }
        }

        let id = Uuid::now_v7();
        self.sessions.insert(id, SessionEntry::new());
        tracing::debug!(session_id = %id, "Session created");
        id
    }

    /// The session's slot, if it exists, marking it as used. The map guard
    /// is released before returning so callers can hold the slot across
    /// awaits.
    pub fn session(&self, id: &Uuid) -> Option<SessionSlot> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.slot)
        })
    }

    /// Drop a session. Returns false if it did not exist.
    pub fn remove_session(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "Session removed");
        }
        removed
    }

    /// Drop sessions idle for longer than the configured TTL. Sessions with
    /// a submission in progress are kept. Returns how many were dropped.
    pub fn sweep_idle(&self) -> usize {
        let Some(ttl) = self.limits.idle_ttl else {
            return 0;
        };
        let now = Instant::now();
        let mut dropped = 0;
        self.sessions.retain(|_, entry| {
            let busy = entry.slot.try_lock().is_err();
            let keep = busy || now.duration_since(entry.last_seen) < ttl;
            if !keep {
                dropped += 1;
            }
            keep
        });
        if dropped > 0 {
            tracing::debug!(dropped, live = self.sessions.len(), "Idle sessions swept");
        }
        dropped
    }

    /// Run [`sweep_idle`](Self::sweep_idle) periodically. Returns `None`
    /// when idle expiry is disabled.
    pub fn spawn_session_sweeper(&self) -> Option<JoinHandle<()>> {
        let ttl = self.limits.idle_ttl?;
        let period = ttl.min(MAX_SWEEP_PERIOD);
        let state = self.clone();

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                state.sweep_idle();
            }
        }))
    }
}
