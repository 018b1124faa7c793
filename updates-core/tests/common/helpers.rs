// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test Helpers
//!
//! Scripted verifier, in-memory update store and downloader fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use updates_core::{
    BoxError, FileDownloader, MockTransport, SignatureVerifier, Update, UpdateStore,
    UpdatesConfig,
};

/// What the scripted verifier answers.
#[derive(Debug, Clone)]
pub enum Verdict {
    Valid,
    Invalid,
    Fail(String),
}

/// Verifier that records its calls and answers with a fixed verdict.
pub struct ScriptedVerifier {
    verdict: Verdict,
    off_thread: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedVerifier {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            off_thread: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer from a blocking worker thread instead of the calling task.
    pub fn off_thread(mut self) -> Self {
        self.off_thread = true;
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SignatureVerifier for ScriptedVerifier {
    async fn verify(
        &self,
        manifest_text: &str,
        signature: &str,
        _config: &UpdatesConfig,
    ) -> Result<bool, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((manifest_text.to_string(), signature.to_string()));

        let verdict = self.verdict.clone();
        let verdict = if self.off_thread {
            tokio::task::spawn_blocking(move || verdict).await?
        } else {
            verdict
        };

        match verdict {
            Verdict::Valid => Ok(true),
            Verdict::Invalid => Ok(false),
            Verdict::Fail(message) => Err(message.into()),
        }
    }
}

/// Update store that remembers saved update ids.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Vec<Option<String>>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn saved_ids(&self) -> Vec<Option<String>> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl UpdateStore for MemoryStore {
    fn save_update(&self, update: &Update) -> Result<(), BoxError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.saved
            .lock()
            .unwrap()
            .push(update.id().map(str::to_string));
        Ok(())
    }
}

/// Route `tracing` output to the test harness (`RUST_LOG=updates_core=debug`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config for the current protocol with SDK 40.
pub fn test_config() -> UpdatesConfig {
    UpdatesConfig::new("https://updates.example.com/manifest").with_sdk_version("40.0.0")
}

/// Downloader fixture with handles on all collaborators.
pub struct Fixture {
    pub transport: Arc<MockTransport>,
    pub verifier: Arc<ScriptedVerifier>,
    pub store: Arc<MemoryStore>,
    pub downloader: FileDownloader,
}

pub fn fixture(config: UpdatesConfig, verdict: Verdict) -> Fixture {
    fixture_with_verifier(config, ScriptedVerifier::new(verdict))
}

pub fn fixture_with_verifier(config: UpdatesConfig, verifier: ScriptedVerifier) -> Fixture {
    init_tracing();
    let transport = Arc::new(MockTransport::new());
    let verifier = Arc::new(verifier);
    let store = Arc::new(MemoryStore::default());
    let downloader = FileDownloader::new(
        config,
        transport.clone(),
        verifier.clone(),
        store.clone(),
    );
    Fixture {
        transport,
        verifier,
        store,
        downloader,
    }
}
