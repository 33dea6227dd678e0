//! The upload state machine
//!
//! At most one submission is outstanding per controller. While a request is
//! in flight, the network call and the progress ticker run as independent
//! tasks; a generation counter decides which of them may still touch the
//! state, so a tick that lands after the response has been classified is a
//! no-op.

use crate::api::ApiClient;
use crate::error::{DetectError, Result};
use crate::progress::{phase_label, ProgressSimulator};
use crate::upload::types::{FileSource, Observer, UploadState};
use crate::validate::{validate, FileDescriptor, ValidationConfig, ValidationOutcome};
use log::{debug, warn};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Inline error shown when submit is called with no file selected
pub const NO_FILE_MESSAGE: &str = "Please select a file first.";

/// Message shown for transport failures
pub const NETWORK_FAILURE_MESSAGE: &str = "Failed to analyze file. Please try again.";

/// How long the full progress bar stays visible before the result is
/// published
pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(300);

struct Inner {
    state: UploadState,
    source: Option<FileSource>,
    inline_error: Option<String>,
    /// Bumped on every accepted submit; stale ticks and responses carry an
    /// older value and are ignored
    generation: u64,
}

/// Orchestrates validation, progress simulation and the API call into one
/// observable workflow
pub struct UploadController {
    api: ApiClient,
    validation: ValidationConfig,
    simulator: ProgressSimulator,
    display_delay: Duration,
    inner: Arc<Mutex<Inner>>,
    observers: Arc<Mutex<Vec<Observer>>>,
}

impl UploadController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            validation: ValidationConfig::default(),
            simulator: ProgressSimulator::default(),
            display_delay: DEFAULT_DISPLAY_DELAY,
            inner: Arc::new(Mutex::new(Inner {
                state: UploadState::Idle,
                source: None,
                inline_error: None,
                generation: 0,
            })),
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the acceptance rules
    pub fn validation(mut self, config: ValidationConfig) -> Self {
        self.validation = config;
        self
    }

    /// Replace the progress simulator configuration
    pub fn simulator(mut self, simulator: ProgressSimulator) -> Self {
        self.simulator = simulator;
        self
    }

    /// Set the delay between the full progress bar and the published result
    pub fn display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    /// Register an observer for state transitions
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&UploadState) + Send + Sync + 'static,
    {
        self.observers.lock().unwrap().push(Arc::new(observer));
    }

    /// Snapshot of the current state
    pub fn state(&self) -> UploadState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Current inline error, if any (validation or missing-file messages)
    pub fn inline_error(&self) -> Option<String> {
        self.inner.lock().unwrap().inline_error.clone()
    }

    /// Cosmetic phase label for the current progress, while submitting
    pub fn phase(&self) -> Option<&'static str> {
        self.state().progress().map(phase_label)
    }

    fn notify(&self, state: &UploadState) {
        notify(&self.observers, state);
    }

    /// Offer a file to the controller
    ///
    /// An accepted file moves the state to `FileSelected`; a rejected one
    /// leaves the state untouched and surfaces the rejection as the inline
    /// error. Selection is ignored while a submission is outstanding.
    pub fn select_file(&self, file: FileDescriptor, source: FileSource) -> ValidationOutcome {
        let outcome = validate(Some(&file), &self.validation);

        let snapshot = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_submitting() {
                warn!("file selection ignored while a submission is outstanding");
                return outcome;
            }
            match &outcome {
                ValidationOutcome::Accepted => {
                    debug!("selected {} ({} bytes)", file.name, file.size_bytes);
                    inner.inline_error = None;
                    inner.source = Some(source);
                    inner.state = UploadState::FileSelected(file);
                    Some(inner.state.clone())
                }
                ValidationOutcome::Rejected { message, .. } => {
                    debug!("rejected {}: {}", file.name, message);
                    inner.inline_error = Some(message.clone());
                    None
                }
            }
        };

        if let Some(state) = snapshot {
            self.notify(&state);
        }
        outcome
    }

    /// Offer a file whose bytes are already in memory
    pub fn select_bytes(&self, name: impl Into<String>, bytes: Vec<u8>) -> ValidationOutcome {
        let name = name.into();
        let file = FileDescriptor::new(name, bytes.len() as u64);
        self.select_file(file, FileSource::Memory(Arc::new(bytes)))
    }

    /// Offer a file from the filesystem; metadata is captured now, bytes
    /// are read at submit time
    pub fn select_path(&self, path: &Path) -> Result<ValidationOutcome> {
        let file = FileDescriptor::from_path(path)?;
        Ok(self.select_file(file, FileSource::Path(path.to_path_buf())))
    }

    /// Clear the selection and any inline error
    pub fn change_file(&self) {
        let snapshot = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_submitting() {
                warn!("change_file ignored while a submission is outstanding");
                return;
            }
            inner.source = None;
            inner.inline_error = None;
            inner.state = UploadState::Idle;
            inner.state.clone()
        };
        self.notify(&snapshot);
    }

    /// Return to `Idle` after a successful classification
    pub fn upload_another(&self) {
        let snapshot = {
            let mut inner = self.inner.lock().unwrap();
            if !matches!(inner.state, UploadState::Succeeded(_)) {
                return;
            }
            inner.source = None;
            inner.inline_error = None;
            inner.state = UploadState::Idle;
            inner.state.clone()
        };
        self.notify(&snapshot);
    }

    /// Submit the selected file and drive the workflow to a terminal state
    ///
    /// A call while already `Submitting` is a no-op; a call with no file
    /// selected surfaces an inline error and leaves the state unchanged.
    /// From `Failed`, the retained file is resubmitted without
    /// re-selection. Network and server failures resolve to `Failed` and
    /// are returned inside the state; only a session expiry is additionally
    /// returned as an error so the caller can redirect to login.
    pub async fn submit(&self) -> Result<UploadState> {
        let (file, source, generation) = {
            let mut inner = self.inner.lock().unwrap();
            let file = match &inner.state {
                UploadState::Submitting { .. } => {
                    debug!("submit ignored: already submitting");
                    return Ok(inner.state.clone());
                }
                UploadState::FileSelected(file) | UploadState::Failed { file, .. } => file.clone(),
                _ => {
                    inner.inline_error = Some(NO_FILE_MESSAGE.to_string());
                    return Ok(inner.state.clone());
                }
            };
            let source = match inner.source.clone() {
                Some(source) => source,
                None => {
                    inner.inline_error = Some(NO_FILE_MESSAGE.to_string());
                    return Ok(inner.state.clone());
                }
            };

            inner.generation += 1;
            inner.inline_error = None;
            inner.state = UploadState::Submitting {
                file: file.clone(),
                progress: 0.0,
            };
            (file, source, inner.generation)
        };
        self.notify(&UploadState::Submitting {
            file: file.clone(),
            progress: 0.0,
        });

        let tick_inner = self.inner.clone();
        let tick_observers = self.observers.clone();
        let ticker = self.simulator.start(move |progress| {
            let snapshot = {
                let mut inner = tick_inner.lock().unwrap();
                if inner.generation != generation {
                    return;
                }
                match &mut inner.state {
                    UploadState::Submitting { progress: current, .. } if progress > *current => {
                        *current = progress;
                        Some(inner.state.clone())
                    }
                    _ => None,
                }
            };
            if let Some(state) = snapshot {
                notify(&tick_observers, &state);
            }
        });

        let outcome = match &source {
            FileSource::Memory(bytes) => self.api.predict(&file.name, bytes.as_ref().clone()).await,
            FileSource::Path(path) => self.api.predict_path(path).await,
        };

        // Both terminal paths stop the ticker exactly once, before the
        // state is classified.
        ticker.stop();

        match outcome {
            Ok(result) => {
                let full = {
                    let mut inner = self.inner.lock().unwrap();
                    if inner.generation != generation {
                        return Ok(inner.state.clone());
                    }
                    inner.state = UploadState::Submitting {
                        file: file.clone(),
                        progress: 100.0,
                    };
                    inner.state.clone()
                };
                self.notify(&full);

                // Let the full bar render before the result replaces it.
                tokio::time::sleep(self.display_delay).await;

                let snapshot = {
                    let mut inner = self.inner.lock().unwrap();
                    if inner.generation != generation {
                        return Ok(inner.state.clone());
                    }
                    debug!("classified {} as {}", result.filename, result.label);
                    inner.state = UploadState::Succeeded(result);
                    inner.state.clone()
                };
                self.notify(&snapshot);
                Ok(snapshot)
            }
            Err(err) => {
                let message = match &err {
                    DetectError::Network { .. } => NETWORK_FAILURE_MESSAGE.to_string(),
                    other => other.to_string(),
                };
                let snapshot = {
                    let mut inner = self.inner.lock().unwrap();
                    if inner.generation != generation {
                        return Ok(inner.state.clone());
                    }
                    warn!("submission of {} failed: {}", file.name, err);
                    inner.state = UploadState::Failed {
                        file: file.clone(),
                        error: message,
                    };
                    inner.state.clone()
                };
                self.notify(&snapshot);

                if err.requires_login() {
                    return Err(err);
                }
                Ok(snapshot)
            }
        }
    }
}

fn notify(observers: &Arc<Mutex<Vec<Observer>>>, state: &UploadState) {
    let observers = observers.lock().unwrap().clone();
    for observer in observers {
        observer(state);
    }
}
