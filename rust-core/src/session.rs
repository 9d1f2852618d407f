//! Keyed store of per-signal working state
//!
//! A session is created when a signal is loaded, updated on every
//! equalization, and removed explicitly or evicted oldest-first once the
//! store is full. The store itself is not synchronized; share it behind a
//! `Mutex` when several request handlers need it.

use log::{debug, info};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

use crate::equalizer::{EqualizationScheme, EqualizerConfig, MirrorMode};
use crate::error::{Result, SpectralError};
use crate::signal::Signal;
use crate::spectrum::analysis::{analyze, SpectrumComponents};
use crate::spectrum::fft::{forward_transform_real, inverse_transform_real};
use crate::spectrum::spectrogram::{SpectrogramConfig, SpectrogramGenerator, SpectrogramMatrix};

/// Opaque handle to a stored session
pub type SignalId = Uuid;

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of live sessions; 0 means unbounded
    pub capacity: usize,

    pub mirror_mode: MirrorMode,
}

impl StoreConfig {
    pub fn equalizer(&self) -> EqualizerConfig {
        EqualizerConfig {
            mirror_mode: self.mirror_mode,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            mirror_mode: MirrorMode::Hermitian,
        }
    }
}

/// Working state of one loaded signal
#[derive(Debug, Clone)]
pub struct SignalSession {
    original: Signal,
    original_spectrum: Vec<Complex64>,
    current_spectrum: Vec<Complex64>,
    current: Signal,
}

/// Visualization data for the current state of a session
#[derive(Debug, Clone)]
pub struct SpectralSnapshot {
    pub components: SpectrumComponents,
    pub spectrogram: SpectrogramMatrix,
}

impl SignalSession {
    fn new(signal: Signal) -> Self {
        let spectrum = forward_transform_real(signal.samples());
        Self {
            current: signal.clone(),
            original: signal,
            current_spectrum: spectrum.clone(),
            original_spectrum: spectrum,
        }
    }

    pub fn original(&self) -> &Signal {
        &self.original
    }

    pub fn original_spectrum(&self) -> &[Complex64] {
        &self.original_spectrum
    }

    pub fn current_spectrum(&self) -> &[Complex64] {
        &self.current_spectrum
    }

    /// Current output signal, same length as the original
    pub fn current(&self) -> &Signal {
        &self.current
    }

    pub fn sample_rate(&self) -> u32 {
        self.original.sample_rate()
    }

    /// Analyzer output of the current spectrum plus the current spectrogram
    pub fn snapshot(&self, config: &SpectrogramConfig) -> Result<SpectralSnapshot> {
        let components = analyze(&self.current_spectrum, self.sample_rate())?;
        let generator = SpectrogramGenerator::new(config.clone())?;

        Ok(SpectralSnapshot {
            components,
            spectrogram: generator.compute(self.current.samples()),
        })
    }

    /// Re-derive the current state from the original spectrum
    fn apply(&mut self, scheme: &EqualizationScheme, equalizer: EqualizerConfig) -> Result<()> {
        let rate = self.sample_rate();
        let spectrum = equalizer.apply(&self.original_spectrum, rate, scheme)?;

        let mut samples = inverse_transform_real(&spectrum);
        samples.truncate(self.original.len());

        self.current = Signal::new(samples, rate)?;
        self.current_spectrum = spectrum;
        Ok(())
    }

    fn reset(&mut self) {
        self.current = self.original.clone();
        self.current_spectrum = self.original_spectrum.clone();
    }
}

/// Bounded map from signal id to session
#[derive(Debug, Default)]
pub struct SignalStore {
    config: StoreConfig,
    sessions: HashMap<SignalId, SignalSession>,
    /// Creation order, oldest first
    order: VecDeque<SignalId>,
}

impl SignalStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Transform `signal` and store it under a fresh id
    pub fn create(&mut self, signal: Signal) -> SignalId {
        let id = Uuid::new_v4();
        debug!(
            "creating session {} ({} samples at {} Hz)",
            id,
            signal.len(),
            signal.sample_rate()
        );

        self.sessions.insert(id, SignalSession::new(signal));
        self.order.push_back(id);
        self.evict_over_capacity();
        id
    }

    pub fn get(&self, id: &SignalId) -> Result<&SignalSession> {
        self.sessions
            .get(id)
            .ok_or_else(|| SpectralError::UnknownSignal(id.to_string()))
    }

    /// Equalize the original spectrum of `id` and make it the current state
    ///
    /// Schemes do not accumulate: each call starts from the original.
    pub fn equalize(&mut self, id: &SignalId, scheme: &EqualizationScheme) -> Result<&SignalSession> {
        let equalizer = self.config.equalizer();
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SpectralError::UnknownSignal(id.to_string()))?;

        session.apply(scheme, equalizer)?;
        debug!("session {} equalized with {} bands", id, scheme.len());
        Ok(session)
    }

    /// Restore the current state of `id` to the original signal
    pub fn reset(&mut self, id: &SignalId) -> Result<()> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SpectralError::UnknownSignal(id.to_string()))?;
        session.reset();
        Ok(())
    }

    /// Drop a session, returning it if it existed
    pub fn remove(&mut self, id: &SignalId) -> Option<SignalSession> {
        let session = self.sessions.remove(id)?;
        self.order.retain(|other| other != id);
        Some(session)
    }

    pub fn contains(&self, id: &SignalId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn evict_over_capacity(&mut self) {
        if self.config.capacity == 0 {
            return;
        }
        while self.sessions.len() > self.config.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    info!("evicting session {}", oldest);
                    self.sessions.remove(&oldest);
                }
                None => break,
            }
        }
    }
}
