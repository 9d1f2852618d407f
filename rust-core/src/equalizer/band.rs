//! Frequency bands and equalization schemes
//!
//! Bands are validated once at construction (and on deserialization), so
//! the equalizer never re-checks them.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

use crate::error::{Result, SpectralError};

/// Linear gain applied to `[start_hz, end_hz)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBand")]
pub struct FrequencyBand {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    start_hz: f64,
    end_hz: f64,
    scale_factor: f64,
}

/// Unvalidated wire form; accepts the front-end and legacy key names
#[derive(Deserialize)]
struct RawBand {
    #[serde(default)]
    label: Option<String>,
    #[serde(alias = "start_frequency", alias = "freq_start_hz")]
    start_hz: f64,
    #[serde(alias = "end_frequency", alias = "freq_end_hz")]
    end_hz: f64,
    #[serde(alias = "scale_value")]
    scale_factor: f64,
}

impl TryFrom<RawBand> for FrequencyBand {
    type Error = SpectralError;

    fn try_from(raw: RawBand) -> Result<Self> {
        let band = FrequencyBand::new(raw.start_hz, raw.end_hz, raw.scale_factor)?;
        Ok(match raw.label {
            Some(label) => band.with_label(label),
            None => band,
        })
    }
}

impl FrequencyBand {
    /// Create a band
    ///
    /// Requires finite values, `start_hz < end_hz` and `scale_factor >= 0`.
    /// Frequencies outside [0, Nyquist] are accepted and clamped when applied.
    pub fn new(start_hz: f64, end_hz: f64, scale_factor: f64) -> Result<Self> {
        let invalid = |reason| SpectralError::InvalidBand {
            start_hz,
            end_hz,
            scale_factor,
            reason,
        };

        if !(start_hz.is_finite() && end_hz.is_finite() && scale_factor.is_finite()) {
            return Err(invalid("values must be finite"));
        }
        if start_hz >= end_hz {
            return Err(invalid("start must be below end"));
        }
        if scale_factor < 0.0 {
            return Err(invalid("scale factor must be non-negative"));
        }

        Ok(Self {
            label: None,
            start_hz,
            end_hz,
            scale_factor,
        })
    }

    /// Attach a display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn start_hz(&self) -> f64 {
        self.start_hz
    }

    pub fn end_hz(&self) -> f64 {
        self.end_hz
    }

    /// Linear amplitude multiplier (not dB)
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

/// Ordered list of bands; overlapping bands compound in list order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FrequencyBand>", into = "Vec<FrequencyBand>")]
pub struct EqualizationScheme {
    bands: Vec<FrequencyBand>,
}

impl TryFrom<Vec<FrequencyBand>> for EqualizationScheme {
    type Error = SpectralError;

    fn try_from(bands: Vec<FrequencyBand>) -> Result<Self> {
        Self::new(bands)
    }
}

impl From<EqualizationScheme> for Vec<FrequencyBand> {
    fn from(scheme: EqualizationScheme) -> Self {
        scheme.bands
    }
}

impl EqualizationScheme {
    /// Create a scheme; an empty band list is rejected
    pub fn new(bands: Vec<FrequencyBand>) -> Result<Self> {
        if bands.is_empty() {
            return Err(SpectralError::InvalidInput(
                "equalization scheme has no bands".into(),
            ));
        }
        Ok(Self { bands })
    }

    /// Single band with one gain
    pub fn single(start_hz: f64, end_hz: f64, scale_factor: f64) -> Result<Self> {
        Self::new(vec![FrequencyBand::new(start_hz, end_hz, scale_factor)?])
    }

    /// Flat starting scheme for an equalizer mode
    pub fn preset(mode: &EqualizerMode) -> Self {
        let band = |label: String, start, end| FrequencyBand {
            label: Some(label),
            start_hz: start,
            end_hz: end,
            scale_factor: 1.0,
        };

        let bands = match mode {
            EqualizerMode::Generic => vec![band("Generic Band 1".into(), 20.0, 1000.0)],
            EqualizerMode::Musical => vec![
                band("Bass (20-250 Hz)".into(), 20.0, 250.0),
                band("Vocals/Mid (250-4k Hz)".into(), 250.0, 4000.0),
                band("Treble (4k-20k Hz)".into(), 4000.0, 20000.0),
            ],
            EqualizerMode::Custom(name) => {
                vec![band(format!("{} Band", title_case(name)), 20.0, 5000.0)]
            }
        };

        Self { bands }
    }

    pub fn bands(&self) -> &[FrequencyBand] {
        &self.bands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyBand> {
        self.bands.iter()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl<'a> IntoIterator for &'a EqualizationScheme {
    type Item = &'a FrequencyBand;
    type IntoIter = std::slice::Iter<'a, FrequencyBand>;

    fn into_iter(self) -> Self::IntoIter {
        self.bands.iter()
    }
}

/// Equalizer mode offered to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EqualizerMode {
    Generic,
    Musical,
    Custom(String),
}

impl EqualizerMode {
    /// Display label ("Generic", "Musical", title-cased custom name)
    pub fn label(&self) -> String {
        match self {
            EqualizerMode::Generic => "Generic".into(),
            EqualizerMode::Musical => "Musical".into(),
            EqualizerMode::Custom(name) => title_case(name),
        }
    }
}

impl FromStr for EqualizerMode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "generic" => EqualizerMode::Generic,
            "musical" => EqualizerMode::Musical,
            other => EqualizerMode::Custom(other.to_string()),
        })
    }
}

fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
