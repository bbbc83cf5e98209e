//! Page configuration. Every field has a default, so an empty JSON object is a
//! valid configuration.

use crate::error::PageError;
use crate::particles::ParticleStyle;
use crate::speech::Utterance;
use crate::timers::ClearPolicy;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum OverlayOnClick {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PageConfig {
    pub particle_style: ParticleStyle,
    pub overlay_on_click: OverlayOnClick,
    pub clear_policy: ClearPolicy,
    pub utterance: Utterance,
    pub heading: String,
    pub portrait_src: String,
    pub portrait_alt: String,
    pub overlay_glyph: String,
    pub cursor_glyph: String,
    /// Fixed RNG seed for reproducible bursts; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            particle_style: ParticleStyle::default(),
            overlay_on_click: OverlayOnClick::default(),
            clear_policy: ClearPolicy::default(),
            utterance: Utterance::default(),
            heading: "ANTONIN SCALIA".to_string(),
            portrait_src: "assets/scalia.jpg".to_string(),
            portrait_alt: "Official portrait of Antonin Scalia".to_string(),
            overlay_glyph: "🕶️".to_string(),
            cursor_glyph: "🔫".to_string(),
            seed: None,
        }
    }
}

impl PageConfig {
    /// Range limits follow what `SpeechSynthesisUtterance` accepts.
    pub fn validate(&self) -> Result<(), PageError> {
        let u = &self.utterance;
        if u.text.trim().is_empty() {
            return Err(PageError::InvalidConfig("utterance text is empty".into()));
        }
        if !(0.0..=2.0).contains(&u.pitch) {
            return Err(PageError::InvalidConfig(format!(
                "pitch {} outside [0, 2]",
                u.pitch
            )));
        }
        if !(0.1..=10.0).contains(&u.rate) {
            return Err(PageError::InvalidConfig(format!(
                "rate {} outside [0.1, 10]",
                u.rate
            )));
        }
        if !(0.0..=1.0).contains(&u.volume) {
            return Err(PageError::InvalidConfig(format!(
                "volume {} outside [0, 1]",
                u.volume
            )));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let cfg: PageConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
