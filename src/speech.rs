//! Spoken line played on every click through the Web Speech API.

use crate::error::PageError;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Utterance {
    pub text: String,
    pub pitch: f32,
    pub rate: f32, // slower than normal to stretch the syllables
    pub volume: f32,
    /// BCP 47 tag of the voice to prefer, e.g. "en-GB".
    pub preferred_lang: String,
}

impl Default for Utterance {
    fn default() -> Self {
        Self {
            text: "Skah-leee-ahh".to_string(),
            pitch: 0.8,
            rate: 0.7,
            volume: 1.0,
            preferred_lang: "en-GB".to_string(),
        }
    }
}

/// Index of the voice to use: first exact language match, else the first
/// voice, else none (browser default).
pub fn pick_voice<S: AsRef<str>>(langs: &[S], preferred: &str) -> Option<usize> {
    langs
        .iter()
        .position(|l| l.as_ref() == preferred)
        .or(if langs.is_empty() { None } else { Some(0) })
}

pub trait Speaker {
    /// Fire-and-forget; success only means the request was queued.
    fn speak(&mut self, utterance: &Utterance) -> Result<(), PageError>;
}

/// Speaker that never says anything.
#[derive(Debug, Default)]
pub struct Silent;

impl Speaker for Silent {
    fn speak(&mut self, _utterance: &Utterance) -> Result<(), PageError> {
        Ok(())
    }
}

/// `window.speechSynthesis` backed speaker.
#[derive(Debug, Default)]
pub struct WebSpeech;

impl WebSpeech {
    fn synth() -> Result<web_sys::SpeechSynthesis, PageError> {
        use wasm_bindgen::JsValue;

        let win = web_sys::window().ok_or(PageError::NoWindow)?;
        let supported =
            js_sys::Reflect::has(&win, &JsValue::from_str("speechSynthesis")).unwrap_or(false);
        if !supported {
            return Err(PageError::SpeechUnavailable);
        }
        win.speech_synthesis()
            .map_err(|_| PageError::SpeechUnavailable)
    }

    /// Some browsers populate the voice list lazily; ask once at mount so the
    /// first click can already pick a regional voice.
    pub fn prime_voices() {
        if let Ok(synth) = Self::synth() {
            let _ = synth.get_voices();
        }
    }
}

impl Speaker for WebSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), PageError> {
        use wasm_bindgen::JsCast;
        use web_sys::{SpeechSynthesisUtterance, SpeechSynthesisVoice};

        let synth = Self::synth()?;
        let utter = SpeechSynthesisUtterance::new_with_text(&utterance.text)?;

        let voices: Vec<SpeechSynthesisVoice> = synth
            .get_voices()
            .iter()
            .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
            .collect();
        let langs: Vec<String> = voices.iter().map(|v| v.lang()).collect();
        if let Some(idx) = pick_voice(&langs, &utterance.preferred_lang) {
            utter.set_voice(voices.get(idx));
        }
        utter.set_pitch(utterance.pitch);
        utter.set_rate(utterance.rate);
        utter.set_volume(utterance.volume);

        synth.speak(&utter);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_utterance() {
        let u = Utterance::default();
        assert_eq!(u.text, "Skah-leee-ahh");
        assert_eq!((u.pitch, u.rate, u.volume), (0.8, 0.7, 1.0));
        assert_eq!(u.preferred_lang, "en-GB");
    }

    #[test]
    fn test_pick_voice_prefers_exact_lang() {
        let langs = ["en-US", "de-DE", "en-GB", "en-GB"];
        assert_eq!(pick_voice(&langs, "en-GB"), Some(2));
    }

    #[test]
    fn test_pick_voice_falls_back_to_first() {
        let langs = vec!["fr-FR".to_string(), "en-US".to_string()];
        assert_eq!(pick_voice(&langs, "en-GB"), Some(0));
        let none: [&str; 0] = [];
        assert_eq!(pick_voice(&none, "en-GB"), None);
    }
}
