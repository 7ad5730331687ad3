use serde::{Deserialize, Serialize};

/// Tunables for a session. The JS side may pass a partial object; anything missing takes the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Number of cards drawn by "New Set"
    pub set_size: usize,
    /// Spoken after the word in spelling mode
    pub spelling_prompt: String,
    /// Word -> spelling prompt
    pub prompt_delay_ms: f64,
    /// Spelling prompt -> microphone on
    pub listen_delay_ms: f64,
    /// Correct spelling -> next card
    pub correct_advance_delay_ms: f64,
    /// Incorrect spelling -> start fading the message
    pub incorrect_fade_delay_ms: f64,
    /// Fade start -> message cleared
    pub fade_out_ms: f64,
    /// Deck completed -> new set
    pub auto_new_set_delay_ms: f64,
    pub celebration_ms: f64,
    pub speech: SpeechSettings,
    pub success_sound_url: String,
    pub failure_sound_url: String,
    /// Fixed seed for the deck shuffles. Drawn at random when absent.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            set_size: 10,
            spelling_prompt: "Please spell the word".to_string(),
            prompt_delay_ms: 1000.0,
            listen_delay_ms: 1000.0,
            correct_advance_delay_ms: 2000.0,
            incorrect_fade_delay_ms: 1500.0,
            fade_out_ms: 500.0,
            auto_new_set_delay_ms: 5000.0,
            celebration_ms: 5000.0,
            speech: SpeechSettings::default(),
            success_sound_url: "/success.mp3".to_string(),
            failure_sound_url: "/failure.mp3".to_string(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeechSettings {
    pub lang: String,
    /// Slightly slower than normal speech
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "setSize": 5, "speech": { "lang": "en-GB" } }"#).unwrap();

        assert_eq!(config.set_size, 5);
        assert_eq!(config.speech.lang, "en-GB");
        assert_eq!(config.speech.rate, 0.8);
        assert_eq!(config.auto_new_set_delay_ms, 5000.0);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }
}
