use wana_kana::ConvertJapanese;

use super::{Backend, BackendError};
use crate::capability::ConversionCapability;

/// In-process calls into the `wana_kana` crate.
pub struct WanaKanaBackend {
    label: String,
}

impl WanaKanaBackend {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for WanaKanaBackend {
    fn default() -> Self {
        Self::new("rust")
    }
}

impl Backend for WanaKanaBackend {
    fn label(&self) -> &str {
        &self.label
    }

    fn invoke(
        &mut self,
        capability: ConversionCapability,
        input: &str,
    ) -> Result<String, BackendError> {
        let output = match capability {
            ConversionCapability::ToTargetScript => input.to_kana(),
            ConversionCapability::ToHiragana => input.to_hiragana(),
            ConversionCapability::ToKatakana => input.to_katakana(),
            ConversionCapability::ToRomanizedForm => input.to_romaji(),
        };
        Ok(output)
    }
}
