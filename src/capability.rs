use std::fmt;

use serde::Deserialize;

/// One of the four conversions every backend has to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionCapability {
    /// Romaji to kana; lower case yields hiragana, upper case katakana.
    ToTargetScript,
    ToHiragana,
    ToKatakana,
    ToRomanizedForm,
}

impl ConversionCapability {
    pub const ALL: [ConversionCapability; 4] = [
        ConversionCapability::ToTargetScript,
        ConversionCapability::ToHiragana,
        ConversionCapability::ToKatakana,
        ConversionCapability::ToRomanizedForm,
    ];

    /// Name of the underlying function under the given naming convention.
    pub fn function_name(self, naming: NamingConvention) -> &'static str {
        match (self, naming) {
            (ConversionCapability::ToTargetScript, NamingConvention::Snake) => "to_kana",
            (ConversionCapability::ToTargetScript, NamingConvention::Camel) => "toKana",
            (ConversionCapability::ToHiragana, NamingConvention::Snake) => "to_hiragana",
            (ConversionCapability::ToHiragana, NamingConvention::Camel) => "toHiragana",
            (ConversionCapability::ToKatakana, NamingConvention::Snake) => "to_katakana",
            (ConversionCapability::ToKatakana, NamingConvention::Camel) => "toKatakana",
            (ConversionCapability::ToRomanizedForm, NamingConvention::Snake) => "to_romaji",
            (ConversionCapability::ToRomanizedForm, NamingConvention::Camel) => "toRomaji",
        }
    }

    /// True when the output is Latin text rather than kana.
    pub fn produces_latin(self) -> bool {
        matches!(self, ConversionCapability::ToRomanizedForm)
    }
}

impl fmt::Display for ConversionCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name(NamingConvention::Snake))
    }
}

/// How an implementation spells its exported function names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    #[default]
    Snake,
    Camel,
}
