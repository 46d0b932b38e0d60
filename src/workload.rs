//! The fixed sequence of conversions replayed against every backend.

use crate::capability::ConversionCapability;

/// Number of times the workload is replayed inside one timing scope.
pub const ITERATIONS: u64 = 1000;

const ROMAJI_LOWER: &str = "aiueosashisusesonaninunenokakikukeko";
const ROMAJI_UPPER: &str = "AIUEOSASHISUSESONANINUNENOKAKIKUKEKO";
const HIRAGANA: &str = "あいうえおさしすせそなにぬねのかきくけこ";
const KATAKANA: &str = "アイウエオサシスセソナニヌネノカキクケコ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadItem {
    pub capability: ConversionCapability,
    pub input: String,
}

impl WorkloadItem {
    pub fn new(capability: ConversionCapability, input: impl Into<String>) -> Self {
        Self {
            capability,
            input: input.into(),
        }
    }
}

/// Ordered, read-only list of [`WorkloadItem`]s.
///
/// There is no mutable access once a workload is built, so every backend
/// sees exactly the same calls in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    items: Vec<WorkloadItem>,
}

impl Workload {
    /// The comparison workload: each capability with a Latin and a kana input.
    pub fn standard() -> Self {
        use ConversionCapability::*;
        Self::from_items(vec![
            WorkloadItem::new(ToTargetScript, ROMAJI_LOWER),
            WorkloadItem::new(ToTargetScript, ROMAJI_UPPER),
            WorkloadItem::new(ToHiragana, ROMAJI_LOWER),
            WorkloadItem::new(ToHiragana, KATAKANA),
            WorkloadItem::new(ToKatakana, ROMAJI_LOWER),
            WorkloadItem::new(ToKatakana, HIRAGANA),
            WorkloadItem::new(ToRomanizedForm, HIRAGANA),
            WorkloadItem::new(ToRomanizedForm, KATAKANA),
        ])
    }

    pub fn from_items(items: Vec<WorkloadItem>) -> Self {
        Self { items }
    }

    pub fn get(&self) -> &[WorkloadItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Workload {
    fn default() -> Self {
        Self::standard()
    }
}
