//! KeywordDesignGenerator - キーワードマッチによる設計案の mock
//!
//! 固定の基本資材リストに、説明文のキーワード（大文字小文字無視）に応じた
//! 追加行を足すだけ。乱数も外部呼び出しもない。

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use crate::domain::{Design, NexaResult};
use crate::ports::DesignGenerator;

pub const DESIGN_TITLE: &str = "Engineered Design v1 (mock)";
pub const EMPTY_DESCRIPTION: &str = "No description provided";
pub const DESIGN_NOTES: &str =
    "Demo output. Wire to O-Calc/engineering service for real structural calcs and BOM.";

pub const BASE_MATERIALS: [&str; 5] = [
    "1x Pole, Wood Class 2, 45 ft",
    "3x Insulators, Polymer",
    "120 ft #2 ACSR Conductor",
    "1x Grounding Kit",
    "Hardware set (bolts, braces, lugs)",
];

struct KeywordRule {
    pattern: Regex,
    material: &'static str,
}

/// 追加ルール。順番どおりに評価し、マッチしたものを 1 回だけ足す。
static RULES: LazyLock<Vec<KeywordRule>> = LazyLock::new(|| {
    [
        ("transformer", "1x 25 kVA Pole-mount Transformer"),
        ("splice|repair", "1x Splice kit (#2 ACSR)"),
        ("crossarm", "1x Crossarm Kit"),
    ]
    .into_iter()
    .map(|(pattern, material)| KeywordRule {
        pattern: RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("keyword patterns are valid literals"),
        material,
    })
    .collect()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordDesignGenerator;

impl KeywordDesignGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core, shared by the trait impl.
    pub fn design_for(&self, description: &str) -> Design {
        let trimmed = description.trim();
        let mut materials: Vec<String> = BASE_MATERIALS.iter().map(|m| m.to_string()).collect();
        materials.extend(
            RULES
                .iter()
                .filter(|rule| rule.pattern.is_match(trimmed))
                .map(|rule| rule.material.to_string()),
        );
        Design {
            title: DESIGN_TITLE.to_string(),
            description: if trimmed.is_empty() {
                EMPTY_DESCRIPTION.to_string()
            } else {
                trimmed.to_string()
            },
            materials,
            notes: DESIGN_NOTES.to_string(),
        }
    }
}

#[async_trait]
impl DesignGenerator for KeywordDesignGenerator {
    async fn generate(&self, description: &str) -> NexaResult<Design> {
        Ok(self.design_for(description))
    }
}
