use std::collections::HashMap;
use std::fs;
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::providers::{TranslationRequest, Translator};

/// How a [`TranslationTable`] finds the translation of a segment
#[derive(Debug, Clone)]
enum Lookup {
    /// `translations[i]` translates segment `i`; `None` marks a gap
    ByIndex(Vec<Option<String>>),
    /// Source text to translated text
    ByText(HashMap<String, String>),
}

/// Translations produced ahead of time by an external translator.
///
/// Accepts either a JSON array (one entry per segment, `null` for gaps) or a
/// JSON object mapping source text to its translation.
#[derive(Debug, Clone)]
pub struct TranslationTable {
    lookup: Lookup,
}

impl TranslationTable {
    pub fn by_index(translations: Vec<Option<String>>) -> Self {
        Self { lookup: Lookup::ByIndex(translations) }
    }

    pub fn by_text(translations: HashMap<String, String>) -> Self {
        Self { lookup: Lookup::ByText(translations) }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).context("Failed to parse translations JSON")?;

        match value {
            Value::Array(items) => Ok(Self::by_index(
                items.into_iter().map(|v| v.as_str().map(str::to_string)).collect(),
            )),
            Value::Object(map) => Ok(Self::by_text(
                map.into_iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.trim().to_string(), s.to_string())))
                    .collect(),
            )),
            _ => Err(anyhow!("Translations must be a JSON array or object")),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read translations: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        match &self.lookup {
            Lookup::ByIndex(items) => items.len(),
            Lookup::ByText(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Translator for TranslationTable {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let found = match &self.lookup {
            Lookup::ByIndex(items) => items.get(request.index).cloned().flatten(),
            Lookup::ByText(map) => map.get(request.text.trim()).cloned(),
        };

        found.ok_or_else(|| ProviderError::MissingTranslation(request.text.clone()))
    }

    fn name(&self) -> &str {
        "translation-table"
    }
}

/// Returns every text unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        Ok(request.text.clone())
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}
