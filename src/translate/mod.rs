//! English to Arabic translation over the text models.
//!
//! Every call goes through [`TextGenerator::complete`], so translations are
//! quota-gated like any other text call. A failed translation returns the
//! original text and is not cached; a batch where nothing translates is an
//! error.

mod cache;

pub use cache::TranslationCache;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm::prompts::translation_prompt;
use crate::llm::TextGenerator;

const SOURCE_LANG: &str = "en";
const TARGET_LANG: &str = "ar";

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Translation failed")]
    Unavailable,
}

#[derive(Clone)]
pub struct Translator {
    generator: TextGenerator,
    cache: Arc<TranslationCache>,
}

impl Translator {
    pub fn new(generator: TextGenerator) -> Self {
        Self::with_cache(generator, Arc::new(TranslationCache::default()))
    }

    pub fn with_cache(generator: TextGenerator, cache: Arc<TranslationCache>) -> Self {
        Self { generator, cache }
    }

    /// Translate one text, or return it unchanged on failure.
    pub async fn translate_to_arabic(&self, text: &str) -> String {
        match self.try_translate(text).await {
            Some(translation) => translation,
            None => {
                warn!("Translation unavailable, returning original text");
                text.to_string()
            }
        }
    }

    /// `None` when no model produced a usable translation.
    async fn try_translate(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return Some(text.to_string());
        }

        let key = TranslationCache::key(SOURCE_LANG, TARGET_LANG, text);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Using cached translation");
            return Some(cached);
        }

        let answer = self.generator.complete(&translation_prompt(text)).await?;
        let translation = answer.trim().trim_matches('"').trim().to_string();
        if translation.is_empty() {
            return None;
        }
        self.cache.insert(key, translation.clone());
        Some(translation)
    }

    /// Translate every value of a keyed content map, keeping the keys.
    ///
    /// Values that fail keep their original text; the call fails only when
    /// no non-blank value could be translated.
    pub async fn translate_content(
        &self,
        content: BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, TranslateError> {
        let (keys, values): (Vec<String>, Vec<String>) = content.into_iter().unzip();
        let translated = self.batch_translate(&values).await?;
        Ok(keys.into_iter().zip(translated).collect())
    }

    /// Translate a list, calling the model once per distinct text.
    pub async fn batch_translate(&self, texts: &[String]) -> Result<Vec<String>, TranslateError> {
        let mut out = Vec::with_capacity(texts.len());
        let mut attempted = 0usize;
        let mut failed = 0usize;
        for text in texts {
            if text.trim().is_empty() {
                out.push(text.clone());
                continue;
            }
            attempted += 1;
            match self.try_translate(text).await {
                Some(translation) => out.push(translation),
                None => {
                    failed += 1;
                    out.push(text.clone());
                }
            }
        }

        if attempted > 0 && failed == attempted {
            warn!("All {} translations failed", attempted);
            return Err(TranslateError::Unavailable);
        }
        Ok(out)
    }
}
