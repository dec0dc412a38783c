//! Word-by-word glossary transform.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{TextTransform, TransformError, TransformRequest};

/// Entries for one translation direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlossaryPair {
  pub source: String,
  pub target: String,
  pub entries: BTreeMap<String, String>,
}

/// Glossary file contents (JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Glossary {
  pub pairs: Vec<GlossaryPair>,
}

impl Glossary {
  /// Loads a glossary from a JSON file.
  pub fn load(path: &Path) -> Result<Glossary, std::io::Error> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
  }
}

/// Translates text word by word through a glossary. Unknown words pass through unchanged.
///
/// Every pair is also usable in the reverse direction unless the glossary declares that direction
/// explicitly.
#[derive(Debug, Clone)]
pub struct GlossaryTransform {
  tables: HashMap<(String, String), HashMap<String, String>>,
}

impl GlossaryTransform {
  pub fn new(glossary: Glossary) -> Self {
    let mut tables: HashMap<(String, String), HashMap<String, String>> = HashMap::new();
    for pair in &glossary.pairs {
      let forward: HashMap<String, String> = pair
        .entries
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect();
      tables.insert((pair.source.clone(), pair.target.clone()), forward);
    }
    for pair in &glossary.pairs {
      let key = (pair.target.clone(), pair.source.clone());
      if tables.contains_key(&key) {
        continue;
      }
      let reverse: HashMap<String, String> = pair
        .entries
        .iter()
        .map(|(k, v)| (v.to_lowercase(), k.clone()))
        .collect();
      tables.insert(key, reverse);
    }
    Self { tables }
  }

  /// Small English/Japanese glossary used when nothing else is configured.
  pub fn builtin() -> Self {
    let entries = [
      ("hello", "こんにちは"),
      ("world", "世界"),
      ("good", "良い"),
      ("morning", "朝"),
      ("night", "夜"),
      ("cat", "猫"),
      ("dog", "犬"),
      ("water", "水"),
      ("book", "本"),
      ("thanks", "ありがとう"),
    ];
    Self::new(Glossary {
      pairs: vec![GlossaryPair {
        source: "en".to_string(),
        target: "ja".to_string(),
        entries: entries
          .iter()
          .map(|(k, v)| (k.to_string(), v.to_string()))
          .collect(),
      }],
    })
  }

  pub fn supports(&self, request: &TransformRequest) -> bool {
    request.source == request.target
      || self
        .tables
        .contains_key(&(request.source.clone(), request.target.clone()))
  }

  fn translate_word(table: &HashMap<String, String>, word: &str) -> String {
    table
      .get(&word.to_lowercase())
      .cloned()
      .unwrap_or_else(|| word.to_string())
  }
}

#[async_trait]
impl TextTransform for GlossaryTransform {
  fn name(&self) -> &str {
    "glossary"
  }

  #[instrument(level = "trace", skip(self, text), fields(request = %request))]
  async fn transform(
    &self,
    text: &str,
    request: &TransformRequest,
  ) -> Result<String, TransformError> {
    if request.source == request.target {
      return Ok(text.to_string());
    }
    let table = self
      .tables
      .get(&(request.source.clone(), request.target.clone()))
      .ok_or_else(|| TransformError::Unavailable(format!("no glossary for {}", request)))?;
    let lines: Vec<String> = text
      .lines()
      .map(|line| {
        line
          .split_whitespace()
          .map(|w| Self::translate_word(table, w))
          .collect::<Vec<_>>()
          .join(" ")
      })
      .collect();
    Ok(lines.join("\n"))
  }
}
