// src/extractors/bert_ner.rs
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use serde::Deserialize;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::Tokenizer;

use crate::extractors::entities::{Entity, EntityLabel, EntityRecognizer};
use crate::utils::error::ModelError;

// --- Constants ---
const MAX_SEQUENCE_TOKENS: usize = 512;
// Lines are packed into chunks of at most this many bytes, which keeps
// typical resume text well under the model's token window.
const CHUNK_BYTES: usize = 1200;

/// The parts of a token-classification `config.json` the BERT config does not cover.
#[derive(Debug, Deserialize)]
struct ClassifierConfig {
    hidden_size: usize,
    id2label: HashMap<String, String>,
}

/// One classified sub-word token, offsets relative to its chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTag<'a> {
    pub tag: &'a str,
    pub start: usize,
    pub end: usize,
    /// Continues the previous token's word ("##son").
    pub continuation: bool,
}

/// BERT token classifier (BIO tagging) running on CPU via candle.
pub struct BertNerRecognizer {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

impl BertNerRecognizer {
    /// Fetches (or reuses the cached copy of) a model from the Hugging Face hub.
    pub fn from_hub(model_id: &str) -> Result<Self, ModelError> {
        tracing::info!("Loading NER model '{}'", model_id);
        let api = hf_hub::api::sync::Api::new()?;
        let repo = api.model(model_id.to_string());

        let config_path = repo.get("config.json")?;
        let weights_path = repo.get("model.safetensors")?;
        let tokenizer = match repo.get("tokenizer.json") {
            Ok(path) => Tokenizer::from_file(&path).map_err(|e| ModelError::Tokenizer(e.to_string()))?,
            Err(e) => {
                tracing::debug!("No tokenizer.json for '{}' ({}), building from vocab.txt", model_id, e);
                wordpiece_tokenizer(&repo.get("vocab.txt")?)?
            }
        };

        Self::load(&config_path, &weights_path, tokenizer)
    }

    fn load(config_path: &Path, weights_path: &Path, tokenizer: Tokenizer) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(config_path)?;
        let bert_config: BertConfig = serde_json::from_str(&raw)?;
        let classifier_config: ClassifierConfig = serde_json::from_str(&raw)?;
        let labels = label_table(&classifier_config.id2label);

        let device = Device::Cpu;
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? };
        let model = BertModel::load(vb.pp("bert"), &bert_config)?;
        let classifier = candle_nn::linear(classifier_config.hidden_size, labels.len(), vb.pp("classifier"))?;

        tracing::info!("NER model ready ({} labels)", labels.len());
        Ok(Self { model, classifier, tokenizer, labels, device })
    }

    /// Tags one chunk and returns its entities with chunk-relative offsets.
    fn tag_chunk(&self, chunk: &str) -> Result<Vec<Entity>, ModelError> {
        let encoding = self
            .tokenizer
            .encode(chunk, true)
            .map_err(|e| ModelError::Tokenizer(e.to_string()))?;

        let len = encoding.get_ids().len().min(MAX_SEQUENCE_TOKENS);
        if len == 0 {
            return Ok(Vec::new());
        }
        let input_ids = Tensor::new(&encoding.get_ids()[..len], &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = input_ids.ones_like()?;

        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let predictions = self
            .classifier
            .forward(&hidden)?
            .squeeze(0)?
            .argmax(D::Minus1)?
            .to_vec1::<u32>()?;

        let offsets = encoding.get_offsets();
        let special = encoding.get_special_tokens_mask();
        let word_ids = encoding.get_word_ids();

        let mut tags = Vec::with_capacity(len);
        for i in 0..len {
            if special[i] == 1 {
                continue;
            }
            let tag = self.labels.get(predictions[i] as usize).map(String::as_str).unwrap_or("O");
            let continuation = i > 0 && word_ids[i].is_some() && word_ids[i] == word_ids[i - 1];
            tags.push(TokenTag { tag, start: offsets[i].0, end: offsets[i].1, continuation });
        }

        Ok(group_tags(chunk, &tags))
    }
}

impl EntityRecognizer for BertNerRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        for (base, chunk) in chunk_spans(text, CHUNK_BYTES) {
            match self.tag_chunk(chunk) {
                Ok(found) => entities.extend(found.into_iter().map(|mut e| {
                    e.start += base;
                    e.end += base;
                    e
                })),
                Err(e) => tracing::warn!("NER failed on chunk at byte {}: {}", base, e),
            }
        }
        tracing::debug!("NER model found {} entities", entities.len());
        entities
    }
}

/// Cased BERT WordPiece tokenizer for repos that ship only `vocab.txt`.
fn wordpiece_tokenizer(vocab_path: &Path) -> Result<Tokenizer, ModelError> {
    let vocab = vocab_path
        .to_str()
        .ok_or_else(|| ModelError::Tokenizer(format!("non UTF-8 path {}", vocab_path.display())))?;
    let wordpiece = WordPiece::from_file(vocab)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| ModelError::Tokenizer(e.to_string()))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    let special_id = |token: &str| {
        tokenizer
            .token_to_id(token)
            .ok_or_else(|| ModelError::Tokenizer(format!("'{}' missing from vocabulary", token)))
    };
    let (cls, sep) = (special_id("[CLS]")?, special_id("[SEP]")?);

    tokenizer
        .with_normalizer(Some(BertNormalizer::new(true, true, None, false)))
        .with_pre_tokenizer(Some(BertPreTokenizer))
        .with_post_processor(Some(BertProcessing::new(("[SEP]".to_string(), sep), ("[CLS]".to_string(), cls))));
    Ok(tokenizer)
}

/// Orders `id2label` by numeric id. Gaps are filled with "O".
fn label_table(id2label: &HashMap<String, String>) -> Vec<String> {
    let indexed: Vec<(usize, &String)> = id2label
        .iter()
        .filter_map(|(id, label)| id.parse::<usize>().ok().map(|i| (i, label)))
        .collect();
    let size = indexed.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
    let mut labels = vec!["O".to_string(); size];
    for (i, label) in indexed {
        labels[i] = label.clone();
    }
    labels
}

fn entity_label(kind: &str) -> Option<EntityLabel> {
    match kind {
        "PER" | "PERSON" => Some(EntityLabel::Person),
        "ORG" => Some(EntityLabel::Organization),
        "LOC" | "GPE" => Some(EntityLabel::Location),
        "MISC" => Some(EntityLabel::Misc),
        _ => None,
    }
}

/// Splits text into line-aligned chunks of at most `max_bytes` each, with
/// their byte offsets. A single longer line gets a chunk of its own.
pub fn chunk_spans(text: &str, max_bytes: usize) -> Vec<(usize, &str)> {
    let mut chunks = Vec::new();
    let (mut start, mut end) = (0, 0);
    for line in text.split_inclusive('\n') {
        if end > start && end - start + line.len() > max_bytes {
            chunks.push((start, &text[start..end]));
            start = end;
        }
        end += line.len();
    }
    if end > start {
        chunks.push((start, &text[start..end]));
    }
    chunks
}

/// Merges BIO token tags into entity spans over `text`.
///
/// `B-X` opens a span, `I-X` extends a span of the same kind (or opens one),
/// and word-piece continuations always follow the word they belong to.
pub fn group_tags(text: &str, tags: &[TokenTag]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut open: Option<(EntityLabel, usize, usize)> = None;

    let mut close = |open: &mut Option<(EntityLabel, usize, usize)>| {
        if let Some((label, start, end)) = open.take() {
            entities.push(Entity { text: text[start..end].to_string(), label, start, end });
        }
    };

    for token in tags {
        if token.continuation {
            if let Some((_, _, end)) = open.as_mut() {
                *end = token.end;
            }
            continue;
        }

        let (prefix, kind) = token.tag.split_once('-').unwrap_or(("O", ""));
        match (prefix, entity_label(kind)) {
            ("I", Some(label)) if matches!(open, Some((l, _, _)) if l == label) => {
                if let Some((_, _, end)) = open.as_mut() {
                    *end = token.end;
                }
            }
            ("B" | "I", Some(label)) => {
                close(&mut open);
                open = Some((label, token.start, token.end));
            }
            _ => close(&mut open),
        }
    }
    close(&mut open);
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(tag: &'static str, start: usize, end: usize) -> TokenTag<'static> {
        TokenTag { tag, start, end, continuation: false }
    }

    #[test]
    fn test_bio_tags_grouped_into_person() {
        let text = "JOHN SMITH\nDeveloper";
        let tags = [tag("B-PER", 0, 4), tag("I-PER", 5, 10), tag("O", 11, 20)];
        let entities = group_tags(text, &tags);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "JOHN SMITH");
        assert_eq!(entities[0].label, EntityLabel::Person);
    }

    #[test]
    fn test_word_piece_continuation_extends_entity() {
        let text = "Kwame Mensah";
        let mut tags = vec![tag("B-PER", 0, 3), tag("I-PER", 3, 5), tag("I-PER", 6, 12)];
        tags[1].continuation = true;
        let entities = group_tags(text, &tags);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Kwame Mensah");
    }

    #[test]
    fn test_kind_change_and_new_begin_split_entities() {
        let text = "Jane Roe Acme Labs";
        let tags = [tag("B-PER", 0, 4), tag("I-PER", 5, 8), tag("I-ORG", 9, 13), tag("B-ORG", 14, 18)];
        let entities = group_tags(text, &tags);
        let spans: Vec<(&str, EntityLabel)> = entities.iter().map(|e| (e.text.as_str(), e.label)).collect();
        assert_eq!(
            spans,
            vec![
                ("Jane Roe", EntityLabel::Person),
                ("Acme", EntityLabel::Organization),
                ("Labs", EntityLabel::Organization),
            ]
        );
    }

    #[test]
    fn test_unknown_kinds_are_dropped() {
        let tags = [tag("B-DATE", 0, 4)];
        assert!(group_tags("2021", &tags).is_empty());
    }

    #[test]
    fn test_chunks_cover_text_on_line_boundaries() {
        let text = "aaaa\nbbbb\ncccc\n";
        let chunks = chunk_spans(text, 10);
        assert_eq!(chunks, vec![(0, "aaaa\nbbbb\n"), (10, "cccc\n")]);

        let long = "x".repeat(30);
        assert_eq!(chunk_spans(&long, 10), vec![(0, long.as_str())]);
        assert!(chunk_spans("", 10).is_empty());
    }

    #[test]
    fn test_label_table_orders_by_id() {
        let id2label: HashMap<String, String> = [("1", "B-PER"), ("0", "O"), ("3", "B-ORG")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(label_table(&id2label), vec!["O", "B-PER", "O", "B-ORG"]);
    }
}
