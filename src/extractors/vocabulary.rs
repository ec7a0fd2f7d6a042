// src/extractors/vocabulary.rs
use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::utils::error::ConfigError;

/// Keyword lists driving line classification and skill detection.
///
/// Every field falls back to the built-in list when absent from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Skill terms, matched whole-word and case-insensitively.
    pub skills: Vec<String>,
    /// Degree keywords, matched as case-sensitive substrings.
    pub degree_keywords: Vec<String>,
    /// Work keywords matched as case-sensitive substrings.
    pub experience_keywords: Vec<String>,
    /// Work keywords matched case-insensitively.
    pub experience_keywords_ci: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            skills: owned(&[
                "HTML", "CSS", "Tailwind CSS", "JavaScript", "TypeScript",
                "React.Js", "Jest", "Node.Js", "Express", "MongoDB",
                "SQL", "Git", "GitHub", "Visual Studio Code", "Postman",
            ]),
            degree_keywords: owned(&["Bachelor", "Master", "PhD", "degree"]),
            // Mixed case handling mirrors the legacy classifier; see DESIGN.md.
            experience_keywords: owned(&["Experience", "Work"]),
            experience_keywords_ci: owned(&["employed"]),
        }
    }
}

impl Vocabulary {
    /// Loads a vocabulary from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let vocabulary: Vocabulary = serde_json::from_str(&raw)?;
        tracing::info!(
            "Loaded vocabulary from {} ({} skills, {} degree keywords)",
            path.display(),
            vocabulary.skills.len(),
            vocabulary.degree_keywords.len()
        );
        Ok(vocabulary)
    }

    /// Builds the matchers used during extraction.
    pub fn compile(&self) -> Result<CompiledVocabulary, ConfigError> {
        let mut skill_patterns = Vec::with_capacity(self.skills.len());
        for skill in &self.skills {
            let skill = skill.trim();
            if skill.is_empty() {
                continue;
            }
            // Terms are literal: "React.Js" does not match "React-Js" or "React Js".
            let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(skill)))
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", skill, e)))?;
            skill_patterns.push((skill.to_string(), pattern));
        }

        Ok(CompiledVocabulary {
            skill_patterns,
            degree_keywords: self.degree_keywords.clone(),
            experience_keywords: self.experience_keywords.clone(),
            experience_keywords_ci: self
                .experience_keywords_ci
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        })
    }
}

/// A `Vocabulary` with its skill patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledVocabulary {
    skill_patterns: Vec<(String, Regex)>,
    degree_keywords: Vec<String>,
    experience_keywords: Vec<String>,
    // stored lower-cased
    experience_keywords_ci: Vec<String>,
}

impl CompiledVocabulary {
    pub fn is_education(&self, line: &str) -> bool {
        self.degree_keywords.iter().any(|k| line.contains(k.as_str()))
    }

    pub fn is_work_experience(&self, line: &str) -> bool {
        if self.experience_keywords.iter().any(|k| line.contains(k.as_str())) {
            return true;
        }
        let lowered = line.to_lowercase();
        self.experience_keywords_ci.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Canonical names of every skill term found whole-word in `line`.
    pub fn skills_in<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.skill_patterns
            .iter()
            .filter(move |(_, re)| re.is_match(line))
            .map(|(name, _)| name.as_str())
    }
}
