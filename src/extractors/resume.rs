// src/extractors/resume.rs
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extractors::email::validate_email;
use crate::extractors::entities::{EntityLabel, EntityRecognizer};
use crate::extractors::patterns::{first_email, first_phone};
use crate::extractors::vocabulary::CompiledVocabulary;

// --- Data Structures ---
/// Fields pulled out of one resume. Built once per document, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Vec<String>,
    pub work_experience: Vec<String>,
    /// Canonical vocabulary spellings; a set, so iteration order carries no meaning.
    pub skills: BTreeSet<String>,
}

/// Which bucket a single trimmed line falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Education,
    WorkExperience,
    SkillsCandidate,
}

// --- Main Extractor Structure ---
pub struct ResumeExtractor {
    recognizer: Box<dyn EntityRecognizer>,
    vocabulary: CompiledVocabulary,
}

impl ResumeExtractor {
    pub fn new(recognizer: Box<dyn EntityRecognizer>, vocabulary: CompiledVocabulary) -> Self {
        Self { recognizer, vocabulary }
    }

    /// Education keywords win over work keywords; anything else is scanned for skills.
    pub fn classify_line(&self, line: &str) -> LineClass {
        if self.vocabulary.is_education(line) {
            LineClass::Education
        } else if self.vocabulary.is_work_experience(line) {
            LineClass::WorkExperience
        } else {
            LineClass::SkillsCandidate
        }
    }

    /// Extracts every field from the resume text. Never fails: fields that
    /// cannot be found are left absent or empty.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let name = self.extract_name(text);
        let email = self.extract_email(text);
        let phone = first_phone(text).map(str::to_string);

        let mut education = Vec::new();
        let mut work_experience = Vec::new();
        let mut skills = BTreeSet::new();

        for line in text.split('\n') {
            let line = line.trim();
            match self.classify_line(line) {
                LineClass::Education => education.push(line.to_string()),
                LineClass::WorkExperience => work_experience.push(line.to_string()),
                LineClass::SkillsCandidate => {
                    skills.extend(self.vocabulary.skills_in(line).map(str::to_string));
                }
            }
        }

        tracing::info!(
            "Extraction complete: name={}, email={}, phone={}, {} education, {} work, {} skills",
            name.is_some(),
            email.is_some(),
            phone.is_some(),
            education.len(),
            work_experience.len(),
            skills.len()
        );

        ExtractionResult { name, email, phone, education, work_experience, skills }
    }

    fn extract_name(&self, text: &str) -> Option<String> {
        let person = self
            .recognizer
            .recognize(text)
            .into_iter()
            .filter(|e| e.label == EntityLabel::Person)
            .min_by_key(|e| e.start)?;
        tracing::debug!("Name entity '{}' at bytes {}..{}", person.text, person.start, person.end);
        Some(person.text)
    }

    fn extract_email(&self, text: &str) -> Option<String> {
        let candidate = first_email(text)?;
        match validate_email(candidate) {
            Ok(normalized) => Some(normalized),
            Err(e) => {
                tracing::debug!("Discarding email candidate '{}': {}", candidate, e);
                None
            }
        }
    }
}
