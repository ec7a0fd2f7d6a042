// src/extractors/entities.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

// --- Constants ---
const MIN_RUN_WORDS: usize = 2;
const MAX_RUN_WORDS: usize = 4;
const TRAILING_PUNCTUATION: [char; 4] = [',', '.', ';', ':'];

// A title-case word, optionally hyphenated or with an apostrophe ("Mary-Jane", "O'Neil").
static NAME_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:[-'][A-Z]?[a-z]+)*$")
        .expect("Failed to compile NAME_WORD_RE")
});

// An upper-case word as found in banner headers ("JOHN", "O'NEIL").
static CAPS_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2,}(?:[-'][A-Z]+)*$")
        .expect("Failed to compile CAPS_WORD_RE")
});

// A middle or leading initial ("A.").
static INITIAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]\.$")
        .expect("Failed to compile INITIAL_RE")
});

// "Name: ...", "Full Name - ..." and similar form-style labels.
static NAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?i:(?:full|candidate)\s+)?(?i:name)\s*[:\-]\s*")
        .expect("Failed to compile NAME_LABEL_RE")
});

static GIVEN_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Aaron", "Adam", "Aditya", "Ahmed", "Aisha", "Alex", "Alexander", "Alice", "Amanda", "Amit",
        "Amy", "Ana", "Andrew", "Angela", "Anil", "Ankit", "Anna", "Anthony", "Arjun", "Ashley",
        "Benjamin", "Brian", "Carlos", "Caroline", "Charles", "Chen", "Chris", "Christopher", "Daniel", "David",
        "Deepak", "Diana", "Divya", "Elena", "Elizabeth", "Emily", "Emma", "Eric", "Fatima", "Gabriel",
        "George", "Grace", "Hannah", "Harry", "Isabella", "Jack", "James", "Jane", "Jason", "Jennifer",
        "Jessica", "John", "Jose", "Joseph", "Joshua", "Julia", "Karan", "Karen", "Kevin", "Kwame", "Laura",
        "Linda", "Lisa", "Luis", "Maria", "Mark", "Mary", "Matthew", "Michael", "Mohammed", "Muhammad",
        "Nancy", "Neha", "Nicole", "Olivia", "Pooja", "Priya", "Rahul", "Raj", "Rachel", "Ravi",
        "Rebecca", "Richard", "Robert", "Rohan", "Ryan", "Sam", "Samuel", "Sankalp", "Sarah", "Sophia",
        "Steven", "Susan", "Thomas", "Vikram", "Wei", "William", "Yusuf", "Zoe",
    ]
    .into_iter()
    .collect()
});

// Words that never appear inside a person's name on a resume: section headings,
// job titles, degree and subject words, calendar words. Compared in title case.
static NON_NAME_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "About", "Achievements", "Activities", "Address", "Analyst", "Architect", "Arts", "Awards",
        "Backend", "Bachelor", "Certifications", "Computer", "Consultant", "Contact", "Courses",
        "Curriculum", "Data", "Degree", "Department", "Designer", "Details", "Developer", "Education",
        "Engineer", "Engineering", "Experience", "Frontend", "Full", "Github", "Hobbies", "Information",
        "Institute", "Interests", "Intern", "Languages", "Lead", "Linkedin", "Manager", "Master",
        "Objective", "Personal", "Present", "Profile", "Projects", "Publications", "References",
        "Resume", "Science", "Scientist", "Senior", "Skills", "Software", "Stack", "Street", "Summary",
        "Technical", "Technology", "Vitae", "Web", "Work",
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ]
    .into_iter()
    .collect()
});

static ORG_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Inc", "Llc", "Ltd", "Corp", "Corporation", "Company", "Group", "Labs", "Technologies",
        "Solutions", "Systems", "University", "College", "Institute", "School", "Academy",
    ]
    .into_iter()
    .collect()
});

// --- Data Structures ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Misc,
}

/// A labelled span of the input text. `start`/`end` are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Anything that can tag spans of text with entity labels.
///
/// Implementations return entities in document order. A recognizer is built
/// once and shared by every extraction in the process.
pub trait EntityRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

/// One word of a candidate run, offsets relative to its line.
#[derive(Debug, Clone, Copy)]
struct RunWord<'a> {
    word: &'a str,
    start: usize,
    end: usize,
    initial: bool,
}

/// Where a line sits, as far as name detection cares.
#[derive(Debug, Clone, Copy)]
struct LineContext {
    offset: usize,
    /// First non-blank line of the document.
    header: bool,
    /// Line opened with a "Name:" style label.
    labelled: bool,
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Gazetteer and capitalisation based recognizer, used when no model is available.
///
/// Looks for runs of 2-4 name-shaped words (title case, upper case or initials)
/// on a single line. A run is a person when it opens with a known given name,
/// follows a "Name:" label, or is the whole first line of the document. No run
/// containing a heading or job-title word is a person. A run ending in an
/// organisation suffix is an organisation.
#[derive(Debug, Default, Clone)]
pub struct RuleBasedRecognizer;

impl RuleBasedRecognizer {
    pub fn new() -> Self { Self {} }

    fn classify_run(&self, run: &[RunWord], whole_line: bool, ctx: LineContext) -> Option<EntityLabel> {
        let full_words: Vec<String> = run.iter().filter(|w| !w.initial).map(|w| title_case(w.word)).collect();
        let first = full_words.first()?;
        let last = full_words.last()?;

        if ORG_SUFFIXES.contains(last.as_str()) {
            return Some(EntityLabel::Organization);
        }
        if full_words.iter().any(|w| NON_NAME_WORDS.contains(w.as_str())) {
            return None;
        }
        if ctx.labelled || GIVEN_NAMES.contains(first.as_str()) || (whole_line && ctx.header) {
            return Some(EntityLabel::Person);
        }
        None
    }

    /// Emits the pending run as an entity if it qualifies, then clears it.
    fn flush_run(&self, line: &str, ctx: LineContext, run: &mut Vec<RunWord>, entities: &mut Vec<Entity>) {
        if (MIN_RUN_WORDS..=MAX_RUN_WORDS).contains(&run.len()) {
            let (start, end) = (run[0].start, run[run.len() - 1].end);
            let content_start = line.len() - line.trim_start().len();
            let content_end = line.trim_end().trim_end_matches(TRAILING_PUNCTUATION).len();
            let whole_line = start == content_start && end >= content_end;

            if let Some(label) = self.classify_run(run, whole_line, ctx) {
                tracing::trace!("Recognized {:?}: '{}'", label, &line[start..end]);
                entities.push(Entity {
                    text: line[start..end].to_string(),
                    label,
                    start: ctx.offset + start,
                    end: ctx.offset + end,
                });
            }
        }
        run.clear();
    }

    fn recognize_line(&self, line: &str, mut ctx: LineContext, entities: &mut Vec<Entity>) {
        let mut run: Vec<RunWord> = Vec::new();

        // Skip past a "Name:" label; the rest of the line is the candidate.
        let mut search_from = 0;
        if let Some(label) = NAME_LABEL_RE.find(line) {
            ctx.labelled = true;
            search_from = label.end();
        }
        let scan_start = search_from;

        // Walk whitespace-separated tokens with their byte offsets.
        for token in line[scan_start..].split_whitespace() {
            let start = match line[search_from..].find(token) {
                Some(i) => search_from + i,
                None => break,
            };
            search_from = start + token.len();

            if INITIAL_RE.is_match(token) {
                run.push(RunWord { word: token, start, end: search_from, initial: true });
                continue;
            }

            let word = token.trim_end_matches(TRAILING_PUNCTUATION);
            let punctuated = word.len() != token.len();

            if NAME_WORD_RE.is_match(word) || CAPS_WORD_RE.is_match(word) {
                run.push(RunWord { word, start, end: start + word.len(), initial: false });
                if punctuated {
                    self.flush_run(line, ctx, &mut run, entities);
                }
            } else {
                self.flush_run(line, ctx, &mut run, entities);
            }
        }

        // Whole-line checks measure from the label, not the line start.
        let body = &line[scan_start..];
        let shifted = LineContext { offset: ctx.offset + scan_start, ..ctx };
        for w in run.iter_mut() {
            w.start -= scan_start;
            w.end -= scan_start;
        }
        self.flush_run(body, shifted, &mut run, entities);
    }
}

impl EntityRecognizer for RuleBasedRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut offset = 0;
        let mut seen_content = false;
        for line in text.split('\n') {
            let header = !seen_content && !line.trim().is_empty();
            seen_content |= header;
            self.recognize_line(line, LineContext { offset, header, labelled: false }, &mut entities);
            offset += line.len() + 1;
        }
        tracing::debug!("Rule-based recognizer found {} entities", entities.len());
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persons(text: &str) -> Vec<String> {
        RuleBasedRecognizer::new()
            .recognize(text)
            .into_iter()
            .filter(|e| e.label == EntityLabel::Person)
            .map(|e| e.text)
            .collect()
    }

    #[test]
    fn test_header_line_is_person() {
        let text = "John Smith\njohn.smith@example.com\nBachelor of Science in Computer Science";
        assert_eq!(persons(text), vec!["John Smith"]);
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "Summary\n  Priya Sharma  \nReferences";
        let entities = RuleBasedRecognizer::new().recognize(text);
        assert_eq!(entities.len(), 1);
        let e = &entities[0];
        assert_eq!(&text[e.start..e.end], "Priya Sharma");
        assert_eq!(e.label, EntityLabel::Person);
    }

    #[test]
    fn test_given_name_inside_sentence() {
        let text = "Reference available from Sarah Connor, Lead Engineer";
        assert_eq!(persons(text), vec!["Sarah Connor"]);
    }

    #[test]
    fn test_subject_and_heading_runs_are_not_people() {
        assert!(persons("Computer Science").is_empty());
        assert!(persons("Work Experience").is_empty());
        assert!(persons("Skilled in JavaScript, SQL, and Git").is_empty());
    }

    #[test]
    fn test_organisation_suffix() {
        let entities = RuleBasedRecognizer::new().recognize("Intern at Acme Labs in 2021");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, EntityLabel::Organization);
        assert_eq!(entities[0].text, "Acme Labs");
    }

    #[test]
    fn test_document_order() {
        let text = "Mary Jones\nWorked with David Brown";
        assert_eq!(persons(text), vec!["Mary Jones", "David Brown"]);
    }

    #[test]
    fn test_upper_case_banner() {
        assert_eq!(persons("JOHN SMITH\nSoftware Developer"), vec!["JOHN SMITH"]);
    }

    #[test]
    fn test_middle_initial() {
        assert_eq!(persons("John A. Smith\njohn@example.com"), vec!["John A. Smith"]);
    }

    #[test]
    fn test_name_label() {
        let text = "Curriculum Vitae\nName: Kwame Mensah\nPhone: 020 7946 0018";
        let entities = RuleBasedRecognizer::new().recognize(text);
        let person = entities.iter().find(|e| e.label == EntityLabel::Person).unwrap();
        assert_eq!(person.text, "Kwame Mensah");
        assert_eq!(&text[person.start..person.end], "Kwame Mensah");
    }

    #[test]
    fn test_job_title_header_is_not_a_person() {
        assert_eq!(persons("Frontend Developer\nSankalp Haritash"), vec!["Sankalp Haritash"]);
        assert_eq!(persons("Personal Details\nJohn Smith"), vec!["John Smith"]);
    }

    #[test]
    fn test_unknown_whole_line_run_only_counts_as_header() {
        // Not a known given name, so only the first line may be taken as the name.
        assert_eq!(persons("Odile Fournier."), vec!["Odile Fournier"]);
        assert!(persons("Summary\nOdile Fournier").is_empty());
    }
}
