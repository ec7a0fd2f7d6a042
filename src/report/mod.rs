// src/report/mod.rs
use std::io::{self, Write};

use crate::extractors::ExtractionResult;

const ABSENT: &str = "None";

/// Renders the fixed console layout. Downstream scripts parse this format, so
/// headings and the `- ` item prefix must stay as they are.
pub fn write_report<W: Write>(result: &ExtractionResult, out: &mut W) -> io::Result<()> {
    writeln!(out, "Extracted Information:")?;
    writeln!(out, "Name: {}", result.name.as_deref().unwrap_or(ABSENT))?;
    writeln!(out, "Email: {}", result.email.as_deref().unwrap_or(ABSENT))?;
    writeln!(out, "Phone: {}", result.phone.as_deref().unwrap_or(ABSENT))?;

    write_list(out, "Education", &result.education)?;
    write_list(out, "Work Experience", &result.work_experience)?;
    write_list(out, "Skills", &result.skills)?;
    Ok(())
}

fn write_list<'a, W, I>(out: &mut W, heading: &str, items: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a String>,
{
    writeln!(out, "{}:", heading)?;
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    Ok(())
}

/// Pretty-printed JSON form of the record.
pub fn write_json<W: Write>(result: &ExtractionResult, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: &ExtractionResult) -> String {
        let mut buf = Vec::new();
        write_report(result, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_full_report_layout() {
        let result = ExtractionResult {
            name: Some("John Smith".to_string()),
            email: Some("john.smith@example.com".to_string()),
            phone: Some("+1-555-000-1111".to_string()),
            education: vec!["Bachelor of Science in Computer Science".to_string()],
            work_experience: vec!["Experience: 5 years as a developer".to_string()],
            skills: ["Git", "SQL"].iter().map(|s| s.to_string()).collect(),
        };

        let expected = "Extracted Information:\n\
            Name: John Smith\n\
            Email: john.smith@example.com\n\
            Phone: +1-555-000-1111\n\
            Education:\n\
            - Bachelor of Science in Computer Science\n\
            Work Experience:\n\
            - Experience: 5 years as a developer\n\
            Skills:\n\
            - Git\n\
            - SQL\n";
        assert_eq!(render(&result), expected);
    }

    #[test]
    fn test_absent_fields_and_empty_lists() {
        let expected = "Extracted Information:\n\
            Name: None\n\
            Email: None\n\
            Phone: None\n\
            Education:\n\
            Work Experience:\n\
            Skills:\n";
        assert_eq!(render(&ExtractionResult::default()), expected);
    }

    #[test]
    fn test_json_record_round_trips() {
        let result = ExtractionResult {
            name: Some("Jane Roe".to_string()),
            skills: ["Jest"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_json(&result, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["name"], "Jane Roe");
        assert!(value["email"].is_null());
        assert_eq!(value["skills"][0], "Jest");
    }
}
