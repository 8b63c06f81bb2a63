//! Research context aggregation.
//!
//! Merges the structured intake record, extracted pitch-deck text, and
//! internal notes into one textual research context. Pure and
//! deterministic: the same inputs always produce byte-identical output,
//! which keeps synthesis prompts reproducible.

use tracing::debug;

use dealbrief_shared::CompanyRecord;

/// Upper bound on pitch-deck text included in the context. Decks can run to
/// hundreds of pages; the tail is the least information-dense part.
const MAX_DOCUMENT_CHARS: usize = 12_000;

/// Upper bound on internal notes included in the context.
const MAX_NOTES_CHARS: usize = 4_000;

/// The assembled research context for one company. Ephemeral — derived from
/// a [`CompanyRecord`] and discarded after brief synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchContext {
    /// The full context text handed to the synthesizer.
    pub text: String,
}

/// Build the research context for a company.
///
/// Sections appear in fixed order: intake summary, pitch-deck block,
/// internal-notes block. The deck and notes blocks are omitted entirely
/// when empty rather than rendered as bare labels.
pub fn build_context(
    record: &CompanyRecord,
    document_text: &str,
    internal_notes: &str,
) -> ResearchContext {
    let mut text = summarize_record(record);

    if !document_text.trim().is_empty() {
        text.push_str("\n\nADDITIONAL CONTEXT - PITCH DECK CONTENT:\n");
        text.push_str(&truncate_content(document_text.trim(), MAX_DOCUMENT_CHARS));
    }

    if !internal_notes.trim().is_empty() {
        text.push_str("\n\nADDITIONAL CONTEXT - INTERNAL NOTES:\n");
        text.push_str(&truncate_content(internal_notes.trim(), MAX_NOTES_CHARS));
    }

    debug!(
        company = %record.company_name,
        context_len = text.len(),
        has_deck = !document_text.trim().is_empty(),
        has_notes = !internal_notes.trim().is_empty(),
        "research context assembled"
    );

    ResearchContext { text }
}

/// Render a bullet summary of every populated field across the record's
/// assessment sub-records. Attributes with empty values are omitted, not
/// rendered as bare labels.
pub fn summarize_record(record: &CompanyRecord) -> String {
    let mut out = format!("Company: {}", record.company_name);

    if !record.website.trim().is_empty() {
        out.push_str(&format!("\nWebsite: {}", record.website));
    }

    for (label, attributes) in record.sub_records() {
        let populated: Vec<(&String, &String)> = attributes
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();

        if populated.is_empty() {
            continue;
        }

        out.push_str(&format!("\n\n{label}:"));
        for (name, value) in populated {
            out.push_str(&format!("\n- {name}: {}", value.trim()));
        }
    }

    out
}

/// Truncate content to at most `max_chars` bytes, respecting char
/// boundaries, with an explicit truncation marker.
fn truncate_content(content: &str, max_chars: usize) -> String {
    if content.len() <= max_chars {
        return content.to_string();
    }
    let mut cut = max_chars;
    while !content.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}\n\n[... content truncated for research context ...]",
        &content[..cut]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CompanyRecord {
        let mut record = CompanyRecord {
            company_name: "Acme".into(),
            website: "https://acme.example".into(),
            ..Default::default()
        };
        record
            .problem_analysis
            .insert("statement".into(), "manual invoice workflows".into());
        record.problem_analysis.insert("score".into(), "8/10".into());
        record
            .market_analysis
            .insert("industry".into(), "B2B fintech".into());
        // Empty value must be omitted from the summary
        record.market_analysis.insert("competitors".into(), "".into());
        record
            .business_analysis
            .insert("traction".into(), "40 pilot customers".into());
        record
    }

    #[test]
    fn context_is_deterministic() {
        let record = sample_record();
        let a = build_context(&record, "deck text", "note");
        let b = build_context(&record, "deck text", "note");
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn summary_omits_empty_attributes() {
        let summary = summarize_record(&sample_record());
        assert!(summary.contains("- statement: manual invoice workflows"));
        assert!(summary.contains("- industry: B2B fintech"));
        assert!(!summary.contains("competitors"));
    }

    #[test]
    fn summary_skips_unpopulated_sub_records() {
        let summary = summarize_record(&sample_record());
        assert!(summary.contains("Problem Analysis:"));
        assert!(summary.contains("Market Analysis:"));
        assert!(summary.contains("Business Analysis:"));
        // No product/team attributes were set
        assert!(!summary.contains("Product Analysis:"));
        assert!(!summary.contains("Team Analysis:"));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let record = sample_record();
        let context = build_context(&record, "slide one", "promising team");
        let summary_pos = context.text.find("Problem Analysis:").unwrap();
        let deck_pos = context
            .text
            .find("ADDITIONAL CONTEXT - PITCH DECK CONTENT:")
            .unwrap();
        let notes_pos = context
            .text
            .find("ADDITIONAL CONTEXT - INTERNAL NOTES:")
            .unwrap();
        assert!(summary_pos < deck_pos);
        assert!(deck_pos < notes_pos);
        assert!(context.text.contains("slide one"));
        assert!(context.text.contains("promising team"));
    }

    #[test]
    fn empty_blocks_are_omitted() {
        let record = sample_record();
        let context = build_context(&record, "", "   ");
        assert!(!context.text.contains("ADDITIONAL CONTEXT"));
    }

    #[test]
    fn minimal_record_still_produces_context() {
        let record = CompanyRecord {
            company_name: "Acme".into(),
            ..Default::default()
        };
        let context = build_context(&record, "", "");
        assert_eq!(context.text, "Company: Acme");
    }

    #[test]
    fn long_deck_text_is_truncated() {
        let record = sample_record();
        let long_deck = "slide ".repeat(5_000);
        let context = build_context(&record, &long_deck, "");
        assert!(context.text.contains("[... content truncated"));
        assert!(context.text.len() < long_deck.len());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let multibyte = "é".repeat(MAX_DOCUMENT_CHARS);
        let truncated = truncate_content(&multibyte, MAX_DOCUMENT_CHARS - 1);
        assert!(truncated.contains("truncated"));
    }
}
