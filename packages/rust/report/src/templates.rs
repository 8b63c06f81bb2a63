//! The two report templates.
//!
//! Plain string assembly against the defaulted brief: every field access is
//! total, so an empty brief renders as a sparse document instead of failing.
//! The blank runs empty fields leave behind are collapsed by the caller.

use dealbrief_shared::IntelligenceBrief;

/// Compact single-page summary.
pub(crate) fn one_pager(brief: &IntelligenceBrief, generated_on: &str) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", brief.company_name));
    if !brief.tagline.is_empty() {
        md.push_str(&format!("*{}*\n\n", brief.tagline));
    }
    md.push_str(&format!("Investment One-Pager · Generated {generated_on}\n\n"));
    md.push_str(&meta_line(&[
        ("Founded", &brief.founded_year),
        ("Total funding", &brief.financials.total_funding),
        ("Revenue", &brief.financials.revenue),
        ("Valuation", &brief.financials.valuation),
    ]));

    md.push_str("\n## Executive Summary\n\n");
    md.push_str(&brief.executive_summary);

    md.push_str("\n\n## The Problem\n\n");
    md.push_str(&brief.problem_statement);

    md.push_str("\n\n## The Solution\n\n");
    md.push_str(&brief.solution);

    md.push_str("\n\n## Business Model\n\n");
    md.push_str(&brief.business_model);

    md.push_str("\n\n## Market Opportunity\n\n");
    let market = &brief.market_analysis;
    md.push_str("| TAM | SAM | SOM |\n| --- | --- | --- |\n");
    md.push_str(&format!(
        "| {} | {} | {} |\n",
        market.size_tam, market.size_sam, market.size_som
    ));
    if !market.target_customer.is_empty() {
        md.push_str(&format!("\n**Target customer:** {}\n", market.target_customer));
    }
    if !market.competitors.is_empty() {
        let names: Vec<&str> = market.competitors.iter().map(|c| c.name.as_str()).collect();
        md.push_str(&format!("\n**Competes with:** {}\n", names.join(", ")));
    }

    md.push_str("\n## Team\n\n");
    for member in &brief.team {
        md.push_str(&format!("- **{}** — {}\n", member.name, member.title));
    }

    if !brief.financials.last_round.is_empty() {
        md.push_str(&format!(
            "\n## Funding Snapshot\n\nLast round: {}\n",
            brief.financials.last_round
        ));
    }

    md.push_str("\n## SWOT at a Glance\n\n");
    let swot = &brief.swot_analysis;
    md.push_str(&swot_line("Strengths", &swot.strengths));
    md.push_str(&swot_line("Weaknesses", &swot.weaknesses));
    md.push_str(&swot_line("Opportunities", &swot.opportunities));
    md.push_str(&swot_line("Threats", &swot.threats));

    md
}

/// Full research report.
pub(crate) fn deep_dive(brief: &IntelligenceBrief, generated_on: &str) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} — Investment Deep Dive\n\n", brief.company_name));
    if !brief.tagline.is_empty() {
        md.push_str(&format!("*{}*\n\n", brief.tagline));
    }
    md.push_str(&format!("Deep-Dive Research Report · Generated {generated_on}\n\n"));
    md.push_str(&meta_line(&[("Founded", &brief.founded_year)]));

    md.push_str("\n## Executive Summary\n\n");
    md.push_str(&brief.executive_summary);

    md.push_str("\n\n## Problem Statement\n\n");
    md.push_str(&brief.problem_statement);

    md.push_str("\n\n## Solution\n\n");
    md.push_str(&brief.solution);

    md.push_str("\n\n## Product Overview\n\n");
    md.push_str(&brief.product_overview);

    md.push_str("\n\n## Business Model\n\n");
    md.push_str(&brief.business_model);

    md.push_str("\n\n## Market Analysis\n\n### Market Size\n\n");
    let market = &brief.market_analysis;
    md.push_str(&format!(
        "- Total Addressable Market (TAM): {}\n\
         - Serviceable Addressable Market (SAM): {}\n\
         - Serviceable Obtainable Market (SOM): {}\n",
        market.size_tam, market.size_sam, market.size_som
    ));

    md.push_str("\n### Key Trends\n\n");
    md.push_str(&bullet_list(&market.key_trends));

    if !market.target_customer.is_empty() {
        md.push_str(&format!("\n### Target Customer\n\n{}\n", market.target_customer));
    }

    md.push_str("\n### Competitive Landscape\n\n");
    for competitor in &market.competitors {
        md.push_str(&format!("- **{}** — {}\n", competitor.name, competitor.description));
    }

    md.push_str("\n## Team\n\n");
    for member in &brief.team {
        md.push_str(&format!(
            "### {} — {}\n\n{}\n\n",
            member.name, member.title, member.background
        ));
    }

    md.push_str("## Financials\n\n");
    md.push_str(&meta_line(&[
        ("Total funding", &brief.financials.total_funding),
        ("Last round", &brief.financials.last_round),
        ("Revenue", &brief.financials.revenue),
        ("Valuation", &brief.financials.valuation),
    ]));
    if !brief.financials.funding_rounds.is_empty() {
        md.push_str("\n| Round | Amount | Date | Lead Investor |\n");
        md.push_str("| --- | --- | --- | --- |\n");
        for round in &brief.financials.funding_rounds {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                round.round_type, round.amount, round.date, round.lead_investor
            ));
        }
    }

    md.push_str("\n## Technology Stack\n\n");
    md.push_str(&bullet_list(&brief.technology_stack));

    md.push_str("\n## Intellectual Property\n\n");
    md.push_str(&bullet_list(&brief.intellectual_property));

    md.push_str("\n## SWOT Analysis\n\n");
    let swot = &brief.swot_analysis;
    md.push_str("### Strengths\n\n");
    md.push_str(&bullet_list(&swot.strengths));
    md.push_str("\n### Weaknesses\n\n");
    md.push_str(&bullet_list(&swot.weaknesses));
    md.push_str("\n### Opportunities\n\n");
    md.push_str(&bullet_list(&swot.opportunities));
    md.push_str("\n### Threats\n\n");
    md.push_str(&bullet_list(&swot.threats));

    md
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render a `- item` list, one line per entry.
fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}\n"))
        .collect::<String>()
}

/// Render a `**Label:** value · **Label:** value` metadata line, skipping
/// empty values. Empty altogether when nothing is populated.
fn meta_line(pairs: &[(&str, &str)]) -> String {
    let populated: Vec<String> = pairs
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("**{label}:** {value}"))
        .collect();

    if populated.is_empty() {
        String::new()
    } else {
        format!("{}\n", populated.join(" · "))
    }
}

/// Render a condensed one-line SWOT entry.
fn swot_line(label: &str, items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("**{label}:** {}\n\n", items.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_list_renders_each_item() {
        let items = vec!["one".to_string(), "two".to_string()];
        assert_eq!(bullet_list(&items), "- one\n- two\n");
        assert_eq!(bullet_list(&[]), "");
    }

    #[test]
    fn meta_line_skips_empty_values() {
        let line = meta_line(&[("Founded", "2019"), ("Revenue", ""), ("Valuation", "$5M")]);
        assert_eq!(line, "**Founded:** 2019 · **Valuation:** $5M\n");
        assert_eq!(meta_line(&[("Founded", " ")]), "");
    }

    #[test]
    fn swot_line_joins_items() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(swot_line("Strengths", &items), "**Strengths:** a; b\n\n");
        assert_eq!(swot_line("Threats", &[]), "");
    }
}
