//! Core domain types for DealBrief research pipelines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CompanyRecord
// ---------------------------------------------------------------------------

/// One row of intake data, as supplied by the intake-queue collaborator.
///
/// Every field defaults so a partial row deserializes cleanly; absent
/// sub-record attributes are empty strings, never null. The record is
/// read-only to the pipeline — the intake queue owns its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRecord {
    /// Identifying key. A record with an empty name cannot be processed.
    pub company_name: String,
    /// Company website as entered in the intake row. Free text, may be empty.
    pub website: String,

    /// Problem assessment attributes (statement, commentary, scores, ...).
    pub problem_analysis: BTreeMap<String, String>,
    /// Market assessment attributes (industry, competitors, target audience, ...).
    pub market_analysis: BTreeMap<String, String>,
    /// Product assessment attributes (mvp, progress, ...).
    pub product_analysis: BTreeMap<String, String>,
    /// Team assessment attributes (founder fit, roles, growth, ...).
    pub team_analysis: BTreeMap<String, String>,
    /// Business assessment attributes (traction, pricing, buyers, ...).
    pub business_analysis: BTreeMap<String, String>,

    /// Optional URL or local path of a pitch-deck document.
    pub pitch_deck_url: Option<String>,
    /// Free-text internal notes attached to the intake row.
    pub internal_notes: String,
}

impl CompanyRecord {
    /// The five assessment sub-records in their fixed presentation order,
    /// paired with their display labels.
    pub fn sub_records(&self) -> [(&'static str, &BTreeMap<String, String>); 5] {
        [
            ("Problem Analysis", &self.problem_analysis),
            ("Market Analysis", &self.market_analysis),
            ("Product Analysis", &self.product_analysis),
            ("Team Analysis", &self.team_analysis),
            ("Business Analysis", &self.business_analysis),
        ]
    }

    /// Whether the record carries the identity required for processing.
    pub fn has_identity(&self) -> bool {
        !self.company_name.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// IntelligenceBrief
// ---------------------------------------------------------------------------

/// The canonical structured research result for one company.
///
/// Field names mirror the JSON contract the synthesizer requests from the
/// text-generation service. Every field is `#[serde(default)]`: a key the
/// service omits deserializes to an empty string or list, so downstream
/// consumers never see a missing key. Optional-field handling is enforced
/// once, here, at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntelligenceBrief {
    pub company_name: String,
    pub founded_year: String,
    pub tagline: String,
    pub executive_summary: String,
    pub problem_statement: String,
    pub solution: String,
    pub business_model: String,
    pub product_overview: String,
    pub market_analysis: MarketAnalysis,
    pub team: Vec<TeamMember>,
    pub financials: Financials,
    pub technology_stack: Vec<String>,
    pub intellectual_property: Vec<String>,
    pub swot_analysis: SwotAnalysis,
}

/// Market sizing, trends, and competitive landscape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketAnalysis {
    #[serde(rename = "sizeTAM")]
    pub size_tam: String,
    #[serde(rename = "sizeSAM")]
    pub size_sam: String,
    #[serde(rename = "sizeSOM")]
    pub size_som: String,
    pub key_trends: Vec<String>,
    pub target_customer: String,
    pub competitors: Vec<Competitor>,
}

/// A single named competitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    pub name: String,
    pub description: String,
}

/// One member of the founding/leadership team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub title: String,
    pub background: String,
}

/// Funding and revenue summary. All values are opaque free-text strings
/// ("$1.2M ARR" and the like) — numeric parsing is a collaborator concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Financials {
    pub total_funding: String,
    pub last_round: String,
    pub revenue: String,
    pub valuation: String,
    pub funding_rounds: Vec<FundingRound>,
}

/// One historical funding round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundingRound {
    #[serde(rename = "type")]
    pub round_type: String,
    pub amount: String,
    pub date: String,
    pub lead_investor: String,
}

/// Strengths / weaknesses / opportunities / threats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl IntelligenceBrief {
    /// Synthetic fallback brief used whenever external research is
    /// unavailable. Fully populated — never partially empty — and keyed only
    /// by the company name, so downstream stages need no special case for
    /// "no research service available".
    ///
    /// This constructor lives next to the struct so the canonical shape and
    /// its placeholder content cannot drift apart.
    pub fn fallback(company_name: &str) -> Self {
        Self {
            company_name: company_name.to_string(),
            founded_year: "2019".into(),
            tagline: "Leading innovation in their industry".into(),
            executive_summary: format!(
                "{company_name} is a fast-growing technology company that has shown strong \
                 market traction and innovation in their sector. The company has built a \
                 scalable platform that serves enterprise clients with proven customer \
                 adoption and revenue growth. Their strategic positioning in the market \
                 demonstrates significant potential for continued expansion and value \
                 creation."
            ),
            problem_statement: "Organizations face complex operational challenges that \
                 require innovative technology solutions. Traditional approaches are often \
                 inefficient, costly, and lack the scalability needed for modern business \
                 requirements."
                .into(),
            solution: format!(
                "{company_name} provides an advanced platform that addresses these \
                 challenges through innovative technology and user-centric design. The \
                 solution integrates seamlessly with existing systems while delivering \
                 measurable improvements in efficiency and outcomes."
            ),
            business_model: "Multi-tier subscription model with enterprise-focused \
                 pricing. Revenue streams include core platform subscriptions, \
                 professional services, and premium feature add-ons."
                .into(),
            product_overview: format!(
                "{company_name} offers a comprehensive platform designed for \
                 enterprise-scale operations with focus on user experience and measurable \
                 business impact."
            ),
            market_analysis: MarketAnalysis {
                size_tam: "$85B".into(),
                size_sam: "$8.5B".into(),
                size_som: "$850M".into(),
                key_trends: vec![
                    "Digital transformation acceleration across industries".into(),
                    "Increased demand for scalable technology solutions".into(),
                    "Growing emphasis on operational efficiency and automation".into(),
                ],
                target_customer: "Mid-market to enterprise companies seeking innovative \
                     solutions to improve operational efficiency and business outcomes."
                    .into(),
                competitors: vec![
                    Competitor {
                        name: "Industry Leader A".into(),
                        description: "Established player with traditional approach".into(),
                    },
                    Competitor {
                        name: "Emerging Competitor B".into(),
                        description: "New entrant with focus on specific market segment"
                            .into(),
                    },
                ],
            },
            team: vec![
                TeamMember {
                    name: "Sarah Chen".into(),
                    title: "CEO & Co-Founder".into(),
                    background: "Former executive at leading technology company, MBA from \
                         top business school, 15+ years experience"
                        .into(),
                },
                TeamMember {
                    name: "Michael Rodriguez".into(),
                    title: "CTO & Co-Founder".into(),
                    background: "Ex-senior engineer at major tech firm, advanced degree in \
                         computer science, expert in scalable systems"
                        .into(),
                },
                TeamMember {
                    name: "Jennifer Park".into(),
                    title: "VP of Business Development".into(),
                    background: "Former sales leader at enterprise software company, proven \
                         track record with Fortune 500 clients"
                        .into(),
                },
            ],
            financials: Financials {
                total_funding: "$25.5M".into(),
                last_round: "Series B, $18M, led by leading venture capital firm".into(),
                revenue: "$5.2M ARR".into(),
                valuation: "$120M".into(),
                funding_rounds: vec![
                    FundingRound {
                        round_type: "Seed".into(),
                        amount: "$2.5M".into(),
                        date: "2020".into(),
                        lead_investor: "Seed Capital Partners".into(),
                    },
                    FundingRound {
                        round_type: "Series A".into(),
                        amount: "$5M".into(),
                        date: "2021".into(),
                        lead_investor: "Growth Ventures".into(),
                    },
                    FundingRound {
                        round_type: "Series B".into(),
                        amount: "$18M".into(),
                        date: "2023".into(),
                        lead_investor: "Premier VC Fund".into(),
                    },
                ],
            },
            technology_stack: vec![
                "Cloud-native architecture".into(),
                "Modern web frameworks".into(),
                "Scalable data processing".into(),
                "Enterprise security standards".into(),
            ],
            intellectual_property: vec![
                "Core platform patents pending".into(),
                "Proprietary algorithms for optimization".into(),
                "Trademark protection for brand assets".into(),
            ],
            swot_analysis: SwotAnalysis {
                strengths: vec![
                    "Strong technical team with proven expertise".into(),
                    "High customer satisfaction and retention rates".into(),
                    "Proven product-market fit with measurable results".into(),
                    "Scalable business model with recurring revenue".into(),
                ],
                weaknesses: vec![
                    "Limited brand recognition in competitive market".into(),
                    "Dependency on key founding team members".into(),
                    "Early stage international market presence".into(),
                ],
                opportunities: vec![
                    "Large addressable market with significant growth potential".into(),
                    "Opportunity for strategic partnerships and integrations".into(),
                    "Expansion into adjacent market segments".into(),
                    "International market expansion possibilities".into(),
                ],
                threats: vec![
                    "Competition from well-funded industry incumbents".into(),
                    "Economic uncertainty affecting enterprise spending".into(),
                    "Rapid technological change requiring continuous innovation".into(),
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_from_partial_row() {
        let json = r#"{
            "company_name": "Acme",
            "problem_analysis": {"statement": "manual workflows everywhere"}
        }"#;
        let record: CompanyRecord = serde_json::from_str(json).expect("deserialize record");
        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.website, "");
        assert_eq!(
            record.problem_analysis.get("statement").map(String::as_str),
            Some("manual workflows everywhere")
        );
        assert!(record.market_analysis.is_empty());
        assert!(record.pitch_deck_url.is_none());
        assert!(record.has_identity());
    }

    #[test]
    fn record_without_name_has_no_identity() {
        let record = CompanyRecord {
            company_name: "   ".into(),
            ..Default::default()
        };
        assert!(!record.has_identity());
    }

    #[test]
    fn brief_tolerates_missing_keys() {
        // Only the identity fields present — everything else must default.
        let json = r#"{"companyName":"Acme","tagline":"X","executiveSummary":"Y"}"#;
        let brief: IntelligenceBrief = serde_json::from_str(json).expect("deserialize brief");
        assert_eq!(brief.company_name, "Acme");
        assert_eq!(brief.founded_year, "");
        assert!(brief.team.is_empty());
        assert!(brief.market_analysis.key_trends.is_empty());
        assert!(brief.swot_analysis.strengths.is_empty());
        assert_eq!(brief.financials.total_funding, "");
    }

    #[test]
    fn brief_serializes_with_contract_keys() {
        let brief = IntelligenceBrief::fallback("Acme");
        let json = serde_json::to_value(&brief).expect("serialize brief");
        assert_eq!(json["companyName"], "Acme");
        assert!(json["marketAnalysis"]["sizeTAM"].is_string());
        assert!(json["marketAnalysis"]["sizeSAM"].is_string());
        assert!(json["marketAnalysis"]["sizeSOM"].is_string());
        assert_eq!(json["financials"]["fundingRounds"][0]["type"], "Seed");
        assert!(json["financials"]["fundingRounds"][0]["leadInvestor"].is_string());
        assert!(json["swotAnalysis"]["strengths"].is_array());
    }

    #[test]
    fn brief_roundtrip() {
        let brief = IntelligenceBrief::fallback("Acme");
        let json = serde_json::to_string(&brief).expect("serialize");
        let parsed: IntelligenceBrief = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, brief);
    }

    #[test]
    fn fallback_is_fully_populated() {
        let brief = IntelligenceBrief::fallback("Acme");
        assert!(brief.executive_summary.contains("Acme"));
        assert!(!brief.founded_year.is_empty());
        assert!(!brief.tagline.is_empty());
        assert!(!brief.problem_statement.is_empty());
        assert!(!brief.solution.is_empty());
        assert!(!brief.business_model.is_empty());
        assert!(!brief.product_overview.is_empty());
        assert!(!brief.market_analysis.size_tam.is_empty());
        assert!(!brief.market_analysis.key_trends.is_empty());
        assert!(!brief.market_analysis.competitors.is_empty());
        assert!(!brief.team.is_empty());
        assert!(!brief.financials.funding_rounds.is_empty());
        assert!(!brief.technology_stack.is_empty());
        assert!(!brief.intellectual_property.is_empty());
        assert!(!brief.swot_analysis.strengths.is_empty());
        assert!(!brief.swot_analysis.weaknesses.is_empty());
        assert!(!brief.swot_analysis.opportunities.is_empty());
        assert!(!brief.swot_analysis.threats.is_empty());
    }

    #[test]
    fn sub_records_keep_fixed_order() {
        let record = CompanyRecord::default();
        let labels: Vec<&str> = record.sub_records().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            [
                "Problem Analysis",
                "Market Analysis",
                "Product Analysis",
                "Team Analysis",
                "Business Analysis"
            ]
        );
    }
}
