//! Research prompt construction.
//!
//! The prompt establishes the analyst persona, embeds the exact JSON
//! contract the pipeline expects back, and appends the assembled research
//! context. The schema text below is the single source of truth for what
//! the service is asked to produce; the `IntelligenceBrief` struct mirrors
//! it field for field (a drift guard in the tests enforces this).

/// The JSON contract requested from the text-generation service.
pub const RESEARCH_SCHEMA: &str = r#"{
  "companyName": "string",
  "foundedYear": "string (Year)",
  "tagline": "string",
  "executiveSummary": "A concise 3-4 sentence summary of the entire business.",
  "problemStatement": "A clear, detailed description of the customer problem they solve.",
  "solution": "A detailed description of their product or service and how it solves the problem.",
  "businessModel": "How the company generates revenue (e.g., SaaS tiers, transaction fees, etc.).",
  "marketAnalysis": {
    "sizeTAM": "string (Total Addressable Market size, e.g., '$150B')",
    "sizeSAM": "string (Serviceable Addressable Market size, e.g., '$15B')",
    "sizeSOM": "string (Serviceable Obtainable Market size, e.g., '$1.5B')",
    "keyTrends": ["List of key market trends benefiting the company."],
    "targetCustomer": "A description of the ideal customer profile.",
    "competitors": [
      {
        "name": "string",
        "description": "string"
      }
    ]
  },
  "team": [
    {
      "name": "string",
      "title": "string",
      "background": "A summary of their relevant experience."
    }
  ],
  "financials": {
    "totalFunding": "string",
    "lastRound": "string (e.g., 'Series A, $6.5M, led by Capital Ventures')",
    "revenue": "string (e.g., '$1.2M ARR')",
    "valuation": "string (e.g., '$50M')",
    "fundingRounds": [
      {
        "type": "string",
        "amount": "string",
        "date": "string",
        "leadInvestor": "string"
      }
    ]
  },
  "productOverview": "string",
  "technologyStack": ["List of technologies used"],
  "intellectualProperty": ["List of patents, trademarks, etc."],
  "swotAnalysis": {
    "strengths": ["List of internal strengths."],
    "weaknesses": ["List of internal weaknesses."],
    "opportunities": ["List of external market opportunities."],
    "threats": ["List of external market threats."]
  }
}"#;

/// Build the full research prompt for one company.
pub fn build_research_prompt(company_name: &str, website: &str, context: &str) -> String {
    let website = if website.trim().is_empty() {
        "unknown"
    } else {
        website
    };

    let mut prompt = format!(
        "You are a world-class Tier 1 financial and market research analyst.\n\
         Your sole task is to conduct a deep, multi-source investigation of the company \
         '{company_name}' (website: {website}).\n\
         You must investigate their business model, market positioning, financials, team, \
         technology, and competitive landscape.\n"
    );

    if !context.trim().is_empty() {
        prompt.push_str("\nRESEARCH CONTEXT:\n");
        prompt.push_str(context.trim());
        prompt.push_str(
            "\n\nUse the provided context to enhance your research and provide more \
             accurate, detailed insights. Cross-reference the provided materials with \
             your external research to create the most comprehensive analysis possible.\n",
        );
    }

    prompt.push_str(
        "\nSynthesize all of your findings into a single, structured JSON object. Do not \
         write any prose or explanations outside of the JSON.\n\
         The JSON object must strictly adhere to the following schema. If you cannot find \
         information for a field, you MUST return an empty string \"\" or an empty array [].\n\
         \nJSON SCHEMA:\n",
    );
    prompt.push_str(RESEARCH_SCHEMA);
    prompt.push_str("\n\nRespond ONLY with the JSON object. No additional text.\n");

    prompt
}
