use std::fmt;

use serde::Serialize;
use serde_json::Number;

use crate::document::Document;
use crate::format::{capitalize, format_usd};
use crate::report::RiskClassification;

const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN: &str = "Unknown";

/// The fixed projection of a report that the terminal summary is built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub rugged: bool,
    pub result: Option<RiskClassification>,
    pub risk_score: Option<Number>,
    pub risks: Vec<RiskEntry>,
    pub mint: Option<String>,
    pub total_market_liquidity: Option<f64>,
    /// `None` when the report carries no verification block at all.
    pub links: Option<Vec<LinkEntry>>,
    pub detected_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEntry {
    pub name: Option<String>,
    pub level: Option<String>,
    pub score: Option<Number>,
    pub description: Option<String>,
    /// Carried as reported; the renderer hides falsy values.
    pub value: Option<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkEntry {
    pub provider: Option<String>,
    pub value: Option<String>,
}

impl Summary {
    pub fn from_report(report: &Document) -> Self {
        let risk_score = report.get("score").and_then(Document::as_number).cloned();
        let result = risk_score
            .as_ref()
            .and_then(Number::as_f64)
            .map(RiskClassification::from_score);

        let links = report
            .get("verification")
            .filter(|v| v.is_truthy())
            .map(|verification| {
                entries(verification.get("links"))
                    .map(LinkEntry::from_document)
                    .collect()
            });

        Self {
            name: text(report.path(&["tokenMeta", "name"])),
            symbol: text(report.path(&["tokenMeta", "symbol"])),
            rugged: report.get("rugged").is_some_and(Document::is_truthy),
            result,
            risk_score,
            risks: entries(report.get("risks"))
                .map(RiskEntry::from_document)
                .collect(),
            mint: text(report.get("mint")),
            total_market_liquidity: report
                .get("totalMarketLiquidity")
                .and_then(Document::as_f64),
            links,
            detected_at: text(report.get("detectedAt")),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    pub fn render(&self) -> String {
        let score = self.risk_score.as_ref().map(Number::to_string);
        let result = self.result.map(|r| r.as_str());

        let mut lines = vec![
            format!("Name: {} ({})", or_na(&self.name), or_na(&self.symbol)),
            format!("Rugged: {}", if self.rugged { "Yes" } else { "No" }),
            format!("Result: {}", result.unwrap_or(NOT_AVAILABLE)),
            format!("Risk Score: {}", score.as_deref().unwrap_or(NOT_AVAILABLE)),
            format!("Mint Address: {}", or_na(&self.mint)),
            format!(
                "Total Market Liquidity: {}",
                format_usd(self.total_market_liquidity.unwrap_or(0.0))
            ),
        ];

        lines.push("\nRisks:".to_string());
        if self.risks.is_empty() {
            lines.push("  No significant risks detected.".to_string());
        }
        for risk in &self.risks {
            let risk_score = risk.score.as_ref().map(Number::to_string);
            lines.push(format!(
                "  - {} (Level: {}, Score: {})",
                risk.name.as_deref().unwrap_or(UNKNOWN),
                or_na(&risk.level),
                or_na(&risk_score)
            ));
            lines.push(format!(
                "    Description: {}",
                risk.description
                    .as_deref()
                    .unwrap_or("No description available")
            ));
            if let Some(value) = risk.value.as_ref().filter(|v| v.is_truthy()) {
                lines.push(format!("    Value: {}", value.to_text()));
            }
        }

        lines.push("\nLinks:".to_string());
        match self.links.as_deref() {
            Some(links) if !links.is_empty() => {
                for link in links {
                    lines.push(format!(
                        "  - {}: {}",
                        capitalize(link.provider.as_deref().unwrap_or(UNKNOWN)),
                        link.value.as_deref().unwrap_or("No link provided")
                    ));
                }
            }
            _ => lines.push("  No links provided.".to_string()),
        }

        lines.push(format!("\nDetected At: {}", or_na(&self.detected_at)));
        lines.join("\n")
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl RiskEntry {
    fn from_document(risk: &Document) -> Self {
        Self {
            name: text(risk.get("name")),
            level: text(risk.get("level")),
            score: risk.get("score").and_then(Document::as_number).cloned(),
            description: text(risk.get("description")),
            value: risk.get("value").filter(|v| !v.is_null()).cloned(),
        }
    }
}

impl LinkEntry {
    fn from_document(link: &Document) -> Self {
        Self {
            provider: text(link.get("provider")),
            value: text(link.get("value")),
        }
    }
}

fn text(doc: Option<&Document>) -> Option<String> {
    doc.filter(|d| !d.is_null()).map(Document::to_text)
}

fn entries(doc: Option<&Document>) -> impl Iterator<Item = &Document> {
    doc.and_then(Document::as_array).unwrap_or_default().iter()
}

fn or_na(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn full_report() -> Document {
        Document::wrap(json!({
            "mint": "D48ayM5GxcXgWiH4afe2U5Zc9Y49akvqgekZT4oDpump",
            "score": 5301,
            "rugged": false,
            "tokenMeta": {"name": "Doge Pump", "symbol": "DPUMP"},
            "totalMarketLiquidity": 1234.5,
            "risks": [
                {
                    "name": "Top 10 holders high ownership",
                    "level": "danger",
                    "score": 5000,
                    "description": "The top 10 users hold more than 70% token supply",
                    "value": "82.15%"
                },
                {
                    "name": "Low amount of LP Providers",
                    "level": "warn",
                    "score": 301,
                    "description": "Only a few users are providing liquidity",
                    "value": ""
                }
            ],
            "verification": {
                "links": [
                    {"provider": "twitter", "value": "https://x.com/dpump"},
                    {"provider": "WEBSITE", "value": "https://dpump.fun"}
                ]
            },
            "detectedAt": "2025-01-14T09:21:44.123Z"
        }))
    }

    #[test]
    fn test_render_full_report() {
        let rendered = Summary::from_report(&full_report()).render();
        let expected = "\
Name: Doge Pump (DPUMP)
Rugged: No
Result: Danger
Risk Score: 5301
Mint Address: D48ayM5GxcXgWiH4afe2U5Zc9Y49akvqgekZT4oDpump
Total Market Liquidity: $1,234.50

Risks:
  - Top 10 holders high ownership (Level: danger, Score: 5000)
    Description: The top 10 users hold more than 70% token supply
    Value: 82.15%
  - Low amount of LP Providers (Level: warn, Score: 301)
    Description: Only a few users are providing liquidity

Links:
  - Twitter: https://x.com/dpump
  - Website: https://dpump.fun

Detected At: 2025-01-14T09:21:44.123Z";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_empty_report_uses_placeholders() {
        let rendered = Summary::from_report(&Document::empty()).render();
        let expected = "\
Name: N/A (N/A)
Rugged: No
Result: N/A
Risk Score: N/A
Mint Address: N/A
Total Market Liquidity: $0.00

Risks:
  No significant risks detected.

Links:
  No links provided.

Detected At: N/A";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_summary_projection_fields() {
        let summary = Summary::from_report(&full_report());
        assert_eq!(summary.name.as_deref(), Some("Doge Pump"));
        assert_eq!(summary.symbol.as_deref(), Some("DPUMP"));
        assert!(!summary.rugged);
        assert_eq!(summary.result, Some(RiskClassification::Danger));
        assert_eq!(summary.risk_score, Some(Number::from(5301)));
        assert_eq!(summary.risks.len(), 2);
        assert_eq!(summary.total_market_liquidity, Some(1234.5));
        assert_eq!(summary.links.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            summary.detected_at.as_deref(),
            Some("2025-01-14T09:21:44.123Z")
        );
    }

    #[test]
    fn test_missing_verification_yields_no_links() {
        let report = Document::wrap(json!({"verification": null}));
        assert_eq!(Summary::from_report(&report).links, None);

        let report = Document::wrap(json!({"verification": {"links": []}}));
        let summary = Summary::from_report(&report);
        assert_eq!(summary.links, Some(vec![]));
        assert!(summary.render().contains("  No links provided."));
    }

    #[test]
    fn test_risk_defaults() {
        let report = Document::wrap(json!({"risks": [{}]}));
        let rendered = Summary::from_report(&report).render();
        assert!(rendered.contains("  - Unknown (Level: N/A, Score: N/A)"));
        assert!(rendered.contains("    Description: No description available"));
        assert!(!rendered.contains("Value:"));
    }

    #[test]
    fn test_link_defaults() {
        let report = Document::wrap(json!({"verification": {"links": [{}]}}));
        let rendered = Summary::from_report(&report).render();
        assert!(rendered.contains("  - Unknown: No link provided"));
    }

    #[test]
    fn test_rugged_flag() {
        let rugged = Document::wrap(json!({"rugged": true}));
        assert!(Summary::from_report(&rugged).render().contains("Rugged: Yes"));

        let not_rugged = Document::wrap(json!({"rugged": null}));
        assert!(Summary::from_report(&not_rugged).render().contains("Rugged: No"));
    }

    #[test]
    fn test_float_score_is_printed_verbatim() {
        let report = Document::wrap(json!({"score": 999.5}));
        let summary = Summary::from_report(&report);
        assert_eq!(summary.result, Some(RiskClassification::Good));
        assert!(summary.render().contains("Risk Score: 999.5"));
    }

    #[test]
    fn test_non_numeric_score_has_no_classification() {
        let report = Document::wrap(json!({"score": "high"}));
        let summary = Summary::from_report(&report);
        assert_eq!(summary.result, None);
        assert_eq!(summary.risk_score, None);
    }

    #[test]
    fn test_to_value_uses_camel_case_keys() {
        let value = Summary::from_report(&full_report()).to_value();
        assert_eq!(value["riskScore"], json!(5301));
        assert_eq!(value["result"], json!("Danger"));
        assert_eq!(value["totalMarketLiquidity"], json!(1234.5));
        assert_eq!(value["detectedAt"], json!("2025-01-14T09:21:44.123Z"));
        assert_eq!(value["links"][0]["provider"], json!("twitter"));
    }

    #[test]
    fn test_risk_entries_keep_numeric_score_and_falsy_value() {
        let report = Document::wrap(json!({
            "risks": [{"name": "A", "level": "warn", "score": 5000, "value": 0}]
        }));
        let summary = Summary::from_report(&report);

        let value = summary.to_value();
        assert_eq!(value["risks"][0]["score"], json!(5000));
        assert_eq!(value["risks"][0]["value"], json!(0));

        let rendered = summary.render();
        assert!(rendered.contains("  - A (Level: warn, Score: 5000)"));
        assert!(!rendered.contains("Value:"));
    }
}
