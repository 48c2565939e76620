use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::Span;

use crate::config::Config;
use crate::document::Document;
use crate::error::AppResult;
use crate::summary::Summary;
use crate::transport::{HttpTransport, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskClassification {
    Good,
    Warning,
    Danger,
}

impl RiskClassification {
    pub const WARNING_THRESHOLD: f64 = 1000.0;
    pub const DANGER_THRESHOLD: f64 = 5000.0;

    /// Closed-open bands: `[.., 1000)` Good, `[1000, 5000)` Warning, `[5000, ..)` Danger.
    pub fn from_score(score: f64) -> Self {
        if score < Self::WARNING_THRESHOLD {
            RiskClassification::Good
        } else if score < Self::DANGER_THRESHOLD {
            RiskClassification::Warning
        } else {
            RiskClassification::Danger
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskClassification::Good => "Good",
            RiskClassification::Warning => "Warning",
            RiskClassification::Danger => "Danger",
        }
    }
}

impl fmt::Display for RiskClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub price: bool,
    pub votes: bool,
}

impl FetchOptions {
    pub fn all() -> Self {
        Self {
            price: true,
            votes: true,
        }
    }

    pub fn with_price(mut self, price: bool) -> Self {
        self.price = price;
        self
    }

    pub fn with_votes(mut self, votes: bool) -> Self {
        self.votes = votes;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Report,
    Price,
    Votes,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Report => "report",
            Endpoint::Price => "price",
            Endpoint::Votes => "votes",
        })
    }
}

/// One token's risk assessment.
///
/// Everything is fetched once, at construction; the documents never change
/// afterwards. Report fields are read through [`RiskReport::get`] rather than
/// copied onto the facade.
#[derive(Clone)]
pub struct RiskReport {
    token_address: String,
    report: Document,
    price: Option<Value>,
    votes: Option<Document>,
}

impl RiskReport {
    /// Fetches from the public endpoints with the default configuration.
    ///
    /// Only building the HTTP client can fail; failed requests degrade to
    /// empty documents.
    pub fn fetch(token_address: &str, options: FetchOptions) -> AppResult<Self> {
        let config = Config::default();
        let transport = HttpTransport::new(&config)?;
        Ok(Self::fetch_with(&transport, &config, token_address, options))
    }

    #[tracing::instrument(
        name = "rugcheck.fetch_report",
        skip_all,
        fields(
            token = %token_address,
            transport = transport.name(),
            fetch.price = options.price,
            fetch.votes = options.votes,
            report.fields = tracing::field::Empty,
        )
    )]
    pub fn fetch_with(
        transport: &dyn Transport,
        config: &Config,
        token_address: &str,
        options: FetchOptions,
    ) -> Self {
        let report = Document::wrap(fetch_or_empty(
            transport,
            Endpoint::Report,
            &config.report_url(token_address),
        ));
        Span::current().record("report.fields", report.len());

        let price = options.price.then(|| {
            fetch_or_empty(transport, Endpoint::Price, &config.price_url(token_address))
        });

        let votes = options.votes.then(|| {
            Document::wrap(fetch_or_empty(
                transport,
                Endpoint::Votes,
                &config.votes_url(token_address),
            ))
        });

        Self::from_parts(token_address, report, price, votes)
    }

    /// Builds a report from already fetched data.
    pub fn from_parts(
        token_address: &str,
        report: Document,
        price: Option<Value>,
        votes: Option<Document>,
    ) -> Self {
        Self {
            token_address: token_address.to_string(),
            report,
            price,
            votes,
        }
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn report(&self) -> &Document {
        &self.report
    }

    /// Price response as plain JSON, present only when requested.
    pub fn price(&self) -> Option<&Value> {
        self.price.as_ref()
    }

    pub fn votes(&self) -> Option<&Document> {
        self.votes.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.report.get(key)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Document) -> &'a Document {
        self.report.get_or(key, default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.report.has(key)
    }

    pub fn to_plain(&self) -> Value {
        self.report.to_plain()
    }

    pub fn to_json(&self) -> AppResult<String> {
        self.report.to_json(false)
    }

    pub fn to_json_pretty(&self) -> AppResult<String> {
        self.report.to_json(true)
    }

    pub fn score(&self) -> Option<f64> {
        self.report.get("score").and_then(Document::as_f64)
    }

    /// `None` when the report has no numeric score.
    pub fn classification(&self) -> Option<RiskClassification> {
        self.score().map(RiskClassification::from_score)
    }

    pub fn has_classification(&self, classification: RiskClassification) -> bool {
        self.classification() == Some(classification)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_report(&self.report)
    }

    pub fn render_summary(&self) -> String {
        self.summary().render()
    }

    /// One-line identification: token, score and result.
    pub fn headline(&self) -> String {
        let score = self
            .report
            .get("score")
            .map(Document::to_text)
            .unwrap_or_else(|| "None".to_string());
        let result = self.classification().map_or("None", |c| c.as_str());
        format!(
            "<RugCheck token={}, score={score}, result={result}>",
            self.token_address
        )
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_summary())
    }
}

impl fmt::Debug for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskReport")
            .field("token_address", &self.token_address)
            .field("score", &self.score())
            .field("classification", &self.classification())
            .field("price", &self.price.is_some())
            .field("votes", &self.votes.is_some())
            .finish()
    }
}

#[tracing::instrument(
    name = "rugcheck.fetch",
    skip_all,
    fields(
        endpoint = %endpoint,
        url = %url,
        http.status_code = tracing::field::Empty,
        error.kind = tracing::field::Empty,
    )
)]
fn fetch_or_empty(transport: &dyn Transport, endpoint: Endpoint, url: &str) -> Value {
    match transport.get_json(url) {
        Ok(value) => {
            Span::current().record("http.status_code", 200);
            tracing::debug!("fetched {endpoint} document");
            value
        }
        Err(e) => {
            let span = Span::current();
            if let Some(status) = e.status() {
                span.record("http.status_code", status);
            }
            span.record("error.kind", e.kind());
            tracing::warn!(error = %e, "{endpoint} fetch failed, using an empty document");
            Value::Object(Map::new())
        }
    }
}
