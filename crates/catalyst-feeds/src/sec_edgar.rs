use async_trait::async_trait;
use catalyst_models::RawItem;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::FeedError;
use crate::fetcher::FeedFetcher;
use crate::normalize::{normalize_link, normalize_title};

#[derive(Debug, Deserialize)]
struct EdgarFiling {
    #[serde(rename = "accessionNumber")]
    accession_number: String,
    #[serde(rename = "filingDate")]
    filing_date: String,
    form: String,
    #[serde(rename = "primaryDocument")]
    primary_document: String,
    #[serde(rename = "cik")]
    cik: String,
}

#[derive(Debug, Deserialize)]
struct EdgarRecentFilings {
    recent: EdgarRecentBlock,
}

#[derive(Debug, Deserialize)]
struct EdgarRecentBlock {
    #[serde(rename = "accessionNumber")]
    accession_number: Vec<String>,
    #[serde(rename = "filingDate")]
    filing_date: Vec<String>,
    form: Vec<String>,
    #[serde(rename = "primaryDocument")]
    primary_document: Vec<String>,
}

/// SEC EDGAR full-text/filings fetcher. Requires a descriptive User-Agent
/// per SEC fair-access policy (spec.md §4.E, §6). Canonical ID is the
/// filing's accession number, which is globally unique and stable.
pub struct SecEdgarFetcher {
    client: reqwest::Client,
    base_url: String,
    cik: String,
}

impl SecEdgarFetcher {
    pub fn new(user_agent: impl AsRef<str>, cik: impl Into<String>) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.as_ref().to_string())
            .build()?;
        Ok(Self {
            client,
            base_url: "https://data.sec.gov".to_string(),
            cik: cik.into(),
        })
    }

    #[cfg(test)]
    fn with_base_url(user_agent: &str, cik: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent.to_string())
                .build()
                .unwrap(),
            base_url: base_url.into(),
            cik: cik.into(),
        }
    }

    fn filing_link(&self, filing: &EdgarFiling) -> String {
        let accession_nodash = filing.accession_number.replace('-', "");
        normalize_link(&format!(
            "{}/Archives/edgar/data/{}/{}/{}",
            self.base_url, filing.cik, accession_nodash, filing.primary_document
        ))
    }
}

#[async_trait]
impl FeedFetcher for SecEdgarFetcher {
    fn source_id(&self) -> String {
        "sec_edgar".to_string()
    }

    async fn fetch(&self, since: DateTime<Utc>) -> Result<Vec<RawItem>, FeedError> {
        let url = format!("{}/submissions/CIK{}.json", self.base_url, self.cik);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Parse(format!(
                "SEC EDGAR returned {} for CIK {}",
                response.status(),
                self.cik
            )));
        }

        let payload: EdgarRecentFilings = response.json().await?;
        let block = payload.recent;
        let observed = Utc::now();
        let count = block.accession_number.len();

        let mut items = Vec::new();
        for i in 0..count {
            let filing = EdgarFiling {
                accession_number: block.accession_number[i].clone(),
                filing_date: block.filing_date[i].clone(),
                form: block.form[i].clone(),
                primary_document: block.primary_document.get(i).cloned().unwrap_or_default(),
                cik: self.cik.clone(),
            };

            let ts_published = chrono::NaiveDate::parse_from_str(&filing.filing_date, "%Y-%m-%d")
                .map_err(|e| FeedError::Parse(e.to_string()))?
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc();

            if ts_published < since {
                continue;
            }

            items.push(RawItem {
                source_id: self.source_id(),
                canonical_id: filing.accession_number.clone(),
                ts_published,
                ts_observed: observed,
                title: normalize_title(&format!("{} filing {}", filing.form, filing.accession_number)),
                body_snippet: None,
                link: self.filing_link(&filing),
                tickers_hint: vec![],
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filing_link_strips_dashes_from_accession_number() {
        let fetcher = SecEdgarFetcher::with_base_url("test agent a@b.com", "0000320193", "https://data.sec.gov");
        let filing = EdgarFiling {
            accession_number: "0000320193-24-000123".to_string(),
            filing_date: "2024-01-15".to_string(),
            form: "8-K".to_string(),
            primary_document: "doc.htm".to_string(),
            cik: "0000320193".to_string(),
        };
        let link = fetcher.filing_link(&filing);
        assert!(link.contains("000032019324000123"));
        assert!(link.ends_with("doc.htm"));
    }

    #[test]
    fn source_id_is_stable() {
        let fetcher = SecEdgarFetcher::with_base_url("ua", "1", "https://data.sec.gov");
        assert_eq!(fetcher.source_id(), "sec_edgar");
    }
}
