//! MediaWiki API client used as the page source for `update`.

use anyhow::{Context, Result};
use log::debug;
use onthisday_core::{plain_text, FetchedPage, PageSource, SourceError};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct MediaWikiSource {
    http: reqwest::blocking::Client,
    api_url: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<QueryPage>,
}

#[derive(Deserialize)]
struct QueryPage {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    revisions: Vec<QueryRevision>,
}

#[derive(Deserialize)]
struct QueryRevision {
    revid: i64,
    slots: RevisionSlots,
}

#[derive(Deserialize)]
struct RevisionSlots {
    main: MainSlot,
}

#[derive(Deserialize)]
struct MainSlot {
    content: String,
}

impl MediaWikiSource {
    pub fn new(api_url: &str, user_agent: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            api_url: api_url.to_string(),
        })
    }
}

impl PageSource for MediaWikiSource {
    fn fetch(&self, page_id: &str) -> Result<FetchedPage, SourceError> {
        debug!("event=page_fetch module=source status=start page={page_id}");
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "revisions"),
                ("rvprop", "ids|content"),
                ("rvslots", "main"),
                ("redirects", "1"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", page_id),
            ])
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let body: QueryResponse = response
            .json()
            .map_err(|err| SourceError::InvalidResponse(err.to_string()))?;
        let page = page_from_response(page_id, body)?;
        debug!(
            "event=page_fetch module=source status=ok page={} revision={}",
            page_id, page.revision_id
        );
        Ok(page)
    }
}

fn page_from_response(page_id: &str, body: QueryResponse) -> Result<FetchedPage, SourceError> {
    let page = body
        .query
        .and_then(|query| query.pages.into_iter().next())
        .ok_or_else(|| SourceError::InvalidResponse(format!("no page in response for {page_id}")))?;
    if page.missing || page.invalid {
        return Err(SourceError::MissingPage(page_id.to_string()));
    }

    let revision = page.revisions.into_iter().next().ok_or_else(|| {
        SourceError::InvalidResponse(format!("no revision in response for {page_id}"))
    })?;
    Ok(FetchedPage {
        revision_id: revision.revid,
        plain_text: plain_text(&revision.slots.main.content),
    })
}

#[cfg(test)]
mod tests {
    use super::{page_from_response, QueryResponse};
    use onthisday_core::SourceError;

    fn parse(json: &str) -> QueryResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn revision_content_is_reduced_to_plain_text() {
        let body = parse(
            r#"{"batchcomplete":true,"query":{"pages":[{"pageid":9,"ns":0,"title":"February 14",
            "revisions":[{"revid":1234,"parentid":1200,"slots":{"main":{"contentmodel":"wikitext",
            "contentformat":"text/x-wiki",
            "content":"==Events==\n* [[1876]] &ndash; [[Alexander Graham Bell]] applies for a patent.<ref>cite</ref>"}}}]}]}}"#,
        );
        let page = page_from_response("February_14", body).unwrap();
        assert_eq!(page.revision_id, 1234);
        assert_eq!(
            page.plain_text,
            "==Events==\n* 1876 – Alexander Graham Bell applies for a patent."
        );
    }

    #[test]
    fn missing_page_is_reported() {
        let body = parse(
            r#"{"query":{"pages":[{"ns":0,"title":"Smarch 3","missing":true}]}}"#,
        );
        assert_eq!(
            page_from_response("Smarch_3", body).unwrap_err(),
            SourceError::MissingPage("Smarch_3".to_string())
        );
    }

    #[test]
    fn malformed_response_is_invalid() {
        let body = parse(r#"{"error":{"code":"badvalue"}}"#);
        assert!(matches!(
            page_from_response("March_3", body),
            Err(SourceError::InvalidResponse(_))
        ));
    }
}
