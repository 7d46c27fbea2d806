//! HubSpot CRM retrieval and normalization of deals into records

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use shared::{Record, UNKNOWN, component_debug, component_warn, logging};
use crate::core::rate_limiter::{RateLimitConfig, RateLimiter};
use crate::error::{FinderError, FinderResult};

pub const HUBSPOT_BASE_URL: &str = "https://api.hubapi.com";

/// Page size ceiling of the deals search endpoint
const SEARCH_BATCH: usize = 100;

const DEAL_PROPERTIES: [&str; 6] = [
    "dealname",
    "amount",
    "closedate",
    "createdate",
    "dealstage",
    "hubspot_owner_id",
];

/// Retry budget for CRM calls answered with 429
///
/// The wait after failed attempt `n` (0-based) is `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrmBackoff {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for CrmBackoff {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl CrmBackoff {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Deal as returned by the CRM search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HubSpotDeal {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
}

impl HubSpotDeal {
    /// Property value, empty when missing or null
    pub fn property(&self, name: &str) -> String {
        self.properties.get(name).cloned().flatten().unwrap_or_default()
    }

    pub fn to_record(&self, owner: String, companies: Vec<String>) -> Record {
        let stage = self.property("dealstage");
        Record {
            id: self.id.clone(),
            name: self.property("dealname"),
            owner,
            amount: self.property("amount"),
            close_date: self.property("closedate"),
            stage: (!stage.is_empty()).then_some(stage),
            companies,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<HubSpotDeal>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
struct NextPage {
    after: String,
}

#[derive(Debug, Deserialize)]
struct AssociationPage {
    #[serde(default)]
    results: Vec<Association>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Association {
    to_object_id: u64,
}

#[derive(Debug, Deserialize)]
struct BatchReadResponse {
    #[serde(default)]
    results: Vec<CrmObject>,
}

#[derive(Debug, Deserialize)]
struct CrmObject {
    #[serde(default)]
    properties: HashMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    email: Option<String>,
}

/// Rate-limited HubSpot client producing normalized records
pub struct HubSpotClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    limiter: RateLimiter,
    backoff: CrmBackoff,
}

impl HubSpotClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            base_url: HUBSPOT_BASE_URL.to_string(),
            limiter: RateLimiter::new("crm", RateLimitConfig::CRM),
            backoff: CrmBackoff::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.limiter = RateLimiter::new("crm", config);
        self
    }

    pub fn with_backoff(mut self, backoff: CrmBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetch up to `limit` deals and normalize each of them, in CRM order
    pub async fn fetch_records(&self, limit: usize) -> FinderResult<Vec<Record>> {
        let deals = self.fetch_deals(limit).await?;
        logging::log_success("crm", &format!("Successfully fetched {} deals.", deals.len()));

        let mut records = Vec::with_capacity(deals.len());
        for deal in &deals {
            let record = match self.normalize_deal(deal).await {
                Ok(record) => record,
                Err(e) => {
                    logging::log_error("crm", &format!("Processing deal {}", deal.id), &e);
                    deal.to_record(UNKNOWN.to_string(), Vec::new())
                }
            };
            records.push(record);
        }

        Ok(records)
    }

    /// Page through the deals search endpoint, newest first
    ///
    /// A failure on the first page is returned; a failure on a later page
    /// ends pagination with the deals collected so far.
    pub async fn fetch_deals(&self, limit: usize) -> FinderResult<Vec<HubSpotDeal>> {
        let mut deals: Vec<HubSpotDeal> = Vec::new();
        let mut after: Option<String> = None;

        while deals.len() < limit {
            let batch_limit = SEARCH_BATCH.min(limit - deals.len());
            let mut search_request = json!({
                "sorts": [{ "propertyName": "createdate", "direction": "DESCENDING" }],
                "properties": DEAL_PROPERTIES,
                "limit": batch_limit,
            });
            if let Some(cursor) = &after {
                search_request["after"] = json!(cursor);
            }

            let page: SearchPage = match self
                .send_json(Method::POST, "/crm/v3/objects/deals/search", Some(&search_request))
                .await
            {
                Ok(page) => page,
                Err(e) if deals.is_empty() => return Err(e),
                Err(e) => {
                    logging::log_error("crm", "Fetching deals", &e);
                    break;
                }
            };

            deals.extend(page.results);
            match page.paging.and_then(|paging| paging.next) {
                Some(next) => after = Some(next.after),
                None => break,
            }
        }

        deals.truncate(limit);
        Ok(deals)
    }

    /// Resolve associated company names and the owner email of a deal
    pub async fn normalize_deal(&self, deal: &HubSpotDeal) -> FinderResult<Record> {
        let company_ids = self.associated_company_ids(&deal.id).await?;
        let companies = self.company_names(&company_ids).await?;
        let owner = self.owner_email(&deal.property("hubspot_owner_id")).await;

        Ok(deal.to_record(owner, companies))
    }

    async fn associated_company_ids(&self, deal_id: &str) -> FinderResult<Vec<u64>> {
        let page: AssociationPage = self
            .send_json(
                Method::GET,
                &format!("/crm/v4/objects/deals/{deal_id}/associations/companies"),
                None,
            )
            .await?;

        Ok(page.results.into_iter().map(|association| association.to_object_id).collect())
    }

    async fn company_names(&self, company_ids: &[u64]) -> FinderResult<Vec<String>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<Value> = company_ids.iter().map(|id| json!({ "id": id.to_string() })).collect();
        let batch_request = json!({ "properties": ["name"], "inputs": inputs });

        let batch: BatchReadResponse = self
            .send_json(Method::POST, "/crm/v3/objects/companies/batch/read", Some(&batch_request))
            .await?;

        Ok(batch
            .results
            .into_iter()
            .map(|company| company.properties.get("name").cloned().flatten().unwrap_or_default())
            .collect())
    }

    /// Owner email, or [`UNKNOWN`] when the deal has no owner or the lookup fails
    async fn owner_email(&self, owner_id: &str) -> String {
        if owner_id.is_empty() {
            return UNKNOWN.to_string();
        }

        let path = format!("/crm/v3/owners/{owner_id}?idProperty=id&archived=false");
        match self.send_json::<Owner>(Method::GET, &path, None).await {
            Ok(owner) => owner.email.filter(|email| !email.is_empty()).unwrap_or_else(|| UNKNOWN.to_string()),
            Err(e) => {
                component_warn!("crm", owner_id, "Exception when fetching owner details: {}", e);
                UNKNOWN.to_string()
            }
        }
    }

    /// Rate-limited request with exponential backoff on 429
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> FinderResult<T> {
        let url = format!("{}{}", self.base_url, path);

        for attempt in 0..self.backoff.max_attempts {
            self.limiter.acquire().await;

            let mut request = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(&self.access_token);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt + 1 < self.backoff.max_attempts {
                    let delay = self.backoff.delay_for(attempt);
                    component_warn!(
                        "crm",
                        attempt,
                        "Rate limit hit. Retrying in {} seconds...",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                continue;
            }

            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(FinderError::CrmError {
                    message: format!("{method} {path} returned {status}: {detail}"),
                });
            }

            component_debug!("crm", %status, "{} {}", method, path);
            return Ok(response.json::<T>().await?);
        }

        Err(FinderError::CrmRateLimited { attempts: self.backoff.max_attempts })
    }
}
