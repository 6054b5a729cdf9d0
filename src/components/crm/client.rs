use super::models::{Attendance, Event, Page, Person};
use crate::components::CrmSource;
use crate::config::Config;
use crate::error::{decode_error, remote_error, SyncResult, CRM_SERVICE};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Header carrying the CRM API token
pub const API_TOKEN_HEADER: &str = "OSDI-API-Token";

/// Embedded collection keys of the list endpoints
pub mod keys {
    pub const EVENTS: &str = "osdi:events";
    pub const PEOPLE: &str = "osdi:people";
    pub const ATTENDANCES: &str = "osdi:attendances";
}

/// Client for the OSDI REST API of the CRM
#[derive(Debug, Clone)]
pub struct CrmClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl CrmClient {
    /// Create a client against `base`, which must end in `/`
    pub fn new(base: Url, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base,
            api_key: api_key.into(),
        }
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.crm_api_base.clone(), config.crm_api_key.clone())
    }

    /// Fetch a single person by bare id
    pub async fn get_person(&self, person_id: &str) -> SyncResult<Person> {
        let url = self.resolve(&format!("people/{}", person_id))?;
        self.get_json(&url).await
    }

    /// Fetch every page of a list endpoint and collect the embedded items
    pub async fn fetch_all<T: DeserializeOwned>(&self, route: &str, key: &str) -> SyncResult<Vec<T>> {
        let mut current = self.resolve(route)?;
        let mut visited = HashSet::new();
        let mut items = Vec::new();

        loop {
            let route = self.route_of(&current);
            debug!("Fetching CRM page {}", route);

            let mut page: Page = self.get_json(&current).await?;
            visited.insert(current.clone());

            let next = page.next_href().map(str::to_string);

            // Convert the embedded collection into typed records
            for value in page.embedded.remove(key).unwrap_or_default() {
                let item = serde_json::from_value(value)
                    .map_err(|e| decode_error(&route, format!("Invalid {} item: {}", key, e)))?;
                items.push(item);
            }

            // Follow the next link unless it points back to a page we've seen
            match next {
                Some(href) => {
                    let next_url = self.resolve(&href)?;
                    if visited.contains(&next_url) {
                        break;
                    }
                    current = next_url;
                }
                None => break,
            }
        }

        debug!("Fetched {} {} items", items.len(), key);
        Ok(items)
    }

    /// Resolve a route or absolute href against the base URL
    fn resolve(&self, href: &str) -> SyncResult<Url> {
        self.base
            .join(href)
            .map_err(|e| decode_error(href, format!("Failed to parse URL: {}", e)))
    }

    /// Route of a URL relative to the base, for logs and errors
    fn route_of(&self, url: &Url) -> String {
        url.as_str()
            .strip_prefix(self.base.as_str())
            .unwrap_or(url.as_str())
            .to_string()
    }

    /// Issue an authenticated GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> SyncResult<T> {
        let route = self.route_of(url);

        let response = self
            .client
            .get(url.clone())
            .header(API_TOKEN_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| remote_error(CRM_SERVICE, &route, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(remote_error(
                CRM_SERVICE,
                &route,
                format!("HTTP {} - {}", status, error_body),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| decode_error(&route, e))
    }
}

#[async_trait]
impl CrmSource for CrmClient {
    async fn list_events(&self) -> SyncResult<Vec<Event>> {
        self.fetch_all("events/", keys::EVENTS).await
    }

    async fn list_all_people(&self) -> SyncResult<Vec<Person>> {
        self.fetch_all("people/", keys::PEOPLE).await
    }

    async fn list_attendances(&self, event_id: &str) -> SyncResult<Vec<Attendance>> {
        self.fetch_all(&format!("events/{}/attendances", event_id), keys::ATTENDANCES)
            .await
    }
}
