use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_backend::client::BackendClient;
use shared_config::AppConfig;

use crate::models::{DayEnumRow, DayIdentityMap, DaySlotRecord, UnresolvedDay};
use super::codec;
use super::schedule::WeeklyAvailability;

/// Which kind of entity a schedule belongs to. Doctors and hospitals share
/// the availability model, but the backend stores their slot lists under
/// different field names, and for hospitals the submit and fetch names do
/// not even match each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOwner {
    Doctor,
    Hospital,
}

impl ScheduleOwner {
    fn resource(&self) -> &'static str {
        match self {
            ScheduleOwner::Doctor => "doctors",
            ScheduleOwner::Hospital => "hospitals",
        }
    }

    fn submit_field(&self) -> &'static str {
        match self {
            ScheduleOwner::Doctor => "doctor_slots",
            ScheduleOwner::Hospital => "operating_hrs",
        }
    }

    fn fetch_field(&self) -> &'static str {
        match self {
            ScheduleOwner::Doctor => "doctor_slots",
            ScheduleOwner::Hospital => "operating_hours",
        }
    }
}

/// Loads and persists whole schedules against the external backend. One
/// request per save, last writer wins; there is no optimistic concurrency
/// here, the backend owns that guarantee if anyone does.
pub struct ScheduleSyncService {
    backend: BackendClient,
}

impl ScheduleSyncService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    /// Fetch the weekday enumeration and build the day identity map.
    pub async fn fetch_day_map(&self, auth_token: &str) -> Result<DayIdentityMap> {
        debug!("Fetching day enumeration");

        let rows: Vec<DayEnumRow> = self.backend.request(
            Method::GET,
            "/rest/v1/week_days?order=id.asc",
            Some(auth_token),
            None,
        ).await?;

        Ok(DayIdentityMap::from_rows(&rows))
    }

    /// Load an entity's schedule from its embedded flat slot list. A missing
    /// or null slot field is an empty schedule, not an error.
    pub async fn fetch_schedule(
        &self,
        owner: ScheduleOwner,
        entity_id: &str,
        day_map: &DayIdentityMap,
        auth_token: &str,
    ) -> Result<(WeeklyAvailability, Vec<UnresolvedDay>)> {
        debug!("Fetching {} schedule for {}", owner.resource(), entity_id);

        let path = format!("/rest/v1/{}?id=eq.{}", owner.resource(), entity_id);
        let result: Vec<Value> = self.backend.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let entity = result
            .first()
            .ok_or_else(|| anyhow!("{} not found: {}", owner.resource(), entity_id))?;

        let records: Vec<DaySlotRecord> = match entity.get(owner.fetch_field()) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone())?,
        };

        Ok(codec::from_records(&records, day_map))
    }

    /// Persist the whole schedule in one shot under the owner's submit
    /// field. Assigned slot ids are not assumed to be echoed back; callers
    /// re-fetch when they need them.
    pub async fn save_schedule(
        &self,
        owner: ScheduleOwner,
        entity_id: &str,
        availability: &WeeklyAvailability,
        day_map: &DayIdentityMap,
        auth_token: &str,
    ) -> Result<Vec<UnresolvedDay>> {
        debug!("Saving {} schedule for {}", owner.resource(), entity_id);

        let (records, unresolved) = codec::to_records(availability, day_map);

        let mut body = serde_json::Map::new();
        body.insert(
            owner.submit_field().to_string(),
            serde_json::to_value(&records)?,
        );

        let path = format!("/rest/v1/{}?id=eq.{}", owner.resource(), entity_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let _: Vec<Value> = self.backend.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(Value::Object(body)),
            Some(headers),
        ).await?;

        Ok(unresolved)
    }
}
