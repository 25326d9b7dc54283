use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::medicover::constants::*;
use crate::medicover::{Directory, SlotSource};
use crate::models::appointment::Appointment;
use crate::models::directory::{Clinic, Doctor, Region, Specialty};
use crate::models::selector::DoctorSelector;

// fault bodies can be whole HTML pages
const MAX_FAULT_BODY: usize = 512;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    application: &'a str,
    device_id: String,
    platform: &'a str,
    os_version: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginTicket {
    ticket_id: Option<String>,
    id: Option<i64>,
}

#[derive(Serialize)]
struct Call<'a> {
    #[serde(rename = "ticketId")]
    ticket_id: &'a str,
    input: Value,
}

/// Unauthenticated handle on the Medicover JSON service.
#[derive(Debug, Clone)]
pub struct MedicoverClient {
    http: reqwest::Client,
    base: Url,
}

impl MedicoverClient {
    pub fn new(base: Url) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| RemoteError::Transport {
                operation: "client setup",
                source,
            })?;
        Ok(Self::with_http(http, base))
    }

    fn with_http(http: reqwest::Client, base: Url) -> Self {
        MedicoverClient { http, base }
    }

    /// Logs in with card id and password and returns a ticket-bearing session.
    pub async fn login(self, card_id: &str, password: &str) -> Result<MedicoverSession, RemoteError> {
        let request = LoginRequest {
            username: card_id,
            password,
            application: APPLICATION_ID,
            device_id: Uuid::new_v4().to_string(),
            platform: PLATFORM,
            os_version: OS_VERSION,
        };

        let reply: LoginTicket = self.post(OP_LOGIN, &request).await?;
        let (ticket, person_id) = accept_ticket(reply)?;

        debug!(ticket = %ticket, "login ticket issued");
        info!(person_id = ?person_id, "successfully logged in");
        Ok(MedicoverSession {
            client: self,
            ticket,
            person_id,
        })
    }

    async fn post<B, T>(&self, operation: &'static str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.base.join(operation)?;
        debug!(%url, "calling {}", operation);

        let transport = |source| RemoteError::Transport { operation, source };
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(RemoteError::Fault {
                operation,
                status: status.as_u16(),
                body: text.chars().take(MAX_FAULT_BODY).collect(),
            });
        }

        serde_json::from_str(&text).map_err(|source| RemoteError::Decode { operation, source })
    }
}

fn accept_ticket(reply: LoginTicket) -> Result<(String, Option<i64>), RemoteError> {
    match reply.ticket_id {
        Some(ticket) if !ticket.is_empty() => Ok((ticket, reply.id)),
        _ => Err(RemoteError::LoginRejected),
    }
}

/// Authenticated session; every call carries the login ticket.
#[derive(Debug, Clone)]
pub struct MedicoverSession {
    client: MedicoverClient,
    ticket: String,
    person_id: Option<i64>,
}

impl MedicoverSession {
    pub fn person_id(&self) -> Option<i64> {
        self.person_id
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        input: Value,
    ) -> Result<T, RemoteError> {
        let call = Call {
            ticket_id: &self.ticket,
            input,
        };
        self.client.post(operation, &call).await
    }

    // catalogue operations answer `null` instead of `[]`
    async fn call_list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        input: Value,
    ) -> Result<Vec<T>, RemoteError> {
        let items: Option<Vec<T>> = self.call(operation, input).await?;
        Ok(items.unwrap_or_default())
    }
}

#[async_trait]
impl SlotSource for MedicoverSession {
    async fn free_slots(
        &self,
        selector: &DoctorSelector,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, RemoteError> {
        self.call_list(OP_FREE_SLOTS, free_slots_input(selector, start, end))
            .await
    }
}

fn free_slots_input(selector: &DoctorSelector, start: NaiveDateTime, end: NaiveDateTime) -> Value {
    json!({
        "RegionId": selector.region_id,
        "SpecialtyId": selector.specialty_id,
        "ClinicId": selector.clinic_id,
        "DoctorId": selector.doctor_id,
        "StartDate": start,
        "EndDate": end,
    })
}

#[async_trait]
impl Directory for MedicoverSession {
    async fn regions(&self) -> Result<Vec<Region>, RemoteError> {
        self.call_list(OP_REGIONS, json!({})).await
    }

    async fn specialties(&self, region_id: i64) -> Result<Vec<Specialty>, RemoteError> {
        self.call_list(OP_SPECIALTIES, json!({ "RegionId": region_id }))
            .await
    }

    async fn clinics(
        &self,
        region_id: i64,
        specialty_id: i64,
    ) -> Result<Vec<Clinic>, RemoteError> {
        self.call_list(
            OP_CLINICS,
            json!({ "RegionId": region_id, "SpecialtyId": specialty_id }),
        )
        .await
    }

    async fn doctors(
        &self,
        region_id: i64,
        specialty_id: i64,
        clinic_id: i64,
    ) -> Result<Vec<Doctor>, RemoteError> {
        self.call_list(
            OP_DOCTORS,
            json!({
                "RegionId": region_id,
                "SpecialtyId": specialty_id,
                "ClinicId": clinic_id,
            }),
        )
        .await
    }
}
