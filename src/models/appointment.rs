use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A free slot as returned by `GetFreeSlots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Appointment {
    pub appointment_date: NaiveDateTime,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub clinic_id: i64,
    pub clinic_public_name: String,
    pub specialty_id: i64,
    pub specialty_name: String,
}

impl Appointment {
    /// Ledger key for this slot's doctor.
    pub fn doctor_key(&self) -> String {
        self.doctor_id.to_string()
    }
}
