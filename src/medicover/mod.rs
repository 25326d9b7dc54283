pub mod client;
pub mod constants;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::RemoteError;
use crate::models::appointment::Appointment;
use crate::models::directory::{Clinic, Doctor, Region, Specialty};
use crate::models::selector::DoctorSelector;

pub use client::{MedicoverClient, MedicoverSession};

/// Free-slot lookup over an authenticated session.
#[async_trait]
pub trait SlotSource {
    async fn free_slots(
        &self,
        selector: &DoctorSelector,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, RemoteError>;
}

/// The Region -> Specialty -> Clinic -> Doctor catalogue.
#[async_trait]
pub trait Directory {
    async fn regions(&self) -> Result<Vec<Region>, RemoteError>;

    async fn specialties(&self, region_id: i64) -> Result<Vec<Specialty>, RemoteError>;

    async fn clinics(&self, region_id: i64, specialty_id: i64)
    -> Result<Vec<Clinic>, RemoteError>;

    async fn doctors(
        &self,
        region_id: i64,
        specialty_id: i64,
        clinic_id: i64,
    ) -> Result<Vec<Doctor>, RemoteError>;
}
