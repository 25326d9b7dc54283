use serde::Deserialize;

use crate::models::selector::DoctorSelector;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Region {
    pub region_id: i64,
    pub region_public_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Specialty {
    pub specialty_id: i64,
    pub specialty_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Clinic {
    pub clinic_id: i64,
    pub clinic_public_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Doctor {
    pub doctor_id: i64,
    pub doctor_name: String,
}

/// One row of the `--list` output: a selector plus the names behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorLocator {
    pub selector: DoctorSelector,
    pub region_name: String,
    pub clinic_name: String,
    pub specialty_name: String,
    pub doctor_name: String,
}
