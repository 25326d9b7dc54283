use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

const DELIMITER: char = '*';

/// Identifies one doctor at one clinic: the query target for a slot scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoctorSelector {
    pub region_id: i64,
    pub specialty_id: i64,
    pub clinic_id: i64,
    pub doctor_id: i64,
}

impl FromStr for DoctorSelector {
    type Err = ConfigError;

    /// Parses `"{region}*{specialty}*{clinic}*{doctor}"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.trim().split(DELIMITER).collect();
        let [region, specialty, clinic, doctor] = parts[..] else {
            return Err(ConfigError::InvalidSelector {
                value: raw.to_string(),
                reason: format!("expected 4 '*'-separated ids, found {}", parts.len()),
            });
        };

        let id = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidSelector {
                    value: raw.to_string(),
                    reason: format!("'{}' is not an integer id", part.trim()),
                })
        };

        Ok(DoctorSelector {
            region_id: id(region)?,
            specialty_id: id(specialty)?,
            clinic_id: id(clinic)?,
            doctor_id: id(doctor)?,
        })
    }
}

impl fmt::Display for DoctorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}{d}{}",
            self.region_id,
            self.specialty_id,
            self.clinic_id,
            self.doctor_id,
            d = DELIMITER
        )
    }
}
