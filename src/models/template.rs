use std::fmt::Write;
use std::str::FromStr;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::models::appointment::Appointment;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// `{{` / `}}` escapes, `{Name}` or `{Name:spec}` placeholders, stray braces
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    AppointmentDate(String),
    DoctorId,
    DoctorName,
    ClinicId,
    ClinicPublicName,
    SpecialtyId,
    SpecialtyName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Notification body with `{FieldName}` placeholders, validated up front so
/// rendering against an appointment cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub const FIELDS: [&'static str; 7] = [
        "AppointmentDate",
        "DoctorId",
        "DoctorName",
        "ClinicId",
        "ClinicPublicName",
        "SpecialtyId",
        "SpecialtyName",
    ];

    pub fn render(&self, appointment: &Appointment) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => {
                    // date formats were checked in `parse_field`
                    let _ = match field {
                        Field::AppointmentDate(format) => {
                            write!(out, "{}", appointment.appointment_date.format(format))
                        }
                        Field::DoctorId => write!(out, "{}", appointment.doctor_id),
                        Field::DoctorName => write!(out, "{}", appointment.doctor_name),
                        Field::ClinicId => write!(out, "{}", appointment.clinic_id),
                        Field::ClinicPublicName => {
                            write!(out, "{}", appointment.clinic_public_name)
                        }
                        Field::SpecialtyId => write!(out, "{}", appointment.specialty_id),
                        Field::SpecialtyName => write!(out, "{}", appointment.specialty_name),
                    };
                }
            }
        }
        out
    }
}

fn parse_field(body: &str) -> Result<Field, ConfigError> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    let field = match name {
        "AppointmentDate" => {
            let format = spec.unwrap_or(DEFAULT_DATE_FORMAT).to_string();
            let mut scratch = String::new();
            if write!(scratch, "{}", NaiveDateTime::default().format(&format)).is_err() {
                return Err(ConfigError::Template(format!(
                    "invalid date format {format:?} in {{{body}}}"
                )));
            }
            return Ok(Field::AppointmentDate(format));
        }
        "DoctorId" => Field::DoctorId,
        "DoctorName" => Field::DoctorName,
        "ClinicId" => Field::ClinicId,
        "ClinicPublicName" => Field::ClinicPublicName,
        "SpecialtyId" => Field::SpecialtyId,
        "SpecialtyName" => Field::SpecialtyName,
        "" => {
            return Err(ConfigError::Template(
                "empty placeholder {}; use a field name".to_string(),
            ));
        }
        other => {
            return Err(ConfigError::Template(format!(
                "unknown field {other:?}; expected one of {}",
                MessageTemplate::FIELDS.join(", ")
            )));
        }
    };

    if spec.is_some() {
        return Err(ConfigError::Template(format!(
            "format spec is only supported on AppointmentDate, found {{{body}}}"
        )));
    }
    Ok(field)
}

impl FromStr for MessageTemplate {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(raw) {
            let Some(token) = caps.get(0) else {
                continue;
            };
            literal.push_str(&raw[last..token.start()]);
            last = token.end();

            match token.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                "{" | "}" => {
                    return Err(ConfigError::Template(format!(
                        "unmatched '{}' at byte {}",
                        token.as_str(),
                        token.start()
                    )));
                }
                _ => {
                    let field = parse_field(&caps[1])?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
            }
        }

        literal.push_str(&raw[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(MessageTemplate { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn appointment() -> Appointment {
        Appointment {
            appointment_date: NaiveDate::from_ymd_opt(2026, 11, 3)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap(),
            doctor_id: 3311,
            doctor_name: "Anna Nowak".to_string(),
            clinic_id: 174,
            clinic_public_name: "Warszawa Atrium".to_string(),
            specialty_id: 9,
            specialty_name: "Dermatolog".to_string(),
        }
    }

    #[test]
    fn renders_named_fields() {
        let template: MessageTemplate = "Dr. {DoctorName} at {ClinicPublicName} on {AppointmentDate}"
            .parse()
            .unwrap();

        let message = template.render(&appointment());
        assert_eq!(
            message,
            "Dr. Anna Nowak at Warszawa Atrium on 2026-11-03 08:15"
        );
        assert!(!message.contains('{'));
        assert!(!message.contains('}'));
    }

    #[test]
    fn date_accepts_a_strftime_spec() {
        let template: MessageTemplate = "{SpecialtyName} {AppointmentDate:%d.%m %H:%M} (#{DoctorId})"
            .parse()
            .unwrap();
        assert_eq!(template.render(&appointment()), "Dermatolog 03.11 08:15 (#3311)");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let template: MessageTemplate = "{{slot}} {ClinicId}}}".parse().unwrap();
        assert_eq!(template.render(&appointment()), "{slot} 174}");
    }

    #[test]
    fn plain_text_renders_unchanged() {
        let template: MessageTemplate = "new slot".parse().unwrap();
        assert_eq!(template.render(&appointment()), "new slot");
    }

    #[test]
    fn unknown_field_fails_fast() {
        let err = "Dr. {DoctorSurname}".parse::<MessageTemplate>().unwrap_err();
        assert!(matches!(err, ConfigError::Template(_)));
        assert!(err.to_string().contains("DoctorSurname"));
    }

    #[test]
    fn empty_placeholder_is_rejected() {
        assert!("slot {}".parse::<MessageTemplate>().is_err());
    }

    #[test]
    fn unmatched_brace_is_rejected() {
        assert!("Dr. {DoctorName".parse::<MessageTemplate>().is_err());
        assert!("Dr. DoctorName}".parse::<MessageTemplate>().is_err());
    }

    #[test]
    fn format_on_text_field_is_rejected() {
        assert!("{DoctorName:>10}".parse::<MessageTemplate>().is_err());
    }

    #[test]
    fn unusable_date_spec_is_rejected() {
        // naive timestamps carry no offset
        assert!("{AppointmentDate:%z}".parse::<MessageTemplate>().is_err());
    }
}
