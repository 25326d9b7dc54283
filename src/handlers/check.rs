use chrono::{Duration, NaiveDateTime};
use tracing::{debug, error, info};

use crate::config::{CheckSettings, LOOKUP_TIME_DAYS};
use crate::error::{ConfigError, LedgerError, MedisnipError};
use crate::ledger::NotificationLedger;
use crate::medicover::SlotSource;
use crate::models::appointment::Appointment;
use crate::models::selector::DoctorSelector;
use crate::models::template::MessageTemplate;
use crate::notify::Notifier;

/// What one notify pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub found: usize,
    pub notified: usize,
    pub already_notified: usize,
    pub failed: usize,
}

/// One free-slot query for `[now, now + window_days]`.
pub async fn scan<S>(
    source: &S,
    selector: &DoctorSelector,
    window_days: u32,
    now: NaiveDateTime,
) -> Result<Vec<Appointment>, MedisnipError>
where
    S: SlotSource + ?Sized,
{
    let end = now
        .checked_add_signed(Duration::days(i64::from(window_days)))
        .ok_or_else(|| ConfigError::InvalidValue {
            key: LOOKUP_TIME_DAYS,
            reason: format!("{window_days} days from {now} is out of range"),
        })?;
    info!(%selector, start = %now, end = %end, "searching for appointments");

    source
        .free_slots(selector, now, end)
        .await
        .map_err(MedisnipError::Query)
}

/**
Sends one notification per appointment the ledger has not seen yet.

Appointments are handled in the order given. A pair is recorded only
after the notifier accepted it, so a failed send is retried on the next
run; it never stops the remaining appointments. A ledger write failure
does, since dedup can no longer be guaranteed.
*/
pub async fn process_appointments<N>(
    appointments: &[Appointment],
    ledger: &mut NotificationLedger,
    notifier: &N,
    template: &MessageTemplate,
    title: &str,
) -> Result<ScanReport, LedgerError>
where
    N: Notifier + ?Sized,
{
    let mut report = ScanReport {
        found: appointments.len(),
        ..ScanReport::default()
    };

    for appointment in appointments {
        let doctor = appointment.doctor_key();
        let when = appointment.appointment_date;
        info!(
            doctor = %doctor,
            date = %when,
            clinic = %appointment.clinic_public_name,
            "appointment found"
        );

        if ledger.has_notified(&doctor, when) {
            info!(doctor = %doctor, date = %when, "notification was already sent");
            report.already_notified += 1;
            continue;
        }

        let message = template.render(appointment);
        info!("sending notification: {}", message);

        match notifier.send(&message, title).await {
            Ok(()) => {
                ledger.record_notified(&doctor, when)?;
                report.notified += 1;
            }
            Err(e) => {
                error!(doctor = %doctor, date = %when, "failed to send notification: {}", e);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// The `check` command: scan, then notify about anything new.
pub async fn check_slots<S, N>(
    source: &S,
    notifier: &N,
    settings: &CheckSettings,
    now: NaiveDateTime,
) -> Result<ScanReport, MedisnipError>
where
    S: SlotSource + ?Sized,
    N: Notifier + ?Sized,
{
    let appointments = scan(source, &settings.selector, settings.lookup_days, now).await?;
    if appointments.is_empty() {
        info!("No appointments found.");
        return Ok(ScanReport::default());
    }

    let mut ledger = NotificationLedger::open(&settings.ledger_path)?;
    debug!(ledger = %ledger.path().display(), "checking against notification ledger");
    let report = process_appointments(
        &appointments,
        &mut ledger,
        notifier,
        &settings.template,
        &settings.title,
    )
    .await?;
    ledger.close()?;

    info!(
        found = report.found,
        notified = report.notified,
        already_notified = report.already_notified,
        failed = report.failed,
        "scan finished"
    );
    Ok(report)
}
