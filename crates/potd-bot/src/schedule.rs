//! Daily POTD trigger

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use potd_common::{AppError, ScheduleConfig};
use potd_service::{PotdReport, PotdService, ServiceContext};
use tracing::{error, info};

/// First instant strictly after `now` whose local time in `offset` is `time`
pub fn next_fire(now: DateTime<Utc>, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(&offset).naive_local();
    let mut fire = local.date().and_time(time);
    if fire <= local {
        fire += Duration::days(1);
    }
    (fire - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

/// Fire `run_potd` once a day
///
/// Failures are logged and the schedule continues; only fatal errors end it.
pub async fn run(ctx: &ServiceContext, schedule: &ScheduleConfig) -> Result<(), AppError> {
    let offset = schedule.offset();
    loop {
        let now = Utc::now();
        let at = next_fire(now, schedule.time, offset);
        info!(next = %at.with_timezone(&offset), "POTD scheduled");
        tokio::time::sleep((at - now).to_std().unwrap_or_default()).await;

        match PotdService::new(ctx).run_potd().await {
            Ok(report) => log_report(&report),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => error!(error = %e, code = e.error_code(), "Scheduled POTD failed"),
        }
    }
}

pub(crate) fn log_report(report: &PotdReport) {
    match report {
        PotdReport::Posted {
            sequence,
            message_id,
            registered,
        } => info!(sequence, message_id = ?message_id, registered, "POTD posted"),
        PotdReport::Holiday { message_id } => info!(message_id = ?message_id, "Holiday announced"),
        PotdReport::Nothing => info!("No POTD to announce"),
    }
}
