use crate::domain::models::appointment::Appointment;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// UTC instant of an appointment's local start. Skipped DST hours resolve forward.
pub fn start_instant(appointment: &Appointment, tz: Tz) -> DateTime<Utc> {
    let local = appointment.date.and_time(appointment.time);
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

/// Generates an iCalendar (.ics) string for an appointment
pub fn generate_ics(appointment: &Appointment, service_name: &str, duration_min: i64, tz: Tz) -> String {
    let starts = start_instant(appointment, tz);
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(service_name)
        .description(&format!("{} ({})", appointment.client_name, appointment.client_phone))
        .starts(starts)
        .ends(starts + Duration::minutes(duration_min))
        .uid(&appointment.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::NewAppointmentParams;
    use chrono::{NaiveDate, NaiveTime};

    fn appointment() -> Appointment {
        Appointment::new(NewAppointmentParams {
            client_name: "Ana".into(),
            client_phone: "1199".into(),
            client_instagram: None,
            service_id: "svc".into(),
            date: NaiveDate::from_ymd_opt(2030, 3, 4).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        })
    }

    #[test]
    fn test_start_instant_uses_business_timezone() {
        let start = start_instant(&appointment(), chrono_tz::America::Sao_Paulo);
        assert_eq!(start.to_rfc3339(), "2030-03-04T12:30:00+00:00");
    }

    #[test]
    fn test_ics_contains_event() {
        let ics = generate_ics(&appointment(), "Corte de Cabelo", 45, chrono_tz::UTC);
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("SUMMARY:Corte de Cabelo"));
        assert!(ics.contains("DTSTART:20300304T093000Z"));
        assert!(ics.contains("DTEND:20300304T101500Z"));
    }
}
