//! Bookable start times for one day of the salon calendar.
//!
//! Candidate starts walk a fixed grid from opening time. A start `t` is offered when
//! `[t, t + duration)` ends by closing time, misses the lunch break and every appointment
//! already booked on that date, and, for today, lies strictly after the current local time.
//! Intervals are half-open and `a` overlaps `b` iff `a.start < b.end && a.end > b.start`.

use std::collections::HashMap;
use std::iter::FusedIterator;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use crate::domain::models::{
    appointment::{hhmm, Appointment},
    service::Service,
};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Resolves a service reference to its duration in minutes.
pub trait ServiceLookup {
    fn duration_of(&self, service_id: &str) -> Option<u32>;
}

impl ServiceLookup for [Service] {
    fn duration_of(&self, service_id: &str) -> Option<u32> {
        self.iter()
            .find(|s| s.id == service_id)
            .and_then(Service::duration_min)
    }
}

impl ServiceLookup for HashMap<String, Service> {
    fn duration_of(&self, service_id: &str) -> Option<u32> {
        self.get(service_id).and_then(Service::duration_min)
    }
}

/// Half-open range of minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, duration: u32) -> Self {
        Self { start, end: start + duration }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HoursError {
    #[error("working day must start before it ends and end by midnight")]
    InvalidWorkday,
    #[error("lunch break must be a non-empty range within working hours")]
    InvalidLunch,
    #[error("slot step must be positive")]
    ZeroStep,
}

/// Opening hours, lunch break and grid step, all in minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub work_start: u32,
    pub work_end: u32,
    pub lunch_start: u32,
    pub lunch_end: u32,
    pub step: u32,
    pub timezone: Tz,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            work_start: 9 * 60,
            work_end: 19 * 60,
            lunch_start: 12 * 60,
            lunch_end: 13 * 60,
            step: 15,
            timezone: chrono_tz::UTC,
        }
    }
}

impl BusinessHours {
    pub fn validate(self) -> Result<Self, HoursError> {
        if self.work_start >= self.work_end || self.work_end > MINUTES_PER_DAY {
            return Err(HoursError::InvalidWorkday);
        }
        if self.lunch_start >= self.lunch_end
            || self.lunch_start < self.work_start
            || self.lunch_end > self.work_end
        {
            return Err(HoursError::InvalidLunch);
        }
        if self.step == 0 {
            return Err(HoursError::ZeroStep);
        }
        Ok(self)
    }

    pub fn lunch(&self) -> Interval {
        Interval { start: self.lunch_start, end: self.lunch_end }
    }

    /// Wall-clock time at the business.
    pub fn local_now(&self, clock: &dyn Clock) -> NaiveDateTime {
        clock.now().with_timezone(&self.timezone).naive_local()
    }

    pub fn today(&self, clock: &dyn Clock) -> NaiveDate {
        self.local_now(clock).date()
    }
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn time_of_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

/// Lazily yields the accepted start times in ascending order.
///
/// Cloning restarts from the current position, so a fresh result can be
/// replayed without recomputing the day's occupancy.
#[derive(Debug, Clone)]
pub struct Slots {
    next: u32,
    last_start: u32,
    step: u32,
    duration: u32,
    lunch: Interval,
    busy: Vec<Interval>,
    not_after: Option<NaiveTime>,
}

impl Slots {
    pub fn empty() -> Self {
        Self {
            next: 1,
            last_start: 0,
            step: 1,
            duration: 0,
            lunch: Interval { start: 0, end: 0 },
            busy: Vec::new(),
            not_after: None,
        }
    }
}

impl Iterator for Slots {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<NaiveTime> {
        while self.next <= self.last_start {
            let start = self.next;
            self.next += self.step;

            let slot = Interval::new(start, self.duration);
            if slot.overlaps(&self.lunch) || self.busy.iter().any(|b| slot.overlaps(b)) {
                continue;
            }

            let Some(time) = time_of_minute(start) else { continue };
            if self.not_after.is_some_and(|now| time <= now) {
                continue;
            }
            return Some(time);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next > self.last_start {
            return (0, Some(0));
        }
        let remaining = (self.last_start - self.next) / self.step + 1;
        (0, Some(remaining as usize))
    }
}

impl FusedIterator for Slots {}

/// Start times a client may book for `service` on `date`.
///
/// `appointments` may span several dates; only those on `date` occupy the grid, and
/// an appointment whose service cannot be resolved occupies nothing. Without a
/// usable service nothing is offered.
pub fn available_slots<L: ServiceLookup + ?Sized>(
    hours: &BusinessHours,
    date: NaiveDate,
    service: Option<&Service>,
    appointments: &[Appointment],
    services: &L,
    clock: &dyn Clock,
) -> Slots {
    if hours.step == 0 {
        return Slots::empty();
    }
    let Some(duration) = service.and_then(Service::duration_min) else {
        return Slots::empty();
    };
    let Some(last_start) = hours.work_end.checked_sub(duration) else {
        return Slots::empty();
    };

    let busy = appointments
        .iter()
        .filter(|a| a.date == date)
        .filter_map(|a| {
            let length = a.service_id.as_deref().and_then(|id| services.duration_of(id))?;
            Some(Interval::new(minute_of_day(a.time), length))
        })
        .collect();

    let now = hours.local_now(clock);
    let not_after = (now.date() == date).then(|| now.time());

    Slots {
        next: hours.work_start,
        last_start,
        step: hours.step,
        duration,
        lunch: hours.lunch(),
        busy,
        not_after,
    }
}

/// [`available_slots`] rendered as `HH:MM` strings.
pub fn calculate_slots<L: ServiceLookup + ?Sized>(
    hours: &BusinessHours,
    date: NaiveDate,
    service: Option<&Service>,
    appointments: &[Appointment],
    services: &L,
    clock: &dyn Clock,
) -> Vec<String> {
    available_slots(hours, date, service, appointments, services, clock)
        .map(|t| t.format(hhmm::FORMAT).to_string())
        .collect()
}
