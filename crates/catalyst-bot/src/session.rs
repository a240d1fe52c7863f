use catalyst_models::SessionConfig;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};

/// U.S. equities trading session (spec.md §4.A). Determines which cadence
/// the main cycle loop should use next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    PreMarket,
    Regular,
    AfterHours,
    Closed,
}

/// Clock & Session Classifier: maps a UTC instant to a trading session and
/// the cycle delay that session implies (spec.md §4.A). Eastern time is
/// approximated via the standard U.S. DST rule (second Sunday in March to
/// first Sunday in November) rather than a full timezone database, since
/// the session boundaries only need to land within a few minutes of the
/// true open/close.
pub struct SessionClock;

impl SessionClock {
    pub fn now() -> DateTime<Utc> {
        Utc::now()
    }

    pub fn current_session(now_utc: DateTime<Utc>) -> Session {
        let eastern_offset_hours = eastern_utc_offset_hours(now_utc.date_naive());
        let eastern = now_utc + Duration::hours(eastern_offset_hours);

        if matches!(eastern.weekday(), Weekday::Sat | Weekday::Sun) {
            return Session::Closed;
        }

        let minutes_since_midnight = eastern.hour() * 60 + eastern.minute();
        match minutes_since_midnight {
            m if (4 * 60..9 * 60 + 30).contains(&m) => Session::PreMarket,
            m if (9 * 60 + 30..16 * 60).contains(&m) => Session::Regular,
            m if (16 * 60..20 * 60).contains(&m) => Session::AfterHours,
            _ => Session::Closed,
        }
    }

    pub fn next_cycle_delay(session: Session, config: &SessionConfig) -> std::time::Duration {
        let secs = match session {
            Session::PreMarket => config.premarket_cycle_secs,
            Session::Regular => config.regular_cycle_secs,
            Session::AfterHours => config.afterhours_cycle_secs,
            Session::Closed => config.closed_cycle_secs,
        };
        std::time::Duration::from_secs(secs)
    }
}

/// Returns the UTC offset for US Eastern time (-5 for EST, -4 for EDT)
/// on the given date, using the second-Sunday-in-March to
/// first-Sunday-in-November DST rule in effect since 2007.
fn eastern_utc_offset_hours(date: NaiveDate) -> i64 {
    let year = date.year();
    let dst_start = nth_sunday_of_month(year, 3, 2);
    let dst_end = nth_sunday_of_month(year, 11, 1);
    if date >= dst_start && date < dst_end {
        -4
    } else {
        -5
    }
}

fn nth_sunday_of_month(year: i32, month: u32, n: u32) -> NaiveDate {
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let days_until_sunday = (7 - first_of_month.weekday().num_days_from_sunday()) % 7;
    let first_sunday = first_of_month + Duration::days(days_until_sunday as i64);
    first_sunday + Duration::weeks((n - 1) as i64)
}
