use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

fn to_primitive_utc(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

/// Timestamps are stored without zone and always mean UTC.
pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn format_date(value: Date) -> String {
    value.format(format_description!("[year]-[month]-[day]")).unwrap_or_else(|_| value.to_string())
}

/// Parses a calendar date written as `YYYY-MM-DD`.
pub(crate) fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Parses a schedule timestamp. Accepts RFC 3339 with any offset, or a naive
/// `YYYY-MM-DD HH:MM[:SS]` (`T` separator allowed) taken as UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<PrimitiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(to_primitive_utc(parsed));
    }

    let normalized = value.replacen('T', " ", 1);
    PrimitiveDateTime::parse(&normalized, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .or_else(|_| {
            PrimitiveDateTime::parse(&normalized, format_description!("[year]-[month]-[day] [hour]:[minute]"))
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Month, Time};

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn timestamp_with_offset_is_shifted_to_utc() {
        let parsed = parse_timestamp("2025-03-01T12:00:00+03:00").expect("rfc3339");
        assert_eq!(format_primitive(parsed), "2025-03-01T09:00:00Z");
    }

    #[test]
    fn naive_timestamps_are_accepted() {
        let with_seconds = parse_timestamp("2025-03-01 08:15:00").expect("seconds");
        let without_seconds = parse_timestamp("2025-03-01T08:15").expect("minutes");
        assert_eq!(with_seconds, without_seconds);
        assert!(parse_timestamp("next tuesday").is_none());
    }

    #[test]
    fn dates_parse_and_format() {
        let date = parse_date("2004-02-29").expect("leap day");
        assert_eq!(format_date(date), "2004-02-29");
        assert!(parse_date("2003-02-29").is_none());
        assert!(parse_date("29/02/2004").is_none());
    }
}
