use time::OffsetDateTime;

/// Uploaded photo binaries on local disk.
pub mod media;
/// Database model definitions.
pub mod models;
/// Persistence of guests, phases, answers, photos and votes.
pub mod party_store;
/// Storage abstraction layer for database operations.
pub mod storage;

/// Fixed-width UTC timestamp (millisecond precision) so stored values sort lexically.
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

fn format_timestamp(at: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.millisecond()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_keep_a_fixed_width() {
        let at = OffsetDateTime::from_unix_timestamp(0).unwrap();
        assert_eq!(format_timestamp(at), "1970-01-01T00:00:00.000Z");
        assert_eq!(now_timestamp().len(), "1970-01-01T00:00:00.000Z".len());
    }
}
