/// Parse a raw snowflake or a user mention (`<@123>` / `<@!123>`).
pub fn parse_user_id(raw: &str) -> Option<u64> {
    let value = raw.trim();
    let digits = value
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|inner| inner.trim_start_matches('!'))
        .unwrap_or(value);

    digits.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Clamp a user supplied minute count to a non-negative value.
pub fn clamp_minutes(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{clamp_minutes, parse_user_id};

    #[test]
    fn parses_ids_and_mentions() {
        assert_eq!(parse_user_id("80351110224678912"), Some(80351110224678912));
        assert_eq!(parse_user_id(" <@80351110224678912> "), Some(80351110224678912));
        assert_eq!(parse_user_id("<@!80351110224678912>"), Some(80351110224678912));
        assert_eq!(parse_user_id("<#80351110224678912>"), None);
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("someone"), None);
    }

    #[test]
    fn negative_minutes_clamp_to_zero() {
        assert_eq!(clamp_minutes(-5), 0);
        assert_eq!(clamp_minutes(0), 0);
        assert_eq!(clamp_minutes(10), 10);
    }
}
