/// Hard limit Discord applies to message content.
pub const MESSAGE_CHAR_LIMIT: usize = 2000;

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    if hours > 0 {
        let mut parts = vec![format!("{}h", hours)];
        if minutes > 0 {
            parts.push(format!("{}m", minutes));
        }
        return parts.join(" ");
    }

    if minutes > 0 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    format!("{}s", seconds)
}

/// Break `@everyone`/`@here` and user mentions in free text supplied by users.
pub fn scrub_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Join lines until the next one would push the message past `limit` chars.
///
/// Returns the joined text and how many lines were left out.
pub fn join_lines_within(lines: &[String], limit: usize) -> (String, usize) {
    let mut out = String::new();
    let mut used = 0;

    for (index, line) in lines.iter().enumerate() {
        let extra = line.chars().count() + usize::from(!out.is_empty());
        if used + extra > limit {
            return (out, lines.len() - index);
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
        used += extra;
    }

    (out, 0)
}

#[cfg(test)]
mod tests {
    use super::{format_compact_duration, join_lines_within, scrub_mentions, truncate_chars};

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(600), "10m");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(5400), "1h 30m");
        assert_eq!(format_compact_duration(86400), "1d");
        assert_eq!(format_compact_duration(90000), "1d 1h");
    }

    #[test]
    fn mentions_are_broken_up() {
        assert_eq!(scrub_mentions("hi @everyone"), "hi @\u{200B}everyone");
        assert_eq!(scrub_mentions("plain"), "plain");
    }

    #[test]
    fn joins_lines_up_to_the_limit() {
        let lines = vec!["aaaa".to_owned(), "bbbb".to_owned(), "cccc".to_owned()];

        assert_eq!(join_lines_within(&lines, 100), ("aaaa\nbbbb\ncccc".to_owned(), 0));
        assert_eq!(join_lines_within(&lines, 9), ("aaaa\nbbbb".to_owned(), 1));
        assert_eq!(join_lines_within(&lines, 3), (String::new(), 3));
    }

    #[test]
    fn truncation_keeps_short_text_and_marks_cuts() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_chars("abcdefghijk", 5), "abcd…");
        assert_eq!(truncate_chars("ééééé", 3).chars().count(), 3);
    }
}
