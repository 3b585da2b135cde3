use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, quiet_text, usage_message};
use bastion_core::{Context, Error};
use bastion_database::impls::warnings::list_warnings;
use bastion_database::model::warnings::WarningRecord;
use bastion_utils::formatting::{
    MESSAGE_CHAR_LIMIT, join_lines_within, scrub_mentions, truncate_chars,
};

pub const META: CommandMeta = CommandMeta {
    name: "warn_list",
    desc: "List the warnings of a user.",
    category: "moderation",
    usage: "!warn_list <user>",
};

// Room left for the "...and N more" trailer.
const TRAILER_RESERVE: usize = 40;
// Keeps every line well under the message limit, so truncation only drops whole entries.
const REASON_CHAR_LIMIT: usize = 200;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warn_list(
    ctx: Context<'_>,
    #[description = "User to inspect"] user: Option<serenity::User>,
) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let entries = list_warnings(&ctx.data().db, user.id.get()).await;
    if entries.is_empty() {
        ctx.send(quiet_text(format!("<@{}> has no warnings.", user.id.get())))
            .await?;
        return Ok(());
    }

    ctx.send(quiet_text(render_warn_list(&user.tag(), &entries)))
        .await?;

    Ok(())
}

fn warning_line(position: usize, entry: &WarningRecord) -> String {
    format!(
        "{}. By <@{}> • {} • <t:{}:f>",
        position,
        entry.moderator_id,
        scrub_mentions(&truncate_chars(&entry.reason, REASON_CHAR_LIMIT)),
        entry.time.timestamp()
    )
}

fn render_warn_list(member_label: &str, entries: &[WarningRecord]) -> String {
    let mut lines = vec![format!("Warnings for **{}**:", member_label)];
    lines.extend(
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| warning_line(index + 1, entry)),
    );

    let (mut text, omitted) =
        join_lines_within(&lines, MESSAGE_CHAR_LIMIT.saturating_sub(TRAILER_RESERVE));
    if omitted > 0 {
        text.push_str(&format!("\n…and {} more.", omitted));
    }
    text
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::render_warn_list;
    use bastion_database::model::warnings::WarningRecord;

    fn record(moderator_id: u64, reason: &str) -> WarningRecord {
        WarningRecord {
            moderator_id,
            reason: reason.to_owned(),
            time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn numbers_warnings_in_issue_order() {
        let text = render_warn_list("spammer", &[record(1, "spam"), record(2, "spam again")]);

        assert_eq!(
            text,
            "Warnings for **spammer**:\n\
             1. By <@1> • spam • <t:1714557600:f>\n\
             2. By <@2> • spam again • <t:1714557600:f>"
        );
    }

    #[test]
    fn long_histories_are_truncated() {
        let reason = "x".repeat(150);
        let entries: Vec<WarningRecord> = (0..40).map(|_| record(1, &reason)).collect();

        let text = render_warn_list("member", &entries);

        assert!(text.chars().count() <= 2000);
        assert!(text.ends_with("more."));
    }

    #[test]
    fn oversized_reason_is_shortened_not_hidden() {
        let long_reason = "y".repeat(5000);
        let entries = [record(1, "first"), record(2, &long_reason), record(3, "last")];

        let text = render_warn_list("m", &entries);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("• first •"));
        assert!(lines[2].starts_with("2. By <@2> • yyy"));
        assert!(lines[2].contains("…"));
        assert!(lines[2].chars().count() < 300);
        assert!(lines[3].contains("• last •"));
        assert!(!text.contains("more."));
    }
}
