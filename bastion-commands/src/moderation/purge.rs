use tokio::time::{Duration, sleep};
use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{ephemeral_text, guild_only_message, permission_denied_message};
use crate::moderation::logging::{log_action, user_label};
use bastion_core::{Context, Error};
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    desc: "Delete the latest messages in this channel.",
    category: "moderation",
    usage: "!purge [amount]",
};

const DEFAULT_PURGE: u8 = 10;
const MAX_PURGE: u8 = 100;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "Amount of messages to purge (default 10, max 100)"] amount: Option<u8>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_MESSAGES,
    )
    .await?
    {
        ctx.send(ephemeral_text(permission_denied_message())).await?;
        return Ok(());
    }

    let amount = amount.unwrap_or(DEFAULT_PURGE);
    if amount == 0 {
        ctx.send(ephemeral_text("Amount must be at least 1.")).await?;
        return Ok(());
    }

    let is_prefix = matches!(ctx, poise::Context::Prefix(_));
    ctx.defer_ephemeral().await?;

    let amount = amount.min(MAX_PURGE);
    let fetch_count = fetch_count(amount, is_prefix);

    let channel_id = ctx.channel_id();
    let messages = channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(fetch_count))
        .await?;

    let ids: Vec<serenity::MessageId> = messages.into_iter().map(|message| message.id).collect();
    if ids.is_empty() {
        ctx.send(ephemeral_text("No messages found to delete.")).await?;
        return Ok(());
    }

    // The invoking message of a prefix command is not part of the purge count.
    let deleted = if is_prefix { ids.len() - 1 } else { ids.len() };

    let delete_result = if ids.len() == 1 {
        channel_id.delete_message(ctx.http(), ids[0]).await
    } else {
        channel_id.delete_messages(ctx.http(), ids).await
    };

    if let Err(source) = delete_result {
        error!(?source, "purge delete request failed");
        ctx.send(ephemeral_text(
            "I couldn't delete messages. Messages older than two weeks can't be bulk deleted.",
        ))
        .await?;
        return Ok(());
    }

    let confirmation = ctx
        .send(ephemeral_text(format!("🗑️ Deleted {} messages.", deleted)))
        .await?;

    log_action(
        &ctx,
        &format!(
            "🗑️ {} messages purged in <#{}> by {}",
            deleted,
            channel_id.get(),
            user_label(ctx.author())
        ),
    )
    .await;

    if is_prefix {
        sleep(Duration::from_secs(3)).await;
        let _ = confirmation.delete(ctx).await;
    }

    Ok(())
}

fn fetch_count(amount: u8, include_invocation: bool) -> u8 {
    if include_invocation {
        amount.saturating_add(1).min(MAX_PURGE)
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::fetch_count;

    #[test]
    fn prefix_invocations_fetch_the_command_message_too() {
        assert_eq!(fetch_count(10, true), 11);
        assert_eq!(fetch_count(10, false), 10);
        assert_eq!(fetch_count(100, true), 100);
    }
}
