use tokio::time::{Duration, sleep};
use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{ephemeral_text, guild_only_message, permission_denied_message};
use crate::moderation::logging::{log_action, user_label};
use crate::tickets::is_ticket_channel;
use bastion_core::{Context, Error};
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "close",
    desc: "Close the current ticket channel.",
    category: "tickets",
    usage: "!close",
};

const CLOSE_DELAY: Duration = Duration::from_secs(5);

#[poise::command(prefix_command, slash_command, category = "Tickets")]
pub async fn close(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_CHANNELS,
    )
    .await?
    {
        ctx.send(ephemeral_text(permission_denied_message())).await?;
        return Ok(());
    }

    let channel = ctx.channel_id().to_channel(ctx.http()).await?;
    let Some(channel) = channel.guild().filter(|channel| is_ticket_channel(&channel.name)) else {
        ctx.say("This command must be used inside a ticket channel.")
            .await?;
        return Ok(());
    };

    ctx.say("🗑️ Closing ticket in 5 seconds...").await?;
    sleep(CLOSE_DELAY).await;

    log_action(
        &ctx,
        &format!(
            "❌ Ticket {} closed by {}",
            channel.name,
            user_label(ctx.author())
        ),
    )
    .await;

    if let Err(source) = channel.delete(ctx.http()).await {
        error!(?source, channel_id = channel.id.get(), "ticket channel deletion failed");
        ctx.say("I couldn't delete this channel.").await?;
    }

    Ok(())
}
