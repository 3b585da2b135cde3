use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    ephemeral_text, guild_only_message, permission_denied_message, usage_message,
};
use bastion_core::{Context, Error};
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "say",
    desc: "Post a message in this channel as the bot.",
    category: "moderation",
    usage: "!say <message>",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn say(
    ctx: Context<'_>,
    #[description = "Message to post"]
    #[rest]
    message: Option<String>,
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

    let Some(message) = message.filter(|text| !text.trim().is_empty()) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let post = serenity::CreateMessage::new()
        .content(message)
        .allowed_mentions(serenity::CreateAllowedMentions::new());
    if let Err(source) = ctx.channel_id().send_message(ctx.http(), post).await {
        error!(?source, "say request failed");
        ctx.send(ephemeral_text("I couldn't post in this channel."))
            .await?;
        return Ok(());
    }

    ctx.send(ephemeral_text("✅ Sent!")).await?;

    Ok(())
}
