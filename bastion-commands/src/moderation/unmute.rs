use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    ephemeral_text, guild_only_message, is_missing_permissions, moderation_action_embed,
    permission_denied_message, target_profile_from_user, usage_message,
};
use crate::moderation::logging::{log_action, user_label};
use bastion_core::{Context, Error};
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unmute",
    desc: "Lift the mute of a user.",
    category: "moderation",
    usage: "!unmute <user>",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "The user to unmute"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MODERATE_MEMBERS,
    )
    .await?
    {
        ctx.send(ephemeral_text(permission_denied_message())).await?;
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let service = ctx
        .data()
        .mutes
        .for_guild(&ctx.serenity_context().http, guild_id);
    if let Err(source) = service.unmute(user.id).await {
        if is_missing_permissions(&source) {
            ctx.say("I need the 'Manage Roles' permission to unmute.")
                .await?;
        } else {
            error!(?source, "unmute request failed");
            ctx.say("I couldn't unmute that user.").await?;
        }
        return Ok(());
    }

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "unmuted", None, None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    log_action(
        &ctx,
        &format!(
            "🔊 {} unmuted by {}",
            user_label(&user),
            user_label(ctx.author())
        ),
    )
    .await;

    Ok(())
}
