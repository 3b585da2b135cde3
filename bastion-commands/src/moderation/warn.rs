use tracing::debug;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    ephemeral_text, guild_only_message, moderation_action_embed, moderation_bot_target_message,
    permission_denied_message, reason_or_default, send_moderation_target_dm_for_guild,
    target_profile_from_user, usage_message,
};
use crate::moderation::logging::{log_action, user_label};
use bastion_core::{Context, Error};
use bastion_database::impls::warnings::record_warning;
use bastion_utils::formatting::scrub_mentions;
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Issue a warning to a user.",
    category: "moderation",
    usage: "!warn <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "User to warn"] user: Option<serenity::User>,
    #[description = "Reason for the warning"]
    #[rest]
    reason: Option<String>,
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

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    let reason = reason_or_default(reason);
    let issued = record_warning(
        &ctx.data().db,
        user.id.get(),
        ctx.author().id.get(),
        &reason,
    )
    .await?;

    if let Err(source) =
        send_moderation_target_dm_for_guild(ctx.http(), &user, guild_id, "warned", &reason).await
    {
        debug!(?source, user_id = user.id.get(), "warning DM not delivered");
    }

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "warned", Some(&reason), None)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Total warns: {}",
            issued.warn_number
        )));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    log_action(
        &ctx,
        &format!(
            "⚠️ {} warned by {} — {} (Total: {})",
            user_label(&user),
            user_label(ctx.author()),
            scrub_mentions(&reason),
            issued.warn_number
        ),
    )
    .await;

    Ok(())
}
