use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    ephemeral_text, guild_only_message, is_missing_permissions_error, moderation_action_embed,
    moderation_self_action_message, permission_denied_message, reason_or_default,
    target_profile_from_user, usage_message, warns_on_record_text,
};
use crate::moderation::logging::{log_action, user_label};
use bastion_core::{Context, Error};
use bastion_database::impls::warnings::warning_count;
use bastion_utils::formatting::scrub_mentions;
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a user from the server.",
    category: "moderation",
    usage: "!ban <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: Option<serenity::User>,
    #[description = "Reason for the ban"]
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
        serenity::Permissions::BAN_MEMBERS,
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

    if user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("ban")).await?;
        return Ok(());
    }

    let reason = reason_or_default(reason);
    if let Err(source) = guild_id
        .ban_with_reason(ctx.http(), user.id, 0, &reason)
        .await
    {
        if !is_missing_permissions_error(&source) {
            error!(?source, "ban request failed");
        }
        ctx.say("I couldn't ban that user. Check role hierarchy and permissions.")
            .await?;
        return Ok(());
    }

    let target_profile = target_profile_from_user(&user);
    let prior_warns = warning_count(&ctx.data().db, user.id.get()).await;
    let embed = moderation_action_embed(&target_profile, user.id, "banned", Some(&reason), None)
        .footer(serenity::CreateEmbedFooter::new(warns_on_record_text(prior_warns)));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    log_action(
        &ctx,
        &format!(
            "🔨 {} banned by {} — {}",
            user_label(&user),
            user_label(ctx.author()),
            scrub_mentions(&reason)
        ),
    )
    .await;

    Ok(())
}
