use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    ephemeral_text, guild_only_message, is_missing_permissions, moderation_action_embed,
    moderation_bot_target_message, moderation_self_action_message, permission_denied_message,
    reason_or_default, target_profile_from_user, usage_message, warns_on_record_text,
};
use crate::moderation::logging::{log_action, user_label};
use bastion_core::{Context, Error};
use bastion_database::impls::warnings::warning_count;
use bastion_utils::formatting::{format_compact_duration, scrub_mentions};
use bastion_utils::parse::clamp_minutes;
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "mute",
    desc: "Mute a user for a number of minutes.",
    category: "moderation",
    usage: "!mute <user> [minutes] [reason]",
};

const DEFAULT_MUTE_MINUTES: i64 = 10;

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "The user to mute"] user: Option<serenity::User>,
    #[description = "Duration in minutes (default 10)"] minutes: Option<i64>,
    #[description = "Reason for the mute"]
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

    if user.id == ctx.author().id {
        ctx.say(moderation_self_action_message("mute")).await?;
        return Ok(());
    }

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    let minutes = clamp_minutes(minutes.unwrap_or(DEFAULT_MUTE_MINUTES));
    let reason = reason_or_default(reason);

    let service = ctx
        .data()
        .mutes
        .for_guild(&ctx.serenity_context().http, guild_id);
    let grant = match service.mute(user.id, minutes, &reason).await {
        Ok(grant) => grant,
        Err(source) => {
            if is_missing_permissions(&source) {
                ctx.say("I need the 'Manage Roles' permission and a role above the target to mute.")
                    .await?;
            } else {
                error!(?source, "mute request failed");
                ctx.say("I couldn't mute that user.").await?;
            }
            return Ok(());
        }
    };

    let duration = format_compact_duration(grant.duration.as_secs());
    let prior_warns = warning_count(&ctx.data().db, user.id.get()).await;
    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(
        &target_profile,
        user.id,
        "muted",
        Some(&reason),
        Some(&duration),
    )
    .footer(serenity::CreateEmbedFooter::new(warns_on_record_text(prior_warns)));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    log_action(
        &ctx,
        &format!(
            "🔇 {} muted by {} for {}m — {}",
            user_label(&user),
            user_label(ctx.author()),
            minutes,
            scrub_mentions(&reason)
        ),
    )
    .await;

    Ok(())
}
