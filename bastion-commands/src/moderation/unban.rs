use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    ephemeral_text, guild_only_message, is_missing_permissions_error, moderation_action_embed,
    permission_denied_message, reason_or_default, target_profile_from_user, usage_message,
};
use crate::moderation::logging::{log_action, user_label};
use bastion_core::{Context, Error};
use bastion_utils::formatting::scrub_mentions;
use bastion_utils::parse::parse_user_id;
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    desc: "Lift the ban of a user by id.",
    category: "moderation",
    usage: "!unban <user_id> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "Id of the banned user"] user_id: Option<String>,
    #[description = "Reason for the unban"]
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

    let Some(user_id) = user_id.as_deref().and_then(parse_user_id) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };
    let user_id = serenity::UserId::new(user_id);

    let user = match ctx.http().get_user(user_id).await {
        Ok(user) => user,
        Err(source) => {
            error!(?source, user_id = user_id.get(), "user lookup failed");
            ctx.say("I couldn't find a user with that id.").await?;
            return Ok(());
        }
    };

    let reason = reason_or_default(reason);
    if let Err(source) = ctx
        .http()
        .remove_ban(guild_id, user_id, Some(reason.as_str()))
        .await
    {
        if !is_missing_permissions_error(&source) {
            error!(?source, "unban request failed");
        }
        ctx.say("I couldn't unban that user. They may not be banned.")
            .await?;
        return Ok(());
    }

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "unbanned", Some(&reason), None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    log_action(
        &ctx,
        &format!(
            "♻️ {} unbanned by {} — {}",
            user_label(&user),
            user_label(ctx.author()),
            scrub_mentions(&reason)
        ),
    )
    .await;

    Ok(())
}
