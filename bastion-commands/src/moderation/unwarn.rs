use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    ephemeral_text, guild_only_message, permission_denied_message, quiet_text, usage_message,
};
use crate::moderation::logging::{log_action, user_label};
use bastion_core::{Context, Error};
use bastion_database::impls::warnings::remove_last_warning;
use bastion_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unwarn",
    desc: "Remove the most recent warning from a user.",
    category: "moderation",
    usage: "!unwarn <user>",
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn unwarn(
    ctx: Context<'_>,
    #[description = "User to remove the last warning from"] user: Option<serenity::User>,
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

    let Some(removed) = remove_last_warning(&ctx.data().db, user.id.get()).await? else {
        ctx.send(ephemeral_text(format!("<@{}> has no warns.", user.id.get())))
            .await?;
        return Ok(());
    };

    ctx.send(quiet_text(format!(
        "Removed last warn from <@{}>. Remaining warns: **{}**",
        user.id.get(),
        removed.remaining
    )))
    .await?;

    log_action(
        &ctx,
        &format!(
            "✅ Warn removed from {} by {}.",
            user_label(&user),
            user_label(ctx.author())
        ),
    )
    .await;

    Ok(())
}
