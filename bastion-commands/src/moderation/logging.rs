use tracing::{error, info};

use poise::serenity_prelude as serenity;

use bastion_core::Context;

/// Write a one-line entry to the configured audit log channel.
///
/// Failures are logged and swallowed; the audit trail never fails a command.
pub async fn log_action(ctx: &Context<'_>, line: &str) {
    info!(target: "bastion::audit", "{}", line);

    let Some(channel_id) = ctx.data().config.log_channel_id else {
        return;
    };

    let message = serenity::CreateMessage::new()
        .content(line)
        .allowed_mentions(serenity::CreateAllowedMentions::new());

    if let Err(source) = serenity::ChannelId::new(channel_id)
        .send_message(ctx.http(), message)
        .await
    {
        error!(?source, channel_id, "failed to write audit log entry");
    }
}

/// Label used for members in audit lines, e.g. `name (123)`.
pub fn user_label(user: &serenity::User) -> String {
    format!("{} ({})", user.tag(), user.id.get())
}
