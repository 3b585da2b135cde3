use poise::serenity_prelude as serenity;

use bastion_utils::embed::DEFAULT_EMBED_COLOR;
use bastion_utils::formatting::scrub_mentions;

pub const DEFAULT_REASON: &str = "No reason provided";

#[derive(Clone, Debug)]
pub struct TargetProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

pub fn target_profile_from_user(user: &serenity::User) -> TargetProfile {
    TargetProfile {
        display_name: user
            .global_name
            .clone()
            .unwrap_or_else(|| user.name.clone()),
        avatar_url: Some(user.face()),
    }
}

pub fn moderation_action_embed(
    target_profile: &TargetProfile,
    target_user_id: serenity::UserId,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> serenity::CreateEmbed {
    let mut fields = vec![format!("**Target :** <@{}>", target_user_id.get())];
    if let Some(reason) = reason {
        fields.push(format!("**Reason :** {}", scrub_mentions(reason)));
    }
    if let Some(duration) = duration {
        fields.push(format!("**Duration :** {}", duration));
    }

    let heading = format!(
        "{} has been {}",
        target_profile.display_name, action_past_tense
    );
    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(fields.join("\n"));

    match target_profile.avatar_url.as_deref() {
        Some(url) => embed.author(serenity::CreateEmbedAuthor::new(heading).icon_url(url)),
        None => embed.title(heading),
    }
}

/// Footer text telling staff how many warnings the target already has.
pub fn warns_on_record_text(count: usize) -> String {
    match count {
        0 => "No warns on record".to_owned(),
        1 => "1 warn on record".to_owned(),
        count => format!("{count} warns on record"),
    }
}

pub async fn send_moderation_target_dm_for_guild(
    http: &serenity::Http,
    target_user: &serenity::User,
    guild_id: serenity::GuildId,
    action_past_tense: &str,
    reason: &str,
) -> Result<(), serenity::Error> {
    let guild_name = match guild_id.to_partial_guild(http).await {
        Ok(guild) => guild.name,
        Err(_) => format!("Server {}", guild_id.get()),
    };

    let content = target_dm_text(&guild_name, action_past_tense, reason);
    let dm_channel = target_user.create_dm_channel(http).await?;
    dm_channel
        .send_message(http, serenity::CreateMessage::new().content(content))
        .await?;

    Ok(())
}

pub fn target_dm_text(guild_name: &str, action_past_tense: &str, reason: &str) -> String {
    format!(
        "You have been {} in **{}**: {}",
        action_past_tense,
        guild_name,
        scrub_mentions(reason)
    )
}

/// Reply only the invoker can see (plain reply for prefix invocations).
pub fn ephemeral_text(content: impl Into<String>) -> poise::CreateReply {
    poise::CreateReply::default()
        .content(content)
        .ephemeral(true)
}

/// Reply whose mentions render but never ping.
pub fn quiet_text(content: impl Into<String>) -> poise::CreateReply {
    poise::CreateReply::default()
        .content(content)
        .allowed_mentions(serenity::CreateAllowedMentions::new())
}

/// Normalize an optional free-text reason.
pub fn reason_or_default(reason: Option<String>) -> String {
    reason
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_REASON.to_owned())
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn permission_denied_message() -> &'static str {
    "You lack permission."
}

pub fn moderation_self_action_message(action: &str) -> String {
    format!("You can't {action} yourself.")
}

pub fn moderation_bot_target_message() -> &'static str {
    "You can't use moderation actions on bots or application accounts."
}

pub fn is_missing_permissions_error(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 || response.error.code == 50013
    )
}

/// Same as [`is_missing_permissions_error`], looking through `anyhow` context layers.
pub fn is_missing_permissions(source: &anyhow::Error) -> bool {
    source
        .chain()
        .filter_map(|cause| cause.downcast_ref::<serenity::Error>())
        .any(is_missing_permissions_error)
}

#[cfg(test)]
mod tests {
    use super::{reason_or_default, target_dm_text, usage_message, warns_on_record_text};

    #[test]
    fn blank_reasons_fall_back_to_default() {
        assert_eq!(reason_or_default(None), "No reason provided");
        assert_eq!(reason_or_default(Some("   ".to_owned())), "No reason provided");
        assert_eq!(reason_or_default(Some(" spam ".to_owned())), "spam");
    }

    #[test]
    fn dm_text_names_the_guild() {
        assert_eq!(
            target_dm_text("Rustaceans", "warned", "spam @here"),
            "You have been warned in **Rustaceans**: spam @\u{200B}here"
        );
    }

    #[test]
    fn warn_footer_counts_prior_warnings() {
        assert_eq!(warns_on_record_text(0), "No warns on record");
        assert_eq!(warns_on_record_text(1), "1 warn on record");
        assert_eq!(warns_on_record_text(3), "3 warns on record");
    }

    #[test]
    fn usage_is_code_formatted() {
        assert_eq!(usage_message("!warn <user>"), "Usage: `!warn <user>`");
    }
}
