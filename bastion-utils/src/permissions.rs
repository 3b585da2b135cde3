use poise::serenity_prelude as serenity;

/// Resolve a member's effective guild-level permissions from their roles.
///
/// The guild owner implicitly holds every permission.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    let resolved = roles
        .values()
        .filter(|role| role.id == everyone_role_id || member.roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |acc, role| acc | role.permissions);

    Ok(resolved)
}

/// Whether `granted` satisfies `required`. `ADMINISTRATOR` satisfies everything.
pub fn grants(granted: serenity::Permissions, required: serenity::Permissions) -> bool {
    granted.contains(serenity::Permissions::ADMINISTRATOR) || granted.contains(required)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(grants(perms, required))
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::Permissions;

    use super::grants;

    #[test]
    fn administrator_grants_everything() {
        assert!(grants(Permissions::ADMINISTRATOR, Permissions::BAN_MEMBERS));
        assert!(grants(
            Permissions::ADMINISTRATOR,
            Permissions::MODERATE_MEMBERS | Permissions::MANAGE_CHANNELS
        ));
    }

    #[test]
    fn requires_every_flag() {
        let granted = Permissions::MANAGE_MESSAGES | Permissions::KICK_MEMBERS;

        assert!(grants(granted, Permissions::MANAGE_MESSAGES));
        assert!(grants(granted, Permissions::MANAGE_MESSAGES | Permissions::KICK_MEMBERS));
        assert!(!grants(granted, Permissions::BAN_MEMBERS));
        assert!(!grants(Permissions::empty(), Permissions::MODERATE_MEMBERS));
    }
}
