use std::sync::Arc;

use serenity::all::{
    ChannelId, CreateAllowedMentions, CreateMessage, EditRole, GuildId, Http, PermissionOverwrite,
    PermissionOverwriteType, Permissions, RoleId, UserId,
};

use crate::platform::GuildPlatform;

/// [`GuildPlatform`] backed by the Discord HTTP API for a single guild.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }

    fn http(&self) -> &Http {
        &self.http
    }
}

#[serenity::async_trait]
impl GuildPlatform for SerenityPlatform {
    async fn find_role_by_name(&self, name: &str) -> anyhow::Result<Option<RoleId>> {
        let roles = self.guild_id.roles(self.http()).await?;

        Ok(roles
            .values()
            .find(|role| role.name == name)
            .map(|role| role.id))
    }

    async fn create_sanction_role(&self, name: &str) -> anyhow::Result<RoleId> {
        let builder = EditRole::new()
            .name(name)
            .permissions(Permissions::empty())
            .audit_log_reason("Create Muted role");
        let role = self.guild_id.create_role(self.http(), builder).await?;

        Ok(role.id)
    }

    async fn channel_ids(&self) -> anyhow::Result<Vec<ChannelId>> {
        let channels = self.guild_id.channels(self.http()).await?;

        Ok(channels.into_keys().collect())
    }

    async fn deny_channel_for_role(
        &self,
        channel_id: ChannelId,
        role_id: RoleId,
    ) -> anyhow::Result<()> {
        let overwrite = PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS,
            kind: PermissionOverwriteType::Role(role_id),
        };
        channel_id.create_permission(self.http(), overwrite).await?;

        Ok(())
    }

    async fn member_roles(&self, user_id: UserId) -> anyhow::Result<Vec<RoleId>> {
        let member = self.guild_id.member(self.http(), user_id).await?;

        Ok(member.roles)
    }

    async fn add_member_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> anyhow::Result<()> {
        self.http()
            .add_member_role(self.guild_id, user_id, role_id, Some(reason))
            .await?;

        Ok(())
    }

    async fn remove_member_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> anyhow::Result<()> {
        self.http()
            .remove_member_role(self.guild_id, user_id, role_id, Some(reason))
            .await?;

        Ok(())
    }

    async fn send_channel_message(
        &self,
        channel_id: ChannelId,
        content: &str,
    ) -> anyhow::Result<()> {
        let message = CreateMessage::new()
            .content(content)
            .allowed_mentions(CreateAllowedMentions::new());
        channel_id.send_message(self.http(), message).await?;

        Ok(())
    }
}
