use serenity::all::{ChannelId, RoleId, UserId};

/// The guild operations the mute controller needs, scoped to one guild.
///
/// Implementations do not retry; failures are returned to the caller as-is.
#[serenity::async_trait]
pub trait GuildPlatform: Send + Sync {
    async fn find_role_by_name(&self, name: &str) -> anyhow::Result<Option<RoleId>>;

    /// Create a role that grants nothing and denies speaking.
    async fn create_sanction_role(&self, name: &str) -> anyhow::Result<RoleId>;

    async fn channel_ids(&self) -> anyhow::Result<Vec<ChannelId>>;

    /// Deny sending messages and adding reactions for `role_id` in `channel_id`.
    async fn deny_channel_for_role(
        &self,
        channel_id: ChannelId,
        role_id: RoleId,
    ) -> anyhow::Result<()>;

    async fn member_roles(&self, user_id: UserId) -> anyhow::Result<Vec<RoleId>>;

    async fn add_member_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> anyhow::Result<()>;

    async fn remove_member_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        reason: &str,
    ) -> anyhow::Result<()>;

    async fn send_channel_message(&self, channel_id: ChannelId, content: &str)
    -> anyhow::Result<()>;
}
