use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, RoleId, UserId};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use bastion_utils::formatting::format_compact_duration;

use crate::platform::GuildPlatform;

pub const DEFAULT_MUTED_ROLE_NAME: &str = "Muted";
pub const AUTO_UNMUTE_REASON: &str = "Auto-unmute";
pub const MANUAL_UNMUTE_REASON: &str = "Manual unmute";

/// Per-guild mute configuration.
#[derive(Clone, Debug)]
pub struct MuteSettings {
    pub role_name: String,
    pub log_channel_id: Option<ChannelId>,
}

impl Default for MuteSettings {
    fn default() -> Self {
        Self {
            role_name: DEFAULT_MUTED_ROLE_NAME.to_owned(),
            log_channel_id: None,
        }
    }
}

/// Identifies one scheduled reversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MuteKey {
    pub user_id: UserId,
    pub granted_at: DateTime<Utc>,
    sequence: u64,
}

/// What a successful [`MuteService::mute`] did.
#[derive(Clone, Copy, Debug)]
pub struct MuteGrant {
    pub key: MuteKey,
    pub role_id: RoleId,
    pub duration: Duration,
}

/// Grants and lifts the sanction role for one guild.
///
/// Cheap to clone; clones share the memoized role, the pending reversals and
/// the transition lock.
#[derive(Clone)]
pub struct MuteService {
    inner: Arc<MuteInner>,
}

struct MuteInner {
    platform: Arc<dyn GuildPlatform>,
    settings: MuteSettings,
    sanction_role: Mutex<Option<RoleId>>,
    // Role check-then-act sequences run one at a time.
    transitions: Mutex<()>,
    pending: StdMutex<HashMap<MuteKey, JoinHandle<()>>>,
    sequence: AtomicU64,
}

impl fmt::Debug for MuteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MuteService")
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl MuteService {
    pub fn new(platform: Arc<dyn GuildPlatform>, settings: MuteSettings) -> Self {
        Self {
            inner: Arc::new(MuteInner {
                platform,
                settings,
                sanction_role: Mutex::new(None),
                transitions: Mutex::new(()),
                pending: StdMutex::new(HashMap::new()),
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Return the sanction role, looking it up by name or creating it once.
    ///
    /// A freshly created role gets a deny overwrite in every guild channel.
    /// Channels that refuse the overwrite are skipped.
    pub async fn ensure_sanction_role(&self) -> anyhow::Result<RoleId> {
        let mut cached = self.inner.sanction_role.lock().await;
        if let Some(role_id) = *cached {
            return Ok(role_id);
        }

        let role_name = &self.inner.settings.role_name;
        let role_id = match self.inner.platform.find_role_by_name(role_name).await? {
            Some(role_id) => role_id,
            None => {
                let role_id = self
                    .inner
                    .platform
                    .create_sanction_role(role_name)
                    .await
                    .context("failed to create sanction role")?;
                info!(%role_id, role_name = %role_name, "Created sanction role.");
                self.apply_channel_overwrites(role_id).await;
                role_id
            }
        };

        *cached = Some(role_id);
        Ok(role_id)
    }

    async fn apply_channel_overwrites(&self, role_id: RoleId) {
        let channel_ids = match self.inner.platform.channel_ids().await {
            Ok(channel_ids) => channel_ids,
            Err(source) => {
                warn!(?source, "failed to list channels for sanction overwrites");
                return;
            }
        };

        for channel_id in channel_ids {
            if let Err(source) = self
                .inner
                .platform
                .deny_channel_for_role(channel_id, role_id)
                .await
            {
                debug!(?source, %channel_id, "skipping channel sanction overwrite");
            }
        }
    }

    /// Grant the sanction role and schedule its reversal after `duration_minutes`.
    pub async fn mute(
        &self,
        user_id: UserId,
        duration_minutes: u64,
        reason: &str,
    ) -> anyhow::Result<MuteGrant> {
        let role_id = self.ensure_sanction_role().await?;

        let duration = Duration::from_secs(duration_minutes.saturating_mul(60));
        // Grant and registration happen under one transition so an unmute either
        // sees both or neither.
        let _transition = self.inner.transitions.lock().await;
        if let Err(source) = self
            .inner
            .platform
            .add_member_role(user_id, role_id, reason)
            .await
        {
            // The role may have been deleted behind our back; look it up again next time.
            self.inner.sanction_role.lock().await.take();
            return Err(source.context("failed to grant sanction role"));
        }

        let key = MuteKey {
            user_id,
            granted_at: Utc::now(),
            sequence: self.inner.sequence.fetch_add(1, Ordering::Relaxed),
        };
        self.schedule_reversal(key, role_id, duration);

        Ok(MuteGrant {
            key,
            role_id,
            duration,
        })
    }

    fn schedule_reversal(&self, key: MuteKey, role_id: RoleId, duration: Duration) {
        // Holding the registry lock while spawning guarantees the task cannot
        // deregister itself before it has been registered.
        let mut pending = self.lock_pending();
        let service = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            if let Err(source) = service
                .reverse_if_still_muted(key.user_id, role_id, duration)
                .await
            {
                error!(?source, user_id = %key.user_id, "scheduled unmute failed");
            }

            service.lock_pending().remove(&key);
        });
        pending.insert(key, handle);
    }

    /// Lift the sanction if the member still holds it. Returns whether a role was removed.
    pub async fn reverse_if_still_muted(
        &self,
        user_id: UserId,
        role_id: RoleId,
        muted_for: Duration,
    ) -> anyhow::Result<bool> {
        {
            let _transition = self.inner.transitions.lock().await;
            let roles = self.inner.platform.member_roles(user_id).await?;
            if !roles.contains(&role_id) {
                debug!(%user_id, "sanction already lifted; nothing to reverse");
                return Ok(false);
            }

            self.inner
                .platform
                .remove_member_role(user_id, role_id, AUTO_UNMUTE_REASON)
                .await?;
        }

        let duration_label = format_compact_duration(muted_for.as_secs());
        info!(%user_id, duration = %duration_label, "Member automatically unmuted.");
        self.audit(&format!(
            "🔊 <@{}> automatically unmuted after {}",
            user_id, duration_label
        ))
        .await;

        Ok(true)
    }

    /// Revoke the sanction role now and drop any pending reversal for the member.
    pub async fn unmute(&self, user_id: UserId) -> anyhow::Result<RoleId> {
        let role_id = self.ensure_sanction_role().await?;

        let _transition = self.inner.transitions.lock().await;
        self.inner
            .platform
            .remove_member_role(user_id, role_id, MANUAL_UNMUTE_REASON)
            .await
            .context("failed to revoke sanction role")?;

        let cancelled = self.cancel_pending(user_id);
        debug!(%user_id, cancelled, "Member manually unmuted.");

        Ok(role_id)
    }

    /// Whether both handles drive the same guild state.
    pub fn shares_state_with(&self, other: &MuteService) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of reversals still scheduled for a member.
    pub fn pending_reversals(&self, user_id: UserId) -> usize {
        self.lock_pending()
            .keys()
            .filter(|key| key.user_id == user_id)
            .count()
    }

    fn cancel_pending(&self, user_id: UserId) -> usize {
        let mut pending = self.lock_pending();
        let keys: Vec<MuteKey> = pending
            .keys()
            .filter(|key| key.user_id == user_id)
            .copied()
            .collect();

        for key in &keys {
            if let Some(handle) = pending.remove(key) {
                handle.abort();
            }
        }

        keys.len()
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<MuteKey, JoinHandle<()>>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn audit(&self, line: &str) {
        let Some(channel_id) = self.inner.settings.log_channel_id else {
            return;
        };

        if let Err(source) = self
            .inner
            .platform
            .send_channel_message(channel_id, line)
            .await
        {
            warn!(?source, %channel_id, "failed to write audit log entry");
        }
    }
}
