use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serenity::all::{GuildId, Http};

use crate::mute::{MuteService, MuteSettings};
use crate::serenity_platform::SerenityPlatform;

/// Lazily created [`MuteService`] per guild, shared through the bot data.
#[derive(Clone, Debug, Default)]
pub struct MuteRegistry {
    settings: MuteSettings,
    services: Arc<Mutex<HashMap<GuildId, MuteService>>>,
}

impl MuteRegistry {
    pub fn new(settings: MuteSettings) -> Self {
        Self {
            settings,
            services: Arc::default(),
        }
    }

    /// Service for `guild_id`, backed by the Discord HTTP API.
    pub fn for_guild(&self, http: &Arc<Http>, guild_id: GuildId) -> MuteService {
        self.get_or_insert_with(guild_id, || {
            MuteService::new(
                Arc::new(SerenityPlatform::new(Arc::clone(http), guild_id)),
                self.settings.clone(),
            )
        })
    }

    fn get_or_insert_with(
        &self,
        guild_id: GuildId,
        create: impl FnOnce() -> MuteService,
    ) -> MuteService {
        self.services
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(guild_id)
            .or_insert_with(create)
            .clone()
    }

    pub fn settings(&self) -> &MuteSettings {
        &self.settings
    }
}
