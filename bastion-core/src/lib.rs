pub mod config;

use std::sync::Arc;

use bastion_database::Database;
use bastion_sanctions::MuteRegistry;

pub use config::BotConfig;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub mutes: MuteRegistry,
    pub config: Arc<BotConfig>,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
