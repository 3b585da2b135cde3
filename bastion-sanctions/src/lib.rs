//! Role based sanctions: the muted role, timed mutes and their scheduled reversal.

pub mod mute;
pub mod platform;
pub mod registry;
pub mod serenity_platform;

pub use mute::{MuteGrant, MuteKey, MuteService, MuteSettings};
pub use platform::GuildPlatform;
pub use registry::MuteRegistry;
pub use serenity_platform::SerenityPlatform;
