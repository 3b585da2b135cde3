pub mod ban;
pub mod kick;
pub mod mute;
pub mod purge;
pub mod say;
pub mod unban;
pub mod unmute;
pub mod unwarn;
pub mod warn;
pub mod warn_list;

pub(crate) mod embeds;
pub(crate) mod logging;
