pub mod moderation;
pub mod tickets;
pub mod utility;

use bastion_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    moderation::warn::META,
    moderation::unwarn::META,
    moderation::warn_list::META,
    moderation::ban::META,
    moderation::unban::META,
    moderation::kick::META,
    moderation::mute::META,
    moderation::unmute::META,
    moderation::purge::META,
    moderation::say::META,
    tickets::ticket::META,
    tickets::close::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        moderation::warn::warn(),
        moderation::unwarn::unwarn(),
        moderation::warn_list::warn_list(),
        moderation::ban::ban(),
        moderation::unban::unban(),
        moderation::kick::kick(),
        moderation::mute::mute(),
        moderation::unmute::unmute(),
        moderation::purge::purge(),
        moderation::say::say(),
        tickets::ticket::ticket(),
        tickets::close::close(),
    ]
}
