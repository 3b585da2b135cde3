pub mod close;
pub mod ticket;

use poise::serenity_prelude as serenity;

const TICKET_CHANNEL_PREFIX: &str = "ticket-";

pub(crate) fn ticket_channel_name(user_id: serenity::UserId) -> String {
    format!("{}{}", TICKET_CHANNEL_PREFIX, user_id.get())
}

pub(crate) fn is_ticket_channel(name: &str) -> bool {
    name.starts_with(TICKET_CHANNEL_PREFIX)
}

pub(crate) fn ticket_topic(author_tag: &str, subject: &str) -> String {
    format!("Ticket for {} • {}", author_tag, subject)
}

/// Hide the channel from everyone except its author and, when configured, staff.
pub(crate) fn ticket_overwrites(
    everyone: serenity::RoleId,
    author: serenity::UserId,
    staff_role: Option<serenity::RoleId>,
) -> Vec<serenity::PermissionOverwrite> {
    let mut overwrites = vec![
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::empty(),
            deny: serenity::Permissions::VIEW_CHANNEL,
            kind: serenity::PermissionOverwriteType::Role(everyone),
        },
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::VIEW_CHANNEL
                | serenity::Permissions::SEND_MESSAGES
                | serenity::Permissions::ATTACH_FILES,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(author),
        },
    ];

    if let Some(staff_role) = staff_role {
        overwrites.push(serenity::PermissionOverwrite {
            allow: serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Role(staff_role),
        });
    }

    overwrites
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{is_ticket_channel, ticket_channel_name, ticket_overwrites, ticket_topic};

    #[test]
    fn channel_names_are_keyed_by_author() {
        let name = ticket_channel_name(serenity::UserId::new(42));
        assert_eq!(name, "ticket-42");
        assert!(is_ticket_channel(&name));
        assert!(!is_ticket_channel("general"));
    }

    #[test]
    fn topic_names_author_and_subject() {
        assert_eq!(ticket_topic("member", "appeal"), "Ticket for member • appeal");
    }

    #[test]
    fn everyone_is_denied_and_author_allowed() {
        let everyone = serenity::RoleId::new(1);
        let author = serenity::UserId::new(2);

        let overwrites = ticket_overwrites(everyone, author, None);

        assert_eq!(overwrites.len(), 2);
        assert_eq!(overwrites[0].kind, serenity::PermissionOverwriteType::Role(everyone));
        assert!(overwrites[0].deny.contains(serenity::Permissions::VIEW_CHANNEL));
        assert_eq!(overwrites[1].kind, serenity::PermissionOverwriteType::Member(author));
        assert!(overwrites[1].allow.contains(serenity::Permissions::ATTACH_FILES));
    }

    #[test]
    fn staff_role_gets_access_when_configured() {
        let staff = serenity::RoleId::new(3);

        let overwrites =
            ticket_overwrites(serenity::RoleId::new(1), serenity::UserId::new(2), Some(staff));

        let staff_overwrite = &overwrites[2];
        assert_eq!(staff_overwrite.kind, serenity::PermissionOverwriteType::Role(staff));
        assert_eq!(
            staff_overwrite.allow,
            serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES
        );
    }
}
