use crate::CommandMeta;

pub fn unknown_category_message(wanted_category: &str, valid_categories: &[&str]) -> String {
    let valid = valid_categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted_category),
        valid
    )
}

pub fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}\n", command.usage, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{grouped_help_description, unknown_category_message};
    use crate::CommandMeta;

    const PING: CommandMeta = CommandMeta {
        name: "ping",
        desc: "Replies with Pong!",
        category: "utility",
        usage: "!ping",
    };
    const WARN: CommandMeta = CommandMeta {
        name: "warn",
        desc: "Issue a warning to a user.",
        category: "moderation",
        usage: "!warn <user> [reason]",
    };

    #[test]
    fn groups_commands_under_category_headings() {
        assert_eq!(
            grouped_help_description(&[&WARN, &PING]),
            "**Moderation**\n`!warn <user> [reason]`: Issue a warning to a user.\n\n\
             **Utility**\n`!ping`: Replies with Pong!"
        );
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(grouped_help_description(&[]), "No commands available.");
    }

    #[test]
    fn unknown_category_lists_valid_ones() {
        assert_eq!(
            unknown_category_message("fun", &["moderation", "tickets"]),
            "Unknown category: Fun\nValid categories: Moderation, Tickets"
        );
    }
}
