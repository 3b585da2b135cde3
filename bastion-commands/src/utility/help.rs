use crate::utility::embeds::{grouped_help_description, unknown_category_message};
use crate::{COMMANDS, CommandMeta};
use bastion_core::{Context, Error};
use bastion_utils::COMMAND_PREFIX;
use bastion_utils::embed::build_embed;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [category]",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Only show one category"] category: Option<String>,
) -> Result<(), Error> {
    let category = category.map(|raw| raw.trim().to_ascii_lowercase());
    let category = category.as_deref().filter(|raw| !raw.is_empty());

    let categories = known_categories();
    if let Some(wanted_category) = category
        && !categories.contains(&wanted_category)
    {
        ctx.say(unknown_category_message(wanted_category, &categories))
            .await?;
        return Ok(());
    }

    let commands = sorted_commands(category);
    let footer = format!("Slash commands or the {COMMAND_PREFIX} prefix both work.");
    let embed = build_embed(
        "Available Commands",
        grouped_help_description(&commands),
        Some(&footer),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn known_categories() -> Vec<&'static str> {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}

#[cfg(test)]
mod tests {
    use super::{known_categories, sorted_commands};

    #[test]
    fn categories_are_unique_and_sorted() {
        assert_eq!(known_categories(), vec!["moderation", "tickets", "utility"]);
    }

    #[test]
    fn filters_by_category_and_sorts_by_name() {
        let names: Vec<&str> = sorted_commands(Some("tickets"))
            .iter()
            .map(|command| command.name)
            .collect();
        assert_eq!(names, vec!["close", "ticket"]);
    }

    #[test]
    fn unfiltered_listing_covers_every_command() {
        let commands = sorted_commands(None);
        assert_eq!(commands.len(), crate::COMMANDS.len());
        assert_eq!(commands[0].category, "moderation");
        assert_eq!(commands[0].name, "ban");
    }
}
