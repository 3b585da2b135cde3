use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{ephemeral_text, guild_only_message, usage_message};
use crate::moderation::logging::{log_action, user_label};
use crate::tickets::{ticket_channel_name, ticket_overwrites, ticket_topic};
use bastion_core::{Context, Error};
use bastion_utils::formatting::scrub_mentions;

pub const META: CommandMeta = CommandMeta {
    name: "ticket",
    desc: "Open a private support ticket with the staff.",
    category: "tickets",
    usage: "!ticket <subject>",
};

#[poise::command(prefix_command, slash_command, category = "Tickets")]
pub async fn ticket(
    ctx: Context<'_>,
    #[description = "What the ticket is about"]
    #[rest]
    subject: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(subject) = subject
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
    else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let author = ctx.author();
    let channel_name = ticket_channel_name(author.id);
    let channels = guild_id.channels(ctx.http()).await?;

    if channels
        .values()
        .any(|channel| channel.kind == serenity::ChannelType::Text && channel.name == channel_name)
    {
        ctx.send(ephemeral_text("You already have an open ticket."))
            .await?;
        return Ok(());
    }

    let category_name = &ctx.data().config.ticket_category_name;
    let category_id = match channels.values().find(|channel| {
        channel.kind == serenity::ChannelType::Category && &channel.name == category_name
    }) {
        Some(category) => category.id,
        None => {
            let created = guild_id
                .create_channel(
                    ctx.http(),
                    serenity::CreateChannel::new(category_name.as_str())
                        .kind(serenity::ChannelType::Category),
                )
                .await?;
            info!(category = %category_name, guild_id = guild_id.get(), "created ticket category");
            created.id
        }
    };

    let staff_role = match ctx.data().config.staff_role_id {
        Some(raw) => {
            let role_id = serenity::RoleId::new(raw);
            let roles = guild_id.roles(ctx.http()).await?;
            roles.contains_key(&role_id).then_some(role_id)
        }
        None => None,
    };

    let builder = serenity::CreateChannel::new(channel_name)
        .kind(serenity::ChannelType::Text)
        .category(category_id)
        .topic(ticket_topic(&author.tag(), &subject))
        .permissions(ticket_overwrites(guild_id.everyone_role(), author.id, staff_role));

    let channel = match guild_id.create_channel(ctx.http(), builder).await {
        Ok(channel) => channel,
        Err(source) => {
            error!(?source, "ticket channel creation failed");
            ctx.send(ephemeral_text(
                "I couldn't create your ticket. I need the 'Manage Channels' permission.",
            ))
            .await?;
            return Ok(());
        }
    };

    let greeting = serenity::CreateMessage::new().content(format!(
        "Hello <@{}>! A staff member will be with you shortly.\nSubject: **{}**",
        author.id.get(),
        scrub_mentions(&subject)
    ));
    channel.send_message(ctx.http(), greeting).await?;

    ctx.send(ephemeral_text(format!(
        "🎫 Ticket created: <#{}>",
        channel.id.get()
    )))
    .await?;

    log_action(
        &ctx,
        &format!(
            "🎫 Ticket created by {} – <#{}> – {}",
            user_label(author),
            channel.id.get(),
            scrub_mentions(&subject)
        ),
    )
    .await;

    Ok(())
}
