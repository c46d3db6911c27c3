//! Conversions from Serenity models into dispatcher events

use frame::{CommandOption, Interaction, InteractionKind, OptionValue, TextMessage};
use serenity::{
    client::Context,
    model::{
        application::{CommandDataOption, CommandDataOptionValue, CommandInteraction},
        channel::Message,
        guild::Guild,
        id::{RoleId, UserId},
        permissions::Permissions,
    },
};

use crate::prelude::*;

/// Guild-level permissions granted by the base (`@everyone`) role plus a
/// member's other roles.  Owners and administrators hold every permission.
fn fold_permissions(
    is_owner: bool,
    base: Permissions,
    roles: impl IntoIterator<Item = Permissions>,
) -> Permissions {
    if is_owner {
        return Permissions::all();
    }

    let perms = roles.into_iter().fold(base, |p, r| p | r);

    if perms.contains(Permissions::ADMINISTRATOR) {
        Permissions::all()
    } else {
        perms
    }
}

fn role_permissions(guild: &Guild, user: UserId, roles: &[RoleId]) -> Permissions {
    let everyone = guild
        .roles
        .get(&RoleId::new(guild.id.get()))
        .map_or_else(Permissions::empty, |r| r.permissions);

    fold_permissions(
        guild.owner_id == user,
        everyone,
        roles
            .iter()
            .filter_map(|id| guild.roles.get(id))
            .map(|r| r.permissions),
    )
}

/// Build a dispatcher event from a gateway message.  Permissions are read
/// from the cache only; an uncached guild or member yields `None`.
pub fn text_message(ctx: &Context, msg: &Message, bot: UserId) -> TextMessage {
    let (member_permissions, bot_permissions) = match msg.guild_id {
        Some(id) if !msg.author.bot => ctx.cache.guild(id).map_or_else(
            || {
                debug!(guild = %id, "Guild not cached, permissions unknown");
                (None, None)
            },
            |guild| {
                let author_roles = msg
                    .member
                    .as_ref()
                    .map(|m| m.roles.as_slice())
                    .or_else(|| guild.members.get(&msg.author.id).map(|m| m.roles.as_slice()));

                (
                    author_roles.map(|r| role_permissions(&guild, msg.author.id, r)),
                    guild
                        .members
                        .get(&bot)
                        .map(|m| role_permissions(&guild, bot, &m.roles)),
                )
            },
        ),
        Some(_) | None => (None, None),
    };

    TextMessage {
        author: msg.author.id,
        author_is_bot: msg.author.bot,
        guild_id: msg.guild_id,
        content: msg.content.clone(),
        mentions: msg.mentions.iter().map(|u| u.id).collect(),
        member_permissions,
        bot_permissions,
    }
}

fn option(opt: &CommandDataOption) -> CommandOption {
    let value = match opt.value {
        CommandDataOptionValue::String(ref s) => OptionValue::String(s.clone()),
        CommandDataOptionValue::Autocomplete { ref value, .. } => OptionValue::String(value.clone()),
        CommandDataOptionValue::Integer(i) => OptionValue::Integer(i),
        CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(b),
        CommandDataOptionValue::Number(f) => OptionValue::Number(f),
        CommandDataOptionValue::User(u) => OptionValue::User(u),
        CommandDataOptionValue::Channel(c) => OptionValue::Channel(c.get()),
        CommandDataOptionValue::Role(r) => OptionValue::Role(r.get()),
        CommandDataOptionValue::SubCommand(ref o) => {
            OptionValue::SubCommand(o.iter().map(option).collect())
        },
        CommandDataOptionValue::SubCommandGroup(ref o) => {
            OptionValue::SubCommandGroup(o.iter().map(option).collect())
        },
        _ => OptionValue::Unknown,
    };

    CommandOption {
        name: opt.name.clone(),
        value,
    }
}

fn command(kind: InteractionKind, cmd: &CommandInteraction) -> Interaction {
    Interaction {
        kind,
        command_name: cmd.data.name.clone(),
        options: cmd.data.options.iter().map(option).collect(),
        user: cmd.user.id,
        guild_id: cmd.guild_id,
        member_permissions: cmd.member.as_ref().and_then(|m| m.permissions),
        app_permissions: cmd.app_permissions,
    }
}

/// Convert interactions that carry command data.  Component, modal and ping
/// interactions have no command to dispatch and yield `None`.
pub fn interaction(int: &serenity::model::application::Interaction) -> Option<Interaction> {
    use serenity::model::application::Interaction as I;

    match int {
        I::Command(c) => Some(command(InteractionKind::Command, c)),
        I::Autocomplete(c) => Some(command(InteractionKind::Autocomplete, c)),
        _ => None,
    }
}
