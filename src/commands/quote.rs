use poise::serenity_prelude::*;

use crate::{
    models::quotes::{Quote, QuoteFields},
    presenter::QuoteCard,
    Context, Error,
};

const PAGE_SIZE: usize = 10;
const PREVIEW_CHARS: usize = 60;

/// the locale quotes are read from and written to for this invocation.
pub(crate) fn current_locale(ctx: Context<'_>) -> String {
    let guild_locale = ctx.guild().map(|guild| guild.preferred_locale.clone());

    resolve_locale(guild_locale, &ctx.data().default_locale)
}

fn resolve_locale(guild_locale: Option<String>, default: &str) -> String {
    guild_locale
        .filter(|locale| !locale.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// threads inherit their permission overwrites from the parent channel.
fn permission_channel(
    channel_id: ChannelId,
    kind: ChannelType,
    parent_id: Option<ChannelId>,
) -> ChannelId {
    match (kind, parent_id) {
        (
            ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread,
            Some(parent_id),
        ) => parent_id,
        _ => channel_id,
    }
}

fn allows_managing(permissions: Option<Permissions>) -> bool {
    permissions.is_some_and(|permissions| permissions.manage_messages())
}

async fn can_manage_quotes(ctx: Context<'_>) -> bool {
    let Some(member) = ctx.author_member().await else {
        return false;
    };

    if member.permissions.is_some() {
        return allows_managing(member.permissions);
    }

    let Some(channel) = ctx.guild_channel().await else {
        return false;
    };
    let source = permission_channel(channel.id, channel.kind, channel.parent_id);

    let permissions = ctx.guild().and_then(|guild| {
        let target = if source == channel.id {
            Some(&channel)
        } else {
            guild.channels.get(&source)
        };

        target.map(|target| guild.user_permissions_in(target, &member))
    });

    allows_managing(permissions)
}

/// splits `text | author | origin`. author and origin may be left out.
pub(crate) fn parse_quote_fields(input: &str) -> QuoteFields {
    let mut parts = input.splitn(3, '|').map(str::trim);

    let text = parts.next().unwrap_or_default().to_string();
    let author = parts.next().map(String::from);
    let origin = parts.next().map(String::from);

    QuoteFields::new(text, author, origin)
}

async fn reply(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .reply(true)
            .allowed_mentions(CreateAllowedMentions::new().replied_user(false))
            .content(content),
    )
    .await
    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    Ok(())
}

async fn send_card(ctx: Context<'_>, quote: Option<&Quote>, locale: &str) -> Result<(), Error> {
    let data = ctx.data();
    let card = QuoteCard::render(quote, &data.display, locale);

    let mut embed = CreateEmbed::default().description(card.body());

    if can_manage_quotes(ctx).await {
        embed = embed.field("manage", card.admin_hints(&data.prefix, locale).join("\n"), false);
    }

    ctx.send(
        poise::CreateReply::default()
            .reply(true)
            .allowed_mentions(CreateAllowedMentions::new().replied_user(false))
            .embed(embed),
    )
    .await
    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    Ok(())
}

/// show a random quote in this server's language.
#[tracing::instrument(skip(ctx))]
#[poise::command(
    prefix_command,
    guild_only,
    aliases("quotes"),
    subcommands("show_quote", "add_quote", "edit_quote", "delete_quote", "list_quotes")
)]
pub async fn quote(ctx: Context<'_>) -> Result<(), Error> {
    let locale = current_locale(ctx);

    let quote = ctx
        .data()
        .quotes
        .random_quote(&locale)
        .await
        .inspect_err(|e| {
            tracing::error!(err = ?e, locale = %locale, "an error occurred when picking a quote");
        })?;

    send_card(ctx, quote.as_ref(), &locale).await
}

/// show the quote with the given id.
#[tracing::instrument(skip(ctx))]
#[poise::command(prefix_command, guild_only, rename = "show")]
pub async fn show_quote(ctx: Context<'_>, id: i64) -> Result<(), Error> {
    let quote = ctx.data().quotes.quote(id).await.inspect_err(|e| {
        tracing::error!(err = ?e, id, "an error occurred when fetching quote");
    })?;

    match quote {
        Some(quote) => send_card(ctx, Some(&quote), &current_locale(ctx)).await,
        None => reply(ctx, format!("quote #{id} does not exist.")).await,
    }
}

/// add a quote: `text | author | origin`.
#[tracing::instrument(skip(ctx))]
#[poise::command(
    prefix_command,
    guild_only,
    rename = "add",
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn add_quote(ctx: Context<'_>, #[rest] content: String) -> Result<(), Error> {
    if content.trim().is_empty() {
        let prefix = &ctx.data().prefix;
        return reply(ctx, format!("usage: `{prefix}quote add <text> | <author> | <origin>`")).await;
    }

    let locale = current_locale(ctx);

    let quote = ctx
        .data()
        .quotes
        .add_quote(&locale, parse_quote_fields(&content))
        .await
        .inspect_err(|e| {
            tracing::error!(err = ?e, locale = %locale, content = %content, "an error occurred when adding quote");
        })?;

    reply(ctx, format!("added quote #{} for `{locale}`.", quote.id)).await
}

/// replace a quote's text, author and origin.
#[tracing::instrument(skip(ctx))]
#[poise::command(
    prefix_command,
    guild_only,
    rename = "edit",
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn edit_quote(ctx: Context<'_>, id: i64, #[rest] content: String) -> Result<(), Error> {
    let quote = ctx
        .data()
        .quotes
        .edit_quote(id, parse_quote_fields(&content))
        .await
        .inspect_err(|e| {
            tracing::error!(err = ?e, id, content = %content, "an error occurred when editing quote");
        })?;

    match quote {
        Some(quote) => reply(ctx, format!("updated quote #{}.", quote.id)).await,
        None => reply(ctx, format!("quote #{id} does not exist.")).await,
    }
}

/// permanently delete a quote.
#[tracing::instrument(skip(ctx))]
#[poise::command(
    prefix_command,
    guild_only,
    rename = "delete",
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn delete_quote(ctx: Context<'_>, id: i64) -> Result<(), Error> {
    let deleted = ctx.data().quotes.delete_quote(id).await.inspect_err(|e| {
        tracing::error!(err = ?e, id, "an error occurred when deleting quote");
    })?;

    if deleted {
        reply(ctx, format!("deleted quote #{id}.")).await
    } else {
        reply(ctx, format!("quote #{id} does not exist.")).await
    }
}

fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();

    if line.chars().count() > PREVIEW_CHARS || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut.trim_end())
    } else {
        line.to_string()
    }
}

/// one page of text per [`PAGE_SIZE`] quotes.
pub(crate) fn list_pages(quotes: &[Quote]) -> Vec<String> {
    quotes
        .chunks(PAGE_SIZE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|quote| match quote.author.as_deref() {
                    Some(author) => format!("#{} {} ({})\n", quote.id, preview(&quote.text), author),
                    None => format!("#{} {}\n", quote.id, preview(&quote.text)),
                })
                .collect()
        })
        .collect()
}

fn page_embed(locale: &str, pages: &[String], current_page: usize) -> CreateEmbed {
    CreateEmbed::default()
        .title(format!("quotes for {locale}"))
        .description(pages[current_page].clone())
        .footer(CreateEmbedFooter::new(format!(
            "page {}/{}",
            current_page + 1,
            pages.len(),
        )))
}

struct PageButtons {
    first: String,
    prev: String,
    next: String,
    last: String,
}

impl PageButtons {
    fn new(ctx_id: u64) -> Self {
        Self {
            first: format!("{ctx_id}first"),
            prev: format!("{ctx_id}prev"),
            next: format!("{ctx_id}next"),
            last: format!("{ctx_id}last"),
        }
    }

    fn row(&self, current_page: usize, total: usize) -> Vec<CreateActionRow> {
        let at_start = current_page == 0;
        let at_end = current_page == total - 1;

        vec![CreateActionRow::Buttons(vec![
            CreateButton::new(&self.first).emoji('⏮').disabled(at_start),
            CreateButton::new(&self.prev).emoji('◀').disabled(at_start),
            CreateButton::new(&self.next).emoji('▶').disabled(at_end),
            CreateButton::new(&self.last).emoji('⏭').disabled(at_end),
        ])]
    }

    fn target(&self, custom_id: &str, current_page: usize, total: usize) -> Option<usize> {
        if custom_id == self.first {
            Some(0)
        } else if custom_id == self.prev {
            Some(current_page.saturating_sub(1))
        } else if custom_id == self.next {
            Some((current_page + 1).min(total - 1))
        } else if custom_id == self.last {
            Some(total - 1)
        } else {
            None
        }
    }
}

/// list this server's quotes.
#[tracing::instrument(skip_all)]
#[poise::command(
    prefix_command,
    guild_only,
    rename = "list",
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn list_quotes(ctx: Context<'_>) -> Result<(), Error> {
    let locale = current_locale(ctx);

    let quotes = ctx
        .data()
        .quotes
        .quotes_for_locale(&locale)
        .await
        .inspect_err(|e| {
            tracing::error!(err = ?e, locale = %locale, "an error occurred when fetching quotes from database");
        })?;

    let pages = list_pages(&quotes);

    if pages.is_empty() {
        return reply(ctx, format!("no quotes found for `{locale}`!")).await;
    }

    let ctx_id = ctx.id();
    let author_id = ctx.author().id;
    let buttons = PageButtons::new(ctx_id);
    let mut current_page: usize = 0;

    let msg = ctx
        .send(
            poise::CreateReply::default()
                .reply(true)
                .allowed_mentions(CreateAllowedMentions::new().replied_user(false))
                .embed(page_embed(&locale, &pages, current_page))
                .components(buttons.row(current_page, pages.len())),
        )
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    while let Some(press) = collector::ComponentInteractionCollector::new(ctx)
        .filter(move |press| press.data.custom_id.starts_with(&ctx_id.to_string()))
        .timeout(std::time::Duration::from_secs(60))
        .await
    {
        if press.user.id != author_id {
            press
                .create_response(
                    ctx,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content("you cannot interact with another user's invoked command!")
                            .ephemeral(true),
                    ),
                )
                .await
                .inspect_err(
                    |e| tracing::error!(err = ?e, "an error occurred when creating response"),
                )?;

            continue;
        }

        let Some(target) = buttons.target(&press.data.custom_id, current_page, pages.len()) else {
            continue;
        };
        current_page = target;

        press
            .create_response(
                ctx,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(page_embed(&locale, &pages, current_page))
                        .components(buttons.row(current_page, pages.len())),
                ),
            )
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when creating response"),
            )?;
    }

    msg.into_message()
        .await?
        .edit(ctx, EditMessage::default().components(vec![]))
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when editing message"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: i64, text: &str, author: Option<&str>) -> Quote {
        Quote {
            id,
            locale_id: 1,
            text: text.to_string(),
            author: author.map(String::from),
            origin: None,
        }
    }

    #[test]
    fn fields_are_split_on_pipes() {
        let fields = parse_quote_fields(" To be, or not to be | Hamlet | Act III, Scene I ");

        assert_eq!(fields.text, "To be, or not to be");
        assert_eq!(fields.author.as_deref(), Some("Hamlet"));
        assert_eq!(fields.origin.as_deref(), Some("Act III, Scene I"));
    }

    #[test]
    fn author_and_origin_are_optional() {
        let fields = parse_quote_fields("just text");
        assert_eq!(fields, QuoteFields::new("just text", None, None));

        let fields = parse_quote_fields("text | | somewhere");
        assert_eq!(fields.author, None);
        assert_eq!(fields.origin.as_deref(), Some("somewhere"));
    }

    #[test]
    fn origin_keeps_extra_pipes() {
        let fields = parse_quote_fields("a | b | c | d");

        assert_eq!(fields.origin.as_deref(), Some("c | d"));
    }

    #[test]
    fn list_is_paged_by_ten() {
        let quotes: Vec<Quote> = (1..=23).map(|id| quote(id, "words", None)).collect();

        let pages = list_pages(&quotes);

        assert_eq!(pages.len(), 3);
        assert!(pages[0].starts_with("#1 words\n"));
        assert_eq!(pages[2].lines().count(), 3);
        assert!(list_pages(&[]).is_empty());
    }

    #[test]
    fn long_and_multiline_text_is_shortened() {
        let long = "x".repeat(100);
        let pages = list_pages(&[
            quote(1, &long, Some("someone")),
            quote(2, "first line\nsecond line", None),
        ]);

        let lines: Vec<&str> = pages[0].lines().collect();
        assert_eq!(lines[0], format!("#1 {}… (someone)", "x".repeat(PREVIEW_CHARS)));
        assert_eq!(lines[1], "#2 first line…");
    }

    #[test]
    fn guild_locale_wins_over_the_default() {
        assert_eq!(resolve_locale(Some("vi".to_string()), "en-US"), "vi");
        assert_eq!(resolve_locale(Some(String::new()), "en-US"), "en-US");
        assert_eq!(resolve_locale(None, "ja"), "ja");
    }

    #[test]
    fn threads_use_their_parent_for_permissions() {
        let thread = ChannelId::new(20);
        let parent = ChannelId::new(10);

        for kind in [
            ChannelType::PublicThread,
            ChannelType::PrivateThread,
            ChannelType::NewsThread,
        ] {
            assert_eq!(permission_channel(thread, kind, Some(parent)), parent);
        }

        // a text channel's parent is its category, which does not decide permissions.
        assert_eq!(permission_channel(thread, ChannelType::Text, Some(parent)), thread);
        assert_eq!(permission_channel(thread, ChannelType::Text, None), thread);
    }

    #[test]
    fn only_manage_messages_allows_managing() {
        assert!(allows_managing(Some(Permissions::MANAGE_MESSAGES)));
        assert!(allows_managing(Some(Permissions::ADMINISTRATOR | Permissions::MANAGE_MESSAGES)));
        assert!(!allows_managing(Some(Permissions::SEND_MESSAGES)));
        assert!(!allows_managing(None));
    }

    #[test]
    fn page_buttons_clamp_to_bounds() {
        let buttons = PageButtons::new(42);

        assert_eq!(buttons.target("42prev", 0, 3), Some(0));
        assert_eq!(buttons.target("42next", 2, 3), Some(2));
        assert_eq!(buttons.target("42next", 0, 3), Some(1));
        assert_eq!(buttons.target("42last", 0, 3), Some(2));
        assert_eq!(buttons.target("42first", 2, 3), Some(0));
        assert_eq!(buttons.target("42other", 1, 3), None);
    }
}
