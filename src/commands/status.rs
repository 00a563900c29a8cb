use std::time::UNIX_EPOCH;

use crate::{
    commands::{get_bot_avatar, quote::current_locale},
    version::{get_version, POISE_VERSION, STARTUP_TIME},
    Context, Error,
};
use poise::serenity_prelude as serenity;

/// get the bot's status.
#[poise::command(prefix_command)]
#[tracing::instrument(skip_all)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let total = data.quotes.count().await.inspect_err(
        |e| tracing::error!(err = ?e, "an error occurred when counting quotes in database"),
    )?;

    let locale = current_locale(ctx);
    let local = data.quotes.count_for_locale(&locale).await.inspect_err(
        |e| tracing::error!(err = ?e, locale = %locale, "an error occurred when counting quotes in database"),
    )?;

    let uptime = STARTUP_TIME
        .duration_since(UNIX_EPOCH)
        .map(|d| format!("<t:{}:R>", d.as_secs()))
        .unwrap_or_else(|_| "unknown".to_string());

    ctx.send(poise::CreateReply::default().embed(
        serenity::CreateEmbed::new()
            .field(
                "about the bot",
                "quotebook keeps a small collection of quotes per language and shows a random one on request, using the [poise](https://github.com/serenity-rs/poise) framework.",
                false,
            )
            .field("version", get_version(), false)
            .field("rust", format!("[{0}](https://releases.rs/docs/{0})", rustc_version_runtime::version()), true)
            .field("poise", format!("[{0}](https://docs.rs/crate/poise/{0})", POISE_VERSION), true)
            .field("quotes stored", total.to_string(), true)
            .field(format!("quotes in {locale}"), local.to_string(), true)
            .field("pick strategy", format!("{:?}", data.pick_strategy).to_lowercase(), true)
            .field("uptime", uptime, true)
            .thumbnail(get_bot_avatar(ctx)),
    ))
    .await
    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    Ok(())
}
