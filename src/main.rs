use config::DisplayOptions;
use selector::PickStrategy;
use service::QuoteService;
use store::SqliteQuoteStore;

#[derive(Clone)]
struct Data {
    quotes: QuoteService<SqliteQuoteStore>,
    display: DisplayOptions,
    prefix: String,
    default_locale: String,
    pick_strategy: PickStrategy,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

mod commands;
mod config;
mod i18n;
mod init;
mod models;
mod presenter;
mod selector;
mod service;
mod store;
mod telemetry;
mod version;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = &*version::STARTUP_TIME;

    let mut client = init::init().await?;

    client
        .start()
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "the discord client stopped with an error"))?;

    Ok(())
}
