use std::str::FromStr;

use poise::serenity_prelude::{self as serenity, *};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::Instrument;

use crate::{
    commands,
    config::Config,
    service::QuoteService,
    store::SqliteQuoteStore,
    telemetry, Data,
};

async fn init_database(db_url: &str) -> anyhow::Result<Pool<Sqlite>> {
    tracing::info!("initializing database connection...");
    let opts = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
    let db = SqlitePoolOptions::new()
        .max_connections(20)
        .connect_with(opts)
        .await?;

    Ok(db)
}

async fn init_discord_client(config: &Config, data: Data) -> anyhow::Result<Client> {
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::help::help(),
                commands::status::status(),
                commands::quote::quote(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands)
                    .await
                    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when registering commands"))?;

                Ok(data)
            }.in_current_span())
        })
        .build();

    let client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .activity(serenity::ActivityData::custom(format!(
            "{}quote for a random quote",
            config.prefix
        )))
        .await?;

    Ok(client)
}

pub async fn init() -> anyhow::Result<Client> {
    telemetry::init_telemetry().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("initializing... please wait warmly.");

    let config = Config::from_env()?;

    let db = init_database(&config.database_url).await?;
    let store = SqliteQuoteStore::new(db);
    store.migrate().await?;

    tracing::info!(
        prefix = %config.prefix,
        default_locale = %config.default_locale,
        pick_strategy = ?config.pick_strategy,
        "loaded configuration"
    );

    let data = Data {
        quotes: QuoteService::new(store, config.pick_strategy),
        display: config.display,
        prefix: config.prefix.clone(),
        default_locale: config.default_locale.clone(),
        pick_strategy: config.pick_strategy,
    };

    let client = init_discord_client(&config, data).await?;

    tracing::info!("finished initializing!");
    Ok(client)
}
