//! Instrumented Cache demo
//!
//! Connects to Redis, stores a few values, reads them back and prints the
//! recorded call history of `Cache.store`.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use instrumented_cache::{Cache, Config, STORE_OPERATION};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "instrumented_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Connecting to {}", config.redis_url());

    let mut cache = Cache::connect(&config).context("failed to open the backing store")?;

    let text_key = cache.store("foo")?;
    let bytes_key = cache.store(b"bar")?;
    let int_key = cache.store(42)?;
    let float_key = cache.store(3.25)?;

    info!("text    -> {:?}", cache.get_str(&text_key)?);
    info!("bytes   -> {:?}", cache.get(&bytes_key)?);
    info!("integer -> {:?}", cache.get_int(&int_key)?);
    info!("float   -> {:?}", cache.get_float(&float_key)?);
    info!("missing -> {:?}", cache.get("nonexistent-uuid")?);

    cache.print_replay(STORE_OPERATION)?;
    Ok(())
}
