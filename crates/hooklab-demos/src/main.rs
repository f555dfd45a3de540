use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use hooklab_core::HostConfig;
use hooklab_demos::{Console, Demo, DemoEnv, FeedConfig, HttpCommentFeed};
use hooklab_ui::TextSurface;

/// Runs one hook demo headlessly and prints every painted frame.
#[derive(Debug, Parser)]
#[command(name = "hooklab", version)]
struct Cli {
    #[arg(value_enum)]
    demo: Demo,

    /// Click the button with this label; repeatable, applied in order.
    #[arg(long = "click", value_name = "LABEL")]
    clicks: Vec<String>,

    /// Type this text, one keystroke per character, before any clicks.
    #[arg(long = "type", value_name = "TEXT")]
    type_text: Option<String>,

    /// Input to type into (id or placeholder); the first input by default.
    #[arg(long, value_name = "SELECTOR", default_value = "")]
    input: String,

    #[arg(long, value_name = "URL")]
    comments_url: Option<String>,

    /// How long to wait for background work after each step.
    #[arg(long, value_name = "N", default_value_t = 5000)]
    wait_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let wait = Duration::from_millis(cli.wait_ms);

    let mut feed_config = FeedConfig {
        timeout: Some(wait),
        ..FeedConfig::default()
    };
    if let Some(url) = cli.comments_url {
        feed_config.url = url;
    }
    let feed = HttpCommentFeed::new(feed_config).context("building the comment feed client")?;
    let env = DemoEnv::new(Arc::new(feed), Console::logging());

    let mut host = cli
        .demo
        .mount(&env, TextSurface::stdout(), HostConfig::default());
    host.run_until_idle(wait)?;

    if let Some(text) = &cli.type_text {
        host.type_text(&cli.input, text)
            .with_context(|| format!("typing into '{}'", cli.input))?;
        host.run_until_idle(wait)?;
    }
    for label in &cli.clicks {
        host.click(label)
            .with_context(|| format!("clicking '{label}'"))?;
        host.run_until_idle(wait)?;
    }

    host.unmount();
    log::debug!("{} frame(s) painted", host.surface().frames.len());
    Ok(())
}
