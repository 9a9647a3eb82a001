// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ncstate: command-line front end for the NC State web toolkit.
//
// Entry point. Initialises logging, loads the configuration, and dispatches
// to the brand or service handlers.

mod args;
mod handlers;

use anyhow::{Context, Result};
use clap::Parser;
use ncstate_core::NcstateConfig;

use args::{Cli, Command};
use handlers::{brand, service};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => NcstateConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => NcstateConfig::from_env().context("loading configuration")?,
    };

    match cli.command {
        Command::Colors { level } => brand::colors(level.as_deref())?,
        Command::Color { key } => brand::color(&key)?,
        Command::Contrast { foreground, background, size, bold } => {
            brand::contrast(&foreground, &background, size, bold)?
        }
        Command::Accessible { size, bold, level } => brand::accessible(size, bold, level)?,
        Command::Bar { site_url, color, no_center } => {
            brand::bar(&config, site_url, &color, !no_center)
        }
        Command::Quicklinks => brand::quicklinks(),
        Command::Version { compare } => brand::version(compare.as_deref()),
        Command::Logo { bold, normal, image } => {
            brand::logo(&config, &bold, &normal, &image).await?
        }
        Command::Text { text, image } => brand::text(&config, &text, &image).await?,
        Command::Dining { action, xml } => service::dining(&config, action, xml).await?,
        Command::Ouc { action, xml } => service::ouc(&config, action, xml).await?,
        Command::Directory { action, bind_dn, password, fields } => {
            service::directory(&config, action, &bind_dn, &password, &fields).await?
        }
        Command::Remedy { action, user, password } => {
            service::remedy(&config, action, &user, &password).await?
        }
        Command::Config { path } => {
            config
                .save(&path)
                .with_context(|| format!("writing configuration to {}", path.display()))?;
            tracing::info!(path = %path.display(), "configuration written");
        }
    }

    Ok(())
}
