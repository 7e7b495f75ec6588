pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod shell;
pub mod store;
pub mod task;
pub mod view;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use crate::app::{App, Intent};
use crate::task::Status;
use crate::view::ViewControls;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting taskpage session");

    let mut cfg = config::Config::load(cli.taskpagerc.as_deref())?;
    cfg.apply_overrides(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value)));
    debug!(files = ?cfg.loaded_files, "configuration loaded");

    let controls = ViewControls::new(cfg.default_sort(), cfg.default_filter(), cfg.page_size());
    let mut app = App::new(controls);

    let seed = !cli.empty && cfg.get_bool("seed").unwrap_or(true);
    if seed {
        seed_tasks(&mut app).context("failed to seed the session")?;
    }

    let mut renderer = render::Renderer::new(&cfg)?;
    shell::run_shell(&mut app, &mut renderer)?;

    info!("session ended");
    Ok(())
}

// Default starting tasks. Seeding goes through the intent funnel like
// everything else.
fn seed_tasks(app: &mut App) -> anyhow::Result<()> {
    app.apply(Intent::Create("Task 1".to_string()))?;
    let second = app
        .apply(Intent::Create("Task 2".to_string()))?
        .context("create returned no task")?;

    app.apply(Intent::OpenEdit(second.id))?;
    app.apply(Intent::EditStatus(Status::InProgress))?;
    app.apply(Intent::SaveEdit)?;

    debug!(count = app.store().len(), "seeded session");
    Ok(())
}
