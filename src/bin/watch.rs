// src/bin/watch.rs
use color_eyre::eyre::WrapErr;
use wiki_watch::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run().wrap_err("wiki_watch stopped")
}
