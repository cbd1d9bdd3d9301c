//! Demo: the two-shape variant.
//!
//! - Arrow keys move the red dot (its size is fixed).
//! - Z grows and X shrinks the blue claw (it stays where it is).
//!
//! Run:
//! - `cargo run --example claw`

use anyhow::Context as _;

use clawball::config::GameConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    clawball::render::app::run_with_config(GameConfig::with_claw())
        .context("failed to run claw demo")
}
