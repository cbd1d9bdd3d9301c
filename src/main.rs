//! Thin binary wrapper: the single-dot game.
//!
//! Run:
//! - `cargo run`
//! - `RUST_LOG=debug cargo run` for per-frame shape positions

fn main() -> anyhow::Result<()> {
    // Keep logging setup in the binary so the library remains unopinionated.
    env_logger::init();

    clawball::run_app()
}
