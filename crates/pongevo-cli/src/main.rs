mod command;
mod config;
mod tui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
