//! `uncover-run <query>`: run uncover and save its findings under outputs/

use reconrun::cli;
use reconrun::domain::Tool;

fn main() {
    std::process::exit(cli::run(Tool::Uncover));
}
