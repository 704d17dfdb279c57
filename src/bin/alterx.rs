//! `alterx-run <list>`: run alterx and save the permutations under outputs/

use reconrun::cli;
use reconrun::domain::Tool;

fn main() {
    std::process::exit(cli::run(Tool::Alterx));
}
