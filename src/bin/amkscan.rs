// Command-line entry point; see `amkscan::cli` for the subcommands.

fn main() {
    amkscan::cli::run();
}
