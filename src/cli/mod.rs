// CLI module
// Command-line interface and argument parsing

mod args;

pub use args::CliArgs;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (missing positional arguments, unknown flags) or the
/// version flag is given, clap prints the appropriate message and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
