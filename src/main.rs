use liboro::{cli::Args, Logger};
use log::error;

fn main() {
    let args: Args = argh::from_env();
    Logger::init(args.verbose, args.quiet);

    if let Err(e) = args.run() {
        error!("{e}");
        std::process::exit(1);
    }
}
