use multistep::{
    cli::{get_args, get_log_level_from_verbose, run},
    error::{default_error_handler, Error},
};

fn main() {
    let args = get_args();
    let level = get_log_level_from_verbose(args.verbose);
    env_logger::Builder::new().filter_level(level).init();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Error::from)
        .and_then(|runtime| runtime.block_on(run(args)));

    if let Err(err) = result {
        default_error_handler(err);
    }
}
