use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = maskroute::cli::run_cli() {
        eprintln!("error: {:#}", err);
        std::process::exit(2);
    }
}
