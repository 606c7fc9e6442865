mod app;

use app::AppConfig;
use clap::Parser;

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();

    let config = AppConfig::parse();
    let result = config.to_run_config().and_then(|run_config| app::run(&run_config));
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
