use std::process::ExitCode;

use log::error;

use webwatch::cli::{build_command, normalize_args, params_from_matches, verbose};
use webwatch::config::validate;
use webwatch::email::SmtpMailer;
use webwatch::fetch::HttpFetcher;
use webwatch::utils::logging::initialize_logging;
use webwatch::{run, Outcome};

fn main() -> ExitCode {
    let matches = build_command().get_matches_from(normalize_args(std::env::args()));

    if let Err(e) = initialize_logging(verbose(&matches)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Nothing touches the network until the whole config is valid
    let config = match validate(&params_from_matches(&matches)) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mailer = SmtpMailer::new(&config.smtp_server, &config.auth);
    let result =
        HttpFetcher::new(config.fetch_timeout).and_then(|fetcher| run(&config, &fetcher, &mailer));

    match result {
        Ok(Outcome::NotMatched) => {
            println!("{:?} NOT found in {}", config.watch_string, config.url);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Sent { .. }) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
