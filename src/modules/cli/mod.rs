use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::RawParams;
use crate::DEFAULT_SMTP_SERVER;

const VALUE_FLAGS: [&str; 8] = [
    "url", "warn", "from", "to", "smtp", "username", "password", "timeout",
];
const SWITCH_FLAGS: [&str; 1] = ["verbose"];

/// Define the command-line interface
pub fn build_command() -> Command {
    let value = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .allow_hyphen_values(true)
            .help(help)
    };

    Command::new("webwatch")
        .about("Fetch a URL once and send an email if a string appears in it")
        .arg(value("url", "URL to check"))
        .arg(value("warn", "Send email if this string is found in the web page"))
        .arg(value("from", "Email address to send from"))
        .arg(value("to", "Comma-separated list of email addresses to send to"))
        .arg(
            value("smtp", "Address of SMTP server to use (host:port)")
                .default_value(DEFAULT_SMTP_SERVER),
        )
        .arg(value("username", "SMTP username (needs -password)"))
        .arg(value("password", "SMTP password (needs -username)"))
        .arg(value("timeout", "HTTP timeout in seconds (default 5)"))
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log at debug level, including the outgoing message"),
        )
}

/// Rewrite Go-style `-url value` / `-url=value` into `--url ...` so clap
/// accepts the single-dash spelling as well. The token after a value flag
/// is always its value, even when it starts with `-`.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    let mut expect_value = false;

    for (index, arg) in args.into_iter().enumerate() {
        if expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }
        if index == 0 || passthrough || !arg.starts_with('-') || arg == "-" {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let flag = arg.trim_start_matches('-');
        let (name, inline_value) = match flag.split_once('=') {
            Some((name, _)) => (name, true),
            None => (flag, false),
        };

        if VALUE_FLAGS.contains(&name) {
            expect_value = !inline_value;
            out.push(format!("--{}", flag));
        } else if SWITCH_FLAGS.contains(&name) {
            out.push(format!("--{}", flag));
        } else {
            out.push(arg);
        }
    }
    out
}

fn string_arg(matches: &ArgMatches, name: &str) -> String {
    matches.get_one::<String>(name).cloned().unwrap_or_default()
}

/// Collect raw values; validation happens later
pub fn params_from_matches(matches: &ArgMatches) -> RawParams {
    RawParams {
        url: string_arg(matches, "url"),
        warn: string_arg(matches, "warn"),
        from: string_arg(matches, "from"),
        to: string_arg(matches, "to"),
        smtp: string_arg(matches, "smtp"),
        username: string_arg(matches, "username"),
        password: string_arg(matches, "password"),
        timeout: string_arg(matches, "timeout"),
    }
}

pub fn verbose(matches: &ArgMatches) -> bool {
    matches.get_flag("verbose")
}
