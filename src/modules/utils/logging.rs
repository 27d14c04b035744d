use env_logger::{Builder, Target, WriteStyle};
use log::{debug, LevelFilter};

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize the logging system; diagnostics go to stderr so stdout stays
/// free for the "not found" line
pub fn initialize_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    Builder::new()
        .filter_level(level_for(verbose))
        .format_timestamp_secs()
        .format_module_path(true)
        .write_style(WriteStyle::Auto)
        .target(Target::Stderr)
        .try_init()?;

    debug!("Logging system initialized");
    Ok(())
}

/// Mask a credential for logging, keeping only its edges
pub fn format_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
