/// Exact, case-sensitive substring test. No regex, no normalisation.
pub fn should_notify(body: &str, watch_string: &str) -> bool {
    body.contains(watch_string)
}
