mod client;

pub use client::{HttpFetcher, PageSource, BROWSER_USER_AGENT, MAX_BODY_BYTES};
