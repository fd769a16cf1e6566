mod client;

pub use client::{SLACK_API_URL, SlackClient};
