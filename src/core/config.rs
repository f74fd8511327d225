mod parsing;
mod secret;
mod settings;
mod types;

pub(crate) use types::{SessionCookieSettings, Settings};

#[cfg(test)]
pub(crate) use types::SameSite;
