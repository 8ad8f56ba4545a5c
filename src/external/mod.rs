pub mod oauth;

pub use oauth::{OAuthClient, OAuthProfile};
