//! # Services
//!
//! Network collaborators: the dashboard feeds (weather, news) and outbound
//! mail. Each is reached through a trait so the core and the tests can swap
//! in fakes.

pub mod feed;
pub mod mail;
pub mod news;
pub mod weather;

pub use feed::{FeedSource, ServiceError};
pub use mail::{MailError, MailMessage, MailService, MailTransport, OutgoingMail};
pub use news::NewsClient;
pub use weather::WeatherClient;
