// Adapters layer: concrete implementations of the domain ports (http, storage, mail).

pub mod http;
pub mod mail;
pub mod storage;

pub use http::HttpFetcher;
pub use mail::SmtpMailer;
pub use storage::LocalStorage;
