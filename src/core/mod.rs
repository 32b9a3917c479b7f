pub mod etl;
pub mod extract;
pub mod paginate;

pub use crate::domain::model::{ExtractedPage, OfferRecord, ScrapedListings, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Mailer, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
