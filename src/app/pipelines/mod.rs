pub mod offers_pipeline;

pub use offers_pipeline::OffersPipeline;
