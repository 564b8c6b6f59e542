//! Captioning API adapter.

mod dto;
mod http_api;

pub use http_api::{CaptionPipelineHttpApi, CaptionerBuildError};
