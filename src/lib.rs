pub mod artifact;
pub mod config;
pub mod extractor;
pub mod jobs;
pub mod palette;
