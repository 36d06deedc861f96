//! toolscout - metadata generation for an AI tool directory.
//!
//! Given a tool name, the pipeline finds the tool's official website, logo,
//! demo video, description, category and pricing model. A structured record
//! from a tool-detail site is preferred; otherwise the fields are assembled
//! from search, image, video and text model providers and verified before
//! being returned.

pub mod browser;
pub mod cli;
pub mod config;
pub mod http_client;
pub mod image;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod quota;
pub mod scrape;
pub mod search;
pub mod server;
pub mod translate;
pub mod utils;
pub mod verify;
pub mod video;
