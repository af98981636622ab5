//! Folio: a portfolio blog rendered from a JSON article index, either as a
//! static site or through a local preview server.

pub mod article;
pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod html;
pub mod interact;
pub mod landing;
pub mod listing;
pub mod logging;
pub mod markup;
pub mod notice;
pub mod query;
pub mod reader;
pub mod server;
pub mod site;
pub mod store;
pub mod theme;
pub mod tree;

pub use error::{FolioError, Result};
