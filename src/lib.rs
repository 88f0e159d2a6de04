// Blocking client for the Goodreads REST/XML API

pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod request;
pub mod response;
pub mod transport;
pub mod xml_node;

// Re-export key types for convenience
pub use client::GoodreadsClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult, ClientError};
pub use options::{GroupListSort, GroupMemberSort, GroupTopicSort, SearchField};
pub use request::{build_url, AppendMode, Params, Request, Route};
pub use transport::{Fetched, HttpTransport, RawResponse, Transport};
pub use xml_node::XmlNode;
