//! Infrastructure layer - External I/O and remote APIs

pub mod config;
pub mod export_file;
pub mod post_store;
pub mod wordpress;
pub mod writeas;
pub mod xmlrpc;

pub use config::Config;
pub use export_file::read_export;
pub use post_store::PostStore;
pub use wordpress::{WordPressApi, WordPressOptions, XmlRpcClient};
pub use writeas::{HttpWriteAs, NewPost, OfflineWriteAs, WriteAsApi, WriteAsSession};
