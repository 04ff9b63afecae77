pub mod host;
pub mod parser;
pub mod types;

pub use host::{HostError, Mailbox};
pub use parser::parse_message;
pub use types::{BodyFormat, MessageItem};
