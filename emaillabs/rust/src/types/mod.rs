//! Type definitions for the EmailLabs transport.

pub mod message;
pub mod payload;
pub mod response;

pub use message::{Address, Attachment, Message, MessageBuilder};
pub use payload::{FileDescriptor, Payload};
pub use response::{ProviderResponse, SendReceipt, STATUS_SUCCESS};
