pub mod token;
pub use token::*;

pub mod outbox;
pub use outbox::*;
