pub mod dispatcher;
pub mod mailer;

pub use dispatcher::*;
pub use mailer::*;
