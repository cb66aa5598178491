pub mod appointment;
pub mod schedule;
pub mod session;

pub use appointment::*;
pub use schedule::*;
pub use session::*;
