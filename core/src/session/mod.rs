pub mod controller;
pub mod input;
pub mod state;

pub use controller::{SessionController, SessionSnapshot};
pub use input::TextInputKind;
pub use state::{SessionEvent, SessionState, SessionStatus, View};
