pub mod gesture;
pub mod session;
pub mod viewport;

pub use gesture::{InputEvent, ScreenPoint};
pub use session::{Session, SessionStatus};
