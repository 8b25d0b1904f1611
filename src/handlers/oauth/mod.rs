pub mod authorize_handler;
pub mod callback_handler;
pub mod session_handler;

pub use authorize_handler::authorize_handler;
pub use callback_handler::callback_handler;
pub use session_handler::session_handler;
