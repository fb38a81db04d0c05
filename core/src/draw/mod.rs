//! Draw session: state machine, timers and the updates it publishes

mod controller;
mod scheduler;
mod state;
mod view;


pub use controller::{DrawCommand, DrawController, DrawHandle};
pub use scheduler::ScheduledTask;
pub use state::{DrawState, Session, SessionSnapshot};
pub use view::{Controls, READY_TEXT, ViewReceiver, ViewSender, ViewUpdate, create_view_channel};
