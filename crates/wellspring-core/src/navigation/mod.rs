mod gate;
mod view;

pub use gate::{AuthMode, Screen, SessionGate};
pub use view::{Router, Transition, View};
