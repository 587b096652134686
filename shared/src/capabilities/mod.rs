mod audio;
mod timer;

pub use self::audio::{Audio, AudioOperation};
pub use self::timer::{Timer, TimerOperation, TimerOutput, TimerPhase};

// We use Crux's built-in Render capability directly because it provides
// all necessary functionality for triggering view updates.
pub use crux_core::render::Render;

use crate::{event::Event, App};

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub audio: Audio<Event>,
    pub timer: Timer<Event>,
}
