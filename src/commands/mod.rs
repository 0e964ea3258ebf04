//! Bot commands.

mod dc;
mod pause;
mod play;
mod queue;
mod remove;
mod skip;
mod unskip;

use crate::Data;
use crate::MynahError;

/// Convenient type alias for [poise::Command].
pub type Command = poise::Command<Data, MynahError>;

/// Lists all the implemented commands
pub fn list() -> Vec<Command> {
    vec![
        play::play(),
        pause::pause(),
        skip::skip(),
        unskip::unskip(),
        remove::remove(),
        queue::queue(),
        dc::dc(),
    ]
}
