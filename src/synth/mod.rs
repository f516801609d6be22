// Purpose: the monophonic voice and the messages that drive it
// This layer sits above the DSP primitives and below the render loop

pub mod message;
pub mod voice;
