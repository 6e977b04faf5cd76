/// Human-in-the-loop interaction types and the pluggable response classifier.
pub mod interactive;
/// Trigger kinds and the event/webhook shapes a scheduler dispatches against.
pub mod trigger;
