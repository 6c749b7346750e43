use crossterm::event::Event;

/// Everything the session loop wakes up for.
pub enum SessionEvent {
    /// A terminal event from the crossterm stream.
    Input(Event),
    /// The refresh timer fired.
    Tick,
}
