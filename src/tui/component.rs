use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a region of the screen.
///
/// Data comes in as struct fields ("props"), filled from `App` each frame.
/// Components that keep state across frames borrow it (`&'a mut FooState`)
/// instead of owning it.
///
/// `render` takes `&mut self` so a component can update caches or scroll
/// offsets in its borrowed state while drawing, the way ratatui's
/// `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Persistent component state that reacts to terminal events.
pub trait EventHandler {
    /// High-level event handed back to the event loop.
    type Event;

    /// Consume a `TuiEvent`; return an event when the loop has something to do.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
