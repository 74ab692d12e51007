//! Drag gesture on the meter: start, any number of moves, end.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
}

/// One gesture at a time. Moves outside a drag are ignored.
#[derive(Debug, Default)]
pub struct DragGesture {
    state: GestureState,
}

impl DragGesture {
    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == GestureState::Dragging
    }

    /// A start during a drag keeps the current drag going.
    pub fn start(&mut self) {
        self.state = GestureState::Dragging;
    }

    /// Whether a move event should be handled.
    pub fn accepts_move(&self) -> bool {
        self.is_dragging()
    }

    /// Ends the drag. Returns `false` when there was none.
    pub fn end(&mut self) -> bool {
        std::mem::replace(&mut self.state, GestureState::Idle) == GestureState::Dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_only_count_while_dragging() {
        let mut gesture = DragGesture::default();
        assert!(!gesture.accepts_move());
        gesture.start();
        assert!(gesture.accepts_move());
        assert!(gesture.end());
        assert!(!gesture.accepts_move());
        assert_eq!(gesture.state(), GestureState::Idle);
    }

    #[test]
    fn ending_without_a_drag_is_a_no_op() {
        let mut gesture = DragGesture::default();
        assert!(!gesture.end());
    }
}
