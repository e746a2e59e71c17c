//! Button actions and frame pacing, kept free of the DOM.
//!
//! The model notifies synchronously, but the page shows one change at a
//! time: [`Session::step`] applies at most one queued [`Change`] per frame
//! and holds the rest back while a grow animation is running. An add into a
//! full array therefore shows the reallocation first and the new value
//! after the cage has finished widening.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, warn};

use crate::config::{parse_element, ValueSource, VizConfig};
use crate::error::{EmptyError, VizError};
use crate::model::{Change, ChangeKind, DynamicArray, Element};
use crate::pseudo_code::{self, Operation};
use crate::scene::{SceneLayout, Tween};

/// What the pseudo-code and status panels should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelText {
    pub op: Operation,
    /// Highlighted line within `op`'s snippet.
    pub line: usize,
    pub status: String,
}

impl PanelText {
    pub fn for_change(change: &Change) -> Self {
        let (op, line) = pseudo_code::highlight(change);
        Self {
            op,
            line,
            status: pseudo_code::status(change),
        }
    }

    /// Panel for an action that was refused.
    pub fn rejected(err: &VizError) -> Self {
        match err {
            VizError::Empty(_) => {
                let (op, line) = pseudo_code::empty_highlight();
                Self {
                    op,
                    line,
                    status: pseudo_code::empty_status().to_owned(),
                }
            }
            other => Self {
                op: Operation::Add,
                line: 0,
                status: other.to_string(),
            },
        }
    }
}

pub struct Session {
    array: DynamicArray,
    values: ValueSource,
    changes: Rc<RefCell<VecDeque<Change>>>,
    tween: Tween,
    tween_ms: u32,
    shown_size: usize,
    shown_capacity: usize,
}

impl Session {
    pub fn new(cfg: &VizConfig) -> Self {
        let mut array = DynamicArray::with_capacity(cfg.initial_capacity);
        let changes = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&changes);
        array.subscribe(move |c| sink.borrow_mut().push_back(*c));

        Self {
            values: cfg.values(),
            tween: Tween::settled(array.capacity()),
            tween_ms: cfg.tween_ms,
            shown_size: 0,
            shown_capacity: array.capacity(),
            array,
            changes,
        }
    }

    /// Panel text before the first click.
    pub fn intro(&self) -> PanelText {
        PanelText {
            op: Operation::Add,
            line: 0,
            status: format!("Empty array (size 0 / capacity {})", self.array.capacity()),
        }
    }

    pub fn array(&self) -> &DynamicArray {
        &self.array
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    /// Changes emitted by the model but not yet on screen.
    pub fn pending(&self) -> usize {
        self.changes.borrow().len()
    }

    /// "Add Element": `raw` is the input field's text. Blank takes the next
    /// generated value; anything that is not an `i32` is refused and the
    /// array is left alone.
    pub fn add(&mut self, raw: &str) -> Result<Element, VizError> {
        let value = match parse_element(raw) {
            Ok(Some(v)) => v,
            Ok(None) => self.values.next().unwrap_or_default(),
            Err(e) => {
                warn!("add rejected: {e}");
                return Err(e);
            }
        };
        self.array.add(value);
        Ok(value)
    }

    pub fn remove(&mut self) -> Result<Element, EmptyError> {
        match self.array.remove_last() {
            Ok(v) => {
                self.values.give_back(v);
                Ok(v)
            }
            Err(e) => {
                warn!("remove rejected: {e}");
                Err(e)
            }
        }
    }

    pub fn grow(&mut self) {
        self.array.grow();
    }

    /// Apply the next queued change, unless a grow animation is still
    /// running at `now_ms`. Returns the panel text for the applied change.
    pub fn step(&mut self, now_ms: f64) -> Option<PanelText> {
        if !self.tween.is_done(now_ms) {
            return None;
        }
        let change = self.changes.borrow_mut().pop_front()?;
        if let ChangeKind::Grown { from } = change.kind {
            self.tween = Tween::start(from, change.capacity, now_ms, self.tween_ms);
        }
        self.shown_size = change.size;
        self.shown_capacity = change.capacity;
        debug!("showing {change:?}");
        Some(PanelText::for_change(&change))
    }

    /// Scene for `now_ms`, reflecting only the changes already stepped.
    pub fn layout(&self, now_ms: f64) -> SceneLayout {
        let values = self.array.as_slice();
        let visible = &values[..self.shown_size.min(values.len())];
        SceneLayout::compute(
            visible,
            self.tween.from,
            self.shown_capacity,
            self.tween.progress(now_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(tween_ms: u32) -> Session {
        Session::new(&VizConfig {
            tween_ms,
            ..VizConfig::default()
        })
    }

    #[test]
    fn blank_input_uses_generated_values() {
        let mut s = session(0);
        assert_eq!(s.add(""), Ok(5));
        assert_eq!(s.add("  "), Ok(7));
        assert_eq!(s.array().as_slice(), &[5, 7]);
    }

    #[test]
    fn typed_value_is_added() {
        let mut s = session(0);
        assert_eq!(s.add("-40"), Ok(-40));
        assert_eq!(s.array().as_slice(), &[-40]);
    }

    #[test]
    fn bad_input_leaves_array_untouched() {
        let mut s = session(0);
        s.add("1").unwrap();
        let err = s.add("twelve").unwrap_err();
        assert_eq!(err, VizError::NotANumber("twelve".into()));
        assert_eq!(s.array().as_slice(), &[1]);
        assert_eq!(s.pending(), 1);
        assert_eq!(PanelText::rejected(&err).status, "'twelve' is not a whole number");
    }

    #[test]
    fn remove_gives_generated_value_back() {
        let mut s = session(0);
        s.add("").unwrap();
        s.add("").unwrap();
        assert_eq!(s.remove(), Ok(7));
        assert_eq!(s.add(""), Ok(7));
    }

    #[test]
    fn empty_remove_reports_error_branch() {
        let mut s = session(0);
        let err = s.remove().unwrap_err();
        let text = PanelText::rejected(&err.into());
        assert_eq!(text.status, pseudo_code::empty_status());
        assert_eq!((text.op, text.line), pseudo_code::empty_highlight());
        assert_eq!(s.pending(), 0);
        assert_eq!(s.step(0.0), None);
    }

    #[test]
    fn one_change_per_frame() {
        let mut s = session(0);
        s.add("").unwrap();
        s.add("").unwrap();
        assert_eq!(s.step(0.0).unwrap().status, "Added 5 at index 0 (size 1 / capacity 2)");
        assert_eq!(s.layout(0.0).filled, 1);
        assert_eq!(s.step(16.0).unwrap().status, "Added 7 at index 1 (size 2 / capacity 2)");
        assert_eq!(s.step(32.0), None);
    }

    #[test]
    fn grow_panel_holds_until_animation_ends() {
        let mut s = session(400);
        for _ in 0..3 {
            s.add("").unwrap();
        }
        s.step(0.0);
        s.step(16.0);

        let grown = s.step(32.0).unwrap();
        assert_eq!(grown.op, Operation::Grow);
        assert_eq!(s.tween().from, 2);
        assert_eq!(s.tween().to, 4);

        // Mid-animation: the new value stays queued and off screen.
        assert_eq!(s.step(200.0), None);
        let mid = s.layout(200.0);
        assert_eq!(mid.slots.len(), 4);
        assert_eq!(mid.filled, 2);

        let added = s.step(432.0).unwrap();
        assert_eq!(added.status, "Added 9 at index 2 (size 3 / capacity 4)");
        assert_eq!(s.layout(432.0).filled, 3);
        assert_eq!(s.pending(), 0);
    }
}
