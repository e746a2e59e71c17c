//! Pseudo-code panel and status line text.

use crate::model::{Change, ChangeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Grow,
}

const ADD: &[&str] = &[
    "add(value):",
    "    if size == capacity:",
    "        grow()",
    "    data[size] = value",
    "    size = size + 1",
];

const REMOVE: &[&str] = &[
    "remove_last():",
    "    if size == 0:",
    "        error \"array is empty\"",
    "    size = size - 1",
    "    return data[size]",
];

const GROW: &[&str] = &[
    "grow():",
    "    new_capacity = max(capacity * 2, 1)",
    "    new_data = allocate(new_capacity)",
    "    for i in 0 .. size:",
    "        new_data[i] = data[i]",
    "    data = new_data",
    "    capacity = new_capacity",
];

pub fn snippet(op: Operation) -> &'static [&'static str] {
    match op {
        Operation::Add => ADD,
        Operation::Remove => REMOVE,
        Operation::Grow => GROW,
    }
}

/// Snippet and line to highlight after `change`.
pub fn highlight(change: &Change) -> (Operation, usize) {
    match change.kind {
        ChangeKind::Added(_) => (Operation::Add, 4),
        ChangeKind::Removed(_) => (Operation::Remove, 4),
        ChangeKind::Grown { .. } => (Operation::Grow, 6),
    }
}

/// Highlight for a rejected remove: the error branch.
pub fn empty_highlight() -> (Operation, usize) {
    (Operation::Remove, 2)
}

pub fn status(change: &Change) -> String {
    let tail = format!("(size {} / capacity {})", change.size, change.capacity);
    match change.kind {
        ChangeKind::Added(v) => format!("Added {v} at index {} {tail}", change.size.saturating_sub(1)),
        ChangeKind::Removed(v) => format!("Removed {v} from index {} {tail}", change.size),
        ChangeKind::Grown { from } => {
            format!("Grew from {from} to {} slots, copied {} elements {tail}", change.capacity, change.size)
        }
    }
}

pub fn empty_status() -> &'static str {
    "Array is empty: nothing to remove"
}

/// Snippet text with `>` in front of line `line` and two spaces elsewhere.
pub fn render_panel(op: Operation, line: usize) -> String {
    snippet(op)
        .iter()
        .enumerate()
        .map(|(i, l)| if i == line { format!("> {l}") } else { format!("  {l}") })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_lines_exist_in_snippets() {
        for kind in [ChangeKind::Added(1), ChangeKind::Removed(1), ChangeKind::Grown { from: 2 }] {
            let c = Change { kind, size: 1, capacity: 4 };
            let (op, line) = highlight(&c);
            assert!(line < snippet(op).len());
        }
        let (op, line) = empty_highlight();
        assert!(snippet(op)[line].contains("empty"));
    }

    #[test]
    fn status_reports_index_and_bounds() {
        let added = Change { kind: ChangeKind::Added(9), size: 3, capacity: 4 };
        assert_eq!(status(&added), "Added 9 at index 2 (size 3 / capacity 4)");

        let removed = Change { kind: ChangeKind::Removed(9), size: 2, capacity: 4 };
        assert_eq!(status(&removed), "Removed 9 from index 2 (size 2 / capacity 4)");

        let grown = Change { kind: ChangeKind::Grown { from: 2 }, size: 2, capacity: 4 };
        assert_eq!(
            status(&grown),
            "Grew from 2 to 4 slots, copied 2 elements (size 2 / capacity 4)"
        );
    }

    #[test]
    fn status_tolerates_hand_built_changes() {
        let odd = Change { kind: ChangeKind::Added(1), size: 0, capacity: 0 };
        assert_eq!(status(&odd), "Added 1 at index 0 (size 0 / capacity 0)");
    }

    #[test]
    fn panel_marks_exactly_one_line() {
        let panel = render_panel(Operation::Grow, 6);
        let marked: Vec<_> = panel.lines().filter(|l| l.starts_with('>')).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].trim_start_matches('>').trim(), "capacity = new_capacity");
        assert_eq!(panel.lines().count(), GROW.len());
    }
}
