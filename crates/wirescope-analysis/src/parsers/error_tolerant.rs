//! Error-tolerant parsing: count ERROR/MISSING nodes so callers can decide
//! whether a partially parsed file is usable.

use tree_sitter::Node;

/// Count ERROR and MISSING nodes below `root`, returning the count and the
/// 1-based line of the first one.
pub fn count_errors(root: Node) -> (u32, Option<u32>) {
    if !root.has_error() {
        return (0, None);
    }
    let mut count = 0u32;
    let mut first_line = None;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
            let line = node.start_position().row as u32 + 1;
            first_line = Some(first_line.map_or(line, |l: u32| l.min(line)));
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    (count, first_line)
}
