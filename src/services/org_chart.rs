//! Org-chart reconstruction from a flat roster.
//!
//! The roster links employees only by manager id (`work.reportsTo`). The
//! builder regroups that flat list into a forest and renders a depth-first,
//! indented traversal. The tree is derived state: it is rebuilt from the
//! given roster on every call and never cached, so it always reflects the
//! snapshot it was built from.

use std::collections::{HashMap, HashSet};

use crate::domain::models::EmployeeRecord;

const INDENT: &str = "  ";

/// Render the org chart for a roster.
///
/// Roots are employees with no manager reference, a manager reference
/// without a usable id, or a manager id that matches nobody in the roster.
/// Both roots and every sibling group are ordered lexicographically by the
/// employee's compact display line (id as tiebreaker), which makes the
/// output byte-identical across calls on the same roster.
///
/// Employees that are unreachable from every root (manager-reference
/// cycles) are not silently dropped: they are listed in a trailing
/// diagnostic section and a warning is logged.
pub fn render_org_chart(roster: &[EmployeeRecord]) -> String {
    let mut emp_by_id: HashMap<String, &EmployeeRecord> = HashMap::new();
    for record in roster {
        if let Some(id) = record.id() {
            emp_by_id.insert(id, record);
        }
    }

    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    let mut roots: Vec<String> = Vec::new();
    for (id, record) in &emp_by_id {
        match record.manager_id() {
            Some(manager_id) if emp_by_id.contains_key(&manager_id) => {
                children.entry(manager_id).or_default().push(id.clone());
            }
            // No manager, no usable manager id, or a manager id that
            // matches nobody in the roster: all roots.
            _ => roots.push(id.clone()),
        }
    }

    let sort_key = |id: &String| -> (String, String) {
        let display = emp_by_id
            .get(id)
            .map(|record| record.display_line())
            .unwrap_or_default();
        (display, id.clone())
    };
    roots.sort_by_key(&sort_key);
    for siblings in children.values_mut() {
        siblings.sort_by_key(&sort_key);
    }

    let mut lines: Vec<String> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    // (id, depth) stack; children are pushed in reverse so the traversal
    // emits siblings in sorted order.
    let mut stack: Vec<(String, usize)> = roots.iter().rev().map(|id| (id.clone(), 0)).collect();
    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        lines.push(format!("{}{}", INDENT.repeat(depth), line_for(&emp_by_id, &id)));
        if let Some(siblings) = children.get(&id) {
            for child in siblings.iter().rev() {
                stack.push((child.clone(), depth + 1));
            }
        }
    }

    let mut unreachable: Vec<String> = emp_by_id
        .keys()
        .filter(|id| !visited.contains(*id))
        .cloned()
        .collect();
    if !unreachable.is_empty() {
        tracing::warn!(
            employees = unreachable.len(),
            "org chart has employees unreachable from any root"
        );
        unreachable.sort_by_key(&sort_key);
        lines.push("Unreachable (cyclic manager references):".to_string());
        for id in unreachable {
            lines.push(format!("{}{}", INDENT, line_for(&emp_by_id, &id)));
        }
    }

    lines.join("\n")
}

fn line_for(emp_by_id: &HashMap<String, &EmployeeRecord>, id: &str) -> String {
    let display = emp_by_id
        .get(id)
        .map(|record| record.display_line())
        .unwrap_or_default();
    if display.is_empty() {
        id.to_string()
    } else {
        display
    }
}
