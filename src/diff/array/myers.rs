use serde_json::Value;

use crate::equality::{get_identity, EqualityCache};
use crate::path::Spath;
use crate::schema::{ArrayPlan, Plan};

use super::super::engine::diff_values;
use super::super::operation::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawEdit {
    Common(usize, usize),
    Add(usize),
    Remove(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collapsed {
    Common(usize, usize),
    Replace(usize, usize),
    Remove(usize),
    Add(usize),
}

/// Shortest edit script between two JSON arrays via Myers' O((n+m)·D) algorithm, with
/// adjacent (remove, add) pairs collapsed into a single replace.
pub(crate) fn diff(
    old: &[Value],
    new: &[Value],
    path: &Spath,
    array_plan: Option<&ArrayPlan>,
    plan: &Plan,
    cache: &EqualityCache,
) -> Vec<Operation> {
    if old.is_empty() && new.is_empty() {
        return Vec::new();
    }
    if old.is_empty() {
        return new
            .iter()
            .map(|item| Operation::Add {
                path: path.push_append(),
                value: item.clone(),
            })
            .collect();
    }
    if new.is_empty() {
        return (0..old.len())
            .rev()
            .map(|i| Operation::Remove {
                path: path.push_index(i),
                old_value: old[i].clone(),
            })
            .collect();
    }

    let hash_fields: &[String] = array_plan.map(|p| p.hash_fields.as_slice()).unwrap_or(&[]);
    let equal = |a: &Value, b: &Value| -> bool {
        if let Some(p) = array_plan {
            if let (Some(ia), Some(ib)) = (get_identity(p, a), get_identity(p, b)) {
                return ia == ib;
            }
        }
        cache.deep_equal_memo(a, b, hash_fields)
    };

    let raw = myers_trace(old, new, &equal);
    let collapsed = collapse_replace(raw);

    emit(collapsed, old, new, path, plan, cache)
}

fn myers_trace(a: &[Value], b: &[Value], equal: &dyn Fn(&Value, &Value) -> bool) -> Vec<RawEdit> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    let offset = max as usize;

    let mut v = vec![0isize; 2 * max as usize + 1];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'outer: for d in 0..=max {
        trace.push(v.clone());

        let mut k = -d;
        while k <= d {
            let idx = (k + offset as isize) as usize;

            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;

            while x < n && y < m && equal(&a[x as usize], &b[y as usize]) {
                x += 1;
                y += 1;
            }

            v[idx] = x;

            if x >= n && y >= m {
                break 'outer;
            }

            k += 2;
        }
    }

    backtrack(&trace, n, m, offset)
}

fn backtrack(trace: &[Vec<isize>], n: isize, m: isize, offset: usize) -> Vec<RawEdit> {
    let mut x = n;
    let mut y = m;
    let mut edits = Vec::new();

    for d in (0..trace.len() as isize).rev() {
        let v = &trace[d as usize];
        let k = x - y;
        let idx = (k + offset as isize) as usize;

        let prev_k = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
            k + 1
        } else {
            k - 1
        };

        let prev_idx = (prev_k + offset as isize) as usize;
        let prev_x = v[prev_idx];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            edits.push(RawEdit::Common((x - 1) as usize, (y - 1) as usize));
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            if x == prev_x {
                edits.push(RawEdit::Add((y - 1) as usize));
            } else {
                edits.push(RawEdit::Remove((x - 1) as usize));
            }
        }

        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    edits
}

fn collapse_replace(edits: Vec<RawEdit>) -> Vec<Collapsed> {
    let mut out = Vec::with_capacity(edits.len());
    let mut i = 0;

    while i < edits.len() {
        match (edits[i], edits.get(i + 1)) {
            (RawEdit::Remove(ai), Some(RawEdit::Add(bi))) => {
                out.push(Collapsed::Replace(ai, *bi));
                i += 2;
            }
            (RawEdit::Common(ai, bi), _) => {
                out.push(Collapsed::Common(ai, bi));
                i += 1;
            }
            (RawEdit::Add(bi), _) => {
                out.push(Collapsed::Add(bi));
                i += 1;
            }
            (RawEdit::Remove(ai), _) => {
                out.push(Collapsed::Remove(ai));
                i += 1;
            }
        }
    }

    out
}

fn emit(
    edits: Vec<Collapsed>,
    old: &[Value],
    new: &[Value],
    path: &Spath,
    plan: &Plan,
    cache: &EqualityCache,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut out_idx = 0usize;

    for edit in edits {
        match edit {
            Collapsed::Common(ai, bi) => {
                let (a_item, b_item) = (&old[ai], &new[bi]);
                if a_item.is_object() && b_item.is_object() {
                    ops.extend(diff_values(
                        Some(a_item),
                        Some(b_item),
                        &path.push_index(out_idx),
                        plan,
                        cache,
                    ));
                }
                out_idx += 1;
            }
            Collapsed::Replace(ai, bi) => {
                ops.push(Operation::Replace {
                    path: path.push_index(out_idx),
                    value: new[bi].clone(),
                    old_value: old[ai].clone(),
                });
                out_idx += 1;
            }
            Collapsed::Remove(ai) => {
                ops.push(Operation::Remove {
                    path: path.push_index(out_idx),
                    old_value: old[ai].clone(),
                });
            }
            Collapsed::Add(bi) => {
                ops.push(Operation::Add {
                    path: path.push_index(out_idx),
                    value: new[bi].clone(),
                });
                out_idx += 1;
            }
        }
    }

    ops
}
