//! Random valid coloring of a fixed BST shape.
//!
//! Bottom-up, every node gets a table counting the valid colorings of its
//! subtree by (root color, black-height). Top-down, colors are drawn with
//! weights taken from those tables, which samples uniformly among all
//! valid colorings. Counts saturate at `u64::MAX`, beyond that the draw is
//! only approximately uniform.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;

use crate::node::Color;
use crate::snapshot::Snapshot;

// (red, black-height counting NIL and the subtree root) -> colorings.
type Table = BTreeMap<(bool, usize), u64>;

fn nil_table() -> Table {
    let mut table = Table::new();
    table.insert((false, 1), 1);
    table
}

fn tables<K>(snapshot: &Snapshot<K>) -> Vec<Table> {
    let mut tables = vec![Table::new(); snapshot.len()];
    let root = match snapshot.root() {
        Some(root) => root,
        None => return tables,
    };

    let mut preorder = vec![];
    let mut stack = vec![root];
    while let Some(at) = stack.pop() {
        preorder.push(at);
        let node = snapshot.node(at);
        stack.extend(node.left.iter().chain(node.right.iter()));
    }

    let nil = nil_table();
    for &at in preorder.iter().rev() {
        let node = snapshot.node(at);
        let table = {
            let left = node.left.map_or(&nil, |l| &tables[l]);
            let right = node.right.map_or(&nil, |r| &tables[r]);
            let mut table = Table::new();
            for &red in [true, false].iter() {
                for (&(lred, lbh), &lcount) in left.iter() {
                    for (&(rred, rbh), &rcount) in right.iter() {
                        if lbh != rbh || (red && (lred || rred)) {
                            continue;
                        }
                        let bh = if red { lbh } else { lbh + 1 };
                        let entry = table.entry((red, bh)).or_insert(0);
                        *entry = entry.saturating_add(lcount.saturating_mul(rcount));
                    }
                }
            }
            table
        };
        tables[at] = table;
    }
    tables
}

/// Number of valid red-black colorings of `snapshot`'s shape with a
/// black root, saturating.
pub fn count_colorings<K>(snapshot: &Snapshot<K>) -> u64 {
    match snapshot.root() {
        None => 1,
        Some(root) => tables(snapshot)[root]
            .iter()
            .filter(|((red, _), _)| !red)
            .fold(0_u64, |acc, (_, n)| acc.saturating_add(*n)),
    }
}

/// Replace the colors of `snapshot` by a valid coloring drawn uniformly
/// at random. Keys and structure are left alone. Return false, with every
/// node colored BLACK, when the shape admits no valid coloring.
pub fn recolor_random<K, R>(snapshot: &mut Snapshot<K>, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    let root = match snapshot.root() {
        Some(root) => root,
        None => return true,
    };
    let tables = tables(snapshot);

    let roots: Vec<(usize, u64)> = tables[root]
        .iter()
        .filter(|((red, _), _)| !red)
        .map(|(&(_, bh), &n)| (bh, n))
        .collect();
    let bh = match pick(rng, &roots) {
        Some(bh) => bh,
        None => {
            debug!("shape of {} nodes has no valid coloring", snapshot.len());
            for at in 0..snapshot.len() {
                snapshot.set_color(at, Color::Black);
            }
            return false;
        }
    };

    let mut stack = vec![(root, true, bh)]; // (node, parent-is-black, black-height)
    while let Some((at, parent_black, bh)) = stack.pop() {
        let table = &tables[at];
        let mut choices = vec![(false, table.get(&(false, bh)).copied().unwrap_or(0))];
        if parent_black && at != root {
            choices.push((true, table.get(&(true, bh)).copied().unwrap_or(0)));
        }
        let red = match pick(rng, &choices) {
            Some(red) => red,
            None => panic!("recolor_random(): empty draw at {}, call the programmer", at),
        };
        snapshot.set_color(at, if red { Color::Red } else { Color::Black });

        let child_bh = if red { bh } else { bh - 1 };
        let node = snapshot.node(at);
        for child in node.left.iter().chain(node.right.iter()) {
            stack.push((*child, !red, child_bh));
        }
    }
    true
}

// Weighted draw among `choices`, None when all weights are zero.
fn pick<T, R>(rng: &mut R, choices: &[(T, u64)]) -> Option<T>
where
    T: Copy,
    R: Rng + ?Sized,
{
    let total = choices
        .iter()
        .fold(0_u64, |acc, (_, n)| acc.saturating_add(*n));
    if total == 0 {
        return None;
    }
    let mut r = rng.gen_range(0, total);
    for (item, n) in choices.iter() {
        if r < *n {
            return Some(*item);
        }
        r -= n;
    }
    None
}
