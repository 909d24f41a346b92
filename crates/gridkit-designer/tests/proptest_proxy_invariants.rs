//! Property tests for the editing proxy's occupancy protocol.

use gridkit_core::{Rect, WidgetId};
use gridkit_designer::{GridProxy, MovePolicy, NodeKind, WidgetTree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Move {
    widget: usize,
    row: i32,
    col: i32,
    how: MovePolicy,
}

fn move_strategy(widgets: usize) -> impl Strategy<Value = Move> {
    (
        0..widgets,
        -1i32..5,
        -1i32..5,
        prop_oneof![
            Just(MovePolicy::Overwrite),
            Just(MovePolicy::Skip),
            Just(MovePolicy::Transient),
        ],
    )
        .prop_map(|(widget, row, col, how)| Move {
            widget,
            row,
            col,
            how,
        })
}

fn setup(widgets: usize) -> (WidgetTree, GridProxy, Vec<WidgetId>) {
    let mut tree = WidgetTree::new();
    let mut proxy = GridProxy::new(Rect::new(0, 0, 400, 400));
    proxy.grid_mut().layout(4, 4);
    let ids: Vec<WidgetId> = (0..widgets)
        .map(|_| {
            let id = tree.add(NodeKind::Button, Rect::new(0, 0, 20, 20));
            proxy.grid_mut().add_child(id);
            id
        })
        .collect();
    (tree, proxy, ids)
}

proptest! {
    /// A widget is never both committed and transient, and every
    /// committed origin lies inside the grid dimensions.
    #[test]
    fn committed_and_transient_are_exclusive(
        moves in proptest::collection::vec(move_strategy(6), 1..40)
    ) {
        let (mut tree, mut proxy, ids) = setup(6);
        for m in moves {
            proxy.move_cell(&mut tree, ids[m.widget], m.row, m.col, m.how);
            for &id in &ids {
                let committed = proxy.grid().cell(id).is_some();
                let transient = proxy.transient_cell(id).is_some();
                prop_assert!(
                    !(committed && transient),
                    "widget {id} is committed and transient at once"
                );
                if let Some(cell) = proxy.grid().cell(id) {
                    prop_assert!(cell.row() + cell.rowspan() <= proxy.grid().rows());
                    prop_assert!(cell.col() + cell.colspan() <= proxy.grid().cols());
                }
            }
        }
    }

    /// No two widgets ever hold the same committed origin.
    #[test]
    fn committed_origins_are_unique(
        moves in proptest::collection::vec(move_strategy(6), 1..40)
    ) {
        let (mut tree, mut proxy, ids) = setup(6);
        for m in moves {
            proxy.move_cell(&mut tree, ids[m.widget], m.row, m.col, m.how);
            let mut seen = std::collections::HashSet::new();
            for &id in &ids {
                if let Some(cell) = proxy.grid().cell(id) {
                    prop_assert!(
                        seen.insert((cell.row(), cell.col())),
                        "two widgets share origin ({}, {})", cell.row(), cell.col()
                    );
                }
            }
        }
    }

    /// A Transient move never disturbs any other widget's committed cell.
    #[test]
    fn transient_moves_preserve_other_placements(
        moves in proptest::collection::vec(move_strategy(6), 1..40)
    ) {
        let (mut tree, mut proxy, ids) = setup(6);
        for m in moves {
            let before: Vec<_> = ids
                .iter()
                .filter(|&&id| id != ids[m.widget])
                .map(|&id| (id, proxy.grid().cell(id).cloned()))
                .collect();
            proxy.move_cell(&mut tree, ids[m.widget], m.row, m.col, MovePolicy::Transient);
            for (id, cell) in before {
                prop_assert_eq!(proxy.grid().cell(id).cloned(), cell);
            }
        }
    }
}
