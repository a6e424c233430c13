//! Host-level flows: documents, editor bindings, tab commands, drag and
//! resize driven through `Workbench`, plus layout persistence.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use wbench::{
    CommandOutcome, DocumentInit, DocumentStore, DragEffect, DragTransfer, DropOutcome,
    DropSurface, DropZone, PaneId, Point, RATIO_EPSILON, Rect, SplitSide, TAB_DRAG_MIME,
    TabCommand, TabId, Workbench, WorkbenchError,
};

const AREA: Rect = Rect::from_size(1000.0, 600.0);

#[derive(Default)]
struct RecordingTransfer {
    data: Vec<(String, String)>,
    effect: Option<DragEffect>,
}

impl DragTransfer for RecordingTransfer {
    fn set_data(&mut self, mime: &str, payload: &str) {
        self.data.push((mime.to_owned(), payload.to_owned()));
    }

    fn set_effect_allowed(&mut self, effect: DragEffect) {
        self.effect = Some(effect);
    }
}

fn open(bench: &mut Workbench, pane: PaneId, name: &str) -> TabId {
    bench
        .open_document(pane, name, DocumentInit::new(format!("// {name}"), "rust"))
        .expect("open")
}

fn order(bench: &Workbench, pane: PaneId) -> Vec<TabId> {
    bench
        .tree()
        .leaf(pane)
        .expect("pane")
        .tabs
        .iter()
        .map(|tab| tab.id)
        .collect()
}

fn strip(pane_rect: Rect, count: usize) -> Vec<Rect> {
    (0..count)
        .map(|index| Rect::new(pane_rect.x + index as f64 * 120.0, pane_rect.y, 120.0, 32.0))
        .collect()
}

#[test]
fn editor_follows_active_tab_and_lock_state() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    assert_eq!(bench.editor_binding(root), Ok(None));

    let main = open(&mut bench, root, "main.rs");
    let lib = open(&mut bench, root, "lib.rs");
    let binding = bench.editor_binding(root).expect("pane").expect("binding");
    assert_eq!(binding.content, "// lib.rs");
    assert!(!binding.readonly);

    bench.activate(main).expect("activate");
    bench.execute(TabCommand::ToggleLock, main).expect("lock");
    let binding = bench.editor_binding(root).expect("pane").expect("binding");
    assert_eq!(binding.content, "// main.rs");
    assert!(binding.readonly);

    assert!(matches!(
        bench.apply_editor_change(main, "edited"),
        Err(WorkbenchError::Layout(_))
    ));
    bench.apply_editor_change(lib, "edited").expect("edit");
    assert_eq!(bench.editor_bindings().len(), 1);
}

#[test]
fn edits_mark_every_tab_of_the_document_dirty_until_saved() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    let main = open(&mut bench, root, "main.rs");
    let CommandOutcome::Duplicated { tab_id: copy, .. } =
        bench.execute(TabCommand::Duplicate, main).expect("duplicate")
    else {
        panic!("expected duplicate");
    };
    assert_eq!(order(&bench, root), vec![main, copy]);

    bench.apply_editor_change(copy, "fn main() {}").expect("edit");
    let document_id = bench.tree().tab(main).expect("tab").document_id;
    assert!(bench.documents().get_document(document_id).expect("doc").dirty);
    assert!(bench.tree().tab(main).expect("tab").is_dirty);
    assert!(bench.tree().tab(copy).expect("tab").is_dirty);

    bench.mark_saved(document_id).expect("save");
    assert!(!bench.tree().tab(main).expect("tab").is_dirty);
    assert!(!bench.tree().tab(copy).expect("tab").is_dirty);
}

#[test]
fn close_others_keeps_locked_tabs() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    let tabs: Vec<TabId> = ["a", "b", "c", "d"]
        .iter()
        .map(|name| open(&mut bench, root, name))
        .collect();
    bench.execute(TabCommand::ToggleLock, tabs[3]).expect("lock");

    let outcome = bench
        .execute_named("tab.close_others", tabs[1])
        .expect("close others");
    let CommandOutcome::ClosedOthers { closed } = outcome else {
        panic!("expected closed tabs, got {outcome:?}");
    };
    assert_eq!(
        closed.iter().map(|tab| tab.id).collect::<Vec<_>>(),
        vec![tabs[0], tabs[2]]
    );
    assert_eq!(order(&bench, root), vec![tabs[1], tabs[3]]);
    assert_eq!(
        bench.execute(TabCommand::CloseOthers, tabs[1]),
        Ok(CommandOutcome::Unchanged)
    );
}

#[test]
fn closing_the_last_tab_of_a_split_pane_collapses_it() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    let a = open(&mut bench, root, "a");
    let b = open(&mut bench, root, "b");
    bench
        .execute(TabCommand::Split(SplitSide::Bottom), b)
        .expect("split");
    assert_eq!(bench.tree().leaves().len(), 2);

    let removed = bench.close_tab(b).expect("close");
    assert!(removed.pruned);
    assert_eq!(bench.tree().root(), root);
    assert_eq!(order(&bench, root), vec![a]);
}

#[test]
fn drag_reorders_within_the_strip() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    let tabs: Vec<TabId> = ["a", "b", "c"].iter().map(|n| open(&mut bench, root, n)).collect();
    let pane_rect = bench.tree().solve_layout(AREA).rect(root).expect("rect");
    let rects = strip(pane_rect, 3);

    let mut transfer = RecordingTransfer::default();
    bench.start_drag(tabs[0], &mut transfer).expect("start");
    assert_eq!(transfer.data.len(), 1);
    assert_eq!(transfer.data[0].0, TAB_DRAG_MIME);
    assert_eq!(transfer.effect, Some(DragEffect::Move));

    // Between the midpoints of b (180) and c (300), nearer c.
    let resolution = bench
        .drag_over(root, Point::new(260.0, 16.0), pane_rect, DropSurface::TabStrip, &rects)
        .expect("over")
        .expect("inside");
    assert_eq!(resolution.zone, DropZone::BeforeTab);
    assert_eq!(resolution.target_index, 2);

    let outcome = bench.drop_tab().expect("drop");
    assert!(matches!(outcome, DropOutcome::Moved { index: 1, .. }));
    assert_eq!(order(&bench, root), vec![tabs[1], tabs[0], tabs[2]]);
}

#[test]
fn drag_leave_then_drop_discards() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    let a = open(&mut bench, root, "a");
    open(&mut bench, root, "b");
    let before = bench.tree().clone();

    bench.start_drag(a, &mut RecordingTransfer::default()).expect("start");
    let pane_rect = bench.tree().solve_layout(AREA).rect(root).expect("rect");
    bench
        .drag_over(root, Point::new(990.0, 300.0), pane_rect, DropSurface::Pane, &strip(pane_rect, 2))
        .expect("over");
    bench.drag_leave().expect("leave");

    assert_eq!(bench.drop_tab(), Ok(DropOutcome::Discarded));
    assert_eq!(bench.tree(), &before);
}

#[test]
fn divider_resize_follows_pointer_and_cancel_restores() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    open(&mut bench, root, "a");
    let b = open(&mut bench, root, "b");
    let CommandOutcome::Split { split_id, .. } = bench
        .execute(TabCommand::Split(SplitSide::Right), b)
        .expect("split")
    else {
        panic!("expected split");
    };

    let target = bench
        .begin_resize_at(AREA, Point::new(502.0, 300.0), 4.0)
        .expect("begin")
        .expect("divider under pointer");
    assert_eq!(target.split_id, split_id);
    assert_eq!(target.divider, 0);

    assert_eq!(bench.resize_to(Point::new(252.0, 300.0)), Ok(true));
    let ratios = bench.tree().split(split_id).expect("split").ratios();
    assert!((ratios[0] - 0.25).abs() <= RATIO_EPSILON);

    // Far past the minimum: clamped to 80px of 1000.
    bench.resize_to(Point::new(-500.0, 300.0)).expect("clamp");
    let ratios = bench.tree().split(split_id).expect("split").ratios();
    assert!((ratios[0] - 0.08).abs() <= RATIO_EPSILON);

    assert_eq!(bench.cancel_interaction(), Ok(true));
    let ratios = bench.tree().split(split_id).expect("split").ratios();
    assert_eq!(ratios, vec![0.5, 0.5]);
    assert!(bench.resize_session().is_none());
    assert_eq!(bench.cancel_interaction(), Ok(false));
}

#[test]
fn layout_survives_a_json_round_trip() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    let a = open(&mut bench, root, "a");
    open(&mut bench, root, "b");
    bench
        .execute(TabCommand::Split(SplitSide::Top), a)
        .expect("split");
    bench.execute(TabCommand::ToggleLock, a).expect("lock");

    let json = bench.layout_json().expect("encode");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(value["schema_version"], 1);

    let frames = Rc::new(RefCell::new(0));
    let mut restored = Workbench::new();
    let _sub = {
        let frames = Rc::clone(&frames);
        restored.subscribe(move |_| *frames.borrow_mut() += 1)
    };
    restored.restore_layout(&json).expect("restore");
    assert_eq!(restored.tree(), bench.tree());
    assert_eq!(*frames.borrow(), 1);

    assert!(restored.restore_layout("{\"schema_version\":9}").is_err());
    assert_eq!(restored.tree(), bench.tree());
}

#[test]
fn resized_layouts_restore_exactly() {
    let mut bench = Workbench::new();
    let root = bench.tree().root();
    open(&mut bench, root, "a");
    let b = open(&mut bench, root, "b");
    bench
        .execute(TabCommand::Split(SplitSide::Right), b)
        .expect("split");
    let area = Rect::from_size(700.0, 400.0);

    for x in (160..560).step_by(7) {
        bench
            .begin_resize_at(area, Point::new(350.0, 200.0), 4.0)
            .expect("begin")
            .expect("divider under pointer");
        bench.resize_to(Point::new(f64::from(x), 200.0)).expect("drag");
        bench.end_resize().expect("end");

        let json = bench.layout_json().expect("encode");
        let mut restored = Workbench::new();
        restored.restore_layout(&json).expect("restore");
        assert_eq!(restored.tree(), bench.tree(), "pointer x={x}");
        assert_eq!(restored.tree().state_hash(), bench.tree().state_hash());

        // Put the divider back under the grab point for the next round.
        bench
            .begin_resize_at(area, Point::new(f64::from(x), 200.0), 4.0)
            .expect("begin")
            .expect("divider under pointer");
        bench.resize_to(Point::new(350.0, 200.0)).expect("drag back");
        bench.end_resize().expect("end");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_command_streams_keep_the_tree_valid(
        script in proptest::collection::vec((0usize..8, any::<u16>()), 1..60),
    ) {
        let mut bench = Workbench::new();
        let root = bench.tree().root();
        open(&mut bench, root, "seed");

        for (command, pick) in script {
            let tabs: Vec<TabId> = bench
                .tree()
                .leaves()
                .into_iter()
                .flat_map(|pane| order(&bench, pane))
                .collect();
            if tabs.is_empty() {
                let pane = bench.tree().leaves()[0];
                open(&mut bench, pane, "fresh");
                continue;
            }
            let tab = tabs[usize::from(pick) % tabs.len()];
            let result = bench.execute(wbench::TabCommand::ALL[command], tab);
            match result {
                Ok(_) => {}
                Err(WorkbenchError::Layout(wbench::LayoutError::TabLocked { tab_id })) => {
                    prop_assert_eq!(tab_id, tab);
                }
                Err(err) => prop_assert!(false, "unexpected error {err}"),
            }
            prop_assert!(bench.tree().validate().is_ok());
        }
    }
}
