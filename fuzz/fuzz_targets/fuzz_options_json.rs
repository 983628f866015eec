#![no_main]

use dpx_core::event::{KeyCode, KeyEvent};
use dpx_widgets::{HeadlessHost, InputId, PickerEvent, PickerRegistry};
use libfuzzer_sys::fuzz_target;

const FIELD: InputId = InputId(1);

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let mut registry = PickerRegistry::new(HeadlessHost::new());
    let initiated = registry.picker(FIELD).init_json(&config).is_ok();
    assert_eq!(registry.picker(FIELD).is_initiated(), initiated);
    if !initiated {
        return;
    }

    // Whatever the options, the picker opens and renders a full grid.
    registry.picker(FIELD).open().expect("initiated picker opens");
    let view = registry.picker(FIELD).view().expect("open picker has a view").clone();
    assert_eq!(view.cells.len(), view.mode.cell_count());

    // Walk the popup with every key the picker reacts to.
    for code in [
        KeyCode::Down,
        KeyCode::Right,
        KeyCode::Tab,
        KeyCode::Enter,
        KeyCode::Up,
        KeyCode::Left,
        KeyCode::Char(' '),
    ] {
        let handled = registry.handle_event(&PickerEvent::Key {
            key: KeyEvent::new(code),
            focused_input: None,
        });
        let moved = handled && (code.is_arrow() || code == KeyCode::Tab);
        if moved && let Some((_, target)) = registry.host().focused() {
            let in_graph = registry
                .picker(FIELD)
                .view()
                .is_some_and(|view| view.focus.contains(target));
            assert!(in_graph, "focus left the popup");
        }
    }
});
