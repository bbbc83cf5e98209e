// Browser tests: mount the page into a headless browser and click it.
// Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, EventTarget, HtmlElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn el(id: &str) -> HtmlElement {
    doc()
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        .unwrap_or_else(|| panic!("#{id} mounted"))
}

fn fire(target: &EventTarget, kind: &str, x: i32, y: i32) {
    let init = MouseEventInit::new();
    init.set_client_x(x);
    init.set_client_y(y);
    init.set_bubbles(true);
    let evt = MouseEvent::new_with_mouse_event_init_dict(kind, &init).expect("event");
    target.dispatch_event(&evt).expect("dispatch");
}

fn click(x: i32, y: i32) {
    fire(el("cs-root").as_ref(), "click", x, y);
}

fn style_of(id: &str, prop: &str) -> String {
    el(id).style().get_property_value(prop).unwrap()
}

#[wasm_bindgen_test]
fn mount_click_unmount() {
    clickshake::start_page().expect("mount");
    click(100, 200);

    let particles = el("cs-root").query_selector_all(".cs-particle").expect("query");
    assert_eq!(particles.length(), 30);

    clickshake::unmount_page();
    assert!(doc().get_element_by_id("cs-root").is_none());
}

#[wasm_bindgen_test]
fn click_applies_shake_and_overlay() {
    clickshake::start_page().expect("mount");
    assert_eq!(style_of("cs-shake", "animation-name"), "none");
    assert_eq!(style_of("cs-overlay", "display"), "none");

    click(100, 200);
    assert_eq!(style_of("cs-shake", "animation-name"), "shake");
    assert_eq!(style_of("cs-shake", "animation-duration"), "0.4s");
    assert_eq!(style_of("cs-overlay", "display"), "flex");
    clickshake::unmount_page();
}

#[wasm_bindgen_test]
fn second_click_restarts_shake() {
    clickshake::start_page().expect("mount");
    click(10, 10);
    assert_eq!(el("cs-shake").get_attribute("data-shake-generation").as_deref(), Some("1"));
    click(20, 20);
    assert_eq!(el("cs-shake").get_attribute("data-shake-generation").as_deref(), Some("2"));
    assert_eq!(style_of("cs-shake", "animation-name"), "shake");
    clickshake::unmount_page();
}

#[wasm_bindgen_test]
fn cursor_follows_pointer_and_flips() {
    clickshake::start_page().expect("mount");
    let win: EventTarget = web_sys::window().unwrap().into();
    fire(&win, "mousemove", 42, 84);
    assert_eq!(style_of("cs-cursor", "left"), "42px");
    assert_eq!(style_of("cs-cursor", "top"), "84px");
    assert_eq!(style_of("cs-cursor", "display"), "block");
    assert!(!style_of("cs-cursor", "transform").contains("225deg"));

    click(42, 84);
    assert!(style_of("cs-cursor", "transform").contains("rotate(225deg)"));

    let body: EventTarget = doc().body().unwrap().into();
    fire(&body, "mouseleave", 0, 0);
    assert_eq!(style_of("cs-cursor", "display"), "none");
    clickshake::unmount_page();
}

#[wasm_bindgen_test]
fn unmount_detaches_listeners() {
    clickshake::start_page().expect("mount");
    let old_cursor = el("cs-cursor");
    clickshake::unmount_page();

    let win: EventTarget = web_sys::window().unwrap().into();
    fire(&win, "mousemove", 321, 123);
    assert_ne!(old_cursor.style().get_property_value("left").unwrap(), "321px");

    // A fresh mount gets working listeners and exactly one root.
    clickshake::start_page().expect("remount");
    clickshake::start_page().expect("remount over a mounted page");
    assert_eq!(doc().query_selector_all("#cs-root").unwrap().length(), 1);
    fire(&win, "mousemove", 5, 6);
    assert_eq!(style_of("cs-cursor", "left"), "5px");
    assert_ne!(old_cursor.style().get_property_value("left").unwrap(), "5px");
    clickshake::unmount_page();
}

#[wasm_bindgen_test]
fn imperative_explosion_renders_burst() {
    clickshake::start_page().expect("mount");
    clickshake::trigger_explosion(10.0, 10.0);
    assert_eq!(el("cs-root").query_selector_all(".cs-particle").unwrap().length(), 30);
    clickshake::unmount_page();
}
