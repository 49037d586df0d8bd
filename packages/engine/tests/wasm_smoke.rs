#![cfg(target_arch = "wasm32")]

use lift_scene_engine::api::listeners::live_scenes;
use lift_scene_engine::{version, ShapeLibrary};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const BUNDLE: &str = include_str!("../content/shapes.json");

#[wasm_bindgen_test]
fn library_loads_demo_bundle() {
    let library = ShapeLibrary::new(BUNDLE, None).expect("bundle should load");
    let manifest: serde_json::Value = serde_json::from_str(&library.manifest_json()).unwrap();
    assert_eq!(manifest["shapes"].as_array().unwrap().len(), 4);
    assert!(!version().is_empty());
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// A 640x360 div appended to the body; `height` may be "auto"
fn container(height: &str) -> HtmlElement {
    let el: HtmlElement = document().create_element("div").unwrap().dyn_into().unwrap();
    el.style().set_property("width", "640px").unwrap();
    el.style().set_property("height", height).unwrap();
    document().body().unwrap().append_child(&el).unwrap();
    el
}

fn canvas_in(el: &HtmlElement) -> Option<HtmlElement> {
    el.query_selector("canvas").unwrap().map(|c| c.dyn_into().unwrap())
}

#[wasm_bindgen_test]
fn mount_into_a_fresh_container() {
    let el = container("360px");
    let library = ShapeLibrary::new(BUNDLE, Some(r#"{ "render": { "targetFps": 30 } }"#.to_string())).unwrap();
    let host = library.mount(el.clone()).expect("scene should mount");
    assert_eq!(host.instance_count(), 24);
    assert!(canvas_in(&el).is_some());

    host.dispose();
    assert!(canvas_in(&el).is_none());
}

#[wasm_bindgen_test]
fn canvas_overlays_the_container_without_growing_it() {
    let el = container("auto");
    let before = el.client_height();
    let library = ShapeLibrary::new(BUNDLE, None).unwrap();
    let host = library.mount(el.clone()).expect("scene should mount");

    let canvas = canvas_in(&el).unwrap();
    assert_eq!(canvas.style().get_property_value("position").unwrap(), "absolute");
    assert_eq!(el.style().get_property_value("position").unwrap(), "relative");
    assert_eq!(el.client_height(), before);

    host.dispose();
    assert_eq!(el.style().get_property_value("position").unwrap(), "");
}

#[wasm_bindgen_test]
fn positioned_container_keeps_its_position() {
    let el = container("200px");
    el.style().set_property("position", "absolute").unwrap();
    let library = ShapeLibrary::new(BUNDLE, None).unwrap();
    let host = library.mount(el.clone()).expect("scene should mount");
    assert_eq!(el.style().get_property_value("position").unwrap(), "absolute");

    host.dispose();
    assert_eq!(el.style().get_property_value("position").unwrap(), "absolute");
}

#[wasm_bindgen_test]
fn dropped_host_stops_receiving_page_input() {
    let baseline = live_scenes();
    let library = ShapeLibrary::new(BUNDLE, None).unwrap();
    let host = library.mount(container("240px")).expect("scene should mount");
    assert_eq!(live_scenes(), baseline + 1);

    host.dispose();
    drop(host);
    assert_eq!(live_scenes(), baseline);
}
