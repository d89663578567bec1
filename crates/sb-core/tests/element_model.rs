//! Integration tests: element model contract across every kind.
//!
//! Covers create/update purity, the size floor, duplication, and the
//! JSON / MessagePack forms of a whole scene.

use pretty_assertions::assert_eq;
use sb_core::kurbo::Point;
use sb_core::*;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn mixed_scene() -> Scene {
    let mut elements: Vec<Element> = ElementKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| Element::create(*kind, i as f64 * 10.0, i as f64 * 5.0, None))
        .collect();
    // Give the freehand elements real strokes.
    for el in elements.iter_mut().filter(|e| e.kind().is_draw()) {
        *el = el
            .with_points(vec![
                Point::new(0.0, 0.0),
                Point::new(12.0, 7.5),
                Point::new(30.0, -4.0),
            ])
            .normalized();
    }
    Scene::from_elements(elements)
}

// ─── Update contract ─────────────────────────────────────────────────────

#[test]
fn empty_update_is_identity_for_every_kind() {
    for kind in ElementKind::ALL {
        let el = Element::create(kind, 3.0, 4.0, None);
        assert_eq!(el.update(&ElementPatch::default()), el, "{kind}");
    }
}

#[test]
fn supplied_sizes_never_drop_below_floor() {
    for kind in ElementKind::ALL {
        for requested in [-100.0, -1.0, 0.0, 1.0, 4.999] {
            let el = Element::create(kind, 0.0, 0.0, None).update(&ElementPatch {
                width: Some(requested),
                height: Some(requested),
                ..ElementPatch::default()
            });
            assert!(el.width() >= MIN_ELEMENT_SIZE, "{kind} width {requested}");
            assert!(el.height() >= MIN_ELEMENT_SIZE, "{kind} height {requested}");
        }
    }
}

#[test]
fn shared_patch_fields_reach_both_payload_families() {
    let red = Color::parse("#ff0000").unwrap();
    let patch = ElementPatch {
        stroke: Some(red),
        stroke_width: Some(6.0),
        ..ElementPatch::default()
    };

    let rect = Element::create(ElementKind::Rectangle, 0.0, 0.0, None).update(&patch);
    assert_eq!(rect.shape().unwrap().stroke, Some(red));
    assert_eq!(rect.shape().unwrap().stroke_width, 6.0);

    let pen = Element::create(ElementKind::Pen, 0.0, 0.0, None).update(&patch);
    assert_eq!(pen.draw().unwrap().stroke, red);
    assert_eq!(pen.draw().unwrap().stroke_width, 6.0);
}

#[test]
fn text_shapes_take_shape_and_text_fields() {
    let bubble = Element::create(ElementKind::ChatBubble, 0.0, 0.0, None).update(&ElementPatch {
        color: Some(Color::WHITE),
        text: Some("Hi!".into()),
        text_stroke: Some(Color::BLACK),
        ..ElementPatch::default()
    });
    assert_eq!(bubble.shape().unwrap().color, Color::WHITE);
    assert_eq!(bubble.text().unwrap().text, "Hi!");
    assert_eq!(bubble.text().unwrap().text_stroke, Some(Color::BLACK));
}

#[test]
fn duplicate_is_deep_and_independent() {
    let original = Element::create(ElementKind::RectangleText, 40.0, 40.0, None);
    let copy = original.duplicate(ElementId::generate(), 20.0);
    let edited = copy.update(&ElementPatch {
        text: Some("changed".into()),
        ..ElementPatch::default()
    });
    assert_eq!(original.text().unwrap().text, "Label");
    assert_eq!(edited.text().unwrap().text, "changed");
    assert_eq!((copy.x(), copy.y()), (60.0, 60.0));
    assert_eq!((copy.width(), copy.height()), (original.width(), original.height()));
}

// ─── Serialized forms ────────────────────────────────────────────────────

#[test]
fn scene_json_roundtrip() {
    let scene = mixed_scene();
    let json = scene.to_json().unwrap();
    assert_eq!(Scene::from_json(&json).unwrap(), scene);
}

#[test]
fn scene_msgpack_roundtrip() {
    let scene = mixed_scene();
    let bytes = scene.to_msgpack().unwrap();
    assert_eq!(Scene::from_msgpack(&bytes).unwrap(), scene);
}

#[test]
fn json_is_a_flat_array_of_records() {
    let scene = mixed_scene();
    let value: serde_json::Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
    let records = value.as_array().expect("scene serializes as an array");
    assert_eq!(records.len(), ElementKind::ALL.len());
    for record in records {
        assert!(record["id"].is_string());
        assert!(record["type"].is_string());
        assert!(record["x"].is_number());
    }
}

#[test]
fn load_accepts_host_written_records() {
    let json = r##"[
        {"id":"1718000000001","type":"rectangle","x":20,"y":80,"width":100,"height":120,
         "color":"#3b82f6","strokeStyle":"dashed","stroke":"rgb(0, 0, 0)","strokeWidth":2},
        {"id":"1718000000002","type":"text","x":0,"y":0,"text":"Title",
         "fontStyle":"italic bold","align":"center","textDecoration":"line-through"},
        {"id":"1718000000003","type":"pencil","x":5,"y":5,"points":[0,0,10,10],"tension":0.3}
    ]"##;
    let scene = Scene::from_json(json).unwrap();
    assert_eq!(scene.len(), 3);

    let rect = scene.get(ElementId::intern("1718000000001")).unwrap();
    assert_eq!(rect.shape().unwrap().stroke_style, StrokeStyle::Dashed);
    assert_eq!(rect.shape().unwrap().stroke, Some(Color::BLACK));

    let text = scene.get(ElementId::intern("1718000000002")).unwrap();
    assert_eq!(text.text().unwrap().font_style, FontStyle::BoldItalic);
    assert_eq!(text.text().unwrap().align, TextAlign::Center);
    assert_eq!(text.text().unwrap().text_decoration, TextDecoration::LineThrough);
    assert_eq!(text.text().unwrap().font_size, 20.0);

    let stroke = scene.get(ElementId::intern("1718000000003")).unwrap();
    assert_eq!(stroke.draw().unwrap().points.len(), 2);
    assert_eq!(stroke.draw().unwrap().tension, 0.3);
}

#[test]
fn invalid_color_in_record_fails_the_load() {
    let json = r#"[{"id":"x1","type":"circle","x":0,"y":0,"color":"blurple"}]"#;
    assert!(matches!(Scene::from_json(json), Err(ModelError::Json(_))));
}

#[test]
fn load_enforces_model_invariants() {
    let json = r#"[
        {"id":"a","type":"rectangle","x":0,"y":0,"width":0,"height":-10},
        {"id":"t","type":"text","x":0,"y":0,"fontSize":0}
    ]"#;
    let scene = Scene::from_json(json).unwrap();
    let rect = scene.get(ElementId::intern("a")).unwrap();
    assert_eq!((rect.width(), rect.height()), (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    let text = scene.get(ElementId::intern("t")).unwrap();
    assert_eq!(text.text().unwrap().font_size, MIN_FONT_SIZE);
}

#[test]
fn load_rejects_duplicate_ids() {
    let json = r#"[
        {"id":"a","type":"rectangle","x":0,"y":0},
        {"id":"a","type":"circle","x":0,"y":0}
    ]"#;
    assert!(matches!(Scene::from_json(json), Err(ModelError::Json(_))));

    let twins = Scene::from_elements([
        Element::create(ElementKind::Star, 0.0, 0.0, Some(ElementId::intern("b"))),
        Element::create(ElementKind::Star, 5.0, 5.0, Some(ElementId::intern("b"))),
    ]);
    let bytes = twins.to_msgpack().unwrap();
    assert!(Scene::from_msgpack(&bytes).is_err());
}
