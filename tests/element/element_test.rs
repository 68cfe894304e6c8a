//! Element factory defaults and JSON shape.

use folio::element::{
    create_element, create_element_named, ElementBody, ElementError, ElementKind, Position,
    ReportElement, DEFAULT_CHART_COLORS, MAX_DECIMAL_PLACES,
};
use serde_json::json;

#[test]
fn test_default_sizes() {
    let origin = Position::new(0.0, 0.0);
    let sizes: Vec<(f64, f64)> = ElementKind::ALL
        .iter()
        .map(|&kind| {
            let size = create_element(kind, origin).size();
            (size.width, size.height)
        })
        .collect();

    assert_eq!(
        sizes,
        vec![(150.0, 30.0), (100.0, 30.0), (400.0, 200.0), (350.0, 250.0)]
    );
}

#[test]
fn test_ids_are_unique() {
    let a = create_element(ElementKind::Text, Position::default());
    let b = create_element(ElementKind::Text, Position::default());
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_unknown_type_rejected() {
    let err = create_element_named("image", Position::default()).unwrap_err();
    assert_eq!(err, ElementError::UnknownElementType("image".to_string()));
    insta::assert_snapshot!(err.to_string(), @"Unknown element type: image");
}

#[test]
fn test_named_types_parse() {
    for name in ["text", "number", "list", "chart"] {
        let el = create_element_named(name, Position::new(5.0, 5.0)).unwrap();
        assert_eq!(el.kind().as_str(), name);
        assert_eq!(el.position(), Position::new(5.0, 5.0));
    }
}

#[test]
fn test_number_defaults() {
    let el = create_element(ElementKind::Number, Position::default());
    let ElementBody::Number { properties, .. } = el.body() else {
        panic!("expected number body");
    };
    assert_eq!(properties.format, "#,##0.00");
    assert_eq!(properties.decimal_places, 2);
    assert_eq!(properties.thousands_separator, ".");
    assert_eq!(properties.decimal_separator, ",");
    assert_eq!(properties.format(1234567.891), "1.234.567,89");
}

#[test]
fn test_decimal_places_are_capped() {
    let el = create_element(ElementKind::Number, Position::default());
    let ElementBody::Number { properties, .. } = el.body() else {
        panic!("expected number body");
    };
    let mut properties = properties.clone();
    properties.decimal_places = u32::MAX;

    let rendered = properties.format(1.5);
    let (_, fraction) = rendered.split_once(',').unwrap();
    assert_eq!(fraction.len(), MAX_DECIMAL_PLACES as usize);
}

#[test]
fn test_chart_defaults() {
    let el = create_element(ElementKind::Chart, Position::default());
    let ElementBody::Chart { properties, .. } = el.body() else {
        panic!("expected chart body");
    };
    assert_eq!(properties.colors, DEFAULT_CHART_COLORS.map(String::from).to_vec());
    assert!(properties.animation);
    assert!(properties.show_legend);
}

#[test]
fn test_json_carries_type_tag() {
    let el = create_element(ElementKind::List, Position::new(10.0, 20.0));
    let value = serde_json::to_value(&el).unwrap();

    assert_eq!(value["type"], "list");
    assert_eq!(value["position"], json!({"x": 10.0, "y": 20.0}));
    assert!(value.get("dataSource").is_some());
    assert!(value["properties"]["columns"].is_array());

    let back: ReportElement = serde_json::from_value(value).unwrap();
    assert_eq!(back, el);
}

#[test]
fn test_unknown_type_tag_in_json_rejected() {
    let value = json!({
        "id": "x",
        "type": "image",
        "position": {"x": 0, "y": 0},
        "size": {"width": 1, "height": 1},
        "properties": {}
    });
    assert!(serde_json::from_value::<ReportElement>(value).is_err());
}
