//! Report document shape, persistence and band assignment.

use folio::dataset::{Dataset, FieldType, QueryParameter};
use folio::element::{create_element, ElementKind, Position};
use folio::report::{
    Band, BandType, DocumentError, Orientation, PageSettings, ReportLayout, LAYOUT_VERSION,
};
use serde_json::json;

fn sample_dataset() -> Dataset {
    Dataset {
        id: "ds_lq2x5k_ab12".to_string(),
        name: "Sales".to_string(),
        sql_query: "SELECT region, total FROM sales WHERE year = @year".to_string(),
        parameters: Some(vec![
            QueryParameter::new("year", FieldType::Number).with_default(2024)
        ]),
        fields: None,
    }
}

#[test]
fn test_default_document() {
    let layout = ReportLayout::default();
    let value = serde_json::to_value(&layout).unwrap();

    assert_eq!(layout.version, LAYOUT_VERSION);
    assert_eq!(
        value["pageSettings"],
        json!({
            "width": 210.0,
            "height": 297.0,
            "orientation": "portrait",
            "margins": {"top": 20.0, "right": 15.0, "bottom": 20.0, "left": 15.0},
            "backgroundColor": "#ffffff"
        })
    );
    assert_eq!(value["datasets"], json!([]));
    assert_eq!(value["bands"], json!([]));
}

#[test]
fn test_band_type_names() {
    let band = Band::new(BandType::PageHeader, 30.0);
    let value = serde_json::to_value(&band).unwrap();
    assert_eq!(value["type"], "page-header");
    assert_eq!(
        serde_json::to_value(BandType::PageFooter).unwrap(),
        json!("page-footer")
    );
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    let mut layout = ReportLayout::new(PageSettings {
        orientation: Orientation::Landscape,
        width: 297.0,
        height: 210.0,
        ..PageSettings::default()
    });
    layout.datasets.push(sample_dataset());
    layout.set_elements(&[create_element(ElementKind::Text, Position::new(10.0, 10.0))]);

    layout.save(&path).unwrap();
    let loaded = ReportLayout::load(&path).unwrap();
    assert_eq!(loaded, layout);
}

#[test]
fn test_partial_document_fills_defaults() {
    let layout = ReportLayout::from_json(r#"{"version": "1.0"}"#).unwrap();
    assert_eq!(layout.page_settings, PageSettings::default());
    assert!(layout.datasets.is_empty());
    assert!(layout.bands.is_empty());
}

#[test]
fn test_unsupported_version_rejected() {
    let err = ReportLayout::from_json(r#"{"version": "2.0"}"#).unwrap_err();
    assert!(matches!(err, DocumentError::UnsupportedVersion(v) if v == "2.0"));
    assert!(matches!(
        ReportLayout::from_json("{not json").unwrap_err(),
        DocumentError::Json(_)
    ));
}

#[test]
fn test_no_bands_gives_single_detail_band() {
    let mut layout = ReportLayout::default();
    let a = create_element(ElementKind::Text, Position::new(0.0, 0.0));
    let b = create_element(ElementKind::Chart, Position::new(0.0, 400.0));
    layout.set_elements(&[a.clone(), b.clone()]);

    assert_eq!(layout.bands.len(), 1);
    assert_eq!(layout.bands[0].band_type, BandType::Detail);
    assert_eq!(layout.bands[0].height, 257.0);
    assert_eq!(layout.elements(), vec![a, b]);
}

#[test]
fn test_elements_assigned_by_vertical_position() {
    let mut layout = ReportLayout::default();
    layout.bands = vec![
        Band::new(BandType::PageHeader, 30.0),
        Band::new(BandType::Detail, 200.0),
        Band::new(BandType::PageFooter, 27.0),
    ];

    let header = create_element(ElementKind::Text, Position::new(0.0, 10.0));
    let detail = create_element(ElementKind::List, Position::new(0.0, 30.0));
    let footer = create_element(ElementKind::Number, Position::new(0.0, 240.0));
    let overflow = create_element(ElementKind::Text, Position::new(0.0, 900.0));
    layout.set_elements(&[header.clone(), detail.clone(), footer.clone(), overflow.clone()]);

    let ids = |band: &Band| band.elements.iter().map(|e| e.id().to_string()).collect::<Vec<_>>();
    assert_eq!(ids(&layout.bands[0]), [header.id()]);
    assert_eq!(ids(&layout.bands[1]), [detail.id()]);
    assert_eq!(ids(&layout.bands[2]), [footer.id(), overflow.id()]);
}

#[test]
fn test_place_elements_honours_recorded_bands() {
    let mut layout = ReportLayout::default();
    layout.bands = vec![
        Band::new(BandType::PageHeader, 30.0),
        Band::new(BandType::PageFooter, 30.0),
    ];
    let footer_note = create_element(ElementKind::Text, Position::new(0.0, 5.0));
    layout.bands[1].elements.push(footer_note.clone());

    let assignments = layout.band_assignments();
    assert_eq!(assignments[footer_note.id()], layout.bands[1].id);

    let fresh = create_element(ElementKind::Text, Position::new(0.0, 5.0));
    layout.place_elements(&[footer_note.clone(), fresh.clone()], &assignments);
    assert_eq!(layout.bands[0].elements, vec![fresh]);
    assert_eq!(layout.bands[1].elements, vec![footer_note]);
}

#[test]
fn test_set_elements_replaces_previous_contents() {
    let mut layout = ReportLayout::default();
    layout.set_elements(&[create_element(ElementKind::Text, Position::default())]);
    layout.set_elements(&[]);
    assert_eq!(layout.bands.len(), 1);
    assert!(layout.elements().is_empty());
}
