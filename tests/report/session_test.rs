//! Report sessions: hydration, saving, and element data views.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::MockExecutor;
use folio::config::{CanvasSettings, Settings};
use folio::dataset::DatasetDef;
use folio::element::{
    create_element, Aggregation, ElementBody, ElementKind, ElementPatch, NumberSource, Position, TextBinding,
};
use folio::report::{Band, BandType, ReportLayout};
use folio::ReportSession;
use serde_json::json;

const SALES: &str = "SELECT region, total FROM sales";

fn executor() -> Arc<MockExecutor> {
    Arc::new(MockExecutor::new().with_rows(
        SALES,
        vec![
            json!({"region": "south", "total": 80}),
            json!({"region": "north", "total": 1200.5}),
            json!({"region": "east", "total": null}),
        ],
    ))
}

/// Edit an element's body in place through the canvas.
fn edit_body(session: &mut ReportSession, id: &str, edit: impl FnOnce(&mut ElementBody)) {
    let mut body = session.canvas().element(id).unwrap().body().clone();
    edit(&mut body);
    session
        .canvas_mut()
        .update_element(id, ElementPatch::new().with_body(body))
        .unwrap();
}

async fn session_with_sales() -> (ReportSession, String) {
    let mut session = ReportSession::new(executor(), &Settings::default());
    let id = session
        .datasets_mut()
        .add_dataset(DatasetDef::new("Sales", SALES))
        .id
        .clone();
    session.datasets_mut().execute_dataset(&id, None).await.unwrap();
    (session, id)
}

#[tokio::test]
async fn test_number_element_aggregates() {
    let (mut session, ds) = session_with_sales().await;
    let el = session
        .canvas_mut()
        .add_element(ElementKind::Number, Position::default());

    edit_body(&mut session, el.id(), |body| {
        if let ElementBody::Number { data_source, .. } = body {
            *data_source = Some(NumberSource {
                dataset_id: Some(ds.clone()),
                field: Some("total".to_string()),
                aggregation: Some(Aggregation::Sum),
            });
        }
    });

    assert_eq!(session.element_value(el.id()), Some(1280.5));
    assert_eq!(session.element_text(el.id()).as_deref(), Some("1.280,50"));

    edit_body(&mut session, el.id(), |body| {
        if let ElementBody::Number { data_source: Some(source), .. } = body {
            source.aggregation = Some(Aggregation::Count);
        }
    });
    assert_eq!(session.element_value(el.id()), Some(2.0));

    edit_body(&mut session, el.id(), |body| {
        if let ElementBody::Number { data_source: Some(source), .. } = body {
            source.aggregation = None;
        }
    });
    assert_eq!(session.element_value(el.id()), Some(80.0));
}

#[tokio::test]
async fn test_text_binding_reads_first_row() {
    let (mut session, ds) = session_with_sales().await;
    let el = session
        .canvas_mut()
        .add_element(ElementKind::Text, Position::default());
    assert_eq!(session.element_text(el.id()).as_deref(), Some("Label Text"));

    edit_body(&mut session, el.id(), |body| {
        if let ElementBody::Text { data_binding, .. } = body {
            *data_binding = Some(TextBinding {
                enabled: true,
                dataset_id: Some(ds.clone()),
                field: Some("region".to_string()),
            });
        }
    });
    assert_eq!(session.element_text(el.id()).as_deref(), Some("south"));
}

#[tokio::test]
async fn test_list_rows_ordered_and_limited() {
    let (mut session, ds) = session_with_sales().await;
    let el = session
        .canvas_mut()
        .add_element(ElementKind::List, Position::default());

    edit_body(&mut session, el.id(), |body| {
        if let ElementBody::List { data_source, .. } = body {
            data_source.dataset_id = Some(ds.clone());
            data_source.order_by = Some("region".to_string());
            data_source.limit = Some(2);
        }
    });

    let regions: Vec<_> = session
        .element_rows(el.id())
        .iter()
        .map(|row| row["region"].clone())
        .collect();
    assert_eq!(regions, [json!("east"), json!("north")]);
}

#[tokio::test]
async fn test_dangling_reference_gives_empty_view() {
    let (mut session, ds) = session_with_sales().await;
    let el = session
        .canvas_mut()
        .add_element(ElementKind::Chart, Position::default());
    edit_body(&mut session, el.id(), |body| {
        if let ElementBody::Chart { data_source, .. } = body {
            data_source.dataset_id = Some(ds.clone());
        }
    });
    assert_eq!(session.element_rows(el.id()).len(), 3);

    session.datasets_mut().remove_dataset(&ds);

    assert!(session.canvas().element(el.id()).is_some());
    assert!(session.element_rows(el.id()).is_empty());
    assert_eq!(session.dangling_elements().len(), 1);
    assert!(session.element_rows("no-such-element").is_empty());
}

#[tokio::test]
async fn test_save_and_reopen_resets_history() {
    let (mut session, _) = session_with_sales().await;
    session
        .canvas_mut()
        .add_element(ElementKind::Text, Position::new(0.0, 0.0));
    session
        .canvas_mut()
        .add_element(ElementKind::Number, Position::new(0.0, 100.0));

    let layout = session.to_layout();
    assert_eq!(layout.datasets.len(), 1);
    assert_eq!(layout.bands.len(), 1);
    assert_eq!(layout.elements().len(), 2);

    let json = layout.to_json().unwrap();
    let reopened = ReportSession::open(
        ReportLayout::from_json(&json).unwrap(),
        executor(),
        &CanvasSettings::default(),
    );

    assert_eq!(reopened.canvas().elements(), session.canvas().elements());
    assert!(!reopened.canvas().can_undo());
    assert_eq!(reopened.datasets().datasets(), session.datasets().datasets());
    // Results are not persisted.
    let ds = &reopened.datasets().datasets()[0].id;
    assert!(reopened.datasets().get_dataset_data(ds).is_empty());
}

#[test]
fn test_band_shells_survive_round_trip() {
    let mut layout = ReportLayout::default();
    layout.bands = vec![
        Band::new(BandType::PageHeader, 25.0),
        Band::new(BandType::Detail, 232.0),
    ];
    let band_ids: Vec<_> = layout.bands.iter().map(|b| b.id.clone()).collect();

    let mut session = ReportSession::open(layout, executor(), &CanvasSettings::default());
    session
        .canvas_mut()
        .add_element(ElementKind::Text, Position::new(0.0, 50.0));

    let saved = session.to_layout();
    let saved_ids: Vec<_> = saved.bands.iter().map(|b| b.id.clone()).collect();
    assert_eq!(saved_ids, band_ids);
    assert!(saved.bands[0].elements.is_empty());
    assert_eq!(saved.bands[1].elements.len(), 1);
}

fn band_sizes(layout: &ReportLayout) -> Vec<usize> {
    layout.bands.iter().map(|b| b.elements.len()).collect()
}

#[test]
fn test_reopened_elements_keep_their_band() {
    let mut layout = ReportLayout::default();
    layout.bands = vec![
        Band::new(BandType::PageHeader, 30.0),
        Band::new(BandType::Detail, 200.0),
        Band::new(BandType::PageFooter, 30.0),
    ];
    // Band-relative y: both sit at the top of their own band.
    let title = create_element(ElementKind::Text, Position::new(10.0, 5.0));
    let page_total = create_element(ElementKind::Number, Position::new(10.0, 5.0));
    layout.bands[0].elements.push(title.clone());
    layout.bands[2].elements.push(page_total.clone());
    assert_eq!(band_sizes(&layout), [1, 0, 1]);

    let mut session = ReportSession::open(layout, executor(), &CanvasSettings::default());
    let saved = session.to_layout();
    assert_eq!(band_sizes(&saved), [1, 0, 1]);
    assert_eq!(saved.bands[0].elements[0].id(), title.id());
    assert_eq!(saved.bands[2].elements[0].id(), page_total.id());

    // New elements are still placed by position.
    session
        .canvas_mut()
        .add_element(ElementKind::Chart, Position::new(0.0, 100.0));
    assert_eq!(band_sizes(&session.to_layout()), [1, 1, 1]);
}

#[test]
fn test_replaced_bands_fall_back_to_position() {
    let mut layout = ReportLayout::default();
    layout.bands = vec![Band::new(BandType::PageFooter, 30.0)];
    layout.bands[0]
        .elements
        .push(create_element(ElementKind::Text, Position::new(0.0, 5.0)));

    let mut session = ReportSession::open(layout, executor(), &CanvasSettings::default());
    session.set_bands(vec![
        Band::new(BandType::PageHeader, 30.0),
        Band::new(BandType::Detail, 200.0),
    ]);

    assert_eq!(band_sizes(&session.to_layout()), [1, 0]);
}
