//! JSON shapes exchanged with the master-data backend and stored in rows.

use consignment_grid::lookup::{LookupEnvelope, LookupRequest, MessageType};
use consignment_grid::models::{DgField, Hazardous, Row, RowRef};
use serde_json::json;

#[test]
fn test_options_request_body() {
    let request = LookupRequest::options(DgField::DgClass, Some("U9"))
        .with_search_term(Some("  expl "))
        .with_page(0, 50);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "messageType": "DG Class Init",
            "searchTerm": "expl",
            "offset": 0,
            "limit": 50,
            "additionalFilter": [{ "FilterName": "UNCode", "FilterValue": "U9" }]
        })
    );
}

#[test]
fn test_unscoped_request_has_no_filter() {
    let request = LookupRequest::options(DgField::UnCode, None);
    assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "messageType": "UN Code Init" }));
}

#[test]
fn test_on_select_request_body() {
    let request = LookupRequest::on_select(DgField::Product, "P1", "Widget").unwrap();
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "messageType": "ProductID On Select",
            "searchCriteria": { "id": "P1", "name": "Widget" }
        })
    );
    assert!(LookupRequest::on_select(DgField::DgClass, "D1", "Explosive").is_none());
}

#[test]
fn test_envelope_drops_incomplete_records() {
    let envelope: LookupEnvelope = serde_json::from_value(json!({
        "ResponseData": "[{\"id\":\"P1\",\"name\":\"Widget\"},{\"id\":\"P2\"},{\"name\":\"orphan\"},{\"id\":\"\",\"name\":\"blank\"}]"
    }))
    .unwrap();

    let page = envelope.option_page(MessageType::ProductInit).unwrap();
    assert_eq!(page.records, 4);
    let options = page.options;
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].label, "P1 || Widget");
    assert_eq!(options[0].label, options[0].value);
}

#[test]
fn test_malformed_response_data_is_empty() {
    let envelope: LookupEnvelope = serde_json::from_value(json!({ "ResponseData": "{not json" })).unwrap();
    assert!(envelope.option_page(MessageType::UnCodeInit).is_err());
    assert!(envelope.records(MessageType::UnCodeInit).is_err());
}

#[test]
fn test_string_encoded_detail_payload() {
    let envelope: LookupEnvelope = serde_json::from_value(json!({
        "ResponsePayload": "{\"UNCode\":\"U9\",\"UNCodeDescription\":\"Hazmat\",\"DGClass\":\"D1\",\"ContainsHazardousGoods\":\"Yes\"}"
    }))
    .unwrap();

    let detail = envelope.detail(MessageType::ProductOnSelect).unwrap();
    assert_eq!(detail.un_code.as_deref(), Some("U9"));
    assert_eq!(detail.dg_class.as_deref(), Some("D1"));
    assert_eq!(detail.dg_class_description, None);
}

#[test]
fn test_row_columns_roundtrip_with_extra_fields() {
    let raw = json!({
        "Product": "P1",
        "ProductDescription": "Widget",
        "UNCode": "U9",
        "UNCodeDescription": "Hazmat",
        "DGClass": "D1",
        "DGClassDescription": "Explosive",
        "ContainsHazardousGoods": "Yes",
        "IsDeleted": false,
        "TripNumber": "T-1001"
    });

    let row: Row = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(row.un_code, "U9");
    assert_eq!(row.contains_hazardous_goods, Hazardous::Yes);
    assert_eq!(row.extra["TripNumber"], "T-1001");
    assert_eq!(serde_json::to_value(&row).unwrap(), raw);
}

#[test]
fn test_row_ref_sentinel() {
    assert_eq!(serde_json::from_value::<RowRef>(json!(-1)).unwrap(), RowRef::New);
    assert_eq!(serde_json::from_value::<RowRef>(json!("new")).unwrap(), RowRef::New);
    assert_eq!(serde_json::from_value::<RowRef>(json!(3)).unwrap(), RowRef::Existing(3));
    assert!(serde_json::from_value::<RowRef>(json!(-2)).is_err());
    assert_eq!(serde_json::to_value(RowRef::New).unwrap(), json!(-1));
}
