//! The grid driving a real HTTP lookup service.

use crate::common::StubBackend;
use anyhow::Result;
use consignment_grid::grid::{ChangeOutcome, ConsignmentGrid, OptionQuery};
use consignment_grid::lookup::HttpLookupService;
use consignment_grid::models::{DgField, Hazardous, Row, RowRef};
use consignment_grid::test_utils::init_test_logging;
use serde_json::json;
use std::sync::Arc;

async fn backend() -> Result<StubBackend> {
    StubBackend::master_data(
        vec![
            ("Product ID Init", None, json!([{ "id": "P1", "name": "Widget" }, { "id": "P2", "name": "Bolt" }])),
            ("UN Code Init", Some("P1"), json!([{ "id": "U9", "name": "Hazmat" }])),
            ("DG Class Init", None, json!([{ "id": "D1", "name": "Explosive" }, { "id": "D2", "name": "Gas" }])),
            ("DG Class Init", Some("U9"), json!([{ "id": "D1", "name": "Explosive" }])),
        ],
        vec![
            ("P1", json!({ "UNCode": "U9", "UNCodeDescription": "Hazmat", "DGClass": "D1", "DGClassDescription": "Explosive" })),
            ("U9", json!([{ "DGClass": "D1", "DGClassDescription": "Explosive" }])),
        ],
    )
    .await
}

fn grid(backend: &StubBackend, rows: usize) -> ConsignmentGrid {
    init_test_logging(None);
    let mut grid = ConsignmentGrid::new(Arc::new(HttpLookupService::new(backend.url())), 50);
    grid.load_rows(vec![Row::new(); rows]);
    grid
}

#[tokio::test]
async fn test_product_selection_end_to_end() -> Result<()> {
    let backend = backend().await?;
    let mut grid = grid(&backend, 1);
    let row = RowRef::Existing(0);

    let outcome = grid.on_field_change(DgField::Product, Some("P1 || Widget"), row).await?;
    assert_eq!(outcome, ChangeOutcome::Populated);

    let current = &grid.rows()[0];
    assert_eq!(current.un_code, "U9");
    assert_eq!(current.dg_class, "D1");
    assert_eq!(current.contains_hazardous_goods, Hazardous::Yes);

    let un_codes = grid.options_for(row, DgField::UnCode, &OptionQuery::new()).await?;
    assert_eq!(un_codes.len(), 1);
    let sent = backend.requests_of("UN Code Init");
    assert_eq!(sent[0]["additionalFilter"][0]["FilterValue"], "P1");
    Ok(())
}

#[tokio::test]
async fn test_new_row_uncode_first_over_http() -> Result<()> {
    let backend = backend().await?;
    let mut grid = grid(&backend, 0);
    let row = grid.start_new_row();

    grid.on_field_change(DgField::UnCode, Some("U9 || Hazmat"), row).await?;
    assert_eq!(grid.new_row().unwrap().dg_class, "D1");

    let dg_classes = grid.options_for(row, DgField::DgClass, &OptionQuery::new()).await?;
    assert_eq!(dg_classes.len(), 1);
    assert_eq!(backend.requests_of("DG Class Init")[0]["additionalFilter"][0]["FilterName"], "UNCode");

    let outcome = grid.on_field_change(DgField::Product, Some("P2 || Bolt"), row).await?;
    assert_eq!(outcome, ChangeOutcome::PriorityKept);
    assert!(backend.requests_of("ProductID On Select").is_empty());

    let index = grid.commit_new_row()?;
    assert_eq!(grid.rows()[index].product, "P2");
    assert_eq!(grid.rows()[index].un_code, "U9");
    Ok(())
}

#[tokio::test]
async fn test_clear_reverts_to_all_over_http() -> Result<()> {
    let backend = backend().await?;
    let mut grid = grid(&backend, 1);
    let row = RowRef::Existing(0);

    grid.on_field_change(DgField::Product, Some("P1 || Widget"), row).await?;
    grid.options_for(row, DgField::DgClass, &OptionQuery::new()).await?;
    grid.on_field_change(DgField::Product, None, row).await?;

    let dg_classes = grid.options_for(row, DgField::DgClass, &OptionQuery::new()).await?;
    assert_eq!(dg_classes.len(), 2);
    let sent = backend.requests_of("DG Class Init");
    assert_eq!(sent.len(), 2);
    assert!(sent[1].get("additionalFilter").is_none());
    Ok(())
}

#[tokio::test]
async fn test_backend_failure_degrades_softly() -> Result<()> {
    let backend = StubBackend::start(|_| (500, "{}".to_string())).await?;
    let mut grid = grid(&backend, 1);
    let row = RowRef::Existing(0);

    let outcome = grid.on_field_change(DgField::Product, Some("P1 || Widget"), row).await?;
    assert_eq!(outcome, ChangeOutcome::LookupFailed);
    assert_eq!(grid.rows()[0].product, "P1");

    let options = grid.options_for(row, DgField::UnCode, &OptionQuery::new()).await?;
    assert!(options.is_empty());
    Ok(())
}
