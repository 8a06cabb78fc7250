use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yard_inventory::formatters::SEPARATOR;
use yard_inventory::{
    CombinedInventory, InventoryCache, QueryInput, QueryOutcome, QueryParameters, QueryRejection,
    VehicleRecord, VinDecoder,
};

// Test fixtures - two small yards

fn record(row: u32, vin: &str, year: i32, make: &str, model: &str) -> VehicleRecord {
    VehicleRecord {
        row_number: row,
        vin: vin.to_string(),
        year,
        make: make.to_string(),
        model: model.to_string(),
    }
}

fn spokane_records() -> Vec<VehicleRecord> {
    vec![
        record(1, "SUBARU30A", 2004, "SUBARU", "LEGACY"),
        record(2, "SUBARU25B", 2004, "SUBARU", "LEGACY"),
        record(3, "SUBARU99C", 1999, "SUBARU", "LEGACY"),
        record(4, "OUTBACK4D", 2004, "SUBARU", "OUTBACK"),
        record(5, "CHEVY0005", 2001, "CHEVROLET", "S10"),
        record(6, "CHEVY0006", 2001, "CHEVY", "S10"),
        record(7, "NISSAN007", 1995, "DATSUN - NISSAN", "PATHFINDER"),
    ]
}

fn mead_records() -> Vec<VehicleRecord> {
    vec![
        record(1, "SUBARU25E", 2004, "SUBARU", "LEGACY"),
        record(2, "SUBARUBADF", 2004, "SUBARU", "LEGACY"),
        record(3, "FORD00003", 2010, "FORD", "F150"),
    ]
}

fn write_yards(dir: &Path) -> InventoryCache {
    let cache = InventoryCache::new(dir);
    cache.write("Spokane", &spokane_records()).unwrap();
    cache.write("Mead", &mead_records()).unwrap();
    cache
}

fn decode_json(displacement: &str, cylinders: &str) -> serde_json::Value {
    serde_json::json!({
        "Count": 2,
        "Message": "Results returned successfully",
        "Results": [
            { "Value": displacement, "Variable": "Displacement (L)" },
            { "Value": cylinders, "Variable": "Engine Number of Cylinders" },
            { "Value": null, "Variable": "Engine Model" }
        ]
    })
}

async fn mount_vin(server: &MockServer, vin: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/decodevin/{vin}")))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Any request not covered by a specific mock fails the test on drop.
async fn forbid_other_calls(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(server)
        .await;
}

fn open(dir: &Path, api_url: &str) -> CombinedInventory {
    let cache = InventoryCache::new(dir);
    CombinedInventory::open(&cache, "Spokane", "Mead", VinDecoder::new(api_url)).unwrap()
}

fn found(outcome: QueryOutcome) -> yard_inventory::query::QueryReport {
    match outcome {
        QueryOutcome::Found(report) => report,
        QueryOutcome::Rejected(r) => panic!("Expected results, got rejection: {r}"),
    }
}

#[tokio::test]
async fn test_subaru_legacy_displacement_scenario() {
    let server = MockServer::start().await;
    mount_vin(&server, "SUBARU30A", ResponseTemplate::new(200).set_body_json(decode_json("3.0", "6"))).await;
    mount_vin(&server, "SUBARU25B", ResponseTemplate::new(200).set_body_json(decode_json("2.457", "4"))).await;
    mount_vin(&server, "SUBARU25E", ResponseTemplate::new(200).set_body_json(decode_json("2.5", "4"))).await;
    mount_vin(&server, "SUBARUBADF", ResponseTemplate::new(500)).await;
    forbid_other_calls(&server).await;

    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let dir = temp_dir.path().to_path_buf();
    let api_url = server.uri();

    let (count, outcome) = tokio::task::spawn_blocking(move || {
        let inventory = open(&dir, &api_url);
        let params = QueryInput {
            year: Some("2004".to_string()),
            make: Some("subaru".to_string()),
            model: Some("legacy".to_string()),
            displacement: Some("3.0".to_string()),
            cylinders: None,
        }
        .parse()
        .unwrap();
        (inventory.count_for_engine_query(&params), inventory.query(&params))
    })
    .await
    .unwrap();

    // Two Spokane and two Mead rows pass the base filter
    assert_eq!(count, 4);

    let report = found(outcome);
    let [spokane, mead] = &report.locations;
    assert_eq!(spokane.count(), 1);
    assert_eq!(spokane.rows[0].record.vin, "SUBARU30A");
    assert_eq!(spokane.rows[0].engine.as_ref().unwrap().displacement_liters, 3.0);
    assert_eq!(mead.count(), 0);

    let text = report.render();
    assert!(text.starts_with("Spokane inventory\nFound 1 instances of 2004 SUBARU LEGACY 3.0L\n"));
    assert!(text.ends_with(&format!(
        "{SEPARATOR}No instances of 2004 SUBARU LEGACY 3.0L found in Mead{SEPARATOR}"
    )));
}

#[tokio::test]
async fn test_cylinder_filter_compares_strings() {
    let server = MockServer::start().await;
    mount_vin(&server, "SUBARU30A", ResponseTemplate::new(200).set_body_json(decode_json("3.0", "6"))).await;
    mount_vin(&server, "SUBARU25B", ResponseTemplate::new(200).set_body_json(decode_json("2.5", "4"))).await;
    mount_vin(&server, "SUBARU25E", ResponseTemplate::new(200).set_body_json(decode_json("2.5", "4"))).await;
    mount_vin(&server, "SUBARUBADF", ResponseTemplate::new(200).set_body_json(decode_json("2.5", "4"))).await;
    forbid_other_calls(&server).await;

    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let dir = temp_dir.path().to_path_buf();
    let api_url = server.uri();

    let outcome = tokio::task::spawn_blocking(move || {
        let params = QueryParameters::new()
            .with_make("subaru")
            .with_model("legacy")
            .with_year(2004)
            .with_cylinders("4");
        open(&dir, &api_url).query(&params)
    })
    .await
    .unwrap();

    let report = found(outcome);
    assert_eq!(report.locations[0].count(), 1);
    assert_eq!(report.locations[1].count(), 2);
    assert_eq!(report.total(), 3);
}

#[tokio::test]
async fn test_browse_all_makes_no_network_calls() {
    let server = MockServer::start().await;
    forbid_other_calls(&server).await;

    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let dir = temp_dir.path().to_path_buf();
    let api_url = server.uri();

    let outcome = tokio::task::spawn_blocking(move || {
        open(&dir, &api_url).query(&QueryParameters::new())
    })
    .await
    .unwrap();

    let report = found(outcome);
    assert_eq!(report.locations[0].count(), spokane_records().len());
    assert_eq!(report.locations[1].count(), mead_records().len());
    assert!(report.locations.iter().flat_map(|l| &l.rows).all(|r| r.engine.is_none()));

    let text = report.render();
    assert!(text.starts_with("Spokane inventory\n7 vehicles\n"));
    assert!(text.contains("Mead inventory\n3 vehicles\n"));
}

#[test]
fn test_chevy_matches_only_stored_chevrolet() {
    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let inventory = open(temp_dir.path(), "http://127.0.0.1:9");

    let report = found(inventory.query(&QueryParameters::new().with_make("chevy")));

    let rows: Vec<&str> = report.locations[0].rows.iter().map(|r| r.record.vin.as_str()).collect();
    assert_eq!(rows, ["CHEVY0005"]);
    assert_eq!(report.locations[1].count(), 0);
}

#[test]
fn test_nissan_and_datsun_search_the_same_tag() {
    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let inventory = open(temp_dir.path(), "http://127.0.0.1:9");

    let nissan = inventory.query(&QueryParameters::new().with_make("nissan")).render();
    let datsun = inventory.query(&QueryParameters::new().with_make("Datsun")).render();

    assert_eq!(nissan, datsun);
    assert!(nissan.contains("Found 1 instances of DATSUN - NISSAN"));
}

#[test]
fn test_zero_matches_gives_combined_message() {
    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let inventory = open(temp_dir.path(), "http://127.0.0.1:9");

    let text = inventory
        .query(&QueryParameters::new().with_year(1970).with_make("amc"))
        .render();

    assert_eq!(text, "No instances of 1970 AMC found in Spokane or Mead");
}

#[test]
fn test_same_query_twice_is_identical() {
    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let inventory = open(temp_dir.path(), "http://127.0.0.1:9");
    let params = QueryParameters::new().with_year(2004);

    assert_eq!(inventory.query(&params), inventory.query(&params));
    assert_eq!(inventory.query(&params).render(), inventory.query(&params).render());
}

#[test]
fn test_engine_query_without_make_rejected_before_any_lookup() {
    let temp_dir = TempDir::new().unwrap();
    write_yards(temp_dir.path());
    let inventory = open(temp_dir.path(), "http://127.0.0.1:9");

    let params = QueryParameters::new().with_year(2004).with_displacement(3.0);
    match inventory.query(&params) {
        QueryOutcome::Rejected(rejection) => {
            assert_eq!(rejection, QueryRejection::EngineWithoutMake)
        }
        QueryOutcome::Found(_) => panic!("Expected rejection"),
    }
}

#[test]
fn test_location_names_come_from_file_names() {
    let temp_dir = TempDir::new().unwrap();
    let cache = write_yards(temp_dir.path());

    let inventory = CombinedInventory::from_files(
        &cache.path("Mead"),
        &cache.path("Spokane"),
        VinDecoder::new("http://127.0.0.1:9"),
    )
    .unwrap();

    let names: Vec<&str> = inventory.stores().iter().map(|s| s.location()).collect();
    assert_eq!(names, ["Mead", "Spokane"]);
}
