use std::path::Path;
use std::time::{Duration, Instant};

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::ReuseDirective;
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, TestcontainersError};

use simhastha_emove::maps_api::{KeyStatus, MapsClient, MapsConfig};

/// nginx serving canned geocoding replies: `/ok/...` answers `OK`,
/// `/denied/...` answers `REQUEST_DENIED`.
fn maps_fixture_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/maps");

    let image = GenericImage::new("nginx", "alpine")
        .with_exposed_port(80.tcp())
        .with_mount(Mount::bind_mount(
            fixtures.to_string_lossy().to_string(),
            "/usr/share/nginx/html",
        ))
        .with_container_name("simhastha-maps-fixture")
        .with_startup_timeout(Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(80.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn client_for(base_url: &str, key: Option<&str>) -> MapsClient {
    let config = MapsConfig {
        api_key: key.map(str::to_string),
        api_base_url: base_url.to_string(),
        timeout_secs: 5,
        ..MapsConfig::default()
    };
    MapsClient::new(config).expect("build maps client")
}

/// nginx may accept connections a moment before it serves files.
fn validate_with_retry(client: &MapsClient) -> KeyStatus {
    let start = Instant::now();
    let mut status = client.validate_key();
    while status == KeyStatus::NetworkError && start.elapsed() < Duration::from_secs(15) {
        std::thread::sleep(Duration::from_millis(500));
        status = client.validate_key();
    }
    status
}

#[test]
fn maps_key_validation_against_fixture_server() {
    let (container, base_url) = maps_fixture_container().expect("start nginx container");

    let valid = client_for(&format!("{}/ok", base_url), Some("test-key"));
    let status = validate_with_retry(&valid);
    assert_eq!(status, KeyStatus::Valid);
    assert!(valid
        .directions_url((23.1837, 75.7924), (23.1765, 75.7885), &status)
        .contains("/maps/embed/v1/directions?key=test-key"));

    let denied = client_for(&format!("{}/denied", base_url), Some("bad-key"));
    let status = validate_with_retry(&denied);
    assert_eq!(status, KeyStatus::Invalid);
    assert!(denied
        .static_map_url((23.1765, 75.7885), &[(23.1765, 75.7885)], &status)
        .is_none());

    let missing = client_for(&format!("{}/missing", base_url), Some("test-key"));
    assert_eq!(missing.validate_key(), KeyStatus::NetworkError);

    drop(container);
}
