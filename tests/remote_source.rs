#![cfg(feature = "remote")]

use pwaicons::{catalog, Error, RasterConfig, VectorSource};
use tiny_http::{Response, Server};

const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><rect x="4" y="4" width="16" height="16" fill="#10b981"/></svg>"##;

/// Serves `/icon.svg` as SVG and `/icon.html` as HTML for `requests`
/// requests, 404 for anything else.
fn serve(requests: usize) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    std::thread::spawn(move || {
        for _ in 0..requests {
            let request = match server.recv() {
                Ok(r) => r,
                Err(_) => return,
            };
            let response = match request.url() {
                "/icon.svg" => Response::from_string(SVG).with_header(
                    "Content-Type: image/svg+xml"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                ),
                "/icon.html" => Response::from_string(SVG).with_header(
                    "Content-Type: text/html; charset=utf-8"
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                ),
                _ => Response::from_string("Not Found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });
    format!("http://{}", addr)
}

#[test]
fn remote_svg_is_fetched_once_per_batch() {
    let base = serve(1);
    let source = VectorSource::parse(&format!("{}/icon.svg", base)).unwrap();
    let results = pwaicons::generate_icons(&source, catalog::catalog(), &RasterConfig::default())
        .expect("remote generation failed");
    assert_eq!(results.len(), 10);
}

#[test]
fn http_error_is_load_error() {
    let base = serve(1);
    let source = VectorSource::parse(&format!("{}/missing.svg", base)).unwrap();
    let err = source.load(RasterConfig::default().timeout()).unwrap_err();
    assert!(matches!(err, Error::LoadError(ref msg) if msg.contains("404")), "{}", err);
}

#[test]
fn non_svg_content_type_is_rejected() {
    let base = serve(2);
    let source = VectorSource::parse(&format!("{}/icon.html", base)).unwrap();
    let timeout = RasterConfig::default().timeout();

    let err = source.load(timeout).unwrap_err();
    assert!(
        matches!(err, Error::UnsupportedContentType(ref t) if t.contains("text/html")),
        "{}",
        err
    );

    let bytes = source.load_with(timeout, false).unwrap();
    assert_eq!(bytes, SVG.as_bytes());
}

#[test]
fn content_type_failure_is_reported_per_entry() {
    let base = serve(1);
    let source = VectorSource::parse(&format!("{}/icon.html", base)).unwrap();
    let err = pwaicons::generate_icons(&source, catalog::catalog(), &RasterConfig::default())
        .unwrap_err();
    assert_eq!(err.failures().len(), 10);
    assert!(err
        .failures()
        .iter()
        .all(|(_, e)| matches!(e, Error::UnsupportedContentType(_))));
}

#[test]
fn type_check_can_be_disabled() {
    let base = serve(1);
    let source = VectorSource::parse(&format!("{}/icon.html", base)).unwrap();
    let cfg = RasterConfig { check_content_type: false, ..Default::default() };
    let results = pwaicons::generate_icons(&source, catalog::catalog(), &cfg).unwrap();
    assert_eq!(results.len(), 10);
}

#[test]
fn unreachable_host_fails_whole_batch() {
    // Bind and drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let source = VectorSource::parse(&format!("http://127.0.0.1:{}/icon.svg", port)).unwrap();
    let cfg = RasterConfig { timeout_ms: 2000, ..Default::default() };
    let err = pwaicons::generate_icons(&source, catalog::catalog(), &cfg).unwrap_err();
    assert_eq!(err.failures().len(), 10);
    assert!(err.failures().iter().all(|(_, e)| e.is_load_error()));
}
