use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Method, Response, Server};

use d1_console::controller::{Controller, StatusView};
use d1_console::device::{DeviceClient, DeviceEndpoint};
use d1_console::pin::PinState;

/// In-process stand-in for the device firmware: serves `/api/status`
/// with a scriptable body and status code, and records every request.
struct StubDevice {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
    status_body: Arc<Mutex<String>>,
    status_code: Arc<Mutex<u16>>,
}

impl StubDevice {
    fn spawn(initial_status: &str) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind stub device");
        let base = format!(
            "http://{}",
            server.server_addr().to_ip().expect("stub device ip addr")
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let status_body = Arc::new(Mutex::new(initial_status.to_string()));
        let status_code = Arc::new(Mutex::new(200_u16));

        {
            let requests = Arc::clone(&requests);
            let status_body = Arc::clone(&status_body);
            let status_code = Arc::clone(&status_code);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    requests
                        .lock()
                        .expect("lock request journal")
                        .push(format!("{} {}", request.method(), request.url()));
                    let response = match (request.method().clone(), request.url()) {
                        (Method::Get, "/api/status") => {
                            let body = status_body.lock().expect("lock status body").clone();
                            Response::from_string(body)
                                .with_status_code(*status_code.lock().expect("lock status code"))
                        }
                        _ => Response::from_string("not found").with_status_code(404_u16),
                    };
                    let _ = request.respond(response);
                }
            });
        }

        Self {
            base,
            requests,
            status_body,
            status_code,
        }
    }

    fn controller(&self) -> Controller {
        let endpoint = DeviceEndpoint::parse(&self.base).expect("parse stub endpoint");
        Controller::new(DeviceClient::new(endpoint))
    }

    fn set_status_body(&self, body: &str) {
        *self.status_body.lock().expect("lock status body") = body.to_string();
    }

    fn set_status_code(&self, code: u16) {
        *self.status_code.lock().expect("lock status code") = code;
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock request journal").clone()
    }
}

fn log_text(controller: &Controller) -> String {
    controller.log().lines().join("\n")
}

fn offline_controller() -> Controller {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral loopback port");
    let addr = listener.local_addr().expect("read local addr");
    drop(listener);
    let endpoint = DeviceEndpoint::parse(&format!("http://{addr}")).expect("parse endpoint");
    Controller::new(DeviceClient::new(endpoint))
}

#[test]
fn refresh_reports_on_state() {
    let device = StubDevice::spawn(r#"{"d1":1}"#);
    let mut controller = device.controller();
    controller.refresh();
    assert_eq!(controller.last_state(), PinState::On);
    assert_eq!(controller.status().text(), "D1 is ON");
    assert!(controller.synced());
    assert!(log_text(&controller).contains("Status refreshed"));
    assert_eq!(device.requests(), vec!["GET /api/status"]);
}

#[test]
fn refresh_reports_off_state() {
    let device = StubDevice::spawn(r#"{"d1":0}"#);
    let mut controller = device.controller();
    controller.refresh();
    assert_eq!(controller.last_state(), PinState::Off);
    assert_eq!(controller.status().text(), "D1 is OFF");
}

#[test]
fn refresh_normalizes_unexpected_numbers_to_off() {
    let device = StubDevice::spawn(r#"{"d1":7}"#);
    let mut controller = device.controller();
    controller.refresh();
    assert_eq!(controller.last_state(), PinState::Off);
    assert_eq!(controller.status(), StatusView::Pin(PinState::Off));
}

#[test]
fn refresh_keeps_state_on_garbage_body() {
    let device = StubDevice::spawn(r#"{"d1":1}"#);
    let mut controller = device.controller();
    controller.refresh();
    assert_eq!(controller.last_state(), PinState::On);

    device.set_status_body("not json");
    controller.refresh();
    assert_eq!(controller.last_state(), PinState::On);
    assert_eq!(controller.status(), StatusView::Error);
    assert_eq!(controller.status().text(), "Status: ERROR");
    assert!(log_text(&controller).contains("failed to parse status JSON"));
}

#[test]
fn refresh_flags_missing_field_as_malformed() {
    let device = StubDevice::spawn(r#"{"led":1}"#);
    let mut controller = device.controller();
    controller.refresh();
    assert_eq!(controller.status(), StatusView::Error);
    assert_eq!(controller.last_state(), PinState::Off);
    assert!(log_text(&controller).contains("Malformed status response"));
    // Wrong field type is the same violation.
    device.set_status_body(r#"{"d1":"on"}"#);
    controller.refresh();
    assert!(log_text(&controller).matches("Malformed status response").count() == 2);
}

#[test]
fn refresh_reports_http_failure() {
    let device = StubDevice::spawn(r#"{"d1":1}"#);
    device.set_status_code(500);
    let mut controller = device.controller();
    controller.refresh();
    assert_eq!(controller.status(), StatusView::Error);
    assert!(log_text(&controller).contains("HTTP 500"));
    assert!(!controller.synced());
}

#[test]
fn refresh_reports_network_failure() {
    let mut controller = offline_controller();
    controller.refresh();
    assert_eq!(controller.status(), StatusView::Error);
    assert!(log_text(&controller).contains("Status refresh failed"));
    assert_eq!(controller.last_state(), PinState::Off);
}

#[test]
fn repeated_refresh_is_idempotent() {
    let device = StubDevice::spawn(r#"{"d1":1}"#);
    let mut controller = device.controller();
    controller.refresh();
    let state_after_first = controller.last_state();
    let lines_after_first = controller.log().len();

    controller.refresh();
    assert_eq!(controller.last_state(), state_after_first);
    assert_eq!(controller.log().len(), lines_after_first + 1);
    assert_eq!(
        device.requests(),
        vec!["GET /api/status", "GET /api/status"]
    );
}

#[test]
fn device_latch_period_is_surfaced() {
    let device = StubDevice::spawn(r#"{"d1":1,"latch":5}"#);
    let mut controller = device.controller();
    assert_eq!(controller.device_latch_seconds(), None);
    controller.refresh();
    assert_eq!(controller.device_latch_seconds(), Some(5));
}
