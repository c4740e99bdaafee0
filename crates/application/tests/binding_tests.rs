use application::printer::BindingState;
use application::{PrinterBinding, ScriptRegistry};
use domain::{ConnectionOptions, PrinterStatus};
use infrastructure::sdk::{MockScriptHost, SdkCall, SimulatedSdk};
use std::sync::Arc;
use std::time::Duration;

fn setup() -> (SimulatedSdk, PrinterBinding) {
    let sdk = SimulatedSdk::new();
    let host = Arc::new(MockScriptHost::new(Arc::new(sdk.clone())));
    let scripts = Arc::new(ScriptRegistry::new(host));
    let binding = PrinterBinding::new(
        &ConnectionOptions::new("/sdk.js", "10.0.0.5").with_port(9100),
        scripts,
    )
    .unwrap();
    (sdk, binding)
}

fn disconnect_calls(sdk: &SimulatedSdk) -> usize {
    sdk.journal()
        .iter()
        .filter(|call| matches!(call, SdkCall::Disconnect))
        .count()
}

#[tokio::test]
async fn test_initial_state_is_idle() {
    let (_sdk, binding) = setup();
    assert_eq!(binding.status(), PrinterStatus::Idle);
    assert!(binding.error().is_none());
    assert!(binding.printer().is_none());
    assert!(!binding.is_connected());
}

#[tokio::test]
async fn test_connect_publishes_connecting_then_connected() {
    let (sdk, mut binding) = setup();
    sdk.configure(|b| b.latency = Duration::from_millis(20));
    let mut rx = binding.subscribe();

    let observer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let status = rx.borrow_and_update().status;
            seen.push(status);
            if status == PrinterStatus::Connected || status == PrinterStatus::Error {
                break;
            }
        }
        seen
    });

    let printer = binding.connect().await.unwrap();
    let seen = observer.await.unwrap();

    assert_eq!(seen, vec![PrinterStatus::Connecting, PrinterStatus::Connected]);
    assert_eq!(binding.status(), PrinterStatus::Connected);
    assert!(Arc::ptr_eq(&binding.printer().unwrap(), &printer));
    assert!(binding.is_connected());
}

#[tokio::test]
async fn test_connect_failure_records_error() {
    let (sdk, mut binding) = setup();
    sdk.configure(|b| b.connect_code = "ERR_CONNECT".to_string());

    let err = binding.connect().await.unwrap_err();

    assert_eq!(binding.status(), PrinterStatus::Error);
    assert_eq!(binding.error(), Some(err.to_string()));
    assert!(binding.error().unwrap().contains("ERR_CONNECT"));
    assert!(binding.printer().is_none());
    assert!(!binding.is_connected());
}

#[tokio::test]
async fn test_device_failure_records_error() {
    let (sdk, mut binding) = setup();
    sdk.configure(|b| b.create_device_code = "DEVICE_IN_USE".to_string());

    binding.connect().await.unwrap_err();

    assert_eq!(binding.status(), PrinterStatus::Error);
    assert!(binding.error().unwrap().contains("DEVICE_IN_USE"));
    assert!(binding.printer().is_none());
    assert!(!binding.is_connected());
    assert_eq!(disconnect_calls(&sdk), 1);
    assert_eq!(sdk.journal().last(), Some(&SdkCall::Disconnect));
}

#[tokio::test]
async fn test_retry_after_error_clears_message() {
    let (sdk, mut binding) = setup();
    sdk.configure(|b| b.connect_code = "ERR_CONNECT".to_string());
    binding.connect().await.unwrap_err();

    sdk.configure(|b| b.connect_code = "OK".to_string());
    binding.connect().await.unwrap();

    assert_eq!(binding.status(), PrinterStatus::Connected);
    assert!(binding.error().is_none());
}

#[tokio::test]
async fn test_disconnect_resets_to_idle() {
    let (sdk, mut binding) = setup();
    binding.connect().await.unwrap();

    binding.disconnect().await;

    let state: BindingState = binding.subscribe().borrow().clone();
    assert_eq!(state.status, PrinterStatus::Idle);
    assert!(state.printer.is_none());
    assert!(state.error.is_none());
    assert!(!binding.is_connected());
    assert_eq!(disconnect_calls(&sdk), 1);
}

#[tokio::test]
async fn test_binding_uses_configured_device() {
    let (sdk, binding) = setup();
    let mut binding = binding.with_device("receipt", None);

    let printer = binding.connect().await.unwrap();

    assert_eq!(printer.device_id(), "receipt");
    assert!(sdk.journal().iter().any(|call| matches!(
        call,
        SdkCall::CreateDevice { device_id, .. } if device_id == "receipt"
    )));
}

#[tokio::test]
async fn test_shutdown_disconnects_exactly_once() {
    let (sdk, mut binding) = setup();
    binding.connect().await.unwrap();

    binding.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(disconnect_calls(&sdk), 1);
    let journal = sdk.journal();
    assert!(matches!(journal[journal.len() - 2], SdkCall::DeleteDevice { .. }));
}

#[tokio::test]
async fn test_shutdown_while_idle_touches_nothing() {
    let (sdk, binding) = setup();

    binding.shutdown().await;

    assert!(sdk.journal().is_empty());
}

#[tokio::test]
async fn test_drop_tears_down_session() {
    let (sdk, mut binding) = setup();
    binding.connect().await.unwrap();

    drop(binding);
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(disconnect_calls(&sdk), 1);
    assert!(sdk.journal().contains(&SdkCall::DeleteDevice {
        device_id: "local_printer".to_string()
    }));
}
