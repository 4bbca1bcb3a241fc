//! CoordinatorClient against an in-process JSON-RPC coordinator

use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use runner_client::types::{
    AckResponse, AcquireResponse, ExtendRequest, FlushRequest, METHOD_ACQUIRE, METHOD_EXTEND,
    METHOD_FLUSH,
};
use runner_client::CoordinatorClient;
use runner_core::domain::{Run, RunResult, RunSignature};
use runner_core::port::LeaseClient;
use runner_core::AppError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Minimal coordinator: hands out queued runs, accepts one known signature
#[derive(Default)]
struct FakeCoordinator {
    queue: Mutex<VecDeque<Run>>,
    live_signature: Mutex<Option<String>>,
    extends: Mutex<Vec<String>>,
    flushes: Mutex<Vec<FlushRequest>>,
}

async fn start(coordinator: Arc<FakeCoordinator>) -> (String, ServerHandle) {
    let server = Server::builder().build("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let mut module = RpcModule::new(());

    let c = coordinator.clone();
    module
        .register_method(METHOD_ACQUIRE, move |_, _, _| {
            let run = c.queue.lock().unwrap().pop_front();
            let response = match run {
                Some(run) => {
                    *c.live_signature.lock().unwrap() = Some(run.run_signature.to_string());
                    AcquireResponse::from(run)
                }
                None => AcquireResponse::default(),
            };
            Ok::<_, ErrorObjectOwned>(response)
        })
        .unwrap();

    let c = coordinator.clone();
    module
        .register_method(METHOD_EXTEND, move |params, _, _| {
            let req: ExtendRequest = params.one()?;
            c.extends.lock().unwrap().push(req.run_signature.clone());
            let live = c.live_signature.lock().unwrap().clone();
            Ok::<_, ErrorObjectOwned>(AckResponse {
                ok: live.as_deref() == Some(req.run_signature.as_str()),
            })
        })
        .unwrap();

    let c = coordinator.clone();
    module
        .register_method(METHOD_FLUSH, move |params, _, _| {
            let req: FlushRequest = params.one()?;
            if req.run_signature == "rejected" {
                return Err(ErrorObjectOwned::owned(
                    4001,
                    "unknown signature",
                    None::<()>,
                ));
            }
            c.flushes.lock().unwrap().push(req);
            Ok(AckResponse::ok())
        })
        .unwrap();

    let handle = server.start(module);
    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn test_acquire_without_work_returns_empty_run() {
    let (url, handle) = start(Arc::new(FakeCoordinator::default())).await;
    let client = CoordinatorClient::connect(&url).unwrap();

    let run = client.acquire().await.unwrap();

    assert!(run.is_empty());
    handle.stop().unwrap();
}

#[tokio::test]
async fn test_lease_lifecycle() {
    let coordinator = Arc::new(FakeCoordinator::default());
    coordinator
        .queue
        .lock()
        .unwrap()
        .push_back(Run::new(42, "echo hello", "sig-42"));
    let (url, handle) = start(coordinator.clone()).await;
    let client = CoordinatorClient::connect(&url).unwrap();

    let run = client.acquire().await.unwrap();
    assert_eq!(run, Run::new(42, "echo hello", "sig-42"));

    client.extend(&run.run_signature).await.unwrap();
    client
        .flush(&RunResult::new(run.run_signature.clone(), 0, "hello\n", ""))
        .await
        .unwrap();

    assert_eq!(coordinator.extends.lock().unwrap().as_slice(), ["sig-42"]);
    let flushes = coordinator.flushes.lock().unwrap();
    assert_eq!(flushes.len(), 1);
    assert_eq!(flushes[0].run_code, 0);
    assert_eq!(flushes[0].run_stdout, "hello\n");
    handle.stop().unwrap();
}

#[tokio::test]
async fn test_extend_of_unknown_lease_fails() {
    let (url, handle) = start(Arc::new(FakeCoordinator::default())).await;
    let client = CoordinatorClient::connect(&url).unwrap();

    let result = client.extend(&RunSignature::new("stale")).await;

    assert!(matches!(result, Err(AppError::Coordinator(_))));
    handle.stop().unwrap();
}

#[tokio::test]
async fn test_flush_rpc_error_is_reported() {
    let (url, handle) = start(Arc::new(FakeCoordinator::default())).await;
    let client = CoordinatorClient::connect(&url).unwrap();

    let result = client
        .flush(&RunResult::new(RunSignature::new("rejected"), 1, "", ""))
        .await;

    match result {
        Err(AppError::Coordinator(msg)) => assert!(msg.contains("unknown signature")),
        other => panic!("unexpected result: {:?}", other),
    }
    handle.stop().unwrap();
}
