//! Integration tests driving a real `Client` over a loopback socket against
//! [`support::fake_router::FakeRouter`].

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::fake_router::{FakeRouter, ScriptedReply};
use tcads_client::{Client, ClientSettings};
use tcads_core::ads::{AdsCommand, AdsDeviceVersion, AdsReturnCode};
use tcads_core::protocol::{AdsDeviceInfoResponse, AdsReadResponse, AdsWriteResponse};

const TARGET_PORT: u16 = 851;

async fn connected_client(router: &FakeRouter) -> Client {
    let settings = ClientSettings::builder(router.local_net_id(), TARGET_PORT)
        .router_address(router.addr().ip())
        .router_tcp_port(router.addr().port())
        .timeout_delay(Duration::from_secs(2))
        .monitor_plc_symbol_version(false)
        .build()
        .unwrap();
    let client = Client::new(settings);
    client.connect().await.unwrap();
    client
}

#[tokio::test]
async fn read_raw_round_trips_through_fake_router() {
    let router = FakeRouter::spawn(Arc::new(|request| {
        assert_eq!(request.header.command_id(), AdsCommand::AdsRead);
        let mut payload = Vec::new();
        AdsReadResponse::new(AdsReturnCode::Ok, vec![1, 2, 3, 4]).write_to(&mut payload).unwrap();
        ScriptedReply::ok(payload)
    }))
    .await
    .unwrap();

    let client = connected_client(&router).await;
    let data = client.read_raw(0x4020, 0, 4).await.unwrap();
    assert_eq!(data, vec![1, 2, 3, 4]);

    client.disconnect(true).await.unwrap();
}

#[tokio::test]
async fn write_raw_surfaces_ads_error_from_router() {
    let router = FakeRouter::spawn(Arc::new(|request| {
        assert_eq!(request.header.command_id(), AdsCommand::AdsWrite);
        let mut payload = Vec::new();
        AdsWriteResponse::new(AdsReturnCode::AdsErrDeviceNotFound).write_to(&mut payload).unwrap();
        ScriptedReply::ok(payload)
    }))
    .await
    .unwrap();

    let client = connected_client(&router).await;
    let err = client.write_raw(0x4020, 0, vec![9]).await.unwrap_err();
    assert!(matches!(err.kind, tcads_client::ErrorKind::Ads(AdsReturnCode::AdsErrDeviceNotFound, _)));

    client.disconnect(true).await.unwrap();
}

#[tokio::test]
async fn read_device_info_decodes_scripted_reply() {
    let router = FakeRouter::spawn(Arc::new(|request| {
        assert_eq!(request.header.command_id(), AdsCommand::AdsReadDeviceInfo);
        let mut payload = Vec::new();
        AdsDeviceInfoResponse::new(AdsDeviceVersion::new(3, 1, 4027), "TwinCAT PLC")
            .write_to(&mut payload)
            .unwrap();
        ScriptedReply::ok(payload)
    }))
    .await
    .unwrap();

    let client = connected_client(&router).await;
    let (version, name) = client.read_device_info().await.unwrap();
    assert_eq!(version, AdsDeviceVersion::new(3, 1, 4027));
    assert_eq!(name, "TwinCAT PLC");

    client.disconnect(true).await.unwrap();
}

#[tokio::test]
async fn ads_header_error_code_fails_the_request() {
    let router = FakeRouter::spawn(Arc::new(|_request| ScriptedReply::error(AdsReturnCode::AdsErrDeviceTimeout))).await.unwrap();

    let client = connected_client(&router).await;
    let err = client.read_raw(0x4020, 0, 4).await.unwrap_err();
    assert!(matches!(err.kind, tcads_client::ErrorKind::Ads(AdsReturnCode::AdsErrDeviceTimeout, _)));

    client.disconnect(true).await.unwrap();
}
