//! Wire protocol serialization and codec behavior.

use futures::io::Cursor;
use libp2p::request_response::Codec;
use libp2p::StreamProtocol;

use hlcks::check::CheckParams;
use hlcks::protocol::{IssueCodec, IssueRequest, IssueResponse, ISSUE_PROTOCOL, MAX_MESSAGE_BYTES};

fn protocol() -> StreamProtocol {
    StreamProtocol::new(ISSUE_PROTOCOL)
}

#[tokio::test]
async fn request_survives_the_codec() {
    let mut codec = IssueCodec;
    let request = IssueRequest {
        name: "backup".to_string(),
        policy: "borgmatic".to_string(),
        params: CheckParams {
            timeout: Some(3600),
            ..Default::default()
        },
    };

    let mut buffer = Cursor::new(Vec::new());
    codec
        .write_request(&protocol(), &mut buffer, request.clone())
        .await
        .unwrap();

    let mut reader = Cursor::new(buffer.into_inner());
    let decoded = codec.read_request(&protocol(), &mut reader).await.unwrap();
    assert_eq!(decoded, request);
}

#[tokio::test]
async fn response_survives_the_codec() {
    let mut codec = IssueCodec;
    let response = IssueResponse::success("https://hc.example.org/ping/a".to_string());

    let mut buffer = Cursor::new(Vec::new());
    codec
        .write_response(&protocol(), &mut buffer, response.clone())
        .await
        .unwrap();

    let mut reader = Cursor::new(buffer.into_inner());
    let decoded = codec.read_response(&protocol(), &mut reader).await.unwrap();
    assert_eq!(decoded, response);
}

#[tokio::test]
async fn garbage_on_the_wire_is_invalid_data() {
    let mut codec = IssueCodec;
    let mut reader = Cursor::new(b"not json".to_vec());

    let error = codec.read_request(&protocol(), &mut reader).await.unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::InvalidData);
}

#[tokio::test]
async fn oversized_frame_is_rejected() {
    let mut codec = IssueCodec;
    let request = IssueRequest {
        name: "backup".to_string(),
        policy: "borgmatic".to_string(),
        params: CheckParams {
            desc: Some("x".repeat(MAX_MESSAGE_BYTES as usize)),
            ..Default::default()
        },
    };

    let mut buffer = Cursor::new(Vec::new());
    codec
        .write_request(&protocol(), &mut buffer, request)
        .await
        .unwrap();

    // The reader stops at the cap; the truncated JSON fails to parse.
    let mut reader = Cursor::new(buffer.into_inner());
    let error = codec.read_request(&protocol(), &mut reader).await.unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::InvalidData);
}

#[tokio::test]
async fn unset_request_params_serialize_to_nothing() {
    let request = IssueRequest {
        name: "backup".to_string(),
        policy: "borgmatic".to_string(),
        params: CheckParams::default(),
    };
    let encoded = serde_json::to_value(&request).unwrap();
    assert_eq!(
        encoded,
        serde_json::json!({"name": "backup", "policy": "borgmatic", "params": {}})
    );
}
