//! Full report runs against a mocked Tendermint RPC endpoint.

use base64::{engine::general_purpose, Engine as _};
use mockito::{Matcher, Mock, Server, ServerGuard};
use prost::Message;
use serde_json::{json, Value};
use std::net::TcpListener;
use url::Url;
use valstat_report::{
    derive_consensus_address, run_report, ConsensusPubKey, ReportError, ReportWriter, RunOptions,
};
use valstat_rpc_client::models::staking::{
    Any, PageResponse, PubKey, QueryValidatorsResponse, Validator,
};
use valstat_rpc_client::{ClientRpcError, RpcClient};

const ED25519: &str = "/cosmos.crypto.ed25519.PubKey";

fn localhost_binding_permitted() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn envelope(result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string()
}

fn consensus_key(seed: u8) -> Any {
    Any {
        type_url: ED25519.to_string(),
        value: PubKey {
            key: vec![seed; 32],
        }
        .encode_to_vec(),
    }
}

fn consensus_address(seed: u8) -> String {
    let key = ConsensusPubKey::from_any(&consensus_key(seed)).unwrap();
    derive_consensus_address(&key).unwrap().to_string()
}

async fn mock_method(server: &mut ServerGuard, method: &str, body: String) -> Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": method })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// A three block chain proposed by validators 1, 2 and 1, where only
/// validator 1 is bonded.
async fn mock_chain(server: &mut ServerGuard) -> Vec<Mock> {
    let proposer_one = consensus_address(1);
    let proposer_two = consensus_address(2);

    let staking = QueryValidatorsResponse {
        validators: vec![Validator {
            operator_address: "cosmosvaloper1one".to_string(),
            consensus_pubkey: Some(consensus_key(1)),
            ..Default::default()
        }],
        pagination: Some(PageResponse {
            next_key: vec![],
            total: 1,
        }),
    };

    vec![
        mock_method(
            server,
            "status",
            envelope(json!({"sync_info": {"latest_block_height": "3", "earliest_block_height": "1"}})),
        )
        .await,
        mock_method(
            server,
            "blockchain",
            envelope(json!({
                "last_height": "3",
                "block_metas": [
                    {"header": {"height": "3", "proposer_address": proposer_one}, "num_txs": "1"},
                    {"header": {"height": "2", "proposer_address": proposer_two}, "num_txs": "0"},
                    {"header": {"height": "1", "proposer_address": proposer_one.to_lowercase()}, "num_txs": "1"}
                ]
            })),
        )
        .await,
        mock_method(
            server,
            "block_results",
            envelope(json!({"height": "3", "txs_results": [{"code": 0, "gas_wanted": "200", "gas_used": "150"}]})),
        )
        .await,
        mock_method(
            server,
            "abci_query",
            envelope(json!({"response": {
                "code": 0,
                "value": general_purpose::STANDARD.encode(staking.encode_to_vec())
            }})),
        )
        .await,
        mock_method(
            server,
            "validators",
            envelope(json!({
                "block_height": "3",
                "validators": [
                    {"address": proposer_one, "voting_power": "700"},
                    {"address": proposer_two, "voting_power": "300"}
                ],
                "count": "2",
                "total": "2"
            })),
        )
        .await,
    ]
}

fn client_for(server: &ServerGuard) -> RpcClient {
    RpcClient::new(Url::parse(&server.url()).unwrap()).unwrap()
}

#[tokio::test]
async fn report_over_rpc() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _mocks = mock_chain(&mut server).await;

    let client = client_for(&server);
    let mut writer = ReportWriter::inline(Vec::new());
    let summary = run_report(&client, &RunOptions::default(), &mut writer)
        .await
        .unwrap();
    let (out, _) = writer.into_inner();
    let output = String::from_utf8(out).unwrap();

    let one = consensus_address(1);
    let two = consensus_address(2);
    let expected = format!(
        "height,proposer,num_txs,gas_used,gas_wanted\n\
         3,{one},1,150,200\n\
         2,{two},0,150,200\n\
         1,{one},1,150,200\n\
         Load validators page ...\n\
         Total blocks scanned: 3 (from 3 to 1)\n\
         {one},700,cosmosvaloper1one,2\n\
         {two},300,?,1\n"
    );
    assert_eq!(output, expected);
    assert_eq!(summary.window.blocks_scanned, 3);
    assert!(summary.omitted_proposers.is_empty());
}

#[tokio::test]
async fn transport_error_aborts_report() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _status = mock_method(
        &mut server,
        "status",
        envelope(json!({"sync_info": {"latest_block_height": "3"}})),
    )
    .await;
    let _blockchain = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "blockchain"})))
        .with_status(500)
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"Internal error","data":"height 3 must be less than or equal to the current blockchain height 2"}}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let mut writer = ReportWriter::inline(Vec::new());
    let err = run_report(&client, &RunOptions::default(), &mut writer)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReportError::Source(ClientRpcError::Rpc { code: -32603, .. })
    ));
}
