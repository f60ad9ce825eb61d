use crate::error::ClientRpcError;
use crate::models::staking::{
    PageRequest, QueryValidatorsRequest, QueryValidatorsResponse, VALIDATORS_QUERY_PATH,
};
use crate::models::{
    RpcAbciQuery, RpcAbciResponse, RpcBlockResults, RpcBlockchainInfo, RpcRequest, RpcResponse,
    RpcStatus, RpcValidator, RpcValidatorSet,
};
use base64::{engine::general_purpose, Engine as _};
use prost::Message;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default HTTP timeout applied to every request
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest page the `validators` method serves
pub const VALIDATORS_PER_PAGE: u32 = 100;

/// Client for the Tendermint/CometBFT JSON-RPC interface
pub struct RpcClient {
    base_address: Url,
    http_client: Client,
    next_id: AtomicU64,
}

/// Builder for [`RpcClient`]
#[derive(Debug, Clone)]
pub struct RpcClientBuilder {
    url: Url,
    timeout: Duration,
}

impl RpcClientBuilder {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client. Credentials embedded in the URL are sent as basic
    /// auth.
    pub fn build(self) -> Result<RpcClient, ClientRpcError> {
        let mut url = self.url;
        let mut auth = None;

        if !url.username().is_empty() {
            auth = Some((
                url.username().to_string(),
                url.password().map(str::to_string),
            ));
            // Credentials must not leak into request lines or logs.
            let _ = url.set_username("");
            let _ = url.set_password(None);
        }

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("valstat/", env!("CARGO_PKG_VERSION")));

        if let Some((user, pass)) = auth {
            let credentials = format!("{}:{}", user, pass.unwrap_or_default());
            let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
            let value = HeaderValue::from_str(&format!("Basic {encoded}"))
                .map_err(|err| ClientRpcError::Config(err.to_string()))?;
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let http_client = builder
            .build()
            .map_err(|err| ClientRpcError::Config(err.to_string()))?;

        Ok(RpcClient {
            base_address: url,
            http_client,
            next_id: AtomicU64::new(1),
        })
    }
}

impl RpcClient {
    /// Creates a configurable builder for the RPC client.
    #[must_use]
    pub fn builder(url: Url) -> RpcClientBuilder {
        RpcClientBuilder::new(url)
    }

    /// Creates a client with default settings.
    pub fn new(url: Url) -> Result<Self, ClientRpcError> {
        RpcClientBuilder::new(url).build()
    }

    /// Endpoint this client talks to, without credentials
    pub fn base_address(&self) -> &Url {
        &self.base_address
    }

    /// Sends one JSON-RPC request and decodes its result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ClientRpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        let start = Instant::now();

        let result = self.send(&request).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(target: "valstat::rpc", method, id, elapsed_ms, "rpc request completed"),
            Err(err) => debug!(
                target: "valstat::rpc",
                method,
                id,
                elapsed_ms,
                code = err.code(),
                error = %err,
                "rpc request failed"
            ),
        }

        result
    }

    async fn send<T: DeserializeOwned>(&self, request: &RpcRequest) -> Result<T, ClientRpcError> {
        let method = request.method.as_str();

        let response = self
            .http_client
            .post(self.base_address.clone())
            .json(request)
            .send()
            .await
            .map_err(|source| ClientRpcError::Http {
                method: method.to_string(),
                source,
            })?;

        let status = response.status();
        let content = response
            .text()
            .await
            .map_err(|source| ClientRpcError::Http {
                method: method.to_string(),
                source,
            })?;

        // Tendermint answers RPC errors with a 500 and a JSON-RPC body, so the
        // body wins over the status whenever it parses.
        let envelope: RpcResponse = match serde_json::from_str(&content) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ClientRpcError::Status {
                    method: method.to_string(),
                    status: status.as_u16(),
                })
            }
            Err(err) => return Err(ClientRpcError::decode(format!("{method} response"), err)),
        };

        envelope.into_result(method)
    }

    // Info methods

    /// Node status, including the latest block height
    pub async fn status(&self) -> Result<RpcStatus, ClientRpcError> {
        self.call("status", json!({})).await
    }

    /// Block metadata for heights in `[min_height, max_height]`, most recent
    /// first. The node caps the page at 20 entries and treats zero bounds as
    /// "unbounded".
    pub async fn blockchain(
        &self,
        min_height: u64,
        max_height: u64,
    ) -> Result<RpcBlockchainInfo, ClientRpcError> {
        self.call(
            "blockchain",
            json!({
                "minHeight": min_height.to_string(),
                "maxHeight": max_height.to_string(),
            }),
        )
        .await
    }

    /// Execution results of the transactions in the block at `height`
    pub async fn block_results(&self, height: u64) -> Result<RpcBlockResults, ClientRpcError> {
        self.call("block_results", json!({ "height": height.to_string() }))
            .await
    }

    /// One page of the validator set at `height`. Pages start at 1.
    pub async fn validators(
        &self,
        height: u64,
        page: u32,
        per_page: u32,
    ) -> Result<RpcValidatorSet, ClientRpcError> {
        self.call(
            "validators",
            json!({
                "height": height.to_string(),
                "page": page.to_string(),
                "per_page": per_page.to_string(),
            }),
        )
        .await
    }

    /// The complete validator set at `height`, in the order the node returns it.
    pub async fn validators_all(&self, height: u64) -> Result<Vec<RpcValidator>, ClientRpcError> {
        let mut validators = Vec::new();
        let mut page = 1u32;

        loop {
            let set = self.validators(height, page, VALIDATORS_PER_PAGE).await?;
            let received = set.validators.len();
            validators.extend(set.validators);

            if received == 0 || validators.len() as u64 >= set.total {
                break;
            }
            page += 1;
        }

        Ok(validators)
    }

    // ABCI methods

    /// Runs an ABCI query against the application. A non-zero response code
    /// is reported as [`ClientRpcError::AbciQuery`].
    pub async fn abci_query(
        &self,
        path: &str,
        data: &[u8],
        height: Option<u64>,
    ) -> Result<RpcAbciResponse, ClientRpcError> {
        let mut params = Map::new();
        params.insert("path".to_string(), Value::String(path.to_string()));
        params.insert("data".to_string(), Value::String(hex::encode(data)));
        params.insert("prove".to_string(), Value::Bool(false));
        if let Some(height) = height {
            params.insert("height".to_string(), Value::String(height.to_string()));
        }

        let query: RpcAbciQuery = self.call("abci_query", Value::Object(params)).await?;
        let response = query.response;
        if response.code != 0 {
            return Err(ClientRpcError::AbciQuery {
                path: path.to_string(),
                code: response.code,
                log: response.log,
            });
        }
        Ok(response)
    }

    /// One page of staking validators with the given bond status.
    ///
    /// `key` is the continuation cursor of the previous page, `None` for the
    /// first one.
    pub async fn staking_validators(
        &self,
        status: &str,
        key: Option<&[u8]>,
        limit: u64,
    ) -> Result<QueryValidatorsResponse, ClientRpcError> {
        let request = QueryValidatorsRequest {
            status: status.to_string(),
            pagination: Some(PageRequest {
                key: key.map(<[u8]>::to_vec).unwrap_or_default(),
                limit,
                ..Default::default()
            }),
        };

        let response = self
            .abci_query(VALIDATORS_QUERY_PATH, &request.encode_to_vec(), None)
            .await?;
        let payload = response.value_bytes()?;
        QueryValidatorsResponse::decode(payload.as_slice())
            .map_err(|err| ClientRpcError::decode("QueryValidatorsResponse", err))
    }
}
