use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JSON-RPC (Alchemy)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u32,
    pub method: &'a str,
    pub params: serde_json::Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u32, method: &'a str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesResult {
    #[serde(default)]
    pub token_balances: Vec<ApiTokenBalance>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTokenBalance {
    pub contract_address: String,
    #[serde(default)]
    pub token_balance: Option<String>,
}

// ---------------------------------------------------------------------------
// Explorer txlist (Etherscan family)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// An array of transactions on success, an error string otherwise.
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTx {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub value: String,
    pub time_stamp: String,
    #[serde(default)]
    pub is_error: String,
    #[serde(default)]
    pub gas_used: String,
    #[serde(default)]
    pub gas_price: String,
    #[serde(default)]
    pub input: String,
}

// ---------------------------------------------------------------------------
// Yield catalog (DefiLlama /pools)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LlamaPoolsResponse {
    #[serde(default)]
    pub data: Option<Vec<LlamaPool>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlamaPool {
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub apy: Option<f64>,
    #[serde(default)]
    pub apy_base: Option<f64>,
    #[serde(default)]
    pub tvl_usd: Option<f64>,
}

// ---------------------------------------------------------------------------
// Remote scorer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub current_position: ScoreRequestPosition,
    pub target_opportunity: ScoreRequestTarget,
    pub bridge_cost: f64,
    pub gas_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequestPosition {
    pub chain: String,
    pub asset: String,
    pub amount: f64,
    pub current_apy: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequestTarget {
    pub protocol: String,
    pub chain: String,
    pub target_apy: f64,
    pub protocol_safety_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub score: f64,
    #[serde(default)]
    pub annual_gain: Option<f64>,
    /// Absent, null or non-finite means the costs are never recouped.
    #[serde(default)]
    pub breakeven: Option<f64>,
    #[serde(default)]
    pub costs: Option<ScoreResponseCosts>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchScoreRequest {
    pub opportunities: Vec<ScoreRequest>,
}

/// Results in request order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScoreResponse {
    #[serde(default)]
    pub scored_opportunities: Vec<ScoreResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponseCosts {
    pub bridge: f64,
    pub gas: f64,
    pub total: f64,
}
