use async_trait::async_trait;
use reqwest::Client;

use super::types::{ExplorerEnvelope, ExplorerTx};
use super::units::{parse_dec_u256, units_to_decimal, WEI_DECIMALS};
use super::{ActivityProvider, ProviderError};
use crate::models::{ChainId, TransactionRecord, TxKind};

const ETHERSCAN_V2_BASE: &str = "https://api.etherscan.io/v2/api";

/// Activity provider backed by the Etherscan multichain `txlist` endpoint.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: ETHERSCAN_V2_BASE.into(),
            api_key,
        }
    }

    fn txlist_url(&self, address: &str, chain: ChainId, limit: u32) -> String {
        let mut url = format!(
            "{}?chainid={}&module=account&action=txlist&address={}&startblock=0&endblock=99999999&page=1&offset={}&sort=desc",
            self.base_url,
            chain.numeric_id(),
            address,
            limit,
        );
        if let Some(key) = &self.api_key {
            url.push_str("&apikey=");
            url.push_str(key);
        }
        url
    }
}

#[async_trait]
impl ActivityProvider for EtherscanClient {
    fn name(&self) -> &'static str {
        "etherscan"
    }

    async fn get_transactions(
        &self,
        address: &str,
        chain: ChainId,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, ProviderError> {
        let envelope: ExplorerEnvelope = self
            .http
            .get(self.txlist_url(address, chain, limit))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let txs = parse_txlist(envelope)?;
        let records = txs
            .iter()
            .filter_map(|tx| match to_record(tx, chain, address) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::debug!(chain = %chain, hash = %tx.hash, error = %e, "Skipping malformed transaction");
                    None
                }
            })
            .collect();

        Ok(records)
    }
}

/// Unwrap the explorer envelope. "No transactions found" is an empty list, not an error.
pub fn parse_txlist(envelope: ExplorerEnvelope) -> Result<Vec<ExplorerTx>, ProviderError> {
    if envelope.status == "1" {
        return serde_json::from_value(envelope.result)
            .map_err(|e| ProviderError::Unexpected(format!("txlist payload: {e}")));
    }

    if envelope.message.to_lowercase().contains("no transactions") {
        return Ok(Vec::new());
    }

    let detail = envelope
        .result
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| envelope.message.clone());
    Err(ProviderError::Rpc(detail))
}

/// Normalize one explorer transaction into a `TransactionRecord`.
pub fn to_record(tx: &ExplorerTx, chain: ChainId, wallet: &str) -> Result<TransactionRecord, ProviderError> {
    let timestamp_secs: i64 = tx
        .time_stamp
        .trim()
        .parse()
        .map_err(|_| ProviderError::Unexpected(format!("bad timestamp {}", tx.time_stamp)))?;

    let gas_used = parse_dec_u256(&tx.gas_used)?;
    let gas_price = parse_dec_u256(&tx.gas_price)?;
    let gas_wei = gas_used
        .checked_mul(gas_price)
        .ok_or_else(|| ProviderError::Unexpected("gas cost overflow".into()))?;

    Ok(TransactionRecord {
        hash: tx.hash.clone(),
        chain_id: chain,
        from: tx.from.clone(),
        to: tx.to.clone(),
        value_native: units_to_decimal(parse_dec_u256(&tx.value)?, WEI_DECIMALS)?,
        timestamp_ms: timestamp_secs * 1000,
        kind: TxKind::classify(&tx.from, &tx.to, &tx.input, wallet),
        is_error: tx.is_error == "1",
        gas_used_native: units_to_decimal(gas_wei, WEI_DECIMALS)?,
        input: tx.input.clone(),
    })
}
