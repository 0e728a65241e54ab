use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{RpcRequest, RpcResponse, TokenBalancesResult};
use super::units::{hex_to_decimal, WEI_DECIMALS};
use super::{BalanceProvider, ProviderError};
use crate::models::{BalanceRecord, ChainId};

/// Balance provider backed by Alchemy's JSON-RPC endpoints.
#[derive(Debug, Clone)]
pub struct AlchemyClient {
    http: Client,
    api_key: String,
    eth_price_usd: Decimal,
}

impl AlchemyClient {
    pub fn new(http: Client, api_key: String, eth_price_usd: Decimal) -> Self {
        Self {
            http,
            api_key,
            eth_price_usd,
        }
    }

    fn rpc_url(&self, chain: ChainId) -> String {
        let network = match chain {
            ChainId::Ethereum => "eth-mainnet",
            ChainId::Base => "base-mainnet",
            ChainId::Arbitrum => "arb-mainnet",
        };
        format!("https://{}.g.alchemy.com/v2/{}", network, self.api_key)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        chain: ChainId,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("ALCHEMY_API_KEY".into()));
        }

        let resp: RpcResponse<T> = self
            .http
            .post(self.rpc_url(chain))
            .json(&RpcRequest::new(1, method, params))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = resp.error {
            return Err(ProviderError::Rpc(format!("{} ({})", err.message, err.code)));
        }
        resp.result
            .ok_or_else(|| ProviderError::Unexpected(format!("{method}: empty result")))
    }

    /// Native ETH balance on one chain.
    pub async fn get_native_balance(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Option<BalanceRecord>, ProviderError> {
        let hex: String = self
            .call(chain, "eth_getBalance", json!([address, "latest"]))
            .await?;
        let amount = hex_to_decimal(&hex, WEI_DECIMALS)?;

        if amount.is_zero() {
            return Ok(None);
        }
        Ok(Some(BalanceRecord::valued(
            chain,
            chain.native_symbol(),
            amount,
            self.eth_price_usd,
        )))
    }

    /// Stablecoin balances on one chain.
    pub async fn get_token_balances(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Vec<BalanceRecord>, ProviderError> {
        let contracts: Vec<&str> = chain.token_contracts().iter().map(|t| t.address).collect();
        if contracts.is_empty() {
            return Ok(Vec::new());
        }

        let result: TokenBalancesResult = self
            .call(chain, "alchemy_getTokenBalances", json!([address, contracts]))
            .await?;

        Ok(parse_token_balances(chain, &result, self.eth_price_usd))
    }
}

#[async_trait]
impl BalanceProvider for AlchemyClient {
    fn name(&self) -> &'static str {
        "alchemy"
    }

    async fn get_balances(
        &self,
        address: &str,
        chain: ChainId,
    ) -> Result<Vec<BalanceRecord>, ProviderError> {
        let (tokens, native) = tokio::join!(
            self.get_token_balances(address, chain),
            self.get_native_balance(address, chain),
        );

        let mut balances = tokens?;
        match native {
            Ok(Some(eth)) => balances.push(eth),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(chain = %chain, error = %e, "Native balance lookup failed");
            }
        }
        Ok(balances)
    }
}

/// Match `alchemy_getTokenBalances` entries to the chain's known contracts,
/// dropping zero balances. An entry that cannot be decoded is skipped on its own.
pub fn parse_token_balances(
    chain: ChainId,
    result: &TokenBalancesResult,
    eth_price_usd: Decimal,
) -> Vec<BalanceRecord> {
    let mut balances = Vec::new();

    for entry in &result.token_balances {
        let Some(token) = chain
            .token_contracts()
            .iter()
            .find(|t| t.address.eq_ignore_ascii_case(&entry.contract_address))
        else {
            continue;
        };

        let raw = entry.token_balance.as_deref().unwrap_or("0x0");
        let amount = match hex_to_decimal(raw, token.decimals) {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(chain = %chain, token = token.symbol, error = %e, "Skipping undecodable token balance");
                continue;
            }
        };
        if amount > Decimal::ZERO {
            balances.push(BalanceRecord::valued(chain, token.symbol, amount, eth_price_usd));
        }
    }

    balances
}
