//! Fixed demo dataset served through the same provider traits as the live adapters.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::{ActivityProvider, BalanceProvider, ProviderError, YieldCatalog};
use crate::models::{BalanceRecord, ChainId, TransactionRecord, TxKind, YieldPool};

const MS_PER_HOUR: i64 = 3_600_000;

/// (chain, symbol, amount as mantissa, scale)
const SAMPLE_BALANCES: [(ChainId, &str, i64, u32); 4] = [
    (ChainId::Ethereum, "USDC", 12_300, 0),
    (ChainId::Ethereum, "ETH", 85, 1),
    (ChainId::Base, "ETH", 5, 1),
    (ChainId::Arbitrum, "USDT", 5_400, 0),
];

#[derive(Debug, Clone, Copy)]
enum Direction {
    Out,
    In,
    Call,
}

struct SampleTx {
    chain: ChainId,
    hours_ago: i64,
    direction: Direction,
    /// Value in milli-ETH.
    value_milli: i64,
    gas_used: i64,
    gas_price_gwei: i64,
    counterparty: &'static str,
}

const SAMPLE_TXS: [SampleTx; 12] = [
    SampleTx { chain: ChainId::Ethereum, hours_ago: 1, direction: Direction::Out, value_milli: 50, gas_used: 21_000, gas_price_gwei: 20, counterparty: "0x87d29c6206e89b6d7e1f4f3c92bfd7d21e3c3456" },
    SampleTx { chain: ChainId::Ethereum, hours_ago: 5, direction: Direction::In, value_milli: 150, gas_used: 21_000, gas_price_gwei: 22, counterparty: "0x1a2b3c4d5e6f7890123456789abcdef012345678" },
    SampleTx { chain: ChainId::Base, hours_ago: 18, direction: Direction::Call, value_milli: 0, gas_used: 85_000, gas_price_gwei: 25, counterparty: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48" },
    SampleTx { chain: ChainId::Ethereum, hours_ago: 48, direction: Direction::In, value_milli: 250, gas_used: 21_000, gas_price_gwei: 18, counterparty: "0x9f8e7d6c5b4a39281726354abcdef01234567890" },
    SampleTx { chain: ChainId::Ethereum, hours_ago: 72, direction: Direction::Out, value_milli: 80, gas_used: 21_000, gas_price_gwei: 30, counterparty: "0x742d35cc6634c0532925a3b844bc9e7595f0beb0" },
    SampleTx { chain: ChainId::Arbitrum, hours_ago: 96, direction: Direction::Call, value_milli: 0, gas_used: 95_000, gas_price_gwei: 28, counterparty: "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc" },
    SampleTx { chain: ChainId::Base, hours_ago: 120, direction: Direction::In, value_milli: 120, gas_used: 21_000, gas_price_gwei: 19, counterparty: "0xabcdef0123456789abcdef0123456789abcdef01" },
    SampleTx { chain: ChainId::Ethereum, hours_ago: 144, direction: Direction::Out, value_milli: 30, gas_used: 21_000, gas_price_gwei: 27, counterparty: "0x90f79bf6eb2c4f870365e785982e1f101e93b906" },
    SampleTx { chain: ChainId::Ethereum, hours_ago: 168, direction: Direction::In, value_milli: 200, gas_used: 21_000, gas_price_gwei: 21, counterparty: "0x234567890abcdef1234567890abcdef123456789" },
    SampleTx { chain: ChainId::Base, hours_ago: 192, direction: Direction::Call, value_milli: 0, gas_used: 72_000, gas_price_gwei: 24, counterparty: "0x5fbdb2315678afecb367f032d93f642f64180aa3" },
    SampleTx { chain: ChainId::Arbitrum, hours_ago: 960, direction: Direction::In, value_milli: 180, gas_used: 21_000, gas_price_gwei: 23, counterparty: "0xcdef0123456789abcdef0123456789abcdef0123" },
    SampleTx { chain: ChainId::Ethereum, hours_ago: 2_088, direction: Direction::In, value_milli: 500, gas_used: 21_000, gas_price_gwei: 35, counterparty: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8" },
];

/// (protocol, chain, symbol, apy × 10, tvl in millions)
const SAMPLE_POOLS: [(&str, ChainId, &str, i64, i64); 9] = [
    ("aave-v3", ChainId::Base, "USDC", 142, 45),
    ("compound-v3", ChainId::Base, "USDC", 128, 28),
    ("aave-v3", ChainId::Base, "USDT", 112, 12),
    ("aave-v3", ChainId::Arbitrum, "USDC", 94, 60),
    ("compound-v3", ChainId::Arbitrum, "USDT", 81, 18),
    ("aave-v3", ChainId::Base, "ETH", 41, 90),
    ("compound-v3", ChainId::Arbitrum, "ETH", 39, 55),
    ("aave-v3", ChainId::Ethereum, "USDC", 52, 800),
    ("curve-dex", ChainId::Ethereum, "DAI", 65, 120),
];

/// Built-in yield pools, also the fallback when the live catalog has never loaded.
pub fn sample_pools() -> Vec<YieldPool> {
    SAMPLE_POOLS
        .iter()
        .map(|&(protocol, chain, symbol, apy_tenths, tvl_millions)| YieldPool {
            protocol_name: protocol.to_string(),
            chain_id: chain,
            asset_symbol: symbol.to_string(),
            apy: Decimal::new(apy_tenths, 1),
            tvl_usd: Decimal::from(tvl_millions * 1_000_000),
            pool_id: format!("sample-{}-{}-{}", protocol, chain.slug(), symbol.to_lowercase()),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SampleBalances {
    eth_price_usd: Decimal,
}

impl SampleBalances {
    pub fn new(eth_price_usd: Decimal) -> Self {
        Self { eth_price_usd }
    }
}

#[async_trait]
impl BalanceProvider for SampleBalances {
    fn name(&self) -> &'static str {
        "sample"
    }

    async fn get_balances(&self, _address: &str, chain: ChainId) -> Result<Vec<BalanceRecord>, ProviderError> {
        Ok(SAMPLE_BALANCES
            .iter()
            .filter(|(c, ..)| *c == chain)
            .map(|&(c, symbol, mantissa, scale)| {
                BalanceRecord::valued(c, symbol, Decimal::new(mantissa, scale), self.eth_price_usd)
            })
            .collect())
    }
}

/// Sample history anchored to the time of the call, so recency stays stable.
#[derive(Debug, Clone, Default)]
pub struct SampleActivity;

#[async_trait]
impl ActivityProvider for SampleActivity {
    fn name(&self) -> &'static str {
        "sample"
    }

    async fn get_transactions(
        &self,
        address: &str,
        chain: ChainId,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, ProviderError> {
        let now_ms = Utc::now().timestamp_millis();
        Ok(SAMPLE_TXS
            .iter()
            .enumerate()
            .filter(|(_, tx)| tx.chain == chain)
            .take(limit as usize)
            .map(|(i, tx)| sample_record(i, tx, address, now_ms))
            .collect())
    }
}

fn sample_record(index: usize, tx: &SampleTx, address: &str, now_ms: i64) -> TransactionRecord {
    let (from, to, input) = match tx.direction {
        Direction::Out => (address, tx.counterparty, "0x"),
        Direction::In => (tx.counterparty, address, "0x"),
        Direction::Call => (address, tx.counterparty, "0x095ea7b3"),
    };

    TransactionRecord {
        hash: format!("0x{:064x}", 0xa1b2_c3d4_u64 + index as u64),
        chain_id: tx.chain,
        from: from.to_string(),
        to: to.to_string(),
        value_native: Decimal::new(tx.value_milli, 3),
        timestamp_ms: now_ms - tx.hours_ago * MS_PER_HOUR,
        kind: TxKind::classify(from, to, input, address),
        is_error: false,
        gas_used_native: Decimal::new(tx.gas_used * tx.gas_price_gwei, 9),
        input: input.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct SampleCatalog;

#[async_trait]
impl YieldCatalog for SampleCatalog {
    fn name(&self) -> &'static str {
        "sample"
    }

    async fn get_all_pools(&self) -> Result<Vec<YieldPool>, ProviderError> {
        Ok(sample_pools())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb1";

    #[tokio::test]
    async fn test_sample_balances_per_chain() {
        let provider = SampleBalances::new(Decimal::from(2000));
        let eth = provider.get_balances(WALLET, ChainId::Ethereum).await.unwrap();
        assert_eq!(eth.len(), 2);
        let native = eth.iter().find(|b| b.is_native()).unwrap();
        assert_eq!(native.amount, Decimal::new(85, 1));
        assert_eq!(native.valuation_usd, Decimal::from(17_000));

        let arb = provider.get_balances(WALLET, ChainId::Arbitrum).await.unwrap();
        assert_eq!(arb[0].asset_symbol, "USDT");
    }

    #[tokio::test]
    async fn test_sample_activity_classified_from_wallet_view() {
        let provider = SampleActivity;
        let txs = provider.get_transactions(WALLET, ChainId::Base, 50).await.unwrap();
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[0].kind, TxKind::Contract);
        assert!(txs[0].is_contract_interaction());
        assert_eq!(txs[1].kind, TxKind::Received);

        let limited = provider.get_transactions(WALLET, ChainId::Ethereum, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_sample_pools_are_well_formed() {
        let pools = sample_pools();
        assert_eq!(pools.len(), SAMPLE_POOLS.len());
        let best = pools.iter().max_by_key(|p| p.apy).unwrap();
        assert_eq!(best.apy, Decimal::new(142, 1));
        assert_eq!(best.chain_id, ChainId::Base);
    }
}
