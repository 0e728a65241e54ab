use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::ChainId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Sent,
    Received,
    Contract,
    #[serde(rename = "self")]
    SelfTransfer,
    Unknown,
}

impl TxKind {
    /// Classify a transaction from the wallet's point of view.
    pub fn classify(from: &str, to: &str, input: &str, wallet: &str) -> Self {
        let from_wallet = from.eq_ignore_ascii_case(wallet);
        let to_wallet = to.eq_ignore_ascii_case(wallet);

        match (from_wallet, to_wallet) {
            (true, true) => TxKind::SelfTransfer,
            (true, false) if is_call_payload(input) => TxKind::Contract,
            (true, false) => TxKind::Sent,
            (false, true) => TxKind::Received,
            (false, false) => TxKind::Unknown,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxKind::Sent => "sent",
            TxKind::Received => "received",
            TxKind::Contract => "contract",
            TxKind::SelfTransfer => "self",
            TxKind::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Provider-agnostic transaction. `hash` is unique per chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub chain_id: ChainId,
    pub from: String,
    pub to: String,
    pub value_native: Decimal,
    pub timestamp_ms: i64,
    pub kind: TxKind,
    pub is_error: bool,
    /// gasUsed × gasPrice, already converted to native units.
    pub gas_used_native: Decimal,
    /// Raw call data; "0x" or empty for plain value transfers.
    #[serde(default)]
    pub input: String,
}

impl TransactionRecord {
    /// True when the payload carries call data rather than a pure value transfer.
    pub fn is_contract_interaction(&self) -> bool {
        is_call_payload(&self.input)
    }

    /// Merge ordering: newest first, ties broken by chain priority, then hash.
    pub fn merge_order(a: &Self, b: &Self) -> Ordering {
        b.timestamp_ms
            .cmp(&a.timestamp_ms)
            .then_with(|| a.chain_id.cmp(&b.chain_id))
            .then_with(|| a.hash.cmp(&b.hash))
    }
}

fn is_call_payload(input: &str) -> bool {
    let input = input.trim();
    !input.is_empty() && input != "0x" && input.len() > 2
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0xAbC0000000000000000000000000000000000001";

    #[test]
    fn test_classify_directions() {
        let other = "0x9999999999999999999999999999999999999999";
        let wallet_lower = WALLET.to_lowercase();

        assert_eq!(TxKind::classify(WALLET, &wallet_lower, "0x", WALLET), TxKind::SelfTransfer);
        assert_eq!(TxKind::classify(WALLET, other, "0x", WALLET), TxKind::Sent);
        assert_eq!(TxKind::classify(WALLET, other, "0xa9059cbb", WALLET), TxKind::Contract);
        assert_eq!(TxKind::classify(other, WALLET, "0xa9059cbb", WALLET), TxKind::Received);
        assert_eq!(TxKind::classify(other, other, "0x", WALLET), TxKind::Unknown);
    }

    #[test]
    fn test_payload_detection() {
        assert!(!is_call_payload(""));
        assert!(!is_call_payload("0x"));
        assert!(is_call_payload("0x095ea7b3"));
    }

    #[test]
    fn test_self_kind_serializes_as_self() {
        let json = serde_json::to_string(&TxKind::SelfTransfer).unwrap();
        assert_eq!(json, "\"self\"");
    }
}
