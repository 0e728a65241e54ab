use rust_decimal::Decimal;

/// A lending/liquidity protocol the catalog is filtered to.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolInfo {
    pub name: &'static str,
    pub short_name: &'static str,
    /// 0–10 safety rating.
    pub safety_score: Decimal,
}

pub const KNOWN_PROTOCOLS: [ProtocolInfo; 3] = [
    ProtocolInfo {
        name: "Aave V3",
        short_name: "aave",
        safety_score: Decimal::from_parts(90, 0, 0, false, 1),
    },
    ProtocolInfo {
        name: "Compound V3",
        short_name: "compound",
        safety_score: Decimal::from_parts(85, 0, 0, false, 1),
    },
    ProtocolInfo {
        name: "Curve Finance",
        short_name: "curve",
        safety_score: Decimal::from_parts(88, 0, 0, false, 1),
    },
];

/// Safety score for protocols outside the registry.
pub const UNKNOWN_PROTOCOL_SAFETY: Decimal = Decimal::from_parts(70, 0, 0, false, 1);

/// Registry lookup by case-insensitive substring, e.g. "aave-v3" → Aave V3.
pub fn lookup_protocol(protocol: &str) -> Option<&'static ProtocolInfo> {
    let needle = protocol.to_lowercase();
    KNOWN_PROTOCOLS
        .iter()
        .find(|p| needle.contains(p.short_name))
}

pub fn safety_score_for(protocol: &str) -> Decimal {
    lookup_protocol(protocol)
        .map(|p| p.safety_score)
        .unwrap_or(UNKNOWN_PROTOCOL_SAFETY)
}

/// Human name for a catalog project slug, falling back to the slug itself.
pub fn display_name_for(protocol: &str) -> String {
    lookup_protocol(protocol)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| protocol.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_catalog_slug() {
        assert_eq!(lookup_protocol("aave-v3").map(|p| p.name), Some("Aave V3"));
        assert_eq!(lookup_protocol("Compound-V3").map(|p| p.name), Some("Compound V3"));
        assert!(lookup_protocol("lido").is_none());
    }

    #[test]
    fn test_safety_scores() {
        assert_eq!(safety_score_for("aave-v3"), Decimal::from(9));
        assert_eq!(safety_score_for("curve-dex"), Decimal::new(88, 1));
        assert_eq!(safety_score_for("unknown-farm"), Decimal::from(7));
    }
}
