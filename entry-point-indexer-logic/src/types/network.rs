use alloy::primitives::ChainId;

const NETWORKS: &[(ChainId, &str)] = &[
    (1, "mainnet"),
    (5, "goerli"),
    (137, "matic"),
    (80001, "mumbai"),
    (42161, "arbitrum-one"),
    (421613, "arbitrum-goerli"),
    (10, "optimism"),
    (420, "optimism-goerli"),
    (250, "fantom"),
    (4002, "fantom-test"),
    (43114, "avalanche"),
    (43113, "avalanche-test"),
    (100, "gnosis"),
    (56, "bsc"),
    (97, "bsc-test"),
];

pub fn network_name(chain_id: ChainId) -> Option<&'static str> {
    NETWORKS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| *name)
}
