//! Initial token set and pools of the PIOGOLD network.

use pioswap_domain::value_objects::Address;
use pioswap_ledger::pool_ledger::NewPool;
use pioswap_ledger::registry::NewToken;
use pioswap_ledger::{Ledger, LedgerError, LedgerResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

struct SeedToken {
    symbol: &'static str,
    name: &'static str,
    address: &'static str,
    decimals: u8,
    price: Decimal,
    price_change_24h: Decimal,
    is_native: bool,
    color: &'static str,
}

struct SeedPool {
    token0: &'static str,
    token1: &'static str,
    fee: Decimal,
    reserve0: Decimal,
    reserve1: Decimal,
}

const PIO: &str = "0x0000000000000000000000000000000000000000";
const WPIO: &str = "0x1111111111111111111111111111111111111111";
const USDT: &str = "0x2222222222222222222222222222222222222222";
const USDC: &str = "0x3333333333333333333333333333333333333333";
const PGOLD: &str = "0x4444444444444444444444444444444444444444";
const PETH: &str = "0x5555555555555555555555555555555555555555";
const PBTC: &str = "0x6666666666666666666666666666666666666666";
const PDAI: &str = "0x7777777777777777777777777777777777777777";

const TOKENS: [SeedToken; 8] = [
    SeedToken {
        symbol: "PIO",
        name: "PIOGOLD",
        address: PIO,
        decimals: 18,
        price: dec!(2.45),
        price_change_24h: dec!(3.24),
        is_native: true,
        color: "FFD700",
    },
    SeedToken {
        symbol: "WPIO",
        name: "Wrapped PIO",
        address: WPIO,
        decimals: 18,
        price: dec!(2.45),
        price_change_24h: dec!(3.24),
        is_native: false,
        color: "DAA520",
    },
    SeedToken {
        symbol: "USDT",
        name: "Tether USD",
        address: USDT,
        decimals: 6,
        price: dec!(1.00),
        price_change_24h: dec!(0.01),
        is_native: false,
        color: "26A17B",
    },
    SeedToken {
        symbol: "USDC",
        name: "USD Coin",
        address: USDC,
        decimals: 6,
        price: dec!(1.00),
        price_change_24h: dec!(0.00),
        is_native: false,
        color: "2775CA",
    },
    SeedToken {
        symbol: "PGOLD",
        name: "Pio Gold Token",
        address: PGOLD,
        decimals: 18,
        price: dec!(156.78),
        price_change_24h: dec!(-1.23),
        is_native: false,
        color: "B8860B",
    },
    SeedToken {
        symbol: "PETH",
        name: "Pio Ethereum",
        address: PETH,
        decimals: 18,
        price: dec!(2320.50),
        price_change_24h: dec!(0.58),
        is_native: false,
        color: "627EEA",
    },
    SeedToken {
        symbol: "PBTC",
        name: "Pio Bitcoin",
        address: PBTC,
        decimals: 8,
        price: dec!(67234.00),
        price_change_24h: dec!(1.85),
        is_native: false,
        color: "F7931A",
    },
    SeedToken {
        symbol: "PDAI",
        name: "Pio DAI",
        address: PDAI,
        decimals: 18,
        price: dec!(1.00),
        price_change_24h: dec!(0.06),
        is_native: false,
        color: "F4B731",
    },
];

const POOLS: [SeedPool; 5] = [
    SeedPool {
        token0: PIO,
        token1: USDT,
        fee: dec!(0.3),
        reserve0: dec!(500000),
        reserve1: dec!(1225000),
    },
    SeedPool {
        token0: PIO,
        token1: USDC,
        fee: dec!(0.3),
        reserve0: dec!(380000),
        reserve1: dec!(931000),
    },
    SeedPool {
        token0: PETH,
        token1: USDT,
        fee: dec!(0.3),
        reserve0: dec!(1200),
        reserve1: dec!(2784600),
    },
    SeedPool {
        token0: PBTC,
        token1: USDT,
        fee: dec!(0.05),
        reserve0: dec!(65),
        reserve1: dec!(4370210),
    },
    SeedPool {
        token0: PGOLD,
        token1: PIO,
        fee: dec!(1.0),
        reserve0: dec!(3000),
        reserve1: dec!(192000),
    },
];

/// What a seeding run added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub tokens: usize,
    pub pools: usize,
}

/// Registers the initial tokens and pools, skipping any already present,
/// then refreshes the protocol stats.
pub async fn seed(ledger: &Ledger) -> LedgerResult<SeedReport> {
    let mut report = SeedReport::default();

    for token in &TOKENS {
        let new = NewToken {
            address: Address::parse(token.address)?,
            symbol: token.symbol.to_string(),
            name: token.name.to_string(),
            decimals: token.decimals,
            logo: Some(format!(
                "https://api.dicebear.com/7.x/shapes/svg?seed={}&backgroundColor={}",
                token.symbol.to_lowercase(),
                token.color
            )),
            is_native: token.is_native,
            price: token.price,
            price_change_24h: token.price_change_24h,
        };
        match ledger.registry().register_token(new).await {
            Ok(_) => report.tokens += 1,
            Err(LedgerError::TokenAlreadyExists(address)) => {
                debug!(%address, "Token already seeded");
            }
            Err(err) => return Err(err),
        }
    }

    for pool in &POOLS {
        let new = NewPool::new(
            Address::parse(pool.token0)?,
            Address::parse(pool.token1)?,
            pool.fee,
        )
        .with_reserves(pool.reserve0, pool.reserve1);
        match ledger.pools().register_pool(new).await {
            Ok(_) => report.pools += 1,
            Err(LedgerError::PoolAlreadyExists) => {
                debug!(token0 = pool.token0, token1 = pool.token1, "Pool already seeded");
            }
            Err(err) => return Err(err),
        }
    }

    let stats = ledger.stats().refresh().await?;
    info!(
        tokens = report.tokens,
        pools = report.pools,
        tvl = %stats.tvl,
        "Seeding complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pioswap_data::MemoryStore;
    use pioswap_ledger::LedgerConfig;
    use std::sync::Arc;

    fn ledger() -> Ledger {
        Ledger::new(Arc::new(MemoryStore::new()), LedgerConfig::default())
    }

    #[tokio::test]
    async fn test_seed_registers_tokens_and_pools() {
        let ledger = ledger();
        let report = seed(&ledger).await.unwrap();
        assert_eq!(report, SeedReport { tokens: 8, pools: 5 });

        let usdt = ledger
            .registry()
            .get_token(&Address::parse(USDT).unwrap())
            .await
            .unwrap();
        assert_eq!(usdt.decimals, 6);

        let pool = ledger
            .pools()
            .find_pool_for_pair(
                &Address::parse(USDT).unwrap(),
                &Address::parse(PIO).unwrap(),
                Some(dec!(0.3)),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pool.tvl, dec!(2450000));
        assert_eq!(pool.apr, dec!(100));

        let stats = ledger.stats().get_stats().await.unwrap();
        assert_eq!(stats.tvl, dec!(19562360));
        assert_eq!(stats.active_pools, 5);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let ledger = ledger();
        seed(&ledger).await.unwrap();
        let again = seed(&ledger).await.unwrap();
        assert_eq!(again, SeedReport::default());
        assert_eq!(ledger.pools().list_pools(100).await.unwrap().len(), 5);
    }
}
