//! Deploy contracts to Casper livenet/testnet using Odra livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000

use odra::casper_types::U256;
use odra::host::Deployer;
use odra::prelude::*;

use arsx_contracts::collateral_token::{CollateralToken, CollateralTokenInitArgs};
use arsx_contracts::directory::{
    CapabilityDirectory, CapabilityDirectoryInitArgs, ROLE_BURNER, ROLE_MINTER,
    ROLE_PRICE_UPDATER, ROLE_RISK_ADMIN,
};
use arsx_contracts::engine::{ArsxEngine, ArsxEngineInitArgs};
use arsx_contracts::oracle::{PriceFeed, PriceFeedInitArgs};
use arsx_contracts::psm::{PegStabilityModule, PegStabilityModuleInitArgs};
use arsx_contracts::token::{ArsxToken, ArsxTokenInitArgs};

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== ARSX Protocol Livenet Deployment ===");
    println!();

    // Initialize Odra livenet environment
    let env = odra_casper_livenet_env::env();

    // Configure payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount: u64 = std::env::var("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(200_000_000_000);
    env.set_gas(payment_amount);

    // Get deployer address
    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);
    println!();

    // Initial rates, 1e8 scale
    let weth_usd_rate = U256::from(2_000u64) * U256::from(10u64).pow(U256::from(8u64)); // $2000
    let peso_usd_rate = U256::from(10u64).pow(U256::from(5u64)); // $0.001

    // ==================== Phase 1: Directory ====================
    println!("=== Phase 1: Deploying Capability Directory ===");
    println!();

    println!("Deploying CapabilityDirectory...");
    let mut directory = CapabilityDirectory::deploy(
        &env,
        CapabilityDirectoryInitArgs {
            initial_admin: deployer,
        },
    );
    let directory_addr = directory.address().clone();
    println!("CapabilityDirectory deployed at: {:?}", directory_addr);

    println!();

    // ==================== Phase 2: Feeds and Tokens ====================
    println!("=== Phase 2: Deploying Price Feeds and Tokens ===");
    println!();

    println!("Deploying PriceFeed (WETH/USD)...");
    let weth_feed = PriceFeed::deploy(
        &env,
        PriceFeedInitArgs {
            directory: directory_addr,
            initial_rate: weth_usd_rate,
        },
    );
    let weth_feed_addr = weth_feed.address().clone();
    println!("PriceFeed (WETH/USD) deployed at: {:?}", weth_feed_addr);

    println!("Deploying PriceFeed (ARS/USD)...");
    let peso_feed = PriceFeed::deploy(
        &env,
        PriceFeedInitArgs {
            directory: directory_addr,
            initial_rate: peso_usd_rate,
        },
    );
    let peso_feed_addr = peso_feed.address().clone();
    println!("PriceFeed (ARS/USD) deployed at: {:?}", peso_feed_addr);

    println!("Deploying CollateralToken (WETH)...");
    let weth = CollateralToken::deploy(
        &env,
        CollateralTokenInitArgs {
            name: String::from("Wrapped Ether"),
            symbol: String::from("WETH"),
            decimals: 18,
        },
    );
    let weth_addr = weth.address().clone();
    println!("CollateralToken (WETH) deployed at: {:?}", weth_addr);

    println!("Deploying ArsxToken...");
    let arsx = ArsxToken::deploy(
        &env,
        ArsxTokenInitArgs {
            directory: directory_addr,
        },
    );
    let arsx_addr = arsx.address().clone();
    println!("ArsxToken deployed at: {:?}", arsx_addr);

    println!();

    // ==================== Phase 3: Engine and PSM ====================
    println!("=== Phase 3: Deploying Engine and Peg Stability Module ===");
    println!();

    println!("Deploying ArsxEngine...");
    let engine = ArsxEngine::deploy(
        &env,
        ArsxEngineInitArgs {
            directory: directory_addr,
            arsx_token: arsx_addr,
            peso_usd_feed: peso_feed_addr,
            collateral_tokens: vec![weth_addr],
            price_feeds: vec![weth_feed_addr],
        },
    );
    let engine_addr = engine.address().clone();
    println!("ArsxEngine deployed at: {:?}", engine_addr);

    println!("Deploying PegStabilityModule...");
    let psm = PegStabilityModule::deploy(
        &env,
        PegStabilityModuleInitArgs {
            directory: directory_addr,
            arsx_token: arsx_addr,
            collateral_token: weth_addr,
            collateral_feed: weth_feed_addr,
            peso_usd_feed: peso_feed_addr,
        },
    );
    let psm_addr = psm.address().clone();
    println!("PegStabilityModule deployed at: {:?}", psm_addr);

    println!();

    // ==================== Phase 4: Role Grants ====================
    println!("=== Phase 4: Granting Capabilities ===");
    println!();

    println!("Granting minter/burner to ArsxEngine...");
    directory.grant_role(ROLE_MINTER, engine_addr);
    directory.grant_role(ROLE_BURNER, engine_addr);
    println!("Done.");

    println!("Granting minter/burner to PegStabilityModule...");
    directory.grant_role(ROLE_MINTER, psm_addr);
    directory.grant_role(ROLE_BURNER, psm_addr);
    println!("Done.");

    println!("Granting price-updater and risk-admin to deployer...");
    directory.grant_role(ROLE_PRICE_UPDATER, deployer);
    directory.grant_role(ROLE_RISK_ADMIN, deployer);
    println!("Done.");

    println!();
    println!("=== Deployment Complete ===");
    println!();
    println!("Contract Addresses:");
    println!("  CapabilityDirectory: {:?}", directory_addr);
    println!("  PriceFeed WETH/USD:  {:?}", weth_feed_addr);
    println!("  PriceFeed ARS/USD:   {:?}", peso_feed_addr);
    println!("  CollateralToken:     {:?}", weth_addr);
    println!("  ArsxToken:           {:?}", arsx_addr);
    println!("  ArsxEngine:          {:?}", engine_addr);
    println!("  PegStabilityModule:  {:?}", psm_addr);
}
