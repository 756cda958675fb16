use authority_relay::domain::authority::ADD_AUTHORITY_NODE;
use authority_relay::ethereum::NodeRpc;
use authority_relay::infra::config;
use authority_relay::{ContractHandle, EthClient};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads env vars (all optional):\n\
           ETH_RPC_URL, CONTRACT_ADDRESS, CONTRACT_ARTIFACT, RELAY_MODE, RPC_TIMEOUT_SECS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if malformed)
    let rpc_url = config::rpc_url();
    let contract_address = config::contract_address();
    let artifact_path = config::contract_artifact_path();
    let mode = config::relay_mode()?;

    println!("> Preflight:");
    println!("  ETH_RPC_URL={}", rpc_url);
    println!("  CONTRACT_ADDRESS={}", contract_address);
    println!("  CONTRACT_ARTIFACT={}", artifact_path);
    println!("  RELAY_MODE={}", mode);

    // Same artifact and address the service binds at startup.
    let contract = ContractHandle::load(&artifact_path, &contract_address)?;
    let function = contract.function(ADD_AUTHORITY_NODE)?;
    println!(
        "  Contract: {} ({}), {} selector 0x{} ({})",
        contract.name(),
        contract.address_hex(),
        ADD_AUTHORITY_NODE,
        hex::encode(function.selector()),
        function.state_mutability.as_deref().unwrap_or("unspecified")
    );
    if function.is_read_only() {
        anyhow::bail!("{} is declared read-only in the artifact", ADD_AUTHORITY_NODE);
    }

    let client = EthClient::new(rpc_url, config::rpc_timeout()?)?;

    // Basic RPC connectivity
    if !client.is_listening().await? {
        anyhow::bail!("node is not listening");
    }
    let chain_id = client.chain_id().await?;
    println!("  Chain id: {}", chain_id);

    let accounts = client.accounts().await?;
    println!("  Accounts: {}", accounts.len());
    match accounts.first() {
        Some(first) => println!("  Sender (first account): {}", first.to_checksum(None)),
        None if mode == authority_relay::RelayMode::Commit => {
            anyhow::bail!("commit mode needs at least one node account")
        }
        None => println!("  Sender: none (diagnostic mode only)"),
    }

    let code = client.code_at(&contract.address()).await?;
    if code.is_empty() {
        anyhow::bail!("no contract code deployed at {}", contract.address_hex());
    }
    println!("  Deployed code: {} bytes", code.len());

    println!("> Preflight OK.");
    Ok(())
}
