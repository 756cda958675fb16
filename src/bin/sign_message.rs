use authority_relay::crypto::key_source::{self, FileKeySource, KeySource};
use authority_relay::infra::config;
use authority_relay::{recover_address, sign_message, to_checksum_address};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin sign_message -- [MESSAGE] [--key-file PATH] [--verify]\n\
         \n\
         Prints 0x<keccak(hex(message))><v><r><s>.\n\
         \n\
         The private key is read from SIGNER_KEY_FILE or SIGNER_PRIVATE_KEY\n\
         unless --key-file is given. MESSAGE defaults to SIGN_MESSAGE or \"Hello World\".\n"
    );
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let mut message: Option<String> = None;
    let mut key_file: Option<String> = None;
    let mut verify = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => usage_and_exit(),
            "--verify" => verify = true,
            "--key-file" => match args.next() {
                Some(path) => key_file = Some(path),
                None => usage_and_exit(),
            },
            other if message.is_none() => message = Some(other.to_string()),
            _ => usage_and_exit(),
        }
    }

    let source: Box<dyn KeySource> = match key_file {
        Some(path) => Box::new(FileKeySource::new(&path)),
        None => key_source::from_config(),
    };
    let key = source
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load signer key ({}): {}", source.describe(), e))?;

    let message = message.unwrap_or_else(config::message_to_sign);
    let signed = sign_message(&message, &key)?;
    println!("{}", signed);

    if verify {
        let signer = recover_address(&signed.digest, &signed.signature)?;
        println!("{}", to_checksum_address(&signer));
    }

    Ok(())
}
