//! SecureMessage CLI - Developer tool over the crypto core.
//!
//! All binary values are read and written as hex. Logs go to stderr and are
//! controlled with `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use securemessage_crypto::{
    self as crypto, EncType, KeyPair, KeyRef, PrivateKey, PublicKey, SecretKey,
    SigType,
};

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "securemessage")]
#[command(about = "SecureMessage crypto core - hash, derive, encrypt and sign from the shell")]
#[command(version)]
struct Cli {
    /// Treat positional data arguments as UTF-8 text instead of hex
    #[arg(long, global = true)]
    text: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash data
    Hash {
        /// Digest algorithm
        #[arg(long, value_enum, default_value = "sha256")]
        algorithm: HashAlgorithm,
        /// Data to hash
        data: String,
    },
    /// Generate random bytes
    Random {
        /// Number of bytes
        len: usize,
    },
    /// Derive a purpose-bound AES-256 key from a master key
    Derive {
        /// Master key (hex)
        #[arg(long, env = "SECUREMESSAGE_KEY")]
        key: String,
        /// Purpose label, e.g. SIG:1 or ENC:2
        #[arg(long)]
        purpose: String,
    },
    /// Encrypt data under a master key
    Encrypt {
        /// Master key (hex)
        #[arg(long, env = "SECUREMESSAGE_KEY")]
        key: String,
        /// Encryption type
        #[arg(long, default_value = "aes-256-cbc")]
        enc_type: EncType,
        /// IV (hex); a fresh one is generated when omitted
        #[arg(long)]
        iv: Option<String>,
        /// Plaintext
        data: String,
    },
    /// Decrypt data under a master key
    Decrypt {
        /// Master key (hex)
        #[arg(long, env = "SECUREMESSAGE_KEY")]
        key: String,
        /// Encryption type
        #[arg(long, default_value = "aes-256-cbc")]
        enc_type: EncType,
        /// IV (hex)
        #[arg(long)]
        iv: String,
        /// Ciphertext (hex)
        ciphertext: String,
    },
    /// Generate a key or key pair
    Keygen {
        /// Key type
        #[arg(value_enum)]
        algorithm: KeygenAlgorithm,
    },
    /// Sign data
    Sign {
        /// Signature type
        #[arg(long)]
        sig_type: SigType,
        /// Secret key for HMAC, DER private key otherwise (hex)
        #[arg(long, env = "SECUREMESSAGE_KEY")]
        key: String,
        /// Data to sign
        data: String,
    },
    /// Verify a signature
    Verify {
        /// Signature type
        #[arg(long)]
        sig_type: SigType,
        /// Secret key for HMAC, DER public key otherwise (hex)
        #[arg(long, env = "SECUREMESSAGE_KEY")]
        key: String,
        /// Signature (hex)
        #[arg(long)]
        signature: String,
        /// Signed data
        data: String,
    },
    /// List purpose labels for every algorithm
    Purposes,
}

#[derive(Clone, Copy, ValueEnum)]
enum HashAlgorithm {
    Sha256,
    Sha512,
}

#[derive(Clone, Copy, ValueEnum)]
enum KeygenAlgorithm {
    Aes256,
    EcP256,
    Rsa2048,
}

// ============================================================================
// Input Helpers
// ============================================================================

fn decode_hex(label: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).with_context(|| format!("{} is not valid hex", label))
}

fn decode_data(text: bool, value: &str) -> Result<Vec<u8>> {
    if text {
        Ok(value.as_bytes().to_vec())
    } else {
        decode_hex("data", value)
    }
}

fn secret_key(value: &str) -> Result<SecretKey> {
    SecretKey::from_bytes(&decode_hex("key", value)?).context("Invalid secret key")
}

// ============================================================================
// Command Handlers
// ============================================================================

fn cmd_hash(algorithm: HashAlgorithm, data: &[u8]) -> Result<()> {
    let digest = match algorithm {
        HashAlgorithm::Sha256 => crypto::sha256(data)?.to_vec(),
        HashAlgorithm::Sha512 => crypto::sha512(data)?.to_vec(),
    };
    println!("{}", hex::encode(digest));
    Ok(())
}

fn cmd_random(len: usize) -> Result<()> {
    println!("{}", hex::encode(crypto::secure_random(len)?));
    Ok(())
}

fn cmd_derive(key: &str, purpose: &str) -> Result<()> {
    let derived = crypto::derive_aes256_key_for(&secret_key(key)?, purpose)?;
    println!("{}", hex::encode(derived.as_bytes()));
    Ok(())
}

fn cmd_encrypt(key: &str, enc_type: EncType, iv: Option<&str>, plaintext: &[u8]) -> Result<()> {
    let iv = match iv {
        Some(iv) => decode_hex("iv", iv)?,
        None => crypto::generate_iv(enc_type)
            .with_context(|| format!("{} does not use an IV", enc_type))?
            .to_vec(),
    };

    let ciphertext = crypto::encrypt(&secret_key(key)?, enc_type, &iv, plaintext)?;

    println!("iv:         {}", hex::encode(&iv));
    println!("ciphertext: {}", hex::encode(ciphertext));
    Ok(())
}

fn cmd_decrypt(key: &str, enc_type: EncType, iv: &str, ciphertext: &str) -> Result<()> {
    let plaintext = crypto::decrypt(
        &secret_key(key)?,
        enc_type,
        &decode_hex("iv", iv)?,
        &decode_hex("ciphertext", ciphertext)?,
    )?;
    println!("{}", hex::encode(&*plaintext));
    Ok(())
}

fn cmd_keygen(algorithm: KeygenAlgorithm) -> Result<()> {
    let print_pair = |pair: KeyPair| {
        let (private, public) = pair.into_parts();
        println!("private: {}", hex::encode(private.as_bytes()));
        println!("public:  {}", hex::encode(public.as_bytes()));
    };

    match algorithm {
        KeygenAlgorithm::Aes256 => {
            let key = crypto::generate_aes256_secret_key();
            println!("secret:  {}", hex::encode(key.as_bytes()));
        },
        KeygenAlgorithm::EcP256 => print_pair(crypto::generate_ec_p256_key_pair()?),
        KeygenAlgorithm::Rsa2048 => {
            tracing::info!("Generating RSA-2048 key pair, this may take a moment");
            print_pair(crypto::generate_rsa2048_key_pair()?)
        },
    }

    Ok(())
}

fn cmd_sign(sig_type: SigType, key: &str, data: &[u8]) -> Result<()> {
    let signature = if sig_type.is_public_key_scheme() {
        let private = PrivateKey::from_der(sig_type.key_algorithm(), &decode_hex("key", key)?)?;
        crypto::sign(sig_type, &private, data)?
    } else {
        crypto::sign(sig_type, &secret_key(key)?, data)?
    };
    println!("{}", hex::encode(signature));
    Ok(())
}

fn cmd_verify(sig_type: SigType, key: &str, signature: &str, data: &[u8]) -> Result<()> {
    let signature = decode_hex("signature", signature)?;

    let valid = if sig_type.is_public_key_scheme() {
        let public = PublicKey::from_der(sig_type.key_algorithm(), &decode_hex("key", key)?)?;
        crypto::verify(sig_type, &public, &signature, data)
    } else {
        let secret = secret_key(key)?;
        crypto::verify(sig_type, KeyRef::Secret(&secret), &signature, data)
    };

    if !valid {
        bail!("Signature is not valid");
    }
    println!("valid");
    Ok(())
}

fn cmd_purposes() -> Result<()> {
    for sig_type in SigType::ALL {
        println!("{:<20} {}", sig_type, sig_type.purpose());
    }
    for enc_type in EncType::ALL {
        println!("{:<20} {}", enc_type, enc_type.purpose());
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let text = cli.text;

    match cli.command {
        Commands::Hash { algorithm, data } => cmd_hash(algorithm, &decode_data(text, &data)?),
        Commands::Random { len } => cmd_random(len),
        Commands::Derive { key, purpose } => cmd_derive(&key, &purpose),
        Commands::Encrypt {
            key,
            enc_type,
            iv,
            data,
        } => cmd_encrypt(&key, enc_type, iv.as_deref(), &decode_data(text, &data)?),
        Commands::Decrypt {
            key,
            enc_type,
            iv,
            ciphertext,
        } => cmd_decrypt(&key, enc_type, &iv, &ciphertext),
        Commands::Keygen { algorithm } => cmd_keygen(algorithm),
        Commands::Sign {
            sig_type,
            key,
            data,
        } => cmd_sign(sig_type, &key, &decode_data(text, &data)?),
        Commands::Verify {
            sig_type,
            key,
            signature,
            data,
        } => cmd_verify(sig_type, &key, &signature, &decode_data(text, &data)?),
        Commands::Purposes => cmd_purposes(),
    }
}
