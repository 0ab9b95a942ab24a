use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use clap::{Parser, ValueEnum};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use upstash_receiver::services::signature::{ClaimSet, EXPECTED_ISSUER, body_hash};
use uuid::Uuid;

/// Mint an `Upstash-Signature` token for a request body, signed with an HMAC key.
///
/// Meant for exercising a running receiver by hand:
/// - Builds the claims (iss=Upstash, sub=url, iat/nbf=now, exp=now+ttl, body=hash)
/// - Signs "base64url(header).base64url(payload)" with the given key
/// - Outputs:
///   - the token
///   - the body hash it was bound to
///   - the expiry
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// HMAC signing key (defaults to the receiver's current key)
    #[arg(long, env = "QSTASH_CURRENT_SIGNING_KEY", hide_env_values = true)]
    key: String,

    /// Request body to bind the token to
    #[arg(long, conflicts_with = "body_file", default_value = "")]
    body: String,

    /// Read the request body from a file instead
    #[arg(long, value_name = "FILE")]
    body_file: Option<PathBuf>,

    /// Destination URL (sub). Leave empty to produce an unbound token.
    #[arg(long, default_value = "")]
    url: String,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = 300)]
    ttl: i64,

    #[arg(long, value_enum, default_value_t = HmacAlg::Hs256)]
    alg: HmacAlg,

    /// Override iat/nbf (unix seconds). Default: now.
    #[arg(long)]
    iat: Option<i64>,

    /// Override jti. Default: random UUID v4.
    #[arg(long)]
    jti: Option<String>,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HmacAlg {
    Hs256,
    Hs384,
    Hs512,
}

impl From<HmacAlg> for Algorithm {
    fn from(alg: HmacAlg) -> Self {
        match alg {
            HmacAlg::Hs256 => Algorithm::HS256,
            HmacAlg::Hs384 => Algorithm::HS384,
            HmacAlg::Hs512 => Algorithm::HS512,
        }
    }
}

fn now_unix() -> Result<i64, Box<dyn std::error::Error>> {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(i64::try_from(secs)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Raw bytes: the receiver hashes exactly what it is sent.
    let body = match &args.body_file {
        Some(path) => fs::read(path)?,
        None => args.body.clone().into_bytes(),
    };

    let iat = match args.iat {
        Some(iat) => iat,
        None => now_unix()?,
    };
    let exp = iat + args.ttl;

    let claims = ClaimSet {
        iss: EXPECTED_ISSUER.to_string(),
        sub: args.url.clone(),
        exp,
        nbf: Some(iat),
        iat: Some(iat),
        jti: Some(args.jti.unwrap_or_else(|| Uuid::new_v4().to_string())),
        body: body_hash(&body),
    };

    let mut header = Header::new(args.alg.into());
    header.typ = Some("JWT".to_string());
    let token = jsonwebtoken::encode(
        &header,
        &claims,
        &EncodingKey::from_secret(args.key.as_bytes()),
    )?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("Upstash-Signature: {}", token);
    println!("body: {}", claims.body);
    println!("sub: {}", if claims.sub.is_empty() { "(none)" } else { &claims.sub });
    println!("exp: {}", exp);

    Ok(())
}
