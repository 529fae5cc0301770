use {
    anyhow::{anyhow, bail, ensure, Context, Result},
    argh::FromArgs,
    ecsig::{
        codec::{BigEndianCodec, Codec},
        groups::{
            named::{secp256k1, secp256r1, sm2p256v1, toy_p17, CurveName},
            EllipticCurve, EllipticCurvePoint, Scalar,
        },
        misuse::{
            forge_without_message, recover_cross_scheme, recover_from_leaked_nonce,
            recover_nonce_reuse, recover_shared_nonce_keys, recover_sm2_leaked_nonce,
            NonceWitness, SignedMessage,
        },
        mod_ring::{RingRefExt, UintMont},
        signature::{verify_prehashed, KeyPair, Scheme, Signature, Signer},
        Error, Strategy,
    },
    rand::thread_rng,
    std::{fmt, hint::black_box, str::FromStr, time::Instant},
    tracing::debug,
};

/// Elliptic curve signatures and ephemeral scalar misuse demonstrations.
#[derive(FromArgs)]
struct Args {
    /// curve: toy-p17, secp256r1, secp256k1 or sm2p256v1
    #[argh(option, default = "CurveName::Secp256r1")]
    curve: CurveName,

    /// scalar multiplication: double-and-add, fixed-base or jacobian
    #[argh(option, default = "Strategy::FixedBase")]
    strategy: Strategy,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Keygen(KeygenCommand),
    Sign(SignCommand),
    Verify(VerifyCommand),
    Attack(AttackCommand),
    Bench(BenchCommand),
}

/// Generate a key pair.
#[derive(FromArgs)]
#[argh(subcommand, name = "keygen")]
struct KeygenCommand {}

/// Sign a message.
#[derive(FromArgs)]
#[argh(subcommand, name = "sign")]
struct SignCommand {
    /// signature scheme: ecdsa, schnorr or sm2
    #[argh(option, default = "Scheme::Ecdsa")]
    scheme: Scheme,

    /// private key as big-endian hex
    #[argh(option)]
    private: String,

    /// ephemeral scalar as big-endian hex, random if absent
    #[argh(option)]
    nonce: Option<String>,

    /// message to sign
    #[argh(positional)]
    message: String,
}

/// Verify a signature.
#[derive(FromArgs)]
#[argh(subcommand, name = "verify")]
struct VerifyCommand {
    /// signature scheme: ecdsa, schnorr or sm2
    #[argh(option, default = "Scheme::Ecdsa")]
    scheme: Scheme,

    /// encoded public point as hex
    #[argh(option)]
    public: String,

    /// encoded signature as hex
    #[argh(option)]
    signature: String,

    /// signed message
    #[argh(positional)]
    message: String,
}

/// Run a key recovery scenario against freshly generated keys.
#[derive(FromArgs)]
#[argh(subcommand, name = "attack")]
struct AttackCommand {
    /// leaked-nonce, nonce-reuse, shared-nonce, cross-scheme,
    /// sm2-leaked-nonce, forgery or all
    #[argh(positional)]
    scenario: Scenario,
}

/// Time the scalar multiplication strategies.
#[derive(FromArgs)]
#[argh(subcommand, name = "bench")]
struct BenchCommand {
    /// multiplications per strategy
    #[argh(option, default = "100")]
    iterations: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Scenario {
    LeakedNonce,
    NonceReuse,
    SharedNonce,
    CrossScheme,
    Sm2LeakedNonce,
    Forgery,
    All,
}

impl Scenario {
    const EACH: [Self; 6] = [
        Self::LeakedNonce,
        Self::NonceReuse,
        Self::SharedNonce,
        Self::CrossScheme,
        Self::Sm2LeakedNonce,
        Self::Forgery,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::LeakedNonce => "leaked-nonce",
            Self::NonceReuse => "nonce-reuse",
            Self::SharedNonce => "shared-nonce",
            Self::CrossScheme => "cross-scheme",
            Self::Sm2LeakedNonce => "sm2-leaked-nonce",
            Self::Forgery => "forgery",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::EACH
            .into_iter()
            .chain([Self::All])
            .find(|scenario| scenario.as_str() == s)
            .ok_or_else(|| format!("unknown scenario {s:?}"))
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let (name, strategy) = (args.curve, args.strategy);
    match name {
        CurveName::ToyP17 => run(name, &toy_p17(), strategy, args.command),
        CurveName::Secp256r1 => run(name, &secp256r1(), strategy, args.command),
        CurveName::Secp256k1 => run(name, &secp256k1(), strategy, args.command),
        CurveName::Sm2p256v1 => run(name, &sm2p256v1(), strategy, args.command),
    }
}

fn run<U: UintMont>(
    name: CurveName,
    curve: &EllipticCurve<U>,
    strategy: Strategy,
    command: Command,
) -> Result<()> {
    let signer = Signer::new(curve).with_strategy(strategy);
    match command {
        Command::Keygen(KeygenCommand {}) => {
            let pair = KeyPair::generate(curve, &mut thread_rng());
            println!("private: {}", to_hex(pair.private));
            println!("public:  {}", to_hex(pair.public));
        }
        Command::Sign(command) => {
            let private = parse_uint(&command.private)?;
            let pair = KeyPair::from_private(curve, private)?;
            let message = command.message.as_bytes();
            let signature = match command.nonce {
                Some(nonce) => {
                    let k = parse_scalar(curve, &nonce)?;
                    signer.sign(command.scheme, pair.private, message, k)?
                }
                None => with_fresh_nonce(curve, |k| {
                    signer.sign(command.scheme, pair.private, message, k)
                })?,
            };
            println!("{}", to_hex(signature));
        }
        Command::Verify(command) => {
            let public: EllipticCurvePoint<'_, U> =
                BigEndianCodec.from_slice(&decode_hex(&command.public)?, curve)?;
            let signature: Signature<'_, U> = BigEndianCodec
                .from_slice(&decode_hex(&command.signature)?, (curve, command.scheme))?;
            let message = command.message.as_bytes();
            ensure!(
                signer.verify(command.scheme, message, &signature, public),
                "signature invalid"
            );
            println!("signature valid");
        }
        Command::Attack(AttackCommand { scenario }) => match scenario {
            Scenario::All => {
                for scenario in Scenario::EACH {
                    attack(name, &signer, scenario)?;
                }
            }
            scenario => attack(name, &signer, scenario)?,
        },
        Command::Bench(BenchCommand { iterations }) => bench(curve, iterations),
    }
    Ok(())
}

fn attack<U: UintMont>(
    name: CurveName,
    signer: &Signer<'_, U>,
    scenario: Scenario,
) -> Result<()> {
    let mut rng = thread_rng();
    let curve = signer.curve();
    // The SM2-like scheme cannot sign with d = n - 1.
    let one = curve.scalar_field().from_u64(1);
    let target = loop {
        let pair = KeyPair::generate(curve, &mut rng);
        if !(pair.private + one).is_zero() {
            break pair;
        }
    };
    println!("== {scenario} on {name} ({})", signer.strategy());
    println!("target public key: {}", to_hex(target.public));

    let recovered = match scenario {
        Scenario::LeakedNonce => {
            let (signature, k) = with_fresh_nonce(curve, |k| {
                Ok((signer.sign_ecdsa(target.private, b"important message", k)?, k))
            })?;
            println!("leaked nonce: {}", to_hex(k));
            recover_from_leaked_nonce(curve, b"important message", &signature, k)
        }
        Scenario::NonceReuse => {
            let (first, second) = with_fresh_nonce(curve, |k| {
                Ok((
                    SignedMessage::new(
                        b"first message",
                        signer.sign_ecdsa(target.private, b"first message", k)?,
                    ),
                    SignedMessage::new(
                        b"second message",
                        signer.sign_ecdsa(target.private, b"second message", k)?,
                    ),
                ))
            })?;
            recover_nonce_reuse(curve, first, second)
        }
        Scenario::SharedNonce => {
            let insider = KeyPair::generate(curve, &mut rng);
            let (witness, victim) = with_fresh_nonce(curve, |k| {
                let witness = NonceWitness::Insider {
                    signed:  SignedMessage::new(
                        b"alice",
                        signer.sign_ecdsa(insider.private, b"alice", k)?,
                    ),
                    private: insider.private,
                };
                let victim =
                    SignedMessage::new(b"bob", signer.sign_ecdsa(target.private, b"bob", k)?);
                Ok((witness, victim))
            })?;
            recover_shared_nonce_keys(curve, witness, &[victim])
                .and_then(|keys| keys.into_iter().next())
        }
        Scenario::CrossScheme => {
            let message = b"cross-scheme message";
            let (ecdsa, schnorr) = with_fresh_nonce(curve, |k| {
                Ok((
                    signer.sign_ecdsa(target.private, message, k)?,
                    signer.sign_schnorr(target.private, message, k)?,
                ))
            })?;
            recover_cross_scheme(curve, message, &ecdsa, &schnorr)
        }
        Scenario::Sm2LeakedNonce => {
            let (signature, k) = with_fresh_nonce(curve, |k| {
                Ok((signer.sign_sm2(target.private, b"important message", k)?, k))
            })?;
            println!("leaked nonce: {}", to_hex(k));
            recover_sm2_leaked_nonce(&signature, k)
        }
        Scenario::Forgery => {
            let forgery = (0..64)
                .find_map(|_| forge_without_message(curve, target.public, &mut rng))
                .ok_or_else(|| anyhow!("no forgery found"))?;
            let valid =
                verify_prehashed(curve, forgery.digest, &forgery.signature, target.public);
            println!("forged signature: {}", to_hex(forgery.signature));
            println!("for digest:       {}", to_hex(forgery.digest));
            ensure!(valid, "forged signature does not verify");
            println!("verifies under the target key (no preimage of the digest is known)");
            return Ok(());
        }
        Scenario::All => bail!("scenario must be a single attack"),
    };

    let recovered = recovered.ok_or_else(|| anyhow!("recovery undefined for these signatures"))?;
    println!("recovered private key: {}", to_hex(*recovered.unverified()));
    let confirmed = recovered.confirm_private(target.public);
    ensure!(
        confirmed == Some(target.private),
        "recovered key does not match the public key"
    );
    println!("confirmed against the public key");
    Ok(())
}

fn bench<U: UintMont>(curve: &EllipticCurve<U>, iterations: u32) {
    let mut rng = thread_rng();
    let field = curve.scalar_field();
    let scalars: Vec<Scalar<'_, U>> = (0..iterations)
        .map(|_| field.random_nonzero(&mut rng))
        .collect();
    let point = curve.generator() * field.random_nonzero(&mut rng);
    for strategy in Strategy::ALL {
        for (label, base) in [("k·G", curve.generator()), ("k·P", point)] {
            let start = Instant::now();
            for k in &scalars {
                black_box(strategy.mul_scalar(base, *k));
            }
            let average = start.elapsed() / iterations.max(1);
            println!("{strategy:>14} {label}: {average:?} (avg per operation)");
        }
    }
}

/// Signs with random ephemerals until one is not degenerate.
fn with_fresh_nonce<'a, U: UintMont, T>(
    curve: &'a EllipticCurve<U>,
    mut f: impl FnMut(Scalar<'a, U>) -> ecsig::Result<T>,
) -> Result<T> {
    let mut rng = thread_rng();
    for _ in 0..64 {
        let k = curve.scalar_field().random_nonzero(&mut rng);
        match f(k) {
            Ok(value) => return Ok(value),
            Err(Error::InvalidEphemeral(reason)) => debug!(reason, "resampling nonce"),
            Err(error) => return Err(error.into()),
        }
    }
    bail!("no usable nonce found")
}

fn to_hex<T>(value: T) -> String
where
    BigEndianCodec: Codec<T>,
{
    hex::encode(BigEndianCodec.to_vec(value))
}

fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let input = input.trim().trim_start_matches("0x");
    if input.len() % 2 == 1 {
        return hex::decode(format!("0{input}")).context("invalid hex");
    }
    hex::decode(input).context("invalid hex")
}

fn parse_uint<U: UintMont>(input: &str) -> Result<U> {
    U::try_from_be_bytes(&decode_hex(input)?).ok_or_else(|| anyhow!("value too large"))
}

fn parse_scalar<'a, U: UintMont>(
    curve: &'a EllipticCurve<U>,
    input: &str,
) -> Result<Scalar<'a, U>> {
    curve
        .scalar_field()
        .checked_from(parse_uint(input)?)
        .ok_or_else(|| anyhow!("scalar must be below the group order"))
}
