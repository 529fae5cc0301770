use {
    anyhow::{Context, Result},
    ecsig::{
        groups::named::{secp256k1, secp256r1, sm2p256v1, toy_p17},
        misuse::{
            forge_without_message, recover_cross_scheme, recover_from_leaked_nonce,
            recover_nonce_reuse, recover_shared_nonce_keys, recover_sm2_leaked_nonce,
            NonceWitness, SignedMessage,
        },
        mod_ring::RingRefExt,
        signature::{verify_prehashed, KeyPair, Signer},
    },
    ruint::aliases::U64,
};

#[test]
fn test_toy_leaked_nonce() -> Result<()> {
    let curve = toy_p17();
    let field = curve.scalar_field();
    let pair = KeyPair::from_private(&curve, U64::from(7))?;
    let k = field.from_u64(5);
    let signature = Signer::new(&curve).sign_ecdsa(pair.private, b"important message", k)?;
    let recovered = recover_from_leaked_nonce(&curve, b"important message", &signature, k)
        .context("no recovery")?;
    assert_eq!(recovered.confirm_private(pair.public), Some(field.from_u64(7)));
    Ok(())
}

#[test]
fn test_leaked_nonce() -> Result<()> {
    let curve = secp256r1();
    let mut rng = rand::thread_rng();
    let pair = KeyPair::generate(&curve, &mut rng);
    let k = curve.scalar_field().random_nonzero(&mut rng);
    let signature = Signer::new(&curve).sign_ecdsa(pair.private, b"leak", k)?;
    let recovered =
        recover_from_leaked_nonce(&curve, b"leak", &signature, k).context("no recovery")?;
    assert_eq!(recovered.confirm_private(pair.public), Some(pair.private));
    Ok(())
}

#[test]
fn test_nonce_reuse() -> Result<()> {
    let curve = secp256k1();
    let mut rng = rand::thread_rng();
    let pair = KeyPair::generate(&curve, &mut rng);
    let k = curve.scalar_field().random_nonzero(&mut rng);
    let signer = Signer::new(&curve);
    let first = SignedMessage::new(b"one", signer.sign_ecdsa(pair.private, b"one", k)?);
    let second = SignedMessage::new(b"two", signer.sign_ecdsa(pair.private, b"two", k)?);
    assert_eq!(first.signature.r, second.signature.r);
    let recovered = recover_nonce_reuse(&curve, first, second).context("no recovery")?;
    assert_eq!(recovered.confirm_private(pair.public), Some(pair.private));
    Ok(())
}

#[test]
fn test_two_signers_shared_nonce() -> Result<()> {
    let curve = secp256r1();
    let mut rng = rand::thread_rng();
    let signer = Signer::new(&curve);
    let first = KeyPair::generate(&curve, &mut rng);
    let second = KeyPair::generate(&curve, &mut rng);
    assert_ne!(first.private, second.private);
    let k = curve.scalar_field().random_nonzero(&mut rng);

    // The first signer used the nonce twice, which exposes it.
    let witness = NonceWitness::Reused {
        first:  SignedMessage::new(b"a", signer.sign_ecdsa(first.private, b"a", k)?),
        second: SignedMessage::new(b"b", signer.sign_ecdsa(first.private, b"b", k)?),
    };
    let victims = [
        SignedMessage::new(b"a", signer.sign_ecdsa(first.private, b"a", k)?),
        SignedMessage::new(b"c", signer.sign_ecdsa(second.private, b"c", k)?),
    ];
    let recovered = recover_shared_nonce_keys(&curve, witness, &victims).context("no nonce")?;
    assert_eq!(recovered.len(), 2);
    assert_eq!(recovered[0].confirm_private(first.public), Some(first.private));
    assert_eq!(recovered[1].confirm_private(second.public), Some(second.private));
    Ok(())
}

#[test]
fn test_cross_scheme() -> Result<()> {
    let curve = sm2p256v1();
    let mut rng = rand::thread_rng();
    let pair = KeyPair::generate(&curve, &mut rng);
    let k = curve.scalar_field().random_nonzero(&mut rng);
    let signer = Signer::new(&curve);
    let ecdsa = signer.sign_ecdsa(pair.private, b"same message", k)?;
    let schnorr = signer.sign_schnorr(pair.private, b"same message", k)?;
    let recovered =
        recover_cross_scheme(&curve, b"same message", &ecdsa, &schnorr).context("no recovery")?;
    assert_eq!(recovered.confirm_private(pair.public), Some(pair.private));
    Ok(())
}

#[test]
fn test_sm2_leaked_nonce() -> Result<()> {
    let curve = sm2p256v1();
    let mut rng = rand::thread_rng();
    let pair = KeyPair::generate(&curve, &mut rng);
    let k = curve.scalar_field().random_nonzero(&mut rng);
    let signature = Signer::new(&curve).sign_sm2(pair.private, b"sm2 leak", k)?;
    let recovered = recover_sm2_leaked_nonce(&signature, k).context("no recovery")?;
    assert_eq!(recovered.confirm_private(pair.public), Some(pair.private));
    Ok(())
}

#[test]
fn test_forgery_toy() -> Result<()> {
    let curve = toy_p17();
    let mut rng = rand::thread_rng();
    let pair = KeyPair::generate(&curve, &mut rng);
    let mut forged = 0;
    for _ in 0..150 {
        if let Some(forgery) = forge_without_message(&curve, pair.public, &mut rng) {
            forged += 1;
            assert!(verify_prehashed(&curve, forgery.digest, &forgery.signature, pair.public));
        }
    }
    assert!(forged >= 100, "only {forged} forgeries");
    Ok(())
}

#[test]
fn test_forgery_p256() -> Result<()> {
    let curve = secp256r1();
    let mut rng = rand::thread_rng();
    let pair = KeyPair::generate(&curve, &mut rng);
    for _ in 0..100 {
        let forgery = forge_without_message(&curve, pair.public, &mut rng).context("no forgery")?;
        assert!(verify_prehashed(&curve, forgery.digest, &forgery.signature, pair.public));
    }
    Ok(())
}
