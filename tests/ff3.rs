use fpe::result::Result;

fn parse_hex(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    (0..bytes.len())
        .step_by(2)
        .map(|i| {
            let hi = (bytes[i] as char).to_digit(16).unwrap();
            let lo = (bytes[i + 1] as char).to_digit(16).unwrap();
            ((hi << 4) | lo) as u8
        })
        .collect()
}

#[test]
fn nist_vector_roundtrips() -> Result<()> {
    let key = parse_hex("EF4359D8D580AA4F7F036D6F04FC6A94");
    let tweak = parse_hex("D8E7920AFA330A73");
    let pt = vec![8, 9, 0, 1, 2, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0, 0];
    let ct = vec![7, 5, 0, 9, 1, 8, 8, 1, 4, 0, 5, 8, 6, 5, 4, 6, 0, 7];

    let ff3 = fpe::ff3::FF3::new(&key, Some(&tweak), 10)?;

    let out = ff3.encrypt(None, &pt)?;
    assert_eq!(out, ct, "encrypt");

    let out = ff3.decrypt(None, &ct)?;
    assert_eq!(out, pt, "decrypt");

    assert_eq!(fpe::ff3::encrypt(&key, Some(&tweak), &pt, 10)?, ct);
    assert_eq!(fpe::ff3::decrypt(&key, Some(&tweak), &ct, 10)?, pt);

    Ok(())
}

#[test]
fn per_call_tweak_overrides_default() -> Result<()> {
    let key = parse_hex("EF4359D8D580AA4F7F036D6F04FC6A94");
    let default_tweak = parse_hex("D8E7920AFA330A73");
    let other_tweak = parse_hex("0000000000000000");
    let pt = vec![8, 9, 0, 1, 2, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0, 0];

    let ff3 = fpe::ff3::FF3::new(&key, Some(&default_tweak), 10)?;

    let ct_default = ff3.encrypt(None, &pt)?;
    let ct_other = ff3.encrypt(Some(&other_tweak), &pt)?;
    assert_ne!(ct_default, ct_other);

    assert_eq!(ff3.decrypt(Some(&other_tweak), &ct_other)?, pt);

    Ok(())
}

#[test]
fn key_sizes_roundtrip() -> Result<()> {
    let tweak = [0u8; 8];
    for key in [vec![0u8; 16], vec![0u8; 24], vec![0u8; 32]] {
        let ff3 = fpe::ff3::FF3::new(&key, Some(&tweak), 10)?;
        let pt = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 0];
        let ct = ff3.encrypt(None, &pt)?;
        assert_eq!(ff3.decrypt(None, &ct)?, pt);
    }
    Ok(())
}

#[test]
fn rejects_wrong_tweak_length() {
    let key = [0u8; 16];
    assert!(fpe::ff3::FF3::new(&key, Some(&[0u8; 7]), 10).is_err());
    assert!(fpe::ff3::FF3::new(&key, Some(&[0u8; 9]), 10).is_err());
}
