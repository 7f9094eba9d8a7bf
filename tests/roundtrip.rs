use lsbstego::header::{Compatibility, HEADER_SIZE, MAGIC};
use lsbstego::lsb::{max_payload, LsbReader};
use lsbstego::pipeline::{compress, decompress, EncryptionAlgorithm};
use lsbstego::raster::ColorModel;
use lsbstego::{capacity, embed, extract, ErrorKind, PixelGrid, StegoConfig, StegoError};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

fn photo(width: u32, height: u32, seed: u64) -> PixelGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (0..width * height)
        .map(|_| 0xFF00_0000 | rng.gen_range(0..0x0100_0000u32))
        .collect();
    PixelGrid::from_pixels(width, height, ColorModel::Rgb, pixels).unwrap()
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

/// Flip the low bit of one channel of the pixel carrying header bit `bit`
fn flip_header_bit(image: &mut PixelGrid, bit: usize) {
    let pixel = (bit / 3) as u32;
    let shift = [16, 8, 0][bit % 3];
    let (x, y) = (pixel % image.width(), pixel / image.width());
    let value = image.get(x, y);
    image.set(x, y, value ^ (1 << shift));
}

#[test]
fn roundtrip_across_config_grid() {
    let cover = photo(48, 48, 11);
    let payload = random_bytes(700, 12);

    for use_compression in [false, true] {
        for use_encryption in [false, true] {
            for max_bits in 1..=8u8 {
                let config = StegoConfig {
                    max_bits_per_channel: max_bits,
                    use_compression,
                    use_encryption,
                    password: Some("grid-password".into()),
                    ..Default::default()
                };
                // 48x48 holds ~850 bytes even at depth 1
                let stego = embed(&payload, &cover, &config).unwrap();
                assert_eq!(
                    extract(&stego, &config).unwrap(),
                    payload,
                    "compression={} encryption={} max_bits={}",
                    use_compression,
                    use_encryption,
                    max_bits
                );
            }
        }
    }
}

#[test]
fn capacity_boundary_at_every_depth() {
    let cover = photo(37, 23, 21);
    for max_bits in 1..=8u8 {
        let config = StegoConfig {
            max_bits_per_channel: max_bits,
            use_compression: false,
            ..Default::default()
        };
        let max = capacity(&cover, &config).unwrap();
        assert_eq!(max, max_payload(cover.pixel_count(), max_bits, Compatibility::Corrected));

        let exact = random_bytes(max, max_bits as u64);
        let stego = embed(&exact, &cover, &config).unwrap();
        assert_eq!(extract(&stego, &config).unwrap(), exact);

        let over = random_bytes(max + 1, max_bits as u64);
        let err = embed(&over, &cover, &config).unwrap_err();
        assert!(matches!(err, StegoError::InsufficientCapacity { .. }), "got {err}");
    }
}

#[test]
fn legacy_capacity_boundary_at_every_depth() {
    let cover = photo(37, 23, 31);
    for max_bits in 1..=8u8 {
        let config = StegoConfig {
            max_bits_per_channel: max_bits,
            use_compression: false,
            compatibility: Compatibility::Legacy,
            ..Default::default()
        };
        let max = capacity(&cover, &config).unwrap();
        let estimate = (cover.pixel_count() * 3 * max_bits as usize) / 8 - HEADER_SIZE;
        assert!(max <= estimate);

        let exact = random_bytes(max, 40 + max_bits as u64);
        let stego = embed(&exact, &cover, &config).unwrap();
        assert_eq!(extract(&stego, &config).unwrap(), exact);

        let over = random_bytes(max + 1, 50 + max_bits as u64);
        match embed(&over, &cover, &config).unwrap_err() {
            StegoError::InsufficientCapacity { needed, capacity } => {
                assert_eq!(needed, max + 1);
                assert_eq!(capacity, max);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn legacy_capacity_is_embeddable_in_100px_square() {
    let cover = photo(100, 100, 32);
    let config = StegoConfig {
        use_compression: false,
        compatibility: Compatibility::Legacy,
        ..Default::default()
    };
    let max = capacity(&cover, &config).unwrap();
    assert_eq!(max, (10_000 - 40) * 3);
    let payload = vec![0xA5; max];
    let stego = embed(&payload, &cover, &config).unwrap();
    assert_eq!(extract(&stego, &config).unwrap(), payload);
}

#[test]
fn empty_grid_is_invalid_image() {
    let config = StegoConfig::default();
    for grid in [PixelGrid::new(0, 5), PixelGrid::new(5, 0)] {
        assert_eq!(extract(&grid, &config).unwrap_err().kind(), ErrorKind::InvalidImage);
        assert_eq!(embed(b"x", &grid, &config).unwrap_err().kind(), ErrorKind::InvalidImage);
        assert_eq!(capacity(&grid, &config).unwrap_err().kind(), ErrorKind::InvalidImage);
    }
}

#[test]
fn tampered_magic_is_invalid_header() {
    let cover = photo(32, 32, 41);
    let config = StegoConfig::default();
    let stego = embed(b"tamper target", &cover, &config).unwrap();

    for byte in 0..MAGIC.len() {
        for bit in [0, 7] {
            let mut tampered = stego.clone();
            flip_header_bit(&mut tampered, byte * 8 + bit);
            let err = extract(&tampered, &config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidHeader, "byte {} bit {}", byte, bit);
        }
    }
}

#[test]
fn wrong_password_never_panics() {
    let cover = photo(64, 64, 51);
    for algorithm in [
        EncryptionAlgorithm::Aes128,
        EncryptionAlgorithm::Aes256,
        EncryptionAlgorithm::Des,
    ] {
        for use_compression in [false, true] {
            let config = StegoConfig {
                encryption_algorithm: algorithm,
                use_compression,
                ..StegoConfig::with_password("A")
            };
            let stego = embed(b"the quick brown fox", &cover, &config).unwrap();
            let wrong = StegoConfig {
                password: Some("B".into()),
                ..config.clone()
            };
            match extract(&stego, &wrong) {
                Err(e) => assert!(
                    matches!(e.kind(), ErrorKind::InvalidPassword | ErrorKind::CorruptData),
                    "unexpected error kind: {e}"
                ),
                Ok(data) => assert_ne!(data, b"the quick brown fox"),
            }
        }
    }
}

#[test]
fn scenario_a_small_payload_in_100px_square() {
    let cover = photo(100, 100, 61);
    let payload = random_bytes(500, 62);
    let config = StegoConfig {
        max_bits_per_channel: 4,
        use_compression: true,
        use_encryption: true,
        password: Some("secret42".into()),
        encryption_algorithm: EncryptionAlgorithm::Aes128,
        ..Default::default()
    };

    let stego = embed(&payload, &cover, &config).unwrap();
    let reader = LsbReader::new(&stego).unwrap();
    let stored = reader.data_length();
    let expected_depth = (1..=4u8)
        .find(|&d| 100 * 100 * 3 * d as usize / 8 >= HEADER_SIZE + stored)
        .unwrap();
    assert_eq!(reader.channel_bits_used(), expected_depth);

    assert_eq!(extract(&stego, &config).unwrap(), payload);
}

#[test]
fn scenario_b_oversized_payload() {
    let cover = photo(100, 100, 71);
    let config = StegoConfig {
        max_bits_per_channel: 4,
        ..StegoConfig::with_password("secret42")
    };
    let payload = random_bytes(1_000_000, 72);
    let err = embed(&payload, &cover, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientCapacity);
}

#[test]
fn scenario_c_plain_photograph() {
    let photo = photo(120, 80, 81);
    let err = extract(&photo, &StegoConfig::default()).unwrap_err();
    assert!(matches!(err, StegoError::InvalidHeader(_)));
}

#[test]
fn indexed_cover_rejected() {
    let cover = PixelGrid::from_pixels(16, 16, ColorModel::Indexed, vec![0; 256]).unwrap();
    let err = embed(b"x", &cover, &StegoConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidImage);
}

#[test]
fn embedding_is_independent_across_threads() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let cover = photo(40, 40, seed);
                let payload = random_bytes(200, seed + 100);
                let config = StegoConfig::default();
                let stego = embed(&payload, &cover, &config).unwrap();
                extract(&stego, &config).unwrap() == payload
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_roundtrip_plain(
        payload in proptest::collection::vec(any::<u8>(), 0..600),
        max_bits in 1u8..=8,
        use_compression in any::<bool>(),
    ) {
        let cover = photo(60, 40, 91);
        let config = StegoConfig {
            max_bits_per_channel: max_bits,
            use_compression,
            ..Default::default()
        };
        let stego = embed(&payload, &cover, &config).unwrap();
        prop_assert_eq!(extract(&stego, &config).unwrap(), payload);
    }

    #[test]
    fn prop_compression_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        prop_assert_eq!(decompress(&compress(&data).unwrap()).unwrap(), data);
    }
}
