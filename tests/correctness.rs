use blockmul::{
    Accumulation, BlockMulError, BlockMultiplier, BlockMultiplierConfig, BlockPartition, Matrix,
    multiply_blocked, multiply_serial,
};

const STRATEGIES: [Accumulation; 2] = [Accumulation::PerOutputBlock, Accumulation::AtomicCells];

fn blocked(a: &Matrix, b: &Matrix, block_size: usize, accumulation: Accumulation) -> Matrix {
    let pa = BlockPartition::build(a, block_size).unwrap();
    let pb = BlockPartition::build(b, block_size).unwrap();
    let mul =
        BlockMultiplier::new(BlockMultiplierConfig::default().with_accumulation(accumulation)).unwrap();
    mul.multiply(&pa, &pb, a, b).unwrap()
}

fn divisors(n: usize) -> Vec<usize> {
    (1..=n).filter(|s| n % s == 0).collect()
}

fn fixture_a() -> Matrix {
    Matrix::from_rows(vec![
        vec![5, 7, 9, 10],
        vec![2, 3, 3, 8],
        vec![8, 10, 2, 3],
        vec![3, 3, 4, 8],
    ])
    .unwrap()
}

fn fixture_b() -> Matrix {
    Matrix::from_rows(vec![
        vec![3, 10, 12, 18],
        vec![12, 1, 4, 9],
        vec![9, 10, 12, 2],
        vec![3, 12, 4, 10],
    ])
    .unwrap()
}

// ============================================================
// Golden fixture
// ============================================================

#[test]
fn test_fixture_4x4() {
    let expected = vec![
        vec![210, 267, 236, 271],
        vec![93, 149, 104, 149],
        vec![171, 146, 172, 268],
        vec![105, 169, 128, 169],
    ];
    let (a, b) = (fixture_a(), fixture_b());

    assert_eq!(multiply_serial(&a, &b).unwrap().to_rows(), expected);
    for accumulation in STRATEGIES {
        assert_eq!(blocked(&a, &b, 2, accumulation).to_rows(), expected, "{}", accumulation);
    }
    assert_eq!(multiply_blocked(&a, &b, 2).unwrap().to_rows(), expected);
}

// ============================================================
// Equivalence with the serial baseline
// ============================================================

#[test]
fn test_equivalence_all_divisors() {
    for n in [1, 2, 6, 9, 12, 16] {
        let a = Matrix::from_fn(n, |r, c| ((r * n + c) % 10) as i64);
        let b = Matrix::from_fn(n, |r, c| ((r + 3 * c) % 7) as i64 - 3);
        let expected = multiply_serial(&a, &b).unwrap();

        for s in divisors(n) {
            for accumulation in STRATEGIES {
                assert_eq!(
                    blocked(&a, &b, s, accumulation),
                    expected,
                    "n={} s={} {}",
                    n,
                    s,
                    accumulation
                );
            }
        }
    }
}

#[test]
fn test_block_size_invariance() {
    let n = 24;
    let a = Matrix::from_fn(n, |r, c| (r as i64 * 31 - c as i64 * 17) % 50);
    let b = Matrix::from_fn(n, |r, c| (r as i64 ^ c as i64) - 12);

    let reference = blocked(&a, &b, 1, Accumulation::PerOutputBlock);
    for s in divisors(n) {
        for accumulation in STRATEGIES {
            assert_eq!(blocked(&a, &b, s, accumulation), reference, "s={} {}", s, accumulation);
        }
    }
}

#[test]
fn test_identity() {
    let n = 8;
    let a = Matrix::from_fn(n, |r, c| (r * 100 + c) as i64 - 400);
    let id = Matrix::identity(n);

    assert_eq!(multiply_serial(&a, &id).unwrap(), a);
    assert_eq!(multiply_serial(&id, &a).unwrap(), a);
    for s in [1, 2, 4, 8] {
        for accumulation in STRATEGIES {
            assert_eq!(blocked(&a, &id, s, accumulation), a);
            assert_eq!(blocked(&id, &a, s, accumulation), a);
        }
    }
}

#[test]
fn test_zero_matrix() {
    let n = 6;
    let a = Matrix::from_fn(n, |r, c| (r * n + c) as i64 + 1);
    let zero = Matrix::zeros(n);

    assert_eq!(multiply_serial(&a, &zero).unwrap(), zero);
    for s in [1, 2, 3, 6] {
        for accumulation in STRATEGIES {
            assert_eq!(blocked(&a, &zero, s, accumulation), zero);
            assert_eq!(blocked(&zero, &a, s, accumulation), zero);
        }
    }
}

#[test]
fn test_negative_values() {
    let a = Matrix::from_fn(4, |r, c| -((r * 4 + c) as i64));
    let b = Matrix::from_fn(4, |r, c| (c as i64) - (r as i64));
    let expected = multiply_serial(&a, &b).unwrap();

    for accumulation in STRATEGIES {
        assert_eq!(blocked(&a, &b, 2, accumulation), expected);
    }
}

#[test]
fn test_overflow_agrees_with_serial() {
    let a = Matrix::from_fn(4, |r, c| i64::MAX - (r * 4 + c) as i64);
    let b = Matrix::from_fn(4, |r, c| (r + c) as i64 + 2);
    let expected = multiply_serial(&a, &b).unwrap();

    for accumulation in STRATEGIES {
        assert_eq!(blocked(&a, &b, 1, accumulation), expected);
        assert_eq!(blocked(&a, &b, 2, accumulation), expected);
    }
}

// ============================================================
// Partition coverage
// ============================================================

#[test]
fn test_partition_coverage() {
    for n in [1, 4, 6, 12, 15] {
        for s in divisors(n) {
            let p = BlockPartition::build(&Matrix::zeros(n), s).unwrap();
            let mut hits = vec![0u32; n * n];

            for (_, block) in p.iter() {
                for r in block.rows(s) {
                    for c in block.cols(s) {
                        hits[r * n + c] += 1;
                    }
                }
            }

            assert!(hits.iter().all(|&h| h == 1), "n={} s={}: gap or overlap", n, s);
        }
    }
}

// ============================================================
// Concurrency
// ============================================================

#[test]
fn test_stress_block_size_one() {
    let n = 12;
    let a = Matrix::from_fn(n, |r, c| ((r * 7 + c * 11) % 23) as i64 - 11);
    let b = Matrix::from_fn(n, |r, c| ((r * 5 + c * 3) % 19) as i64 - 9);
    let expected = multiply_serial(&a, &b).unwrap();

    let pa = BlockPartition::build(&a, 1).unwrap();
    let pb = BlockPartition::build(&b, 1).unwrap();

    for accumulation in STRATEGIES {
        let mul = BlockMultiplier::new(
            BlockMultiplierConfig::default()
                .with_threads(8)
                .with_accumulation(accumulation),
        )
        .unwrap();

        for iteration in 0..100 {
            let c = mul.multiply(&pa, &pb, &a, &b).unwrap();
            assert_eq!(c, expected, "{} iteration {}", accumulation, iteration);
        }
    }
}

#[test]
fn test_single_thread_pool() {
    let (a, b) = (fixture_a(), fixture_b());
    let pa = BlockPartition::build(&a, 1).unwrap();
    let pb = BlockPartition::build(&b, 1).unwrap();

    let mul = BlockMultiplier::new(
        BlockMultiplierConfig::default()
            .with_threads(1)
            .with_accumulation(Accumulation::AtomicCells),
    )
    .unwrap();
    assert_eq!(mul.multiply(&pa, &pb, &a, &b).unwrap(), multiply_serial(&a, &b).unwrap());
}

// ============================================================
// Error handling
// ============================================================

#[test]
fn test_non_divisible_block_size() {
    let a = Matrix::zeros(10);
    assert_eq!(
        multiply_blocked(&a, &a, 4).unwrap_err(),
        BlockMulError::InvalidBlockSize {
            dimension: 10,
            block_size: 4
        }
    );
}

#[test]
fn test_zero_block_size() {
    let a = Matrix::zeros(4);
    assert!(matches!(
        multiply_blocked(&a, &a, 0).unwrap_err(),
        BlockMulError::InvalidArgument { .. }
    ));
}

#[test]
fn test_operand_size_mismatch() {
    let err = multiply_blocked(&Matrix::zeros(4), &Matrix::zeros(8), 2).unwrap_err();
    assert!(matches!(err, BlockMulError::ShapeMismatch { .. }));
}

#[test]
fn test_error_messages() {
    let err = BlockMulError::InvalidBlockSize {
        dimension: 10,
        block_size: 3,
    };
    assert_eq!(err.to_string(), "block size 3 does not evenly divide matrix dimension 10");
}
