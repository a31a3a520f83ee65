use arrowhead::algebra::CsrMatrix;
use arrowhead::comm::ProcessGroup;
use arrowhead::dist::{distribute_triples, nnz_owned_range, offset_triples, LocalTriples};
use arrowhead::io::write_triples;

struct StubGroup {
    rank: usize,
    size: usize,
}

impl ProcessGroup for StubGroup {
    fn rank(&self) -> usize {
        self.rank
    }
    fn size(&self) -> usize {
        self.size
    }
    fn sum_all(&self, local: &[i64]) -> Vec<i64> {
        local.to_vec()
    }
}

// block-diagonal stream: a 2x2 block at the origin and a 3x3 identity
// at offset (2, 2), 7 nonzeros in a 5x5 matrix
fn global_stream() -> Vec<(usize, usize, f64)> {
    let top = CsrMatrix::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![1., 2., 3., 4.]);
    let bottom = CsrMatrix::<f64>::identity(3);

    let mut stream: Vec<_> = offset_triples(&top, 0, 0).collect();
    stream.extend(offset_triples(&bottom, 2, 2));
    stream
}

#[test]
fn ranks_tile_the_global_stream() {
    let stream = global_stream();
    let nnz = stream.len();
    assert_eq!(nnz, 7);

    let mut seen = Vec::new();
    for rank in 0..3 {
        let group = StubGroup { rank, size: 3 };
        let local = distribute_triples(5, nnz, stream.iter().copied(), &group);

        assert_eq!(local.len(), nnz_owned_range(nnz, rank, 3).len());
        for ((&r, &c), &v) in local.rows.iter().zip(&local.cols).zip(&local.vals) {
            seen.push((r, c, v));
        }
    }

    // concatenating the ranks' slices reproduces the stream in order
    assert_eq!(seen, stream);
}

#[test]
fn one_based_conversion_after_distribution() {
    let stream = global_stream();
    let group = StubGroup { rank: 2, size: 3 };
    let mut local = distribute_triples(5, stream.len(), stream, &group);

    assert!(!local.is_one_based());
    local.convert_to_one_based();
    assert!(local.is_one_based());
    assert!(local.rows.iter().all(|&r| r >= 1));
    assert!(local.cols.iter().all(|&c| c >= 1));
}

#[test]
fn single_rank_dump_holds_whole_matrix() {
    let stream = global_stream();
    let nnz = stream.len();
    let group = StubGroup { rank: 0, size: 1 };

    let mut local: LocalTriples<f64> = distribute_triples(5, nnz, stream, &group);
    assert_eq!(local.len(), nnz);
    local.convert_to_one_based();

    let mut out = Vec::new();
    write_triples(&mut out, &local).unwrap();

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), "5 7 0");
    assert_eq!(lines.count(), nnz);
}
