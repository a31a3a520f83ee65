//! Debug output of assembled matrices.

use crate::algebra::FloatT;
use crate::dist::LocalTriples;
use std::io::{Result, Write};

/// Write a triple list as text: one `n nnz 0` header line, then one
/// `row col value` line per nonzero.
///
/// Dumping the complete matrix this way only makes sense when the
/// calling process holds the whole triple list, i.e. in single-process
/// runs; multi-process callers get their local slice only.
pub fn write_triples<T: FloatT, W: Write>(out: &mut W, triples: &LocalTriples<T>) -> Result<()> {
    writeln!(out, "{} {} 0", triples.n, triples.global_nnz)?;
    for ((&row, &col), &val) in triples
        .rows
        .iter()
        .zip(triples.cols.iter())
        .zip(triples.vals.iter())
    {
        writeln!(out, "{} {} {:20.16}", row, col, val)?;
    }
    Ok(())
}

// ------------------
// testing
