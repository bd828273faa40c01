//! One-dimensional piecewise-linear interpolation kernel
//!
//! Abscissae are strictly increasing (guaranteed by table indexing). Arguments
//! that land exactly on a node return the stored ordinate untouched, so a
//! table always reproduces its own measured points.

/// In-range position on an abscissa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Span {
    /// Exactly on node `i`
    Node(usize),
    /// Strictly between nodes `i` and `i + 1`, at fraction `t` in (0, 1)
    Between(usize, f64),
}

impl Span {
    pub(crate) fn apply(self, ys: &[f64]) -> f64 {
        match self {
            Span::Node(i) => ys[i],
            Span::Between(i, t) => lerp(ys[i], ys[i + 1], t),
        }
    }
}

/// Where an argument falls relative to an abscissa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Located {
    Inside(Span),
    Below,
    Above,
}

pub(crate) fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    lo + t * (hi - lo)
}

/// Locate finite `x` in the strictly increasing, non-empty slice `xs`.
pub(crate) fn locate(xs: &[f64], x: f64) -> Located {
    let n = xs.len();
    if x < xs[0] {
        return Located::Below;
    }
    if x > xs[n - 1] {
        return Located::Above;
    }
    // First node >= x; exists because x <= last.
    let i = xs.partition_point(|&v| v < x);
    if xs[i] == x {
        Located::Inside(Span::Node(i))
    } else {
        Located::Inside(Span::Between(i - 1, (x - xs[i - 1]) / (xs[i] - xs[i - 1])))
    }
}

/// True when every element is strictly greater than the one before it.
pub(crate) fn strictly_increasing(xs: &[f64]) -> bool {
    xs.windows(2).all(|w| w[1] > w[0])
}
