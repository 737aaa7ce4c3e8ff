use crate::error::{Error, Result};

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Check that `data` is a non-empty set of finite points sharing one dimension.
///
/// Returns that dimension.
pub(crate) fn validate_points(data: &[Vec<f32>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for (i, point) in data.iter().enumerate() {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        if let Some(dim) = point.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteCoordinate { point: i, dim });
        }
    }
    Ok(d)
}

/// Reject a NaN, zero or negative neighborhood radius.
pub(crate) fn validate_eps(eps: f32) -> Result<()> {
    if eps.is_nan() || eps <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "epsilon",
            message: "must be positive",
        });
    }
    Ok(())
}

/// Check `eps` and `min_samples` before any work is scheduled.
pub(crate) fn validate_params(eps: f32, min_samples: usize) -> Result<()> {
    validate_eps(eps)?;
    if min_samples == 0 {
        return Err(Error::InvalidParameter {
            name: "min_pts",
            message: "must be at least 1",
        });
    }
    Ok(())
}

/// Allocate `n` copies of `value`, reporting allocation failure as an error.
pub(crate) fn try_filled<T: Clone>(what: &'static str, n: usize, value: T) -> Result<Vec<T>> {
    let mut v = try_with_capacity(what, n)?;
    v.resize(n, value);
    Ok(v)
}

/// `Vec::with_capacity` that reports allocation failure instead of aborting.
pub(crate) fn try_with_capacity<T>(what: &'static str, n: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|_| Error::ResourceExhausted { what, requested: n })?;
    Ok(v)
}
