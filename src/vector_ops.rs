use crate::config::{Number, EPSILON};
use wide::f32x8;

const LANES: usize = 8;

/// Cosine similarity `dot(a, b) / (|a| * |b|)` computed in SIMD lanes of eight.
///
/// Returns `None` when the lengths differ and `Some(0.0)` when either vector
/// has (near) zero magnitude. The result is clamped to `[-1, 1]`.
pub fn compute_cosine_similarity_simd(a: &[Number], b: &[Number]) -> Option<Number> {
    if a.len() != b.len() {
        tracing::trace!(left = a.len(), right = b.len(), "vector length mismatch");
        return None;
    }

    let mut dot_product = f32x8::splat(0.0);
    let mut mag_a = f32x8::splat(0.0);
    let mut mag_b = f32x8::splat(0.0);

    let chunks_a = a.chunks_exact(LANES);
    let chunks_b = b.chunks_exact(LANES);
    let rest_a = chunks_a.remainder();
    let rest_b = chunks_b.remainder();

    for (ca, cb) in chunks_a.zip(chunks_b) {
        let va = lane(ca);
        let vb = lane(cb);
        dot_product += va * vb;
        mag_a += va * va;
        mag_b += vb * vb;
    }

    let mut scalar_dot_product = dot_product.reduce_add();
    let mut scalar_mag_a = mag_a.reduce_add();
    let mut scalar_mag_b = mag_b.reduce_add();

    for (&x, &y) in rest_a.iter().zip(rest_b) {
        scalar_dot_product += x * y;
        scalar_mag_a += x * x;
        scalar_mag_b += y * y;
    }

    let denominator = (scalar_mag_a * scalar_mag_b).sqrt();
    if denominator < EPSILON {
        return Some(0.0);
    }
    Some((scalar_dot_product / denominator).clamp(-1.0, 1.0))
}

fn lane(chunk: &[Number]) -> f32x8 {
    let mut buf = [0.0; LANES];
    buf.copy_from_slice(chunk);
    f32x8::new(buf)
}

pub fn normalize_vector(vector: &mut [Number]) {
    let magnitude: Number = vector.iter().map(|&x| x * x).sum::<Number>().sqrt();
    if magnitude > EPSILON {
        for x in vector.iter_mut() {
            *x /= magnitude;
        }
    }
}

/// True when every element is a finite number.
pub fn is_finite_vector(vector: &[Number]) -> bool {
    vector.iter().all(|x| x.is_finite())
}

/// Index of the highest score. The first index wins ties; NaN scores are
/// never selected.
pub fn argmax(scores: &[Number]) -> Option<usize> {
    let mut best: Option<(usize, Number)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, top)) => score > top,
        };
        if better {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}
