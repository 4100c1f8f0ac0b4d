// Vector math for profile matching.
//
// Cosine similarity compares the direction of two embeddings and ignores
// their magnitude, so a short post and a long article about the same thing
// land close together. Unlike a clamped score, the full [-1, 1] range is kept:
// a profile pointing away from the content should rank below an orthogonal one.

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Largest absolute component, or 0.0 for an empty vector.
fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

/// True when every component is exactly zero.
pub fn is_zero(v: &[f64]) -> bool {
    v.iter().all(|&x| x == 0.0)
}

/// Euclidean (L2) norm.
///
/// Components are scaled by the largest magnitude first, so squaring
/// neither overflows near 1e200 nor underflows near 1e-200.
pub fn norm(v: &[f64]) -> f64 {
    let scale = max_abs(v);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    scale * v.iter().map(|x| (x / scale).powi(2)).sum::<f64>().sqrt()
}

/// Cosine similarity between two embedding vectors.
///
/// Returns `None` when the similarity is undefined: mismatched lengths, empty
/// input, a non-finite component, or an all-zero vector on either side. The
/// matcher turns each of those into a typed error before calling this.
///
/// Cosine is scale-invariant, so both sides are divided by their largest
/// magnitude before any product is taken. Every scaled component lies in
/// [-1, 1] and each scaled vector has norm of at least 1.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    if !a.iter().chain(b).all(|x| x.is_finite()) {
        return None;
    }

    let (scale_a, scale_b) = (max_abs(a), max_abs(b));
    if scale_a == 0.0 || scale_b == 0.0 {
        return None;
    }

    let a: Vec<f64> = a.iter().map(|x| x / scale_a).collect();
    let b: Vec<f64> = b.iter().map(|x| x / scale_b).collect();
    let denom = (dot(&a, &a) * dot(&b, &b)).sqrt();

    // Rounding can push parallel vectors a hair past 1.0
    Some((dot(&a, &b) / denom).clamp(-1.0, 1.0))
}

/// Mean of a set of equal-length vectors.
///
/// Returns `None` for an empty set or when the lengths disagree.
pub fn mean_embedding<V: AsRef<[f64]>>(embeddings: &[V]) -> Option<Vec<f64>> {
    let first = embeddings.first()?.as_ref();
    let dim = first.len();

    let mut mean = vec![0.0_f64; dim];
    for emb in embeddings {
        let emb = emb.as_ref();
        if emb.len() != dim {
            return None;
        }
        for (acc, &val) in mean.iter_mut().zip(emb) {
            *acc += val;
        }
    }

    let n = embeddings.len() as f64;
    for val in &mut mean {
        *val /= n;
    }

    Some(mean)
}
