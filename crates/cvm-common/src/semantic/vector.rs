/// L2-normalized hashed term vector. All components are non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVector(Vec<f32>);

impl TermVector {
    /// Normalizes `raw` in place; an all-zero input stays zero.
    pub fn from_raw(mut raw: Vec<f32>) -> Self {
        let norm = l2_norm(&raw);
        if norm > 0.0 {
            raw.iter_mut().for_each(|v| *v /= norm);
        }
        Self(raw)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    /// 0.0〜1.0; zero when either side is empty or the dimensions differ.
    pub fn cosine(&self, other: &TermVector) -> f32 {
        if self.0.len() != other.0.len() {
            tracing::warn!(
                left = self.0.len(),
                right = other.0.len(),
                "term vector dimension mismatch"
            );
            return 0.0;
        }
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }

        let dot: f32 = self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum();
        dot.clamp(0.0, 1.0)
    }
}

fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_unit_length() {
        let v = TermVector::from_raw(vec![3.0, 4.0]);

        assert!((l2_norm(v.as_slice()) - 1.0).abs() < 1e-6);
        assert!((v.as_slice()[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn identical_vectors_have_cosine_one() {
        let a = TermVector::from_raw(vec![1.0, 2.0, 0.0]);

        assert!((a.cosine(&a.clone()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_zero_and_mismatched_vectors_score_zero() {
        let a = TermVector::from_raw(vec![1.0, 0.0]);
        let b = TermVector::from_raw(vec![0.0, 3.0]);
        let zero = TermVector::from_raw(vec![0.0, 0.0]);
        let short = TermVector::from_raw(vec![1.0]);

        assert_eq!(a.cosine(&b), 0.0);
        assert_eq!(a.cosine(&zero), 0.0);
        assert!(zero.is_zero());
        assert_eq!(a.cosine(&short), 0.0);
    }
}
