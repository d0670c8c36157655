use ndarray::Array1;

/// Dimension des vecteurs d'entrée et de sortie (numéros 1-90).
pub const INPUT_DIM: usize = 90;

/// Encode un tirage en vecteur multi-hot de dimension 90 : indice (n-1) à 1.0.
/// Les numéros hors plage sont ignorés.
pub fn encode_numbers(numbers: &[u8]) -> Array1<f64> {
    let mut v = Array1::zeros(INPUT_DIM);
    for &n in numbers {
        if n >= 1 && (n as usize) <= INPUT_DIM {
            v[(n - 1) as usize] = 1.0;
        }
    }
    v
}

/// Numéros associés aux `k` plus fortes activations, dans l'ordre décroissant.
/// À activation égale, le plus petit numéro passe devant.
pub fn top_numbers(output: &Array1<f64>, k: usize) -> Vec<u8> {
    let mut indices: Vec<usize> = (0..output.len()).collect();
    indices.sort_by(|&a, &b| {
        output[b]
            .partial_cmp(&output[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    indices.into_iter().take(k).map(|i| (i + 1) as u8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_dimension_and_sum() {
        let v = encode_numbers(&[3, 15, 27, 38, 90]);
        assert_eq!(v.len(), INPUT_DIM);
        assert!((v.sum() - 5.0).abs() < 1e-10);
        assert_eq!(v[89], 1.0);
        assert_eq!(v[0], 0.0);
    }

    #[test]
    fn test_encode_ignores_out_of_range() {
        let v = encode_numbers(&[0, 91, 1]);
        assert!((v.sum() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_top_numbers_order() {
        let mut out = Array1::zeros(INPUT_DIM);
        out[9] = 0.9;
        out[4] = 0.5;
        out[70] = 0.5;
        let top = top_numbers(&out, 3);
        assert_eq!(top, vec![10, 5, 71]);
    }
}
