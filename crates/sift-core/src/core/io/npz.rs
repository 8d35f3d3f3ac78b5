//! Reading the compressed pairwise-error matrix artifact.

use crate::engine::error::SiftError;
use ndarray::Array2;
use ndarray_npy::NpzReader;
use std::fs::File;
use std::path::Path;

/// Loads the pairwise-error matrix from an `.npz` archive.
///
/// The archive member holding the matrix is the one whose name contains
/// `pae`, falling back to the first member. Element type may be f32 or
/// f64 depending on the predictor build. The matrix must be square;
/// validation against declared chain lengths happens at the adapter.
pub fn read_pae_matrix(path: &Path) -> Result<Array2<f64>, SiftError> {
    let file = File::open(path).map_err(|e| SiftError::io(path, e))?;
    let mut npz =
        NpzReader::new(file).map_err(|e| SiftError::parse(path, e.to_string()))?;

    let names = npz
        .names()
        .map_err(|e| SiftError::parse(path, e.to_string()))?;
    let member = names
        .iter()
        .find(|name| name.contains("pae"))
        .or_else(|| names.first())
        .ok_or_else(|| SiftError::parse(path, "npz archive holds no arrays"))?
        .clone();

    let matrix: Array2<f64> = match npz.by_name::<ndarray::OwnedRepr<f32>, ndarray::Ix2>(&member) {
        Ok(matrix) => matrix.mapv(f64::from),
        Err(_) => npz
            .by_name::<ndarray::OwnedRepr<f64>, ndarray::Ix2>(&member)
            .map_err(|e| SiftError::parse(path, e.to_string()))?,
    };

    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(SiftError::parse(
            path,
            format!("pairwise-error matrix is not square: {}x{}", rows, cols),
        ));
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use ndarray_npy::NpzWriter;

    fn write_npz(path: &Path, name: &str, matrix: &Array2<f32>) {
        let mut npz = NpzWriter::new(File::create(path).unwrap());
        npz.add_array(name, matrix).unwrap();
        npz.finish().unwrap();
    }

    #[test]
    fn square_f32_matrix_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pae_input_model_0.npz");
        let matrix = Array2::from_shape_fn((4, 4), |(i, j)| (i + j) as f32);
        write_npz(&path, "pae", &matrix);

        let loaded = read_pae_matrix(&path).unwrap();
        assert_eq!(loaded.dim(), (4, 4));
        assert_eq!(loaded[[1, 2]], 3.0);
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pae.npz");
        let matrix = Array2::from_elem((3, 5), 1.0f32);
        write_npz(&path, "pae", &matrix);

        assert!(matches!(
            read_pae_matrix(&path),
            Err(SiftError::Parse { .. })
        ));
    }

    #[test]
    fn truncated_archive_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pae.npz");
        std::fs::write(&path, b"not a zip archive").unwrap();

        assert!(matches!(
            read_pae_matrix(&path),
            Err(SiftError::Parse { .. })
        ));
    }
}
