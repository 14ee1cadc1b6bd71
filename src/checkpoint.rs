//! Versioned persistence of trained models.

use crate::error::{ForecastError, Result};
use crate::ssa::{LinearRecurrentFormula, SignalSubspace, TrainedModel};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Current checkpoint format version.
const CHECKPOINT_VERSION: u32 = 1;

/// The on-disk record: everything needed to reproduce forecasts exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CheckpointRecord {
    version: u32,
    window_size: usize,
    rank: usize,
    singular_values: Vec<f64>,
    basis: Vec<Vec<f64>>,
    lrf_coefficients: Vec<f64>,
    trailing_buffer: Vec<f64>,
    residual_sigma: f64,
    non_negative: bool,
}

/// Serialize a trained model to a writer.
pub fn save_checkpoint<W: Write>(model: &TrainedModel, mut writer: W) -> Result<()> {
    let record = CheckpointRecord {
        version: CHECKPOINT_VERSION,
        window_size: model.window_size(),
        rank: model.rank(),
        singular_values: model.subspace().singular_values().to_vec(),
        basis: model.subspace().basis().to_vec(),
        lrf_coefficients: model.lrf().coefficients().to_vec(),
        trailing_buffer: model.trailing_buffer().to_vec(),
        residual_sigma: model.residual_sigma(),
        non_negative: model.non_negative(),
    };

    bincode::serde::encode_into_std_write(&record, &mut writer, bincode::config::standard())
        .map_err(|e| ForecastError::CheckpointIo(e.to_string()))?;
    Ok(())
}

/// Deserialize a trained model from a reader, validating its structure.
pub fn load_checkpoint<R: Read>(mut reader: R) -> Result<TrainedModel> {
    let record: CheckpointRecord =
        bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
            .map_err(|e| ForecastError::CorruptCheckpoint(e.to_string()))?;

    validate_record(&record)?;

    let subspace = SignalSubspace::from_parts(record.basis, record.singular_values);
    let lrf = LinearRecurrentFormula::from_coefficients(record.lrf_coefficients);

    Ok(TrainedModel::from_parts(
        subspace,
        lrf,
        record.trailing_buffer,
        record.residual_sigma,
        record.window_size,
        record.non_negative,
    ))
}

/// Save a trained model to a file.
pub fn save_checkpoint_file<P: AsRef<Path>>(model: &TrainedModel, path: P) -> Result<()> {
    let file =
        File::create(path.as_ref()).map_err(|e| ForecastError::CheckpointIo(e.to_string()))?;
    save_checkpoint(model, BufWriter::new(file))
}

/// Load a trained model from a file.
pub fn load_checkpoint_file<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
    let file =
        File::open(path.as_ref()).map_err(|e| ForecastError::CheckpointIo(e.to_string()))?;
    load_checkpoint(BufReader::new(file))
}

fn validate_record(record: &CheckpointRecord) -> Result<()> {
    if record.version != CHECKPOINT_VERSION {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "unsupported version {} (expected {})",
            record.version, CHECKPOINT_VERSION
        )));
    }
    if record.window_size < 2 {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "window size {} must be at least 2",
            record.window_size
        )));
    }
    if record.rank == 0 || record.rank >= record.window_size {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "rank {} not in [1, {})",
            record.rank, record.window_size
        )));
    }
    if record.basis.len() != record.rank {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "basis vector count {} does not match rank {}",
            record.basis.len(),
            record.rank
        )));
    }
    if record.singular_values.len() != record.rank {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "singular value count {} does not match rank {}",
            record.singular_values.len(),
            record.rank
        )));
    }
    for vector in &record.basis {
        if vector.len() != record.window_size {
            return Err(ForecastError::CorruptCheckpoint(format!(
                "basis vector length {} does not match window size {}",
                vector.len(),
                record.window_size
            )));
        }
    }
    let order = record.window_size - 1;
    if record.lrf_coefficients.len() != order {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "coefficient count {} does not match window size {}",
            record.lrf_coefficients.len(),
            record.window_size
        )));
    }
    if record.trailing_buffer.len() != order {
        return Err(ForecastError::CorruptCheckpoint(format!(
            "trailing buffer length {} does not match window size {}",
            record.trailing_buffer.len(),
            record.window_size
        )));
    }
    if !record.residual_sigma.is_finite() || record.residual_sigma < 0.0 {
        return Err(ForecastError::CorruptCheckpoint(
            "residual sigma must be finite and non-negative".to_string(),
        ));
    }
    let payload = record
        .singular_values
        .iter()
        .chain(record.basis.iter().flatten())
        .chain(record.lrf_coefficients.iter())
        .chain(record.trailing_buffer.iter());
    for value in payload {
        if !value.is_finite() {
            return Err(ForecastError::CorruptCheckpoint(
                "non-finite value in checkpoint payload".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use crate::ssa::{train, SsaConfig};
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn trained_model() -> TrainedModel {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..365).map(|i| base + Duration::days(i)).collect();
        let values = (0..365)
            .map(|t| 100.0 + 10.0 * (2.0 * std::f64::consts::PI * t as f64 / 7.0).sin())
            .collect();
        let series = TimeSeries::new(timestamps, values).unwrap();
        let config = SsaConfig::new(7, 30, 365, 4).unwrap();
        train(&series, &config).unwrap()
    }

    fn record_for(model: &TrainedModel) -> CheckpointRecord {
        CheckpointRecord {
            version: CHECKPOINT_VERSION,
            window_size: model.window_size(),
            rank: model.rank(),
            singular_values: model.subspace().singular_values().to_vec(),
            basis: model.subspace().basis().to_vec(),
            lrf_coefficients: model.lrf().coefficients().to_vec(),
            trailing_buffer: model.trailing_buffer().to_vec(),
            residual_sigma: model.residual_sigma(),
            non_negative: model.non_negative(),
        }
    }

    fn load_from_record(record: &CheckpointRecord) -> Result<TrainedModel> {
        let bytes =
            bincode::serde::encode_to_vec(record, bincode::config::standard()).unwrap();
        load_checkpoint(bytes.as_slice())
    }

    #[test]
    fn round_trip_reproduces_forecasts() {
        let model = trained_model();
        let mut buffer = Vec::new();
        save_checkpoint(&model, &mut buffer).unwrap();
        let reloaded = load_checkpoint(buffer.as_slice()).unwrap();

        let original = model.forecast(14, 0.95).unwrap();
        let restored = reloaded.forecast(14, 0.95).unwrap();
        for i in 0..14 {
            assert_relative_eq!(
                original.point()[i],
                restored.point()[i],
                max_relative = 1e-9
            );
            assert_relative_eq!(
                original.lower()[i],
                restored.lower()[i],
                max_relative = 1e-9,
                epsilon = 1e-9
            );
            assert_relative_eq!(
                original.upper()[i],
                restored.upper()[i],
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn garbage_bytes_are_corrupt() {
        let err = load_checkpoint(&[0xde, 0xad, 0xbe, 0xef][..]).unwrap_err();
        assert!(matches!(err, ForecastError::CorruptCheckpoint(_)));
    }

    #[test]
    fn version_mismatch_is_corrupt() {
        let model = trained_model();
        let mut record = record_for(&model);
        record.version = 99;
        let err = load_from_record(&record).unwrap_err();
        assert!(matches!(err, ForecastError::CorruptCheckpoint(_)));
    }

    #[test]
    fn buffer_length_mismatch_is_corrupt() {
        let model = trained_model();
        let mut record = record_for(&model);
        record.trailing_buffer.pop();
        let err = load_from_record(&record).unwrap_err();
        assert!(matches!(err, ForecastError::CorruptCheckpoint(_)));
    }

    #[test]
    fn basis_shape_mismatch_is_corrupt() {
        let model = trained_model();

        let mut record = record_for(&model);
        record.basis.pop();
        assert!(matches!(
            load_from_record(&record).unwrap_err(),
            ForecastError::CorruptCheckpoint(_)
        ));

        let mut record = record_for(&model);
        record.basis[0].push(0.0);
        assert!(matches!(
            load_from_record(&record).unwrap_err(),
            ForecastError::CorruptCheckpoint(_)
        ));
    }

    #[test]
    fn non_finite_payload_is_corrupt() {
        let model = trained_model();
        let mut record = record_for(&model);
        record.lrf_coefficients[0] = f64::NAN;
        let err = load_from_record(&record).unwrap_err();
        assert!(matches!(err, ForecastError::CorruptCheckpoint(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_checkpoint_file("/nonexistent/model.ckpt").unwrap_err();
        assert!(matches!(err, ForecastError::CheckpointIo(_)));
    }
}
