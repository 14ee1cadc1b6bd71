//! Adapter from raw demand records to the training and evaluation series.
//!
//! Loading the records is the data-source collaborator's job; this module
//! only splits already loaded rows into the two eras the engine consumes.

use crate::core::TimeSeries;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw demand observation.
///
/// `period_indicator` partitions the history into a training era and an
/// evaluation era (for the bike-demand data it is the year column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub timestamp: DateTime<Utc>,
    pub period_indicator: f64,
    pub value: f64,
}

/// Split records into (training era, evaluation era) around a boundary.
///
/// Training takes `period_indicator < boundary`, evaluation takes
/// `period_indicator >= boundary`. Records may arrive unsorted; each era
/// is sorted by timestamp before series construction. Duplicate
/// timestamps within an era are rejected.
pub fn split_by_period(
    records: &[DemandRecord],
    boundary: f64,
) -> Result<(TimeSeries, TimeSeries)> {
    let mut training: Vec<&DemandRecord> = Vec::new();
    let mut evaluation: Vec<&DemandRecord> = Vec::new();
    for record in records {
        if record.period_indicator < boundary {
            training.push(record);
        } else {
            evaluation.push(record);
        }
    }

    Ok((era_series(&mut training)?, era_series(&mut evaluation)?))
}

fn era_series(records: &mut [&DemandRecord]) -> Result<TimeSeries> {
    records.sort_by_key(|r| r.timestamp);
    let timestamps = records.iter().map(|r| r.timestamp).collect();
    let values = records.iter().map(|r| r.value).collect();
    TimeSeries::new(timestamps, values)
}
