use crate::annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
use crate::annotations::detection::Detection;
use crate::error::PredictResult;
use serde::{Deserialize, Serialize};
use std::io::Write;

pub const COLUMNS: [&str; 6] = ["xmin", "ymin", "xmax", "ymax", "score", "label"];

/// One row of a [`DetectionTable`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DetectionRow {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
    pub score: f32,
    pub label: String,
}

impl<T: BoundingBoxGeometry> From<&Detection<T>> for DetectionRow {
    fn from(detection: &Detection<T>) -> Self {
        let (xmin, ymin, xmax, ymax) = detection.annotation.as_xyxy();
        DetectionRow {
            xmin,
            ymin,
            xmax,
            ymax,
            score: detection.confidence,
            label: detection.annotation.category().to_string(),
        }
    }
}

/// Detections of one image as a table with the columns in [`COLUMNS`], one row per detection.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DetectionTable {
    pub rows: Vec<DetectionRow>,
}

impl DetectionTable {
    pub fn from_detections(detections: &[Detection<BoundingBox>]) -> Self {
        DetectionTable {
            rows: detections.iter().map(DetectionRow::from).collect(),
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the table as csv. The header is written even when there are no rows.
    pub fn write_csv<W: Write>(&self, writer: W) -> PredictResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(COLUMNS)?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the rows as a json array of objects keyed by column name.
    pub fn write_json<W: Write>(&self, mut writer: W) -> PredictResult<()> {
        serde_json::to_writer_pretty(&mut writer, &self.rows)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
