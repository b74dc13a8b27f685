use bodycap_core::{config::JointColumns, joint::JointSchema, point::Point};
use bodycap_zed::BodyData;
use std::{fs::File, io::Write, path::Path, time::Duration};

use crate::error::CaptureError;

/// One output row: the first tracked body at a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestep: Duration,
    pub id: i32,
    pub position: Point,
    /// Positions of the included joints, in schema order.
    pub joints: Vec<Point>,
}

impl Sample {
    pub fn from_body(timestep: Duration, body: &BodyData, schema: &JointSchema) -> Self {
        Self {
            timestep,
            id: body.id,
            position: body.position,
            joints: schema
                .included()
                .map(|joint| body.keypoints[joint.index])
                .collect(),
        }
    }
}

/// Appends samples to a CSV table. The header is written on construction.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    layout: JointColumns,
    rows: usize,
}

impl CsvSink<File> {
    pub fn create(
        path: impl AsRef<Path>,
        schema: &JointSchema,
        layout: JointColumns,
    ) -> Result<Self, CaptureError> {
        let file = File::create(path)?;
        Self::new(file, schema, layout)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W, schema: &JointSchema, layout: JointColumns) -> Result<Self, CaptureError> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(Self::header(schema, layout))?;
        writer.flush()?;
        Ok(Self {
            writer,
            layout,
            rows: 0,
        })
    }

    pub fn header(schema: &JointSchema, layout: JointColumns) -> Vec<String> {
        let mut labels: Vec<String> = ["timestep", "ID", "pos.x", "pos.y", "pos.z"]
            .iter()
            .map(|label| label.to_string())
            .collect();
        for joint in schema.included() {
            match layout {
                JointColumns::Packed => labels.push(joint.name.to_string()),
                JointColumns::Split => {
                    labels.extend(["x", "y", "z"].iter().map(|axis| format!("{}.{axis}", joint.name)))
                }
            }
        }
        labels
    }

    /// Writes and flushes one row.
    pub fn append(&mut self, sample: &Sample) -> Result<(), CaptureError> {
        let mut record = vec![
            sample.timestep.as_secs_f64().to_string(),
            sample.id.to_string(),
            sample.position.x.to_string(),
            sample.position.y.to_string(),
            sample.position.z.to_string(),
        ];
        for joint in &sample.joints {
            match self.layout {
                JointColumns::Packed => {
                    record.push(format!("[{} {} {}]", joint.x, joint.y, joint.z))
                }
                JointColumns::Split => {
                    record.extend([joint.x, joint.y, joint.z].iter().map(|v| v.to_string()))
                }
            }
        }
        self.writer.write_record(&record)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), CaptureError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, CaptureError> {
        self.writer
            .into_inner()
            .map_err(|e| CaptureError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> BodyData {
        let mut body = BodyData::new(3, Point::new(1.5, -0.25, 2.));
        for (i, keypoint) in body.keypoints.iter_mut().enumerate() {
            *keypoint = Point::new(i as f32, i as f32 * 0.5, -(i as f32));
        }
        body
    }

    fn lines(bytes: Vec<u8>) -> Vec<String> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    pub fn test_packed_header() {
        let schema = JointSchema::body_34();
        let header = CsvSink::<Vec<u8>>::header(&schema, JointColumns::Packed);
        assert_eq!(header.len(), 5 + schema.included_count());
        assert_eq!(&header[..6], ["timestep", "ID", "pos.x", "pos.y", "pos.z", "Pelvis"]);
        assert_eq!(header.last().map(String::as_str), Some("Right_Hip"));
    }

    #[test]
    pub fn test_split_header() {
        let schema = JointSchema::with_included(&["Neck"]).unwrap();
        let header = CsvSink::<Vec<u8>>::header(&schema, JointColumns::Split);
        assert_eq!(
            header,
            ["timestep", "ID", "pos.x", "pos.y", "pos.z", "Neck.x", "Neck.y", "Neck.z"]
        );
    }

    #[test]
    pub fn test_sample_picks_included_joints() {
        let schema = JointSchema::with_included(&["Head", "Pelvis"]).unwrap();
        let sample = Sample::from_body(Duration::from_millis(200), &body(), &schema);
        assert_eq!(sample.id, 3);
        assert_eq!(
            sample.joints,
            vec![Point::new(0., 0., -0.), Point::new(26., 13., -26.)]
        );
    }

    #[test]
    pub fn test_append_packed_row() {
        let schema = JointSchema::with_included(&["Neck", "Right_Hip"]).unwrap();
        let mut sink = CsvSink::new(Vec::new(), &schema, JointColumns::Packed).unwrap();
        sink.append(&Sample::from_body(Duration::from_millis(100), &body(), &schema))
            .unwrap();
        assert_eq!(sink.rows(), 1);

        let lines = lines(sink.into_inner().unwrap());
        assert_eq!(
            lines,
            vec![
                "timestep,ID,pos.x,pos.y,pos.z,Neck,Right_Hip",
                "0.1,3,1.5,-0.25,2,[3 1.5 -3],[22 11 -22]",
            ]
        );
    }

    #[test]
    pub fn test_append_split_row() {
        let schema = JointSchema::with_included(&["Neck"]).unwrap();
        let mut sink = CsvSink::new(Vec::new(), &schema, JointColumns::Split).unwrap();
        sink.append(&Sample::from_body(Duration::ZERO, &body(), &schema))
            .unwrap();

        let lines = lines(sink.into_inner().unwrap());
        assert_eq!(lines[1], "0,3,1.5,-0.25,2,3,1.5,-3");
    }

    #[test]
    pub fn test_values_read_back_verbatim() {
        let schema = JointSchema::with_included(&["Left_Wrist"]).unwrap();
        let mut body = BodyData::new(-1, Point::new(0.1, 1.0e-7, 123456.79));
        body.keypoints[7] = Point::new(-0.333_333_34, 2.5, 0.007);
        let mut sink = CsvSink::new(Vec::new(), &schema, JointColumns::Split).unwrap();
        sink.append(&Sample::from_body(Duration::from_millis(1300), &body, &schema))
            .unwrap();

        let bytes = sink.into_inner().unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let record = reader.records().next().unwrap().unwrap();
        let values: Vec<f32> = record
            .iter()
            .skip(2)
            .map(|field| field.parse().unwrap())
            .collect();
        assert_eq!(&record[0], "1.3");
        assert_eq!(&record[1], "-1");
        assert_eq!(values, vec![0.1, 1.0e-7, 123456.79, -0.333_333_34, 2.5, 0.007]);
    }
}
