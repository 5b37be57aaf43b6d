/// Shared fixtures: synthetic summary text, an in-memory backend and a
/// safetensors recording writer.
use std::collections::HashMap;
use std::path::Path;

use anyhow::anyhow;
use ictal::{Band, FileRecord, SegmentBackend, SeizureEvent, Segment, Skip, StWriter, SubjectId, SubjectIndex, Window};
use ndarray::Array2;

#[allow(unused)]
/// One `File Name` block.  `pairs` are (start, end) in seconds; the count line
/// says `count`, which need not match `pairs.len()`.
pub fn block(file: &str, count: &str, pairs: &[(u32, u32)]) -> String {
    let mut s = format!(
        "File Name: {file}\nFile Start Time: 10:00:00\nFile End Time: 11:00:00\n\
         Number of Seizures in File: {count}\n"
    );
    for (i, (start, end)) in pairs.iter().enumerate() {
        let k = i + 1;
        s.push_str(&format!("Seizure {k} Start Time: {start} seconds\n"));
        s.push_str(&format!("Seizure {k} End Time: {end} seconds\n"));
    }
    s.push('\n');
    s
}

#[allow(unused)]
/// Header that precedes the file blocks in real summaries.
pub fn summary_header() -> String {
    "Data Sampling Rate: 256 Hz\n\
     *************************\n\n\
     Channels in EDF Files:\n\
     **********************\n\
     Channel 1: FP1-F7\n\
     Channel 2: F7-T7\n\n"
        .to_string()
}

#[allow(unused)]
pub fn index_with(subject: u32, files: &[(&str, &[(u32, u32)], u32)]) -> SubjectIndex {
    let mut idx = SubjectIndex::new(SubjectId(subject));
    for &(file, events, duration) in files {
        if events.is_empty() {
            idx.file_records.push(FileRecord::non_seizure(file));
        } else {
            for &(s, e) in events {
                idx.file_records.push(FileRecord::seizure(file, SeizureEvent::new(s, e).unwrap()));
            }
        }
        idx.durations.insert(file.to_string(), duration);
    }
    // Seizure records first, like the parser-backed index.
    idx.file_records.sort_by_key(|r| !r.is_seizure());
    idx
}

/// In-memory backend.  Every band of every segment is filled with the
/// subject id, so vectors can be traced back to their subject.
#[allow(unused)]
#[derive(Default)]
pub struct MockBackend {
    pub indices: HashMap<u32, SubjectIndex>,
    pub failing_files: Vec<String>,
    pub missing_band: Option<Band>,
}

#[allow(unused)]
impl MockBackend {
    pub fn with_index(mut self, index: SubjectIndex) -> Self {
        self.indices.insert(index.subject_id.0, index);
        self
    }
}

impl SegmentBackend for MockBackend {
    fn load_index(&self, subject: SubjectId) -> anyhow::Result<SubjectIndex> {
        self.indices
            .get(&subject.0)
            .cloned()
            .ok_or_else(|| anyhow!("no index for subject {subject}"))
    }

    fn load_segment(&self, subject: SubjectId, window: &Window) -> Result<Segment, Skip> {
        if self.failing_files.contains(&window.file_id) {
            return Err(Skip::backend(&window.file_id, "simulated filter failure"));
        }
        let mut seg = Segment::new();
        for band in Band::ALL {
            if Some(band) != self.missing_band {
                seg.insert(band, Array2::from_elem((4, 32), subject.0 as f32));
            }
        }
        Ok(seg)
    }
}

#[allow(unused)]
/// Write a `[n_ch, duration·sfreq]` recording whose channels are sines.
pub fn write_recording(path: &Path, ch_names: &[&str], sfreq: f32, duration_secs: u32) {
    let n_t = (duration_secs as f32 * sfreq) as usize;
    let data = Array2::from_shape_fn((ch_names.len(), n_t), |(c, t)| {
        let f = 3.0 + 4.0 * c as f32;
        (2.0 * std::f32::consts::PI * f * t as f32 / sfreq).sin() * 50.0
    });
    let names: Vec<String> = ch_names.iter().map(|s| s.to_string()).collect();
    let mut w = StWriter::new();
    w.add_f32_arr2("data", &data);
    w.add_f32("sfreq", &[sfreq], &[1]);
    w.add_strings("ch_names", &names);
    w.write(path).unwrap();
}
