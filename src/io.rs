//! Safetensors I/O.
//!
//! Reader: recordings exported as safetensors with keys
//!   `data`      [C, T]  F32   signal in original units
//!   `sfreq`     [1]     F32   sampling rate (Hz)
//!   `ch_names`  bytes         optional, newline-separated UTF-8
//!
//! Writer: [`StWriter`] for arbitrary F32/I32 tensors and [`write_dataset`]
//! for the final feature dataset.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use serde_json::Value;

use crate::dataset::Dataset;
use crate::features::FeatureVector;

// ── Low-level safetensors parser ─────────────────────────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let mut len = [0u8; 8];
    len.copy_from_slice(&bytes[..8]);
    let n = u64::from_le_bytes(len) as usize;
    let end = 8usize.checked_add(n).filter(|&e| e <= bytes.len())
        .context("safetensors header length exceeds file size")?;
    let header: HashMap<String, Value> =
        serde_json::from_slice(&bytes[8..end]).context("failed to parse safetensors header")?;
    Ok((header, end))
}

fn tensor_bytes<'a>(bytes: &'a [u8], data_start: usize, entry: &Value) -> Result<&'a [u8]> {
    let offsets = entry["data_offsets"].as_array().context("missing data_offsets")?;
    let (s, e) = match offsets.as_slice() {
        [s, e] => (
            s.as_u64().context("bad data offset")? as usize,
            e.as_u64().context("bad data offset")? as usize,
        ),
        _ => bail!("data_offsets must have two entries"),
    };
    let start = data_start.checked_add(s);
    let end = data_start.checked_add(e);
    start
        .zip(end)
        .and_then(|(start, end)| bytes.get(start..end))
        .context("tensor data out of bounds")
}

fn read_f32_tensor(bytes: &[u8], data_start: usize, entry: &Value) -> Result<Vec<f32>> {
    if entry["dtype"].as_str() != Some("F32") {
        bail!("expected F32 tensor, got {}", entry["dtype"]);
    }
    let raw = tensor_bytes(bytes, data_start, entry)?;
    Ok(raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn shape_of(entry: &Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("missing shape")?
        .iter()
        .map(|v| v.as_u64().map(|d| d as usize).context("bad shape entry"))
        .collect()
}

// ── Recording reader ─────────────────────────────────────────────────────────

/// One multi-channel recording.
#[derive(Debug, Clone)]
pub struct Recording {
    /// [C, T] in original units.
    pub data: Array2<f32>,
    /// Sampling rate (Hz).
    pub sfreq: f32,
    /// Channel names (empty if the file carries none).
    pub ch_names: Vec<String>,
}

impl Recording {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let (header, data_start) = parse_header(&bytes)?;

        let data_entry = header.get("data").context("missing 'data' key")?;
        let shape = shape_of(data_entry)?;
        let [n_ch, n_t] = shape[..] else {
            bail!("'data' must be 2-D, got shape {shape:?}");
        };
        let values = read_f32_tensor(&bytes, data_start, data_entry)?;
        let data = Array2::from_shape_vec((n_ch, n_t), values).context("'data' size does not match its shape")?;

        let sfreq_entry = header.get("sfreq").context("missing 'sfreq' key")?;
        let sfreq = *read_f32_tensor(&bytes, data_start, sfreq_entry)?
            .first()
            .context("empty 'sfreq' tensor")?;
        if sfreq.is_nan() || sfreq <= 0.0 {
            bail!("non-positive sampling rate {sfreq}");
        }

        let ch_names = match header.get("ch_names") {
            Some(e) => std::str::from_utf8(tensor_bytes(&bytes, data_start, e)?)?
                .split('\n')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => vec![],
        };
        if !ch_names.is_empty() && ch_names.len() != n_ch {
            bail!("{} channel names for {n_ch} channels", ch_names.len());
        }

        Ok(Recording { data, sfreq, ch_names })
    }

    /// Whole seconds of signal: `floor(T / sfreq)`.
    pub fn duration_secs(&self) -> u32 {
        (self.data.ncols() as f64 / self.sfreq as f64).floor() as u32
    }

    /// Drop channels whose normalised name appears in `exclude`.
    ///
    /// Name normalisation: lowercase + strip spaces.
    pub fn drop_channels(&mut self, exclude: &[String]) {
        if self.ch_names.is_empty() || exclude.is_empty() {
            return;
        }
        let norm = |s: &str| s.replace(' ', "").to_lowercase();
        let excluded: Vec<String> = exclude.iter().map(|s| norm(s)).collect();
        let keep: Vec<usize> = (0..self.ch_names.len())
            .filter(|&i| !excluded.contains(&norm(&self.ch_names[i])))
            .collect();
        if keep.len() == self.ch_names.len() {
            return;
        }
        self.data = self.data.select(ndarray::Axis(0), &keep);
        self.ch_names = keep.iter().map(|&i| self.ch_names[i].clone()).collect();
    }
}

/// Shape and sampling rate of a recording, read without loading the signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordingInfo {
    pub n_chan: usize,
    pub n_times: usize,
    pub sfreq: f32,
}

impl RecordingInfo {
    pub fn probe(path: &Path) -> Result<Self> {
        use std::io::{Read, Seek, SeekFrom};

        let mut f = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
        let file_len = f.metadata().with_context(|| format!("stat {}", path.display()))?.len();
        let mut len = [0u8; 8];
        f.read_exact(&mut len).context("safetensors file too small")?;
        let n = u64::from_le_bytes(len);
        if 8u64.checked_add(n).map_or(true, |end| end > file_len) {
            bail!("safetensors header length {n} exceeds file size {file_len}");
        }
        let mut hdr = vec![0u8; n as usize];
        f.read_exact(&mut hdr).context("truncated safetensors header")?;
        let header: HashMap<String, Value> =
            serde_json::from_slice(&hdr).context("failed to parse safetensors header")?;

        let shape = shape_of(header.get("data").context("missing 'data' key")?)?;
        let [n_chan, n_times] = shape[..] else {
            bail!("'data' must be 2-D, got shape {shape:?}");
        };

        let sfreq_entry = header.get("sfreq").context("missing 'sfreq' key")?;
        let offset = sfreq_entry["data_offsets"][0].as_u64().context("bad 'sfreq' offset")?;
        let sfreq_at = (8 + n).checked_add(offset).context("bad 'sfreq' offset")?;
        f.seek(SeekFrom::Start(sfreq_at))?;
        let mut raw = [0u8; 4];
        f.read_exact(&mut raw).context("reading 'sfreq'")?;
        let sfreq = f32::from_le_bytes(raw);
        if sfreq.is_nan() || sfreq <= 0.0 {
            bail!("non-positive sampling rate {sfreq}");
        }

        Ok(Self { n_chan, n_times, sfreq })
    }

    /// Whole seconds of signal: `floor(T / sfreq)`.
    pub fn duration_secs(&self) -> u32 {
        (self.n_times as f64 / self.sfreq as f64).floor() as u32
    }
}

// ── Generic safetensors builder ───────────────────────────────────────────────

/// Simple safetensors file writer for F32 and I32 tensors and raw bytes.
///
/// ```rust,no_run
/// use ictal::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f32("sfreq", &[256.0], &[1]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn add_f32_arr2(&mut self, name: &str, arr: &Array2<f32>) {
        let data: Vec<f32> = arr.iter().copied().collect();
        self.add_f32(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    /// Newline-joined UTF-8 strings stored as a U8 tensor.
    pub fn add_strings(&mut self, name: &str, items: &[String]) {
        let bytes = items.join("\n").into_bytes();
        let n = bytes.len();
        self.entries.push((name.to_string(), bytes, "U8", vec![n]));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let mut hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        hdr_bytes.extend(std::iter::repeat(b' ').take(pad));

        let mut f = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(hdr_bytes.len() as u64).to_le_bytes())?;
        f.write_all(&hdr_bytes)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

// ── Dataset writer ───────────────────────────────────────────────────────────

fn stack(vectors: &[FeatureVector]) -> Vec<f32> {
    vectors
        .iter()
        .flat_map(|v| v.values.iter().map(|&x| x as f32))
        .collect()
}

/// Write the dataset as `seizure` [N, D] and `non_seizure` [M, D] F32 tensors
/// plus `n_seizure` / `n_non_seizure` I32 scalars.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    let width = dataset.mode.vector_len();
    for v in dataset.seizure.iter().chain(dataset.non_seizure.iter()) {
        if v.values.len() != width {
            bail!("feature vector of length {} in a {width}-wide dataset", v.values.len());
        }
    }

    let mut w = StWriter::new();
    let (n_s, n_ns) = (dataset.seizure.len(), dataset.non_seizure.len());
    w.add_f32("seizure", &stack(&dataset.seizure), &[n_s, width]);
    w.add_f32("non_seizure", &stack(&dataset.non_seizure), &[n_ns, width]);
    w.add_i32("n_seizure", &[n_s as i32], &[1]);
    w.add_i32("n_non_seizure", &[n_ns as i32], &[1]);
    w.write(path)
}
