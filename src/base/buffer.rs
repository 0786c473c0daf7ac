use crate::StrError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds a flat numeric buffer used to marshal materials across process or storage boundaries
///
/// Values are appended with the `push` functions and read back, in the same order,
/// with the `pull` functions. Integers and flags are stored as `f64`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Buffer {
    /// Holds the values
    data: Vec<f64>,

    /// Holds the position of the next value to be pulled
    #[serde(skip)]
    cursor: usize,
}

impl Buffer {
    /// Allocates an empty buffer
    pub fn new() -> Self {
        Buffer {
            data: Vec::new(),
            cursor: 0,
        }
    }

    /// Allocates a buffer from received values (cursor at the beginning)
    pub fn from_vec(data: Vec<f64>) -> Self {
        Buffer { data, cursor: 0 }
    }

    /// Returns access to the values
    pub fn as_data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the number of values
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Indicates that the buffer has no values
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of values not yet pulled
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Moves the cursor back to the beginning
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Appends a value
    pub fn push(&mut self, value: f64) {
        self.data.push(value);
    }

    /// Appends an integer value
    pub fn push_usize(&mut self, value: usize) {
        self.data.push(value as f64);
    }

    /// Appends a flag
    pub fn push_bool(&mut self, flag: bool) {
        self.data.push(if flag { 1.0 } else { 0.0 });
    }

    /// Appends a length-prefixed array of values
    pub fn push_slice(&mut self, values: &[f64]) {
        self.push_usize(values.len());
        self.data.extend_from_slice(values);
    }

    /// Reads the next value
    pub fn pull(&mut self) -> Result<f64, StrError> {
        if self.cursor >= self.data.len() {
            return Err("buffer is exhausted");
        }
        let value = self.data[self.cursor];
        self.cursor += 1;
        Ok(value)
    }

    /// Reads the next value as a non-negative integer
    pub fn pull_usize(&mut self) -> Result<usize, StrError> {
        let value = self.pull()?;
        if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
            return Err("buffer value is not a non-negative integer");
        }
        Ok(value as usize)
    }

    /// Reads the next value as a flag
    pub fn pull_bool(&mut self) -> Result<bool, StrError> {
        let value = self.pull()?;
        if value == 0.0 {
            Ok(false)
        } else if value == 1.0 {
            Ok(true)
        } else {
            Err("buffer value is not a flag")
        }
    }

    /// Reads a length-prefixed array of values
    pub fn pull_vec(&mut self) -> Result<Vec<f64>, StrError> {
        let n = self.pull_usize()?;
        if n > self.remaining() {
            return Err("buffer is exhausted");
        }
        let values = self.data[self.cursor..(self.cursor + n)].to_vec();
        self.cursor += n;
        Ok(values)
    }

    /// Reads a length-prefixed array of values and checks its length
    pub fn pull_vec_sized(&mut self, expected: usize) -> Result<Vec<f64>, StrError> {
        let values = self.pull_vec()?;
        if values.len() != expected {
            return Err("buffer array has an unexpected length");
        }
        Ok(values)
    }

    /// Reads a JSON file containing a buffer (e.g., a checkpoint)
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(&path).map_err(|_| "file not found")?;
        let reader = BufReader::new(file);
        let buffer = serde_json::from_reader(reader).map_err(|_| "deserialize failed")?;
        Ok(buffer)
    }

    /// Writes a JSON file with the buffer values
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

/// Specifies the communication channel used to move material data across contexts
///
/// The engine only produces and consumes flat numeric packets; the transport belongs to
/// the surrounding application (message passing, database, checkpoint files).
pub trait Channel {
    /// Sends one packet of values
    fn send_values(&mut self, values: &[f64]) -> Result<(), StrError>;

    /// Receives the next packet of values
    fn recv_values(&mut self) -> Result<Vec<f64>, StrError>;
}

/// Implements an in-process loopback channel
///
/// Packets are received in the order they were sent.
#[derive(Clone, Debug, Default)]
pub struct MemoryChannel {
    packets: VecDeque<Vec<f64>>,
}

impl MemoryChannel {
    /// Allocates a new instance
    pub fn new() -> Self {
        MemoryChannel {
            packets: VecDeque::new(),
        }
    }

    /// Returns the number of packets waiting to be received
    pub fn pending(&self) -> usize {
        self.packets.len()
    }
}

impl Channel for MemoryChannel {
    fn send_values(&mut self, values: &[f64]) -> Result<(), StrError> {
        self.packets.push_back(values.to_vec());
        Ok(())
    }

    fn recv_values(&mut self) -> Result<Vec<f64>, StrError> {
        self.packets.pop_front().ok_or("channel has no pending packets")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
