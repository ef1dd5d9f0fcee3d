//! Minimal streaming AIFF (big-endian PCM) writer.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

const COMM_CHUNK_LEN: u32 = 18;
// "AIFF" + COMM header/body + SSND header + offset/block size.
const HEADER_OVERHEAD: u32 = 4 + 8 + COMM_CHUNK_LEN + 8 + 8;
const NUM_FRAMES_POS: u64 = 22;
const SSND_LEN_POS: u64 = 42;

pub struct AiffWriter<W: Write + Seek> {
    out: W,
    channels: u16,
    bits: u16,
    samples_written: u64,
}

impl AiffWriter<BufWriter<File>> {
    pub fn create(path: &Path, channels: u16, sample_rate: u32, bits: u16) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?), channels, sample_rate, bits)
    }
}

impl<W: Write + Seek> AiffWriter<W> {
    /// Write a header with placeholder sizes; [`finalize`](Self::finalize)
    /// patches them.
    pub fn new(mut out: W, channels: u16, sample_rate: u32, bits: u16) -> io::Result<Self> {
        if !matches!(bits, 8 | 16 | 24 | 32) || channels == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported AIFF layout: {channels}ch {bits}-bit"),
            ));
        }

        out.write_all(b"FORM")?;
        out.write_all(&0u32.to_be_bytes())?;
        out.write_all(b"AIFF")?;

        out.write_all(b"COMM")?;
        out.write_all(&COMM_CHUNK_LEN.to_be_bytes())?;
        out.write_all(&channels.to_be_bytes())?;
        out.write_all(&0u32.to_be_bytes())?;
        out.write_all(&bits.to_be_bytes())?;
        out.write_all(&extended_from_u32(sample_rate))?;

        out.write_all(b"SSND")?;
        out.write_all(&0u32.to_be_bytes())?;
        out.write_all(&0u32.to_be_bytes())?; // offset
        out.write_all(&0u32.to_be_bytes())?; // block size

        Ok(Self {
            out,
            channels,
            bits,
            samples_written: 0,
        })
    }

    /// Write one already-quantized sample, interleaved by channel.
    pub fn write_sample(&mut self, sample: i32) -> io::Result<()> {
        match self.bits {
            8 => self.out.write_all(&[sample as i8 as u8])?,
            16 => self.out.write_all(&(sample as i16).to_be_bytes())?,
            24 => self.out.write_all(&sample.to_be_bytes()[1..])?,
            _ => self.out.write_all(&sample.to_be_bytes())?,
        }
        self.samples_written += 1;
        Ok(())
    }

    pub fn finalize(mut self) -> io::Result<W> {
        let bytes_per_sample = u64::from(self.bits / 8);
        let data_len = self.samples_written * bytes_per_sample;
        let frames = self.samples_written / u64::from(self.channels);

        let too_big = || io::Error::new(io::ErrorKind::InvalidData, "AIFF data exceeds 4 GiB");
        let data_len32 = u32::try_from(data_len).map_err(|_| too_big())?;
        let frames32 = u32::try_from(frames).map_err(|_| too_big())?;

        // Chunks are padded to an even length.
        let pad = data_len32 % 2;
        if pad == 1 {
            self.out.write_all(&[0])?;
        }
        let form_len = HEADER_OVERHEAD
            .checked_add(data_len32 + pad)
            .ok_or_else(too_big)?;

        self.out.seek(SeekFrom::Start(4))?;
        self.out.write_all(&form_len.to_be_bytes())?;
        self.out.seek(SeekFrom::Start(NUM_FRAMES_POS))?;
        self.out.write_all(&frames32.to_be_bytes())?;
        self.out.seek(SeekFrom::Start(SSND_LEN_POS))?;
        self.out.write_all(&(data_len32 + 8).to_be_bytes())?;
        self.out.seek(SeekFrom::End(0))?;
        self.out.flush()?;
        Ok(self.out)
    }
}

/// 80-bit IEEE 754 extended encoding of an integer sample rate.
pub(crate) fn extended_from_u32(value: u32) -> [u8; 10] {
    let mut bytes = [0u8; 10];
    if value == 0 {
        return bytes;
    }
    let v = u64::from(value);
    let shift = v.leading_zeros();
    let exponent = 16383 + (63 - shift) as u16;
    let mantissa = v << shift;
    bytes[..2].copy_from_slice(&exponent.to_be_bytes());
    bytes[2..].copy_from_slice(&mantissa.to_be_bytes());
    bytes
}
