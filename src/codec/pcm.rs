use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::decoder::DecoderError;
use rodio::source::UniformSourceIterator;
use rodio::{Decoder, Source};
use tracing::debug;

use crate::format::{TargetFormat, TargetSpec, capability};

use super::aiff::AiffWriter;
use super::{CodecError, CodecProvider, TranscodeOutcome, quantize};

/// Decodes with rodio and writes integer PCM WAV or AIFF.
///
/// Sample rate and channel layout are adapted with rodio's
/// `UniformSourceIterator`; the sample format is quantized here.
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioCodec;

impl CodecProvider for RodioCodec {
    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        spec: &TargetSpec,
    ) -> Result<TranscodeOutcome, CodecError> {
        if !capability(spec.format).supports(spec) {
            debug!(%spec, "spec outside codec capabilities");
            return Ok(TranscodeOutcome::Unsupported);
        }

        let file = File::open(input)?;
        let decoder = match Decoder::new(BufReader::new(file)) {
            Ok(d) => d,
            Err(DecoderError::UnrecognizedFormat) => {
                debug!(input = %input.display(), "decoder does not recognize input");
                return Ok(TranscodeOutcome::Unsupported);
            }
            Err(e) => return Err(CodecError::Decode(e.to_string())),
        };

        let source_rate = u32::from(decoder.sample_rate());
        let source_channels = u16::from(decoder.channels());
        debug!(
            input = %input.display(),
            source_rate,
            source_channels,
            %spec,
            "transcoding"
        );

        let samples = UniformSourceIterator::new(decoder, spec.channels, spec.sample_rate);
        match spec.format {
            TargetFormat::Wav => write_wav(output, spec, samples)?,
            TargetFormat::Aiff => write_aiff(output, spec, samples)?,
        }
        Ok(TranscodeOutcome::Encoded)
    }
}

fn write_wav(
    output: &Path,
    spec: &TargetSpec,
    samples: impl Iterator<Item = f32>,
) -> Result<(), CodecError> {
    let wav_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bit_depth,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output, wav_spec)?;
    for s in samples {
        writer.write_sample(quantize(s, spec.bit_depth))?;
    }
    writer.finalize()?;
    Ok(())
}

fn write_aiff(
    output: &Path,
    spec: &TargetSpec,
    samples: impl Iterator<Item = f32>,
) -> Result<(), CodecError> {
    let mut writer = AiffWriter::create(output, spec.channels, spec.sample_rate, spec.bit_depth)?;
    for s in samples {
        writer.write_sample(quantize(s, spec.bit_depth))?;
    }
    writer.finalize()?;
    Ok(())
}
