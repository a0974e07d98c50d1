//! PNG reader implementation using the png library.
//!
//! This module feeds the asset stream to `png::Decoder`, configures expansion and 16-bit
//! stripping, and copies each decoded row into one packed RGB buffer through the
//! normalization plan.

use std::io::{Cursor, Read};

use tracing::{debug, instrument, warn};

use crate::image_loader::common::error::{LoadError, Result};
use crate::image_loader::config::LoaderConfig;
use crate::image_loader::decode::probe;
use crate::image_loader::decode::reader::RasterReader;
use crate::image_loader::decode::transform::{DecodedLayout, RowNormalizer, TransformPlan};
use crate::image_loader::decode::types::{ColorKind, DecodedRaster, SourceHeader};

/// Raster reader backed by the `png` crate.
pub struct PngRasterReader;

impl RasterReader for PngRasterReader {
    /// Decodes a PNG stream into a packed 8-bit RGB raster.
    ///
    /// # Errors
    ///
    /// * `InvalidFormat` - the stream does not start with the PNG signature
    /// * `UnsupportedFormat` - the IHDR color type is reserved
    /// * `DecodeError` - the decoder rejected the header or image data
    /// * `UnexpectedChannelCount` - normalization did not end at 3 channels
    /// * `OutOfMemory` - the row table or pixel buffer could not be allocated
    #[instrument(skip_all)]
    fn read_raster(&self, source: &mut dyn Read, config: &LoaderConfig) -> Result<DecodedRaster> {
        let probed = probe::probe(source)?;
        let probed_color = probed.color();
        let stream = Cursor::new(probed.into_prefix()).chain(source);

        let mut decoder = png::Decoder::new_with_limits(stream, png::Limits { bytes: usize::MAX });
        // Alpha stripping, gray-to-RGB and gamma happen while rows are copied out
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info().map_err(decode_error)?;

        let header = SourceHeader::from_info(reader.info());
        if header.color != probed_color {
            return Err(LoadError::DecodeError(format!(
                "decoder reports {:?}, IHDR declares {:?}",
                header.color, probed_color
            )));
        }
        debug!(
            "Decoded header: {}x{}, {:?} at {} bits, gamma {:?}",
            header.width, header.height, header.color, header.bit_depth, header.gamma
        );

        let plan = TransformPlan::for_header(&header, config.screen_gamma);
        debug!("Transform plan: {:?}", plan);

        let format = plan.commit(&header)?;
        if format.channels != 3 {
            return Err(LoadError::UnexpectedChannelCount(format.channels));
        }

        let (color_type, bit_depth) = reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            return Err(LoadError::DecodeError(format!(
                "decoder produced {:?} samples, expected 8 bits",
                bit_depth
            )));
        }
        let normalizer = RowNormalizer::new(
            DecodedLayout::from(ColorKind::from(color_type)),
            plan.gamma_table(),
        );

        let height = header.height as usize;
        let row_offsets = row_offsets(format.row_bytes, height)?;
        let mut data = alloc_bytes(format.row_bytes * height, "pixel buffer")?;
        let mut frame = alloc_bytes(reader.output_buffer_size(), "decoder frame")?;

        let output = reader.next_frame(&mut frame).map_err(decode_error)?;
        for (src, &offset) in frame.chunks_exact(output.line_size).zip(&row_offsets) {
            normalizer.normalize_row(src, &mut data[offset..offset + format.row_bytes]);
        }
        drop(frame);

        // Every pixel is in place; trailing chunks are not worth failing the load over
        if let Err(e) = reader.finish() {
            warn!("Ignoring error after image data: {}", e);
        }

        debug!("Decoded {} bytes of RGB data", data.len());

        Ok(DecodedRaster {
            width: header.width,
            height: header.height,
            data,
        })
    }
}

fn decode_error(err: png::DecodingError) -> LoadError {
    match err {
        png::DecodingError::LimitsExceeded => {
            LoadError::OutOfMemory("decoder memory limit exceeded".to_string())
        }
        other => LoadError::DecodeError(other.to_string()),
    }
}

/// Start offset of every row inside the single pixel buffer. Also validates that the
/// whole buffer size is representable.
fn row_offsets(row_bytes: usize, height: usize) -> Result<Vec<usize>> {
    row_bytes.checked_mul(height).ok_or_else(|| {
        LoadError::OutOfMemory(format!("{} rows of {} bytes overflow", height, row_bytes))
    })?;

    let mut offsets = Vec::new();
    offsets
        .try_reserve_exact(height)
        .map_err(|e| LoadError::OutOfMemory(format!("row table ({} rows): {}", height, e)))?;
    offsets.extend((0..height).map(|row| row * row_bytes));
    Ok(offsets)
}

fn alloc_bytes(len: usize, what: &str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| LoadError::OutOfMemory(format!("{} ({} bytes): {}", what, len, e)))?;
    buffer.resize(len, 0);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_offsets_are_contiguous() {
        assert_eq!(row_offsets(6, 3).unwrap(), vec![0, 6, 12]);
        assert!(row_offsets(6, 0).unwrap().is_empty());
    }

    #[test]
    fn oversized_buffers_are_out_of_memory() {
        assert!(matches!(
            row_offsets(usize::MAX / 2, 3).unwrap_err(),
            LoadError::OutOfMemory(_)
        ));
        assert!(matches!(
            alloc_bytes(usize::MAX, "test").unwrap_err(),
            LoadError::OutOfMemory(_)
        ));
    }
}
