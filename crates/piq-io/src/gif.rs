//! GIF decoding.
//!
//! Only the first frame is decoded. It is composited at its frame offset onto
//! a transparent canvas the size of the logical screen. There is no GIF
//! encoder: writing GIF requires palette quantisation, which piq does not do.

use crate::{FormatReader, ImageFormat, IoError, IoResult};
use piq_core::{PixelBuffer, Rect};
use std::io::Cursor;

/// GIF reader (first frame only).
#[derive(Debug, Clone, Copy, Default)]
pub struct GifCodec;

impl FormatReader for GifCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Gif
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = options
            .read_info(Cursor::new(data))
            .map_err(|e| IoError::DecodeError(e.to_string()))?;

        let screen_w = decoder.width() as u32;
        let screen_h = decoder.height() as u32;

        let frame = decoder
            .read_next_frame()
            .map_err(|e| IoError::DecodeError(e.to_string()))?
            .ok_or_else(|| IoError::DecodeError("GIF contains no frames".into()))?;

        let frame_w = frame.width as u32;
        let frame_h = frame.height as u32;
        let layer = PixelBuffer::from_raw(frame_w, frame_h, frame.buffer.to_vec())
            .map_err(|e| IoError::DecodeError(e.to_string()))?;

        let mut canvas = PixelBuffer::new(screen_w, screen_h);
        let placed = Rect::new(frame.left as i32, frame.top as i32, frame_w, frame_h);
        // Frames may overhang the logical screen; keep the visible part
        if let Some(visible) = placed.intersect(&canvas.bounds()) {
            let src = Rect::new(
                visible.x - placed.x,
                visible.y - placed.y,
                visible.width,
                visible.height,
            );
            canvas
                .copy_region(&layer, src, visible.x as u32, visible.y as u32)
                .map_err(|e| IoError::DecodeError(e.to_string()))?;
        }
        Ok(canvas)
    }
}
