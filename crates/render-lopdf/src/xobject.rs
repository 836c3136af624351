//! Turning asset bytes into PDF image XObjects.

use crate::error::RenderError;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder, ImageFormat};
use lopdf::{dictionary, Dictionary, Stream};
use std::io::Cursor;

pub(crate) struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub stream: Stream,
    pub smask: Option<Stream>,
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8i64,
    }
}

fn flate_stream(dict: Dictionary, data: Vec<u8>) -> Result<Stream, RenderError> {
    let mut stream = Stream::new(dict, data);
    stream.compress()?;
    Ok(stream)
}

/// Encodes PNG, GIF or JPEG bytes. Grey and RGB JPEGs are embedded as-is;
/// everything else is decoded to RGB with a soft mask when it has alpha.
pub(crate) fn encode_image(bytes: &[u8]) -> Result<ImageXObject, RenderError> {
    let format = image::guess_format(bytes)?;
    if format == ImageFormat::Jpeg
        && let Some(jpeg) = embed_jpeg(bytes)?
    {
        return Ok(jpeg);
    }

    let rgba = image::load_from_memory_with_format(bytes, format)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Image("image has no pixels".into()));
    }

    let pixel_count = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let smask = if alpha.iter().all(|&a| a == u8::MAX) {
        None
    } else {
        Some(flate_stream(
            image_dictionary(width, height, "DeviceGray"),
            alpha,
        )?)
    };

    Ok(ImageXObject {
        width,
        height,
        stream: flate_stream(image_dictionary(width, height, "DeviceRGB"), rgb)?,
        smask,
    })
}

fn embed_jpeg(bytes: &[u8]) -> Result<Option<ImageXObject>, RenderError> {
    let decoder = JpegDecoder::new(Cursor::new(bytes))?;
    let (width, height) = decoder.dimensions();
    let color_space = match decoder.color_type() {
        ColorType::L8 => "DeviceGray",
        ColorType::Rgb8 => "DeviceRGB",
        _ => return Ok(None),
    };

    let mut dict = image_dictionary(width, height, color_space);
    dict.set("Filter", "DCTDecode");
    Ok(Some(ImageXObject {
        width,
        height,
        stream: Stream::new(dict, bytes.to_vec()).with_compression(false),
        smask: None,
    }))
}
