// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Draws detection boxes onto the frame returned to the client

use ab_glyph::{FontRef, PxScale};
use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use super::detection::{BoundingBox, Detection};

/// DejaVu Sans Mono, see `assets/fonts/LICENSE`
static LABEL_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const LINE_THICKNESS: i32 = 2;
const LABEL_SCALE: f32 = 14.0;
/// Space between the label text and the tab edges, top and bottom
const LABEL_PADDING: i32 = 5;

/// Copy the frame and outline every detection with a green box, writing
/// `"{label} {confidence:.2}"` into a filled tab above it.
pub fn annotate_detections(frame: &DynamicImage, detections: &[Detection]) -> Result<RgbImage> {
    let font = FontRef::try_from_slice(LABEL_FONT).context("Failed to parse label font")?;
    let scale = PxScale::from(LABEL_SCALE);
    let mut canvas = frame.to_rgb8();

    for det in detections {
        draw_box(&mut canvas, &det.bbox);

        let label = format!("{} {:.2}", det.label, det.confidence);
        let (text_w, text_h) = text_size(scale, &font, &label);
        let tab_top = det.bbox.y_min - text_h as i32 - 2 * LABEL_PADDING;
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(det.bbox.x_min, tab_top).of_size(text_w.max(1), (det.bbox.y_min - tab_top) as u32),
            BOX_COLOR,
        );
        draw_text_mut(
            &mut canvas,
            TEXT_COLOR,
            det.bbox.x_min,
            tab_top + LABEL_PADDING,
            scale,
            &font,
            &label,
        );
    }

    Ok(canvas)
}

fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox) {
    for t in 0..LINE_THICKNESS {
        let width = bbox.x_max - bbox.x_min + 1 - 2 * t;
        let height = bbox.y_max - bbox.y_min + 1 - 2 * t;
        if width <= 0 || height <= 0 {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            Rect::at(bbox.x_min + t, bbox.y_min + t).of_size(width as u32, height as u32),
            BOX_COLOR,
        );
    }
}
