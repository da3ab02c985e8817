//! Rendering helpers shared by the screens.
//!
//! Decoding a base64 payload into an egui texture is the expensive part of
//! displaying an image, so the app caches the resulting handles and only
//! calls into here when the underlying image actually changed.

use eframe::egui;

use crate::codec;
use crate::error::{AppError, Result};

/// Decodes a base64 image payload and uploads it as an egui texture.
pub fn texture_from_payload(
    ctx: &egui::Context,
    name: &str,
    payload: &str,
) -> Result<egui::TextureHandle> {
    let bytes = codec::decode_payload(payload)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| AppError::image(format!("Failed to decode image: {}", e)))?;

    let size = [decoded.width() as usize, decoded.height() as usize];
    let rgba = decoded.to_rgba8();
    let pixels = rgba.as_flat_samples();
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());

    Ok(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
}

/// Draws the drop-zone border, highlighted while a file hovers the window.
pub fn draw_drop_zone(painter: &egui::Painter, rect: egui::Rect, highlighted: bool) {
    let (width, color) = if highlighted {
        (2.0, egui::Color32::LIGHT_BLUE)
    } else {
        (1.0, egui::Color32::GRAY)
    };
    painter.rect_stroke(
        rect,
        egui::CornerRadius::same(8),
        egui::Stroke::new(width, color),
        egui::StrokeKind::Middle,
    );
}

/// Fits an image of the given size into a container, preserving aspect
/// ratio and centering. Images smaller than the container are not upscaled.
pub fn fit_rect(container: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return container;
    }
    let scale = (container.width() / image_size.x)
        .min(container.height() / image_size.y)
        .min(1.0);
    egui::Rect::from_center_size(container.center(), image_size * scale)
}

/// Paints a cached texture fitted into the given container rect.
pub fn paint_fitted_image(
    painter: &egui::Painter,
    container: egui::Rect,
    texture: &egui::TextureHandle,
) {
    let target = fit_rect(container, texture.size_vec2());
    painter.image(
        texture.id(),
        target,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_rect_preserves_aspect_and_centers() {
        let container =
            egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 100.0));
        let fitted = fit_rect(container, egui::vec2(400.0, 400.0));
        assert_eq!(fitted.width(), 100.0);
        assert_eq!(fitted.height(), 100.0);
        assert_eq!(fitted.center(), container.center());
    }

    #[test]
    fn fit_rect_never_upscales() {
        let container =
            egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(500.0, 500.0));
        let fitted = fit_rect(container, egui::vec2(50.0, 20.0));
        assert_eq!(fitted.size(), egui::vec2(50.0, 20.0));
    }

    #[test]
    fn degenerate_image_size_falls_back_to_container() {
        let container =
            egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        assert_eq!(fit_rect(container, egui::vec2(0.0, 0.0)), container);
    }
}
