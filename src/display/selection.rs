//! Rubber-band selection over the displayed image
//!
//! Tracks an in-progress drag in display space, draws the dotted
//! preview rectangle, and maps the finished drag back to a pixel
//! region of the source image.

use egui::{Color32, Pos2, Rect, Shape, Stroke};

use crate::display::scale::DisplayScale;
use crate::error::ViewerError;

/// A rectangle in source-image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Right edge (exclusive); u64 so far-out regions cannot overflow
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Whether the region lies inside an image of the given size
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Parses the `WxH+X+Y` form written by `Display`
impl std::str::FromStr for Region {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ViewerError::InvalidDimension(format!("expected WxH+X+Y, got {:?}", s));
        let number = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        let (size, offset) = s.split_once('+').ok_or_else(invalid)?;
        let (width, height) = size.split_once('x').ok_or_else(invalid)?;
        let (x, y) = offset.split_once('+').ok_or_else(invalid)?;

        let region = Region::new(number(x)?, number(y)?, number(width)?, number(height)?);
        if region.is_empty() {
            return Err(invalid());
        }
        Ok(region)
    }
}

/// State of the selection drag, in display-space pixels relative to the
/// top-left corner of the drawn image
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Where the drag started
    pub start_point: Option<Pos2>,
    /// Latest pointer position during the drag
    pub current_point: Option<Pos2>,
    /// A drag is in progress
    pub is_selecting: bool,
}

impl SelectionState {
    /// Mouse pressed: start a fresh selection
    pub fn press(&mut self, pos: Pos2) {
        self.start_point = Some(pos);
        self.current_point = Some(pos);
        self.is_selecting = true;
    }

    /// Pointer moved while the button is held
    pub fn drag(&mut self, pos: Pos2) {
        if self.is_selecting {
            self.current_point = Some(pos);
        }
    }

    /// Mouse released: returns the (start, end) pair of the finished drag
    pub fn release(&mut self, pos: Pos2) -> Option<(Pos2, Pos2)> {
        if !self.is_selecting {
            return None;
        }
        self.is_selecting = false;
        self.current_point = Some(pos);
        self.start_point.map(|start| (start, pos))
    }

    /// Forget any selection, e.g. when a new image is shown
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Preview rectangle of the in-progress drag, in display space
    pub fn preview_rect(&self) -> Option<Rect> {
        if !self.is_selecting {
            return None;
        }
        match (self.start_point, self.current_point) {
            (Some(start), Some(current)) => Some(display_rect(start, current)),
            _ => None,
        }
    }
}

/// Normalize two display points into a rectangle with non-negative size
pub fn display_rect(start: Pos2, end: Pos2) -> Rect {
    let min = Pos2::new(start.x.min(end.x), start.y.min(end.y));
    let size = egui::vec2((end.x - start.x).abs(), (end.y - start.y).abs());
    Rect::from_min_size(min, size)
}

/// Map a finished drag back to source-image pixels
///
/// Returns `None` for a click without movement, for a drag that
/// collapses to zero width or height, and for a drag entirely outside
/// the image. Overshoot past the image edges is clamped. The returned
/// region always has a positive area and lies within the image.
pub fn finalize_selection(
    start: Pos2,
    end: Pos2,
    scale: DisplayScale,
    image_width: u32,
    image_height: u32,
) -> Option<Region> {
    if start == end || scale.x <= 0.0 || scale.y <= 0.0 {
        return None;
    }

    let rect = display_rect(start, end);
    let (image_w, image_h) = (image_width as f32, image_height as f32);

    let left = (rect.min.x / scale.x).clamp(0.0, image_w);
    let top = (rect.min.y / scale.y).clamp(0.0, image_h);
    let right = (rect.max.x / scale.x).clamp(0.0, image_w);
    let bottom = (rect.max.y / scale.y).clamp(0.0, image_h);

    if right - left <= 0.0 || bottom - top <= 0.0 {
        return None;
    }

    // Grow outward to whole pixels so nothing the user framed is cut off
    let x = left.floor() as u32;
    let y = top.floor() as u32;
    let width = (right.ceil() as u32).min(image_width) - x;
    let height = (bottom.ceil() as u32).min(image_height) - y;

    let region = Region::new(x, y, width, height);
    (!region.is_empty()).then_some(region)
}

/// Draw the dotted preview rectangle over the image
///
/// `origin` is the screen position of the image's top-left corner.
pub fn paint_selection(painter: &egui::Painter, origin: Pos2, state: &SelectionState) {
    let Some(rect) = state.preview_rect() else {
        return;
    };
    let rect = rect.translate(origin.to_vec2());

    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(Shape::dashed_line(
        &corners,
        Stroke::new(2.0, Color32::from_rgb(0, 90, 255)),
        4.0,
        3.0,
    ));

    let size_text = format!("{:.0} x {:.0}", rect.width(), rect.height());
    painter.text(
        rect.right_bottom() + egui::vec2(4.0, 4.0),
        egui::Align2::LEFT_TOP,
        size_text,
        egui::FontId::proportional(12.0),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within_far_out_region() {
        assert!(Region::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!Region::new(1, 0, 10, 10).fits_within(10, 10));
        assert!(!Region::new(u32::MAX - 1, 0, 5, 5).fits_within(10, 10));
        assert!(!Region::new(0, u32::MAX, 1, u32::MAX).fits_within(10, 10));
        assert_eq!(Region::new(u32::MAX, 0, u32::MAX, 1).right(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_region_parses_display_form() {
        let region: Region = "120x40+8+16".parse().unwrap();
        assert_eq!(region, Region::new(8, 16, 120, 40));
        assert_eq!(region.to_string().parse::<Region>().unwrap(), region);

        for bad in ["", "120x40", "120x40+8", "0x40+8+16", "ax40+8+16", "120x40+8+-1"] {
            assert!(
                matches!(bad.parse::<Region>(), Err(ViewerError::InvalidDimension(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_display_rect_reversed() {
        // Dragging up and to the left still yields a positive rectangle
        let rect = display_rect(Pos2::new(300.0, 400.0), Pos2::new(100.0, 200.0));
        assert_eq!(rect.min, Pos2::new(100.0, 200.0));
        assert!((rect.width() - 200.0).abs() < 0.001);
        assert!((rect.height() - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_click_without_drag_is_empty() {
        for &(x, y) in &[(0.0, 0.0), (10.0, 20.0), (-5.0, 3.5), (1e6, 1e6)] {
            let p = Pos2::new(x, y);
            assert_eq!(finalize_selection(p, p, DisplayScale::identity(), 100, 100), None);
            assert_eq!(finalize_selection(p, p, DisplayScale::uniform(0.25), 100, 100), None);
        }
    }

    #[test]
    fn test_zero_height_drag_is_empty() {
        let region = finalize_selection(
            Pos2::new(10.0, 20.0),
            Pos2::new(50.0, 20.0),
            DisplayScale::identity(),
            100,
            100,
        );
        assert_eq!(region, None);
    }

    #[test]
    fn test_unscaled_selection() {
        let region = finalize_selection(
            Pos2::new(30.0, 40.0),
            Pos2::new(10.0, 20.0),
            DisplayScale::identity(),
            100,
            100,
        );
        assert_eq!(region, Some(Region::new(10, 20, 20, 20)));
    }

    #[test]
    fn test_scaled_selection_maps_to_source() {
        // Image drawn at half size
        let region = finalize_selection(
            Pos2::new(10.0, 10.0),
            Pos2::new(60.0, 35.0),
            DisplayScale::uniform(0.5),
            400,
            300,
        );
        assert_eq!(region, Some(Region::new(20, 20, 100, 50)));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let offsets = [-500.0f32, -1.0, 0.0, 1.0, 37.5, 500.0];
        for &dx in &offsets {
            for &dy in &offsets {
                let start = Pos2::new(50.0 + dx, 40.0 + dy);
                let end = Pos2::new(150.0 + dx, 90.0 + dy);
                if let Some(region) =
                    finalize_selection(start, end, DisplayScale::uniform(1.5), 80, 60)
                {
                    assert!(!region.is_empty());
                    assert!(region.fits_within(80, 60), "{region:?} for offset {dx},{dy}");
                }
            }
        }
    }

    #[test]
    fn test_selection_outside_image_is_empty() {
        let region = finalize_selection(
            Pos2::new(200.0, 200.0),
            Pos2::new(300.0, 300.0),
            DisplayScale::identity(),
            100,
            100,
        );
        assert_eq!(region, None);
    }

    #[test]
    fn test_rescaled_region_matches_drag() {
        let scales = [0.1f32, 0.37, 0.5, 1.0, 2.0, 3.3];
        let drags = [
            (Pos2::new(5.0, 7.0), Pos2::new(40.0, 33.0)),
            (Pos2::new(40.5, 33.2), Pos2::new(5.1, 7.9)),
            (Pos2::new(0.0, 12.0), Pos2::new(25.0, 1.0)),
        ];
        for &s in &scales {
            for &(start, end) in &drags {
                let region =
                    finalize_selection(start, end, DisplayScale::uniform(s), 10_000, 10_000)
                        .unwrap();
                let rect = display_rect(start, end);

                // Back in display space the region covers the drag, give or
                // take one source pixel at each edge
                let tolerance = s + 0.01;
                assert!((region.x as f32 * s - rect.min.x).abs() <= tolerance);
                assert!((region.y as f32 * s - rect.min.y).abs() <= tolerance);
                assert!((region.right() as f32 * s - rect.max.x).abs() <= tolerance);
                assert!((region.bottom() as f32 * s - rect.max.y).abs() <= tolerance);
            }
        }
    }

    #[test]
    fn test_selection_state_lifecycle() {
        let mut state = SelectionState::default();
        assert!(state.preview_rect().is_none());

        state.press(Pos2::new(10.0, 10.0));
        state.drag(Pos2::new(5.0, 30.0));
        let preview = state.preview_rect().unwrap();
        assert_eq!(preview.min, Pos2::new(5.0, 10.0));
        assert!((preview.width() - 5.0).abs() < 0.001);

        let finished = state.release(Pos2::new(4.0, 30.0));
        assert_eq!(finished, Some((Pos2::new(10.0, 10.0), Pos2::new(4.0, 30.0))));
        assert!(!state.is_selecting);
        assert!(state.preview_rect().is_none());

        // Release without a press is ignored
        assert_eq!(state.release(Pos2::new(1.0, 1.0)), None);

        state.press(Pos2::new(1.0, 1.0));
        state.clear();
        assert!(state.start_point.is_none());
        assert!(!state.is_selecting);
    }
}
