//! Custom cursor state: follows the pointer 1:1, hides when the pointer leaves
//! the document, shrinks while pressed and flips 180° on every other click.

/// Glyph rotation with no flip applied (points the glyph up instead of down).
pub const BASE_ROTATION_DEG: f64 = 45.0;
pub const FLIP_ROTATION_DEG: f64 = 180.0;
pub const PRESSED_SCALE: f64 = 0.8;
pub const CURSOR_FONT_PX: u32 = 48;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
    pub pressed: bool,
    click_count: u64,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// Last value wins, no throttling.
    pub fn on_move(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn on_enter(&mut self) {
        self.visible = true;
    }

    pub fn on_leave(&mut self) {
        self.visible = false;
    }

    pub fn on_press(&mut self) {
        self.pressed = true;
    }

    pub fn on_release(&mut self) {
        self.pressed = false;
    }

    pub fn trigger_click(&mut self) {
        self.click_count = self.click_count.wrapping_add(1);
    }

    pub fn click_count(&self) -> u64 {
        self.click_count
    }

    pub fn is_flipped(&self) -> bool {
        self.click_count % 2 == 1
    }

    pub fn rotation_deg(&self) -> f64 {
        if self.is_flipped() {
            BASE_ROTATION_DEG + FLIP_ROTATION_DEG
        } else {
            BASE_ROTATION_DEG
        }
    }

    pub fn scale(&self) -> f64 {
        if self.pressed { PRESSED_SCALE } else { 1.0 }
    }

    /// CSS transform for the glyph. The rotate/scale part is eased by the
    /// element's transition; left/top are set separately and are not.
    pub fn transform_css(&self) -> String {
        format!(
            "translate(-20%, -50%) rotate({}deg) scale({})",
            self.rotation_deg(),
            self.scale()
        )
    }

    pub fn display_css(&self) -> &'static str {
        if self.visible { "block" } else { "none" }
    }
}

/// Static part of the cursor element's inline style.
pub fn base_style() -> String {
    format!(
        "position:fixed; font-size:{CURSOR_FONT_PX}px; pointer-events:none; z-index:9999; \
         transition:transform 0.3s ease-out; text-shadow:0 2px 4px rgba(0,0,0,0.5);"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_visible_and_unflipped() {
        let c = CursorState::new();
        assert!(c.visible);
        assert!(!c.pressed);
        assert!(!c.is_flipped());
        assert_eq!(c.rotation_deg(), 45.0);
    }

    #[test]
    fn test_every_other_click_flips() {
        let mut c = CursorState::new();
        c.trigger_click();
        assert!(c.is_flipped());
        assert_eq!(c.rotation_deg(), 225.0);
        c.trigger_click();
        assert!(!c.is_flipped());
        assert_eq!(c.rotation_deg(), 45.0);
    }

    #[test]
    fn test_press_scales_down() {
        let mut c = CursorState::new();
        c.on_press();
        assert_eq!(c.scale(), 0.8);
        assert!(c.transform_css().ends_with("scale(0.8)"));
        c.on_release();
        assert_eq!(c.transform_css(), "translate(-20%, -50%) rotate(45deg) scale(1)");
    }

    #[test]
    fn test_leave_hides_without_losing_position() {
        let mut c = CursorState::new();
        c.on_move(10.0, 20.0);
        c.on_leave();
        assert_eq!(c.display_css(), "none");
        assert_eq!((c.x, c.y), (10.0, 20.0));
        c.on_enter();
        assert_eq!(c.display_css(), "block");
    }

    #[test]
    fn test_move_is_last_write_wins() {
        let mut c = CursorState::new();
        for i in 0..100 {
            c.on_move(i as f64, (i * 2) as f64);
        }
        assert_eq!((c.x, c.y), (99.0, 198.0));
    }
}
