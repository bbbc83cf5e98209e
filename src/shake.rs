//! Screen shake wrapper. A pure function of the caller's `shaking` flag: no
//! timer lives here, the controller clears the flag.

pub const SHAKE_DURATION_S: f64 = 0.4;

/// `(percent, translate_x px, translate_y px, rotate deg)`; predetermined, not
/// randomized at runtime.
pub const SHAKE_KEYFRAMES: [(u8, i32, i32, i32); 11] = [
    (0, 0, 0, 0),
    (10, -10, -10, -1),
    (20, 10, -5, 1),
    (30, -5, 15, 0),
    (40, 15, 5, 1),
    (50, -10, 5, -1),
    (60, 10, -10, 0),
    (70, -15, 0, -1),
    (80, 15, -5, 1),
    (90, -5, 10, 0),
    (100, 0, 0, 0),
];

pub fn animation_for(shaking: bool) -> &'static str {
    if shaking { "shake 0.4s ease-in-out" } else { "none" }
}

pub fn keyframes_css() -> String {
    let mut css = String::from("@keyframes shake {\n");
    for (pct, tx, ty, rot) in SHAKE_KEYFRAMES {
        css.push_str(&format!(
            "  {pct}% {{ transform: translate({tx}px, {ty}px) rotate({rot}deg); }}\n"
        ));
    }
    css.push_str("}\n");
    css
}
