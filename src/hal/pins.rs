//! Pin assignments for the two board variants.

/// Radio module SPI wiring (shared by both roles).
pub struct RadioPins {
    pub mosi: i32,
    pub miso: i32,
    pub sck: i32,
    pub ce: i32,
    pub csn: i32,
}

/// Pocket (weapon sensor) board.
pub struct PocketPins {
    pub touch: i32,
    pub weapon_line_a: i32,
    pub weapon_line_c: i32,
    pub btn_confirm: i32,
    pub btn_select: i32,
    pub radio: RadioPins,
}

/// Desk (referee indicator) board.
pub struct DeskPins {
    pub led_green_valid: i32,
    pub led_green_invalid: i32,
    pub led_red_valid: i32,
    pub led_red_invalid: i32,
    pub buzzer: i32,
    pub btn_confirm: i32,
    pub btn_select: i32,
    pub radio: RadioPins,
}
