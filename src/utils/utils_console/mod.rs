use std::sync::atomic::{AtomicBool, Ordering};
use colored::Colorize;

static DEBUG_PRINTING: AtomicBool = AtomicBool::new(false);

/// Prints the given string with the given color.
///
/// ## Example
/// ```
/// use scene_utils::utils::utils_console::{scene_print, PrintMode, PrintColor};
/// scene_print("test", PrintMode::Print, PrintColor::Blue, false);
/// ```
pub fn scene_print(s: &str, mode: PrintMode, color: PrintColor, bolded: bool) {
    let mut string = match &color {
        PrintColor::None => { s.normal() }
        _ => {
            let c = color.get_color_triple();
            s.truecolor(c.0, c.1, c.2)
        }
    };
    if bolded { string = string.bold(); }
    match mode {
        PrintMode::Println => { println!("{}", string); }
        PrintMode::Print => { print!("{}", string); }
    }
}

/// Turns on or off the output of `scene_debug_print` for the whole process.
pub fn set_debug_printing(on: bool) {
    DEBUG_PRINTING.store(on, Ordering::Relaxed);
}

pub fn debug_printing_enabled() -> bool {
    DEBUG_PRINTING.load(Ordering::Relaxed)
}

/// Prints only when debug printing was switched on (the `-D` flag of the drivers).
pub fn scene_debug_print(s: &str) {
    if debug_printing_enabled() {
        scene_print(s, PrintMode::Println, PrintColor::Cyan, false);
    }
}

pub fn scene_warning_print(s: &str) {
    scene_print(&format!("WARNING: {}", s), PrintMode::Println, PrintColor::Yellow, true);
}

/// Enum that is used in scene_print function.
/// Println will cause a new line after each line, while Print will not.
#[derive(Clone, Debug)]
pub enum PrintMode {
    Println,
    Print
}

/// Defines color for a scene print command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrintColor {
    None,
    Blue,
    Green,
    Red,
    Yellow,
    Cyan,
    Magenta
}
impl PrintColor {
    pub fn get_color_triple(&self) -> (u8, u8, u8) {
        match self {
            PrintColor::None => { (0,0,0) }
            PrintColor::Blue => { return (0, 0, 255) }
            PrintColor::Green => { return (0, 255, 0) }
            PrintColor::Red => { return (255, 0, 0) }
            PrintColor::Yellow => { return (255, 255, 0) }
            PrintColor::Cyan => { return (0, 255, 255) }
            PrintColor::Magenta => { return (255, 0, 255) }
        }
    }
}
