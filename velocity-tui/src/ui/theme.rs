use ratatui::style::Color;

pub struct ThemeColors {
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub text_dim: Color,
    pub background: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight_bg: Color,
    pub velocity_low: Color,
    pub velocity_mid: Color,
    pub velocity_high: Color,
}

/// Dark zinc palette with the indigo brand accent
pub fn theme() -> ThemeColors {
    ThemeColors {
        primary: Color::Rgb(99, 102, 241),       // indigo-500
        accent: Color::Rgb(139, 92, 246),        // violet-500
        text: Color::Rgb(228, 228, 231),         // zinc-200
        text_dim: Color::Rgb(113, 113, 122),     // zinc-500
        background: Color::Rgb(9, 9, 11),        // zinc-950
        border: Color::Rgb(39, 39, 42),          // zinc-800
        success: Color::Rgb(16, 185, 129),       // emerald-500
        warning: Color::Rgb(245, 158, 11),       // amber-500
        error: Color::Rgb(239, 68, 68),          // red-500
        highlight_bg: Color::Rgb(30, 27, 75),    // indigo-950
        velocity_low: Color::Rgb(161, 161, 170), // zinc-400
        velocity_mid: Color::Rgb(99, 102, 241),
        velocity_high: Color::Rgb(16, 185, 129),
    }
}
