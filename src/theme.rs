use ratatui::style::Color;

/// Theme data structure containing all colors used in the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text_default: Color,

    // Header and pane borders
    pub header_title: Color,
    pub header_path: Color,
    pub border: Color,

    // Listings
    pub directory: Color,
    pub executable: Color,
    pub marked: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub parent_selected_bg: Color,
    pub search_match: Color,
    pub fuzzy_match: Color,

    // Preview
    pub preview_placeholder: Color,

    // Footer
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub prompt: Color,
    pub chord: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // gruvbox dark
        let bg0 = Color::Rgb(0x28, 0x28, 0x28);
        let bg1 = Color::Rgb(0x3c, 0x38, 0x36);
        let bg2 = Color::Rgb(0x50, 0x49, 0x45);
        let fg1 = Color::Rgb(0xeb, 0xdb, 0xb2);
        let gray = Color::Rgb(0x92, 0x83, 0x74);
        let red = Color::Rgb(0xfb, 0x49, 0x34);
        let green = Color::Rgb(0xb8, 0xbb, 0x26);
        let yellow = Color::Rgb(0xfa, 0xbd, 0x2f);
        let blue = Color::Rgb(0x83, 0xa5, 0x98);
        let purple = Color::Rgb(0xd3, 0x86, 0x9b);
        let aqua = Color::Rgb(0x8e, 0xc0, 0x7c);
        let orange = Color::Rgb(0xfe, 0x80, 0x19);

        Self {
            background: bg0,
            text_default: fg1,

            header_title: aqua,
            header_path: fg1,
            border: gray,

            directory: blue,
            executable: green,
            marked: purple,
            selected_bg: aqua,
            selected_fg: bg0,
            parent_selected_bg: bg2,
            search_match: red,
            fuzzy_match: orange,

            preview_placeholder: gray,

            status_bar_bg: bg1,
            status_bar_fg: fg1,
            prompt: yellow,
            chord: orange,
        }
    }
}

/// Get the current theme
pub fn get_theme() -> Theme {
    Theme::default()
}
