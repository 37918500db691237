use winit::keyboard::{Key, NamedKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    ToggleAnimation,
    CyclePcf,
    ToggleFullscreen,
}

/// Maps a pressed logical key to a demo action.
pub fn action_for_key(key: &Key) -> Option<InputAction> {
    match key {
        Key::Named(NamedKey::Escape) => Some(InputAction::Quit),
        Key::Named(NamedKey::F1) => Some(InputAction::ToggleFullscreen),
        // Numpad add also reports "+".
        Key::Character(text) => match text.as_str() {
            "q" | "Q" => Some(InputAction::Quit),
            "a" | "A" => Some(InputAction::ToggleAnimation),
            "+" => Some(InputAction::CyclePcf),
            _ => None,
        },
        _ => None,
    }
}
