use std::collections::{HashSet, VecDeque};
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

pub type KeyCode = i64;
pub type MouseCode = i64;

pub const MOUSE_BUTTON_LEFT: MouseCode = 0;
pub const MOUSE_BUTTON_RIGHT: MouseCode = 1;
pub const MOUSE_BUTTON_MIDDLE: MouseCode = 2;
pub const MOUSE_BUTTON_SIDE: MouseCode = 3;
pub const MOUSE_BUTTON_EXTRA: MouseCode = 4;
pub const MOUSE_BUTTON_FORWARD: MouseCode = 5;
pub const MOUSE_BUTTON_BACK: MouseCode = 6;

pub const KEY_SPACE: KeyCode = 32;
pub const KEY_ESCAPE: KeyCode = 256;
pub const KEY_ENTER: KeyCode = 257;
pub const KEY_TAB: KeyCode = 258;
pub const KEY_BACKSPACE: KeyCode = 259;
pub const KEY_INSERT: KeyCode = 260;
pub const KEY_DELETE: KeyCode = 261;
pub const KEY_RIGHT: KeyCode = 262;
pub const KEY_LEFT: KeyCode = 263;
pub const KEY_DOWN: KeyCode = 264;
pub const KEY_UP: KeyCode = 265;
pub const KEY_PAGE_UP: KeyCode = 266;
pub const KEY_PAGE_DOWN: KeyCode = 267;
pub const KEY_HOME: KeyCode = 268;
pub const KEY_END: KeyCode = 269;
pub const KEY_CAPS_LOCK: KeyCode = 280;
pub const KEY_SCROLL_LOCK: KeyCode = 281;
pub const KEY_NUM_LOCK: KeyCode = 282;
pub const KEY_PRINT_SCREEN: KeyCode = 283;
pub const KEY_PAUSE: KeyCode = 284;
pub const KEY_F1: KeyCode = 290;
pub const KEY_LEFT_SHIFT: KeyCode = 340;
pub const KEY_LEFT_CONTROL: KeyCode = 341;
pub const KEY_LEFT_ALT: KeyCode = 342;
pub const KEY_LEFT_SUPER: KeyCode = 343;
pub const KEY_RIGHT_SHIFT: KeyCode = 344;
pub const KEY_RIGHT_CONTROL: KeyCode = 345;
pub const KEY_RIGHT_ALT: KeyCode = 346;
pub const KEY_RIGHT_SUPER: KeyCode = 347;
pub const KEY_KB_MENU: KeyCode = 348;

/// The fixed key-code table exposed to scripts. Printable keys use their
/// ASCII value, everything else the codes above.
pub const KEY_TABLE: &[(&str, KeyCode)] = &[
    ("KEY_SPACE", KEY_SPACE),
    ("KEY_APOSTROPHE", 39),
    ("KEY_COMMA", 44),
    ("KEY_MINUS", 45),
    ("KEY_PERIOD", 46),
    ("KEY_SLASH", 47),
    ("KEY_ZERO", 48),
    ("KEY_ONE", 49),
    ("KEY_TWO", 50),
    ("KEY_THREE", 51),
    ("KEY_FOUR", 52),
    ("KEY_FIVE", 53),
    ("KEY_SIX", 54),
    ("KEY_SEVEN", 55),
    ("KEY_EIGHT", 56),
    ("KEY_NINE", 57),
    ("KEY_SEMICOLON", 59),
    ("KEY_EQUAL", 61),
    ("KEY_A", 65),
    ("KEY_B", 66),
    ("KEY_C", 67),
    ("KEY_D", 68),
    ("KEY_E", 69),
    ("KEY_F", 70),
    ("KEY_G", 71),
    ("KEY_H", 72),
    ("KEY_I", 73),
    ("KEY_J", 74),
    ("KEY_K", 75),
    ("KEY_L", 76),
    ("KEY_M", 77),
    ("KEY_N", 78),
    ("KEY_O", 79),
    ("KEY_P", 80),
    ("KEY_Q", 81),
    ("KEY_R", 82),
    ("KEY_S", 83),
    ("KEY_T", 84),
    ("KEY_U", 85),
    ("KEY_V", 86),
    ("KEY_W", 87),
    ("KEY_X", 88),
    ("KEY_Y", 89),
    ("KEY_Z", 90),
    ("KEY_LEFT_BRACKET", 91),
    ("KEY_BACKSLASH", 92),
    ("KEY_RIGHT_BRACKET", 93),
    ("KEY_GRAVE", 96),
    ("KEY_ESCAPE", KEY_ESCAPE),
    ("KEY_ENTER", KEY_ENTER),
    ("KEY_TAB", KEY_TAB),
    ("KEY_BACKSPACE", KEY_BACKSPACE),
    ("KEY_INSERT", KEY_INSERT),
    ("KEY_DELETE", KEY_DELETE),
    ("KEY_RIGHT", KEY_RIGHT),
    ("KEY_LEFT", KEY_LEFT),
    ("KEY_DOWN", KEY_DOWN),
    ("KEY_UP", KEY_UP),
    ("KEY_PAGE_UP", KEY_PAGE_UP),
    ("KEY_PAGE_DOWN", KEY_PAGE_DOWN),
    ("KEY_HOME", KEY_HOME),
    ("KEY_END", KEY_END),
    ("KEY_CAPS_LOCK", KEY_CAPS_LOCK),
    ("KEY_SCROLL_LOCK", KEY_SCROLL_LOCK),
    ("KEY_NUM_LOCK", KEY_NUM_LOCK),
    ("KEY_PRINT_SCREEN", KEY_PRINT_SCREEN),
    ("KEY_PAUSE", KEY_PAUSE),
    ("KEY_F1", 290),
    ("KEY_F2", 291),
    ("KEY_F3", 292),
    ("KEY_F4", 293),
    ("KEY_F5", 294),
    ("KEY_F6", 295),
    ("KEY_F7", 296),
    ("KEY_F8", 297),
    ("KEY_F9", 298),
    ("KEY_F10", 299),
    ("KEY_F11", 300),
    ("KEY_F12", 301),
    ("KEY_LEFT_SHIFT", KEY_LEFT_SHIFT),
    ("KEY_LEFT_CONTROL", KEY_LEFT_CONTROL),
    ("KEY_LEFT_ALT", KEY_LEFT_ALT),
    ("KEY_LEFT_SUPER", KEY_LEFT_SUPER),
    ("KEY_RIGHT_SHIFT", KEY_RIGHT_SHIFT),
    ("KEY_RIGHT_CONTROL", KEY_RIGHT_CONTROL),
    ("KEY_RIGHT_ALT", KEY_RIGHT_ALT),
    ("KEY_RIGHT_SUPER", KEY_RIGHT_SUPER),
    ("KEY_KB_MENU", KEY_KB_MENU),
];

pub const MOUSE_TABLE: &[(&str, MouseCode)] = &[
    ("MOUSE_BUTTON_LEFT", MOUSE_BUTTON_LEFT),
    ("MOUSE_BUTTON_RIGHT", MOUSE_BUTTON_RIGHT),
    ("MOUSE_BUTTON_MIDDLE", MOUSE_BUTTON_MIDDLE),
    ("MOUSE_BUTTON_SIDE", MOUSE_BUTTON_SIDE),
    ("MOUSE_BUTTON_EXTRA", MOUSE_BUTTON_EXTRA),
    ("MOUSE_BUTTON_FORWARD", MOUSE_BUTTON_FORWARD),
    ("MOUSE_BUTTON_BACK", MOUSE_BUTTON_BACK),
];

/// Maps a winit logical key onto the script-facing key code.
pub fn key_code(key: &Key) -> Option<KeyCode> {
    match key {
        Key::Character(text) => {
            let ch = text.chars().next()?;
            if ch.is_ascii() {
                Some(ch.to_ascii_uppercase() as KeyCode)
            } else {
                None
            }
        }
        Key::Named(named) => match named {
            NamedKey::Space => Some(KEY_SPACE),
            NamedKey::Escape => Some(KEY_ESCAPE),
            NamedKey::Enter => Some(KEY_ENTER),
            NamedKey::Tab => Some(KEY_TAB),
            NamedKey::Backspace => Some(KEY_BACKSPACE),
            NamedKey::Insert => Some(KEY_INSERT),
            NamedKey::Delete => Some(KEY_DELETE),
            NamedKey::ArrowRight => Some(KEY_RIGHT),
            NamedKey::ArrowLeft => Some(KEY_LEFT),
            NamedKey::ArrowDown => Some(KEY_DOWN),
            NamedKey::ArrowUp => Some(KEY_UP),
            NamedKey::PageUp => Some(KEY_PAGE_UP),
            NamedKey::PageDown => Some(KEY_PAGE_DOWN),
            NamedKey::Home => Some(KEY_HOME),
            NamedKey::End => Some(KEY_END),
            NamedKey::CapsLock => Some(KEY_CAPS_LOCK),
            NamedKey::ScrollLock => Some(KEY_SCROLL_LOCK),
            NamedKey::NumLock => Some(KEY_NUM_LOCK),
            NamedKey::PrintScreen => Some(KEY_PRINT_SCREEN),
            NamedKey::Pause => Some(KEY_PAUSE),
            NamedKey::F1 => Some(290),
            NamedKey::F2 => Some(291),
            NamedKey::F3 => Some(292),
            NamedKey::F4 => Some(293),
            NamedKey::F5 => Some(294),
            NamedKey::F6 => Some(295),
            NamedKey::F7 => Some(296),
            NamedKey::F8 => Some(297),
            NamedKey::F9 => Some(298),
            NamedKey::F10 => Some(299),
            NamedKey::F11 => Some(300),
            NamedKey::F12 => Some(301),
            // Logical keys carry no left/right distinction; report the left codes.
            NamedKey::Shift => Some(KEY_LEFT_SHIFT),
            NamedKey::Control => Some(KEY_LEFT_CONTROL),
            NamedKey::Alt => Some(KEY_LEFT_ALT),
            NamedKey::Super => Some(KEY_LEFT_SUPER),
            NamedKey::ContextMenu => Some(KEY_KB_MENU),
            _ => None,
        },
        _ => None,
    }
}

fn mouse_code(button: &MouseButton) -> Option<MouseCode> {
    match button {
        MouseButton::Left => Some(MOUSE_BUTTON_LEFT),
        MouseButton::Right => Some(MOUSE_BUTTON_RIGHT),
        MouseButton::Middle => Some(MOUSE_BUTTON_MIDDLE),
        MouseButton::Back => Some(MOUSE_BUTTON_BACK),
        MouseButton::Forward => Some(MOUSE_BUTTON_FORWARD),
        MouseButton::Other(_) => None,
    }
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    Text { ch: char },
    MouseMove { dx: f32, dy: f32 },
    Wheel { delta: f32 },
    MouseButton { button: MouseButton, pressed: bool },
    CursorPos { x: f32, y: f32 },
    Other,
}

impl InputEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                InputEvent::Wheel { delta: d }
            }
            WindowEvent::CursorMoved { position, .. } => {
                InputEvent::CursorPos { x: position.x as f32, y: position.y as f32 }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                InputEvent::MouseButton { button: *button, pressed: *state == ElementState::Pressed }
            }
            WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
                key: event.logical_key.clone(),
                pressed: event.state == ElementState::Pressed,
            },
            _ => InputEvent::Other,
        }
    }

    pub fn from_device_event(ev: &DeviceEvent) -> Self {
        match ev {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => {
                InputEvent::MouseMove { dx: *dx as f32, dy: *dy as f32 }
            }
            _ => InputEvent::Other,
        }
    }
}

const MOUSE_BUTTON_COUNT: usize = 7;

/// Per-frame input state: keys and mouse buttons in the down/pressed/released
/// triple the script surface polls, plus the key/char queues.
pub struct Input {
    down: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
    key_queue: VecDeque<KeyCode>,
    char_queue: VecDeque<char>,
    cursor_pos: (f32, f32),
    pub mouse_delta: (f32, f32),
    wheel: f32,
    buttons_down: [bool; MOUSE_BUTTON_COUNT],
    buttons_pressed: [bool; MOUSE_BUTTON_COUNT],
    buttons_released: [bool; MOUSE_BUTTON_COUNT],
}

impl Input {
    pub fn new() -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
            key_queue: VecDeque::new(),
            char_queue: VecDeque::new(),
            cursor_pos: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            wheel: 0.0,
            buttons_down: [false; MOUSE_BUTTON_COUNT],
            buttons_pressed: [false; MOUSE_BUTTON_COUNT],
            buttons_released: [false; MOUSE_BUTTON_COUNT],
        }
    }

    pub fn push(&mut self, ev: InputEvent) {
        match &ev {
            InputEvent::Key { key, pressed } => {
                if let Some(code) = key_code(key) {
                    if *pressed {
                        if self.down.insert(code) {
                            self.pressed.insert(code);
                            self.key_queue.push_back(code);
                        }
                        if let Key::Character(text) = key {
                            if let Some(ch) = text.chars().next() {
                                self.char_queue.push_back(ch);
                            }
                        }
                    } else {
                        self.down.remove(&code);
                        self.released.insert(code);
                    }
                }
            }
            InputEvent::Text { ch } => {
                self.char_queue.push_back(*ch);
            }
            InputEvent::MouseMove { dx, dy } => {
                self.mouse_delta.0 += *dx;
                self.mouse_delta.1 += *dy;
            }
            InputEvent::Wheel { delta } => {
                self.wheel += *delta;
            }
            InputEvent::MouseButton { button, pressed } => {
                if let Some(code) = mouse_code(button) {
                    let idx = code as usize;
                    if *pressed {
                        if !self.buttons_down[idx] {
                            self.buttons_pressed[idx] = true;
                        }
                        self.buttons_down[idx] = true;
                    } else {
                        self.buttons_down[idx] = false;
                        self.buttons_released[idx] = true;
                    }
                }
            }
            InputEvent::CursorPos { x, y } => {
                self.cursor_pos = (*x, *y);
            }
            InputEvent::Other => {}
        }
    }

    /// Drops the edge-triggered state at the end of a frame; held state stays.
    pub fn clear_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.key_queue.clear();
        self.char_queue.clear();
        self.mouse_delta = (0.0, 0.0);
        self.wheel = 0.0;
        self.buttons_pressed = [false; MOUSE_BUTTON_COUNT];
        self.buttons_released = [false; MOUSE_BUTTON_COUNT];
    }

    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.down.contains(&code)
    }

    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn is_key_released(&self, code: KeyCode) -> bool {
        self.released.contains(&code)
    }

    pub fn is_key_up(&self, code: KeyCode) -> bool {
        !self.down.contains(&code)
    }

    /// Pops the next key pressed this frame; 0 when the queue is empty.
    pub fn pop_key(&mut self) -> KeyCode {
        self.key_queue.pop_front().unwrap_or(0)
    }

    /// Pops the next character typed this frame; 0 when the queue is empty.
    pub fn pop_char(&mut self) -> i64 {
        self.char_queue.pop_front().map(|c| c as i64).unwrap_or(0)
    }

    pub fn cursor_pos(&self) -> (f32, f32) {
        self.cursor_pos
    }

    pub fn wheel_move(&self) -> f32 {
        self.wheel
    }

    pub fn is_mouse_button_down(&self, code: MouseCode) -> bool {
        Self::button_index(code).map_or(false, |i| self.buttons_down[i])
    }

    pub fn is_mouse_button_pressed(&self, code: MouseCode) -> bool {
        Self::button_index(code).map_or(false, |i| self.buttons_pressed[i])
    }

    pub fn is_mouse_button_released(&self, code: MouseCode) -> bool {
        Self::button_index(code).map_or(false, |i| self.buttons_released[i])
    }

    pub fn is_mouse_button_up(&self, code: MouseCode) -> bool {
        !self.is_mouse_button_down(code)
    }

    fn button_index(code: MouseCode) -> Option<usize> {
        if (0..MOUSE_BUTTON_COUNT as MouseCode).contains(&code) {
            Some(code as usize)
        } else {
            None
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}
