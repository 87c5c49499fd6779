// Keyboard-walk detector — a contiguous run of 4+ adjacent keys on any
// known layout ("qwerty", "asdfgh", "zxcvbn") is a strong signal of a
// generated rather than chosen local-part.

use crate::reference::keyboard;

const MIN_WALK_LEN: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    pub hit: bool,
    pub layout: Option<&'static str>,
    pub walk_len: usize,
}

pub fn analyze(local: &str) -> WalkResult {
    let chars: Vec<char> = local.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if chars.len() < MIN_WALK_LEN {
        return WalkResult::default();
    }

    for window_len in (MIN_WALK_LEN..=chars.len()).rev() {
        for start in 0..=(chars.len() - window_len) {
            let window: String = chars[start..start + window_len].iter().collect();
            if let Some(layout) = keyboard::walk(&window, MIN_WALK_LEN) {
                return WalkResult { hit: true, layout: Some(layout), walk_len: window_len };
            }
        }
    }

    WalkResult::default()
}

pub fn detector_risk(result: &WalkResult) -> f64 {
    if !result.hit {
        return 0.0;
    }
    (0.4 + 0.1 * (result.walk_len.saturating_sub(MIN_WALK_LEN) as f64)).min(0.9)
}
