//! Hashable keys for windows of ternary states

use series_math::State;
use std::fmt;

/// Deepest window packed into a single integer. `3^80` still fits in a `u128`.
pub const MAX_PACKED_MEMORY: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Key {
    /// Base-3 digits, first state most significant
    Packed(u128),
    /// Windows deeper than [`MAX_PACKED_MEMORY`]
    Wide(Box<[State]>),
}

/// A window of consecutive states used as a rule key.
///
/// Windows up to [`MAX_PACKED_MEMORY`] states are packed as a base-3 integer;
/// deeper windows keep their states. The window length is part of the key, so
/// `[Down]` and `[Down, Down]` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern {
    len: usize,
    key: Key,
}

impl Pattern {
    /// Build the key of a window. Returns `None` for an empty window.
    pub fn from_states(window: &[State]) -> Option<Self> {
        if window.is_empty() {
            return None;
        }

        let key = if window.len() <= MAX_PACKED_MEMORY {
            Key::Packed(
                window
                    .iter()
                    .fold(0u128, |code, state| code * 3 + state.index() as u128),
            )
        } else {
            Key::Wide(window.into())
        };

        Some(Self {
            len: window.len(),
            key,
        })
    }

    /// Window length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, empty windows have no key
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed base-3 value, `None` for windows deeper than [`MAX_PACKED_MEMORY`]
    pub fn code(&self) -> Option<u128> {
        match self.key {
            Key::Packed(code) => Some(code),
            Key::Wide(_) => None,
        }
    }

    /// Unpack the window in its original order
    pub fn states(&self) -> Vec<State> {
        match &self.key {
            Key::Wide(states) => states.to_vec(),
            Key::Packed(code) => {
                let mut states = vec![State::Down; self.len];
                let mut code = *code;

                for slot in states.iter_mut().rev() {
                    // the remainder is always < 3
                    *slot = State::from_index((code % 3) as usize).unwrap_or(State::Neutral);
                    code /= 3;
                }

                states
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<String> = self.states().iter().map(|s| s.to_string()).collect();
        write!(f, "{}", symbols.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let window = [State::Up, State::Down, State::Neutral, State::Up];
        let pattern = Pattern::from_states(&window).unwrap();
        assert_eq!(pattern.len(), 4);
        assert_eq!(pattern.states(), window.to_vec());
        assert_eq!(pattern.to_string(), "1|-1|0|1");
    }

    #[test]
    fn test_length_is_part_of_key() {
        let short = Pattern::from_states(&[State::Down]).unwrap();
        let long = Pattern::from_states(&[State::Down, State::Down]).unwrap();
        assert_eq!(short.code(), long.code());
        assert_ne!(short, long);
    }

    #[test]
    fn test_order_matters() {
        let a = Pattern::from_states(&[State::Up, State::Down]).unwrap();
        let b = Pattern::from_states(&[State::Down, State::Up]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, Pattern::from_states(&[State::Up, State::Down]).unwrap());
    }

    #[test]
    fn test_packed_limit() {
        assert!(Pattern::from_states(&[]).is_none());

        let deepest = vec![State::Up; MAX_PACKED_MEMORY];
        let pattern = Pattern::from_states(&deepest).unwrap();
        assert_eq!(pattern.code(), Some(3u128.pow(MAX_PACKED_MEMORY as u32) - 1));
        assert_eq!(pattern.states(), deepest);
    }

    #[test]
    fn test_wide_windows() {
        let mut window = vec![State::Neutral; MAX_PACKED_MEMORY + 5];
        window[0] = State::Up;
        let pattern = Pattern::from_states(&window).unwrap();

        assert_eq!(pattern.code(), None);
        assert_eq!(pattern.len(), MAX_PACKED_MEMORY + 5);
        assert_eq!(pattern.states(), window);

        window[1] = State::Down;
        assert_ne!(Pattern::from_states(&window).unwrap(), pattern);
    }
}
