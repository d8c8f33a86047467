//! Declarative side effects returned by the reducer.
//!
//! The reducer stays pure; the shell interprets these after each intent.

use crate::core::state::View;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Lightweight side-effect: log a message (info level).
    Log(String),
    /// The derived view changed; the shell swaps the visible screen.
    ViewChanged { from: View, to: View },
    /// Leave the event loop.
    Quit,
}

impl Effect {
    pub fn log<T: Into<String>>(msg: T) -> Self {
        Effect::Log(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_log_effect() {
        match Effect::log("hello") {
            Effect::Log(s) => assert_eq!(s, "hello"),
            other => panic!("expected Log variant, got {other:?}"),
        }
    }
}
