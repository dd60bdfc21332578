/// Lexical scope the scanner is currently inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexState {
    Global,
    Function,
    Methodmap,
    EnumStruct,
    Property,
    Loop,
    Macro,
}

/// Stack of open scopes. The bottom `Global` entry is never popped.
#[derive(Debug, Clone)]
pub(crate) struct StateStack {
    states: Vec<LexState>,
}

impl StateStack {
    pub(crate) fn new() -> Self {
        Self {
            states: vec![LexState::Global],
        }
    }

    pub(crate) fn push(
        &mut self,
        state: LexState,
    ) {
        self.states.push(state);
    }

    /// Pops the innermost scope. Returns `None` when only `Global` is left.
    pub(crate) fn pop(&mut self) -> Option<LexState> {
        if self.states.len() <= 1 {
            return None;
        }
        self.states.pop()
    }

    pub(crate) fn top(&self) -> LexState {
        self.states.last().copied().unwrap_or(LexState::Global)
    }

    pub(crate) fn contains(
        &self,
        state: LexState,
    ) -> bool {
        self.states.contains(&state)
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.states.len()
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}
