//! Ordered, append-only conversation history owned by one session.
//!
//! Insertion order is the conversation order and is replayed verbatim to the
//! model on every request, so the store offers no deletion or reordering.
//! [`HistoryStore::replace`] exists for callers that rebuilt the sequence from
//! a snapshot.
use crate::generic::ConversationTurn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStore {
    turns: Vec<ConversationTurn>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `turn` at the end.
    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Copy of the full sequence. Mutating it does not affect the store.
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns.clone()
    }

    /// Swap the whole sequence for `turns`.
    pub fn replace(&mut self, turns: Vec<ConversationTurn>) {
        self.turns = turns;
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl From<Vec<ConversationTurn>> for HistoryStore {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        Self { turns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_order_and_snapshot_is_detached() {
        let mut history = HistoryStore::new();
        history.append(ConversationTurn::user("hi"));
        history.append(ConversationTurn::assistant("hello"));

        let mut snapshot = history.snapshot();
        snapshot.push(ConversationTurn::user("not in the store"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().content, "hello");
        let contents: Vec<_> = history.iter().map(|turn| turn.content.as_str()).collect();
        assert_eq!(contents, ["hi", "hello"]);
    }

    #[test]
    fn replace_swaps_sequence() {
        let mut history = HistoryStore::from(vec![ConversationTurn::user("a")]);
        let mut turns = history.snapshot();
        turns.push(ConversationTurn::function("show_sandpack_editor", "[ok]"));

        history.replace(turns);

        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().name.as_deref(), Some("show_sandpack_editor"));
    }
}
