// Component-owned search state: the rendered results, which one is
// highlighted, and which query they belong to. Nothing here touches the DOM;
// the widget applies the returned outcomes to its elements.

use crate::{
    config::EnterAction,
    search::{ResultValue, SearchResult, cap_results},
};

/// What a key press means to the dropdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    Confirm,
    Ignore,
}

impl KeyAction {
    pub fn from_key(key: &str) -> Self {
        match key {
            "ArrowDown" => KeyAction::Next,
            "ArrowUp" => KeyAction::Previous,
            "Enter" => KeyAction::Confirm,
            _ => KeyAction::Ignore,
        }
    }
}

/// Move the highlight one step among `len` entries, wrapping at either end.
/// With nothing highlighted, Next starts at the first entry and Previous at the last.
pub fn step_highlight(current: Option<usize>, forward: bool, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    Some(match (current, forward) {
        (Some(i), true) if i < last => i + 1,
        (Some(i), false) if i > 0 && i <= last => i - 1,
        (_, true) => 0,
        (_, false) => last,
    })
}

/// An entry chosen by click or Enter.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Goes into the query input.
    pub text: String,
    pub value: ResultValue,
    /// Whether `onSelect` should be called with `value`.
    pub notify: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum KeyOutcome {
    Unchanged,
    Highlight {
        previous: Option<usize>,
        current: usize,
    },
    Select(Selection),
}

/// Identifies the query a result set was computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

pub struct SearchState {
    results: Vec<SearchResult>,
    highlighted: Option<usize>,
    generation: u64,
    limit: usize,
    enter_action: EnterAction,
}

impl SearchState {
    pub fn new(limit: usize, enter_action: EnterAction) -> Self {
        Self {
            results: Vec::new(),
            highlighted: None,
            generation: 0,
            limit,
            enter_action,
        }
    }

    /// Start a new query. Results for any earlier ticket are stale from now on.
    pub fn begin_query(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    /// Install the results for `ticket`, capped to the limit, with no highlight.
    /// Returns false (and changes nothing) when a newer query has started.
    pub fn accept(&mut self, ticket: Ticket, results: Vec<SearchResult>) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.results = cap_results(results, self.limit);
        self.highlighted = None;
        true
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn handle_key(&mut self, action: KeyAction) -> KeyOutcome {
        match action {
            KeyAction::Next | KeyAction::Previous => {
                let previous = self.highlighted;
                match step_highlight(previous, action == KeyAction::Next, self.results.len()) {
                    Some(current) => {
                        self.highlighted = Some(current);
                        KeyOutcome::Highlight { previous, current }
                    }
                    None => KeyOutcome::Unchanged,
                }
            }
            KeyAction::Confirm => match self.highlighted.and_then(|i| self.results.get(i)) {
                Some(result) => KeyOutcome::Select(Selection {
                    text: result.text.clone(),
                    value: result.value.clone(),
                    notify: self.enter_action == EnterAction::Select,
                }),
                None => KeyOutcome::Unchanged,
            },
            KeyAction::Ignore => KeyOutcome::Unchanged,
        }
    }

    /// The selection made by clicking entry `index`.
    pub fn click(&self, index: usize) -> Option<Selection> {
        self.results.get(index).map(|result| Selection {
            text: result.text.clone(),
            value: result.value.clone(),
            notify: true,
        })
    }
}
